//! Registry trait for self-registering implementations.
//!
//! Wallet, token and relayer implementations each expose a `Registry` type
//! naming the configuration key they answer to and the factory that builds
//! them. The service binary collects these into factory maps.

/// Base trait for implementation registries.
pub trait ImplementationRegistry {
	/// The name used in configuration files to reference this implementation,
	/// for example `local` in `[wallet.implementations.local]` or `http` in
	/// `[relayer.implementations.http]`.
	const NAME: &'static str;

	/// The factory function type this implementation provides.
	type Factory;

	/// Returns the factory function that builds this implementation from its
	/// configuration table.
	fn factory() -> Self::Factory;
}
