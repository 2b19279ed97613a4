//! Wall-clock source for authorization validity windows.

use gasless_types::utils::current_timestamp;

/// Source of the current unix time in seconds.
pub trait Clock: Send + Sync {
	fn now(&self) -> u64;
}

/// Reads the system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now(&self) -> u64 {
		current_timestamp()
	}
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
	fn now(&self) -> u64 {
		self.0
	}
}
