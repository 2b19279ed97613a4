//! Builders for constructing configuration objects in tests.

pub mod config;

pub use config::ConfigBuilder;
