//! State management for transfer attempts.
//!
//! Holds the client-visible flow state and validates every transition against
//! a fixed table, publishing each change on the event bus.

pub mod flow;

pub use flow::{FlowState, FlowStateError, FlowStateMachine};
