//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod clock;
pub mod discussion_observer;
pub mod key_value_store;
pub mod locale;
pub mod panel_gateway;
pub mod reveal_delay;
