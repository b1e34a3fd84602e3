//! HTTP adapter for the panel-discussion backend.

mod gateway;
pub mod response;

pub use gateway::HttpPanelGateway;
pub use response::{extract_error_message, normalize_panel_response};
