//! Infrastructure layer for panel-desk
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod http;
pub mod storage;
pub mod system;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileApiConfig, FileCacheConfig, FileConfig,
    FileDiscussionConfig, FileOutputConfig,
};
pub use http::{HttpPanelGateway, normalize_panel_response};
pub use storage::{FileKeyValueStore, MemoryKeyValueStore};
pub use system::{DEFAULT_REVEAL_DELAY, FixedLocale, SystemClock, TokioRevealDelay};
