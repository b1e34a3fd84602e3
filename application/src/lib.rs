//! Application layer for panel-desk
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{CacheParams, DEFAULT_CACHE_NAMESPACE};
pub use ports::{
    clock::Clock,
    discussion_observer::{DiscussionObserver, NoObserver, Notice, NoticeLevel},
    key_value_store::{KeyValueStore, StorageError},
    locale::LocaleProvider,
    panel_gateway::{GatewayError, PanelGateway, PanelRequest, PanelResponse},
    reveal_delay::{NoDelay, RevealDelay},
};
pub use use_cases::panel_cache::{CacheError, PanelCacheStore};
pub use use_cases::run_discussion::{
    DiscussionView, GenerateError, GenerationOutcome, PanelDiscussionController,
};
pub use use_cases::staged_reveal::{RevealEvent, staged_reveal};
