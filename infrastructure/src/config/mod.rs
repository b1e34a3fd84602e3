//! Configuration file loading for panel-desk
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `PANEL_DESK_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./panel-desk.toml` or `./.panel-desk.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/panel-desk/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileApiConfig, FileCacheConfig, FileConfig, FileDiscussionConfig,
    FileOutputConfig,
};
pub use loader::ConfigLoader;
