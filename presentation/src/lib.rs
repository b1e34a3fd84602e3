//! Presentation layer for panel-desk
//!
//! This crate contains CLI definitions, output formatters,
//! and progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{CacheCommand, Cli, Command, DiscussArgs, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{RevealReporter, SimpleReveal};
