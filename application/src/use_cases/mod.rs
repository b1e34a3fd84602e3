//! Use cases (application services)
//!
//! - [`panel_cache::PanelCacheStore`]: durable per-article discussion cache
//! - [`staged_reveal::staged_reveal`]: turn-by-turn opinion stream
//! - [`run_discussion::PanelDiscussionController`]: one article's discussion lifecycle

pub mod panel_cache;
pub mod run_discussion;
pub mod staged_reveal;

#[cfg(test)]
pub(crate) mod test_support;
