//! Application-level configuration.
//!
//! - [`CacheParams`]: panel cache TTL, capacity and storage key

pub mod cache_params;

pub use cache_params::{CacheParams, DEFAULT_CACHE_NAMESPACE};
