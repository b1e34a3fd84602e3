//! Clock port

use chrono::{DateTime, Utc};

/// Source of the current time.
///
/// Injected so cache expiry and eviction can be tested with a manual clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}
