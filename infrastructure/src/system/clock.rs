//! Wall-clock adapter

use chrono::{DateTime, SubsecRound, Utc};
use panel_application::Clock;

/// Current UTC time at millisecond precision, matching what the cache stores
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_has_millisecond_precision() {
        let now = SystemClock.now();
        assert_eq!(now.timestamp_subsec_nanos() % 1_000_000, 0);
        assert!(Utc::now() >= now);
    }
}
