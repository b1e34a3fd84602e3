//! Timer-backed reveal delay

use async_trait::async_trait;
use panel_application::RevealDelay;
use std::time::Duration;

/// Default pause between announcing a speaker and showing their opinion
pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(800);

/// Waits a fixed duration before every reveal
pub struct TokioRevealDelay {
    duration: Duration,
}

impl TokioRevealDelay {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Default for TokioRevealDelay {
    fn default() -> Self {
        Self::new(DEFAULT_REVEAL_DELAY)
    }
}

#[async_trait]
impl RevealDelay for TokioRevealDelay {
    async fn wait(&self, _index: usize) {
        if !self.duration.is_zero() {
            tokio::time::sleep(self.duration).await;
        }
    }
}
