//! Reveal delay port
//!
//! The pause between announcing a speaker and revealing their opinion.

use async_trait::async_trait;

/// Delay strategy for the staged reveal
#[async_trait]
pub trait RevealDelay: Send + Sync {
    /// Wait before revealing the opinion at `index`
    async fn wait(&self, index: usize);
}

/// Reveals immediately
pub struct NoDelay;

#[async_trait]
impl RevealDelay for NoDelay {
    async fn wait(&self, _index: usize) {}
}
