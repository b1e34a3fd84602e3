//! Lifecycle phases of a panel discussion view

use serde::{Deserialize, Serialize};

/// Phase of one article's discussion view.
///
/// Transitions are linear: `Idle`/`LoadedFromCache` → `Generating` →
/// `Revealing` → `Complete`. `Error` is only reachable from `Generating`
/// and falls back to `Idle` once the failure has been reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscussionPhase {
    #[default]
    Idle,
    LoadedFromCache,
    Generating,
    Revealing,
    Complete,
    Error,
}

impl DiscussionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscussionPhase::Idle => "idle",
            DiscussionPhase::LoadedFromCache => "loaded_from_cache",
            DiscussionPhase::Generating => "generating",
            DiscussionPhase::Revealing => "revealing",
            DiscussionPhase::Complete => "complete",
            DiscussionPhase::Error => "error",
        }
    }

    /// Whether opinions are visible in full (no reveal pending)
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            DiscussionPhase::LoadedFromCache | DiscussionPhase::Complete
        )
    }
}

impl std::fmt::Display for DiscussionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
