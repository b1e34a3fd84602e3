//! Discussion observer port
//!
//! Defines the callbacks a presenter receives while a discussion is
//! generated and revealed.

use panel_domain::{ConsensusSummary, DiscussionPhase, PanelOpinion, Speaker};

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Ephemeral, non-blocking message for the user (toast)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Callback for updates while a discussion is generated
///
/// Implementations live in the presentation layer. Every method has a
/// no-op default.
pub trait DiscussionObserver: Send + Sync {
    /// Called on every phase transition
    fn on_phase_change(&self, _phase: DiscussionPhase) {}

    /// Called when the next speaker is announced, before the reveal delay
    fn on_speaker(&self, _speaker: &Speaker) {}

    /// Called when an opinion becomes visible
    fn on_opinion_revealed(&self, _index: usize, _opinion: &PanelOpinion) {}

    /// Called when the consensus summary becomes visible
    fn on_consensus(&self, _consensus: &ConsensusSummary) {}

    /// Called with a user-facing notice
    fn on_notice(&self, _notice: &Notice) {}
}

/// No-op observer for when nothing is displayed
pub struct NoObserver;

impl DiscussionObserver for NoObserver {}
