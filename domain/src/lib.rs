//! Domain layer for panel-desk
//!
//! This crate contains the entities and value objects of a panel
//! discussion. It has no dependencies on infrastructure or presentation
//! concerns.
//!
//! # Core Concepts
//!
//! - **Panel discussion**: ordered opinions from a fixed roster of
//!   [`Persona`]s about one article, plus an optional consensus
//! - **Cached panel**: a finished discussion persisted per article,
//!   valid for one language and a limited time

pub mod core;
pub mod panel;

// Re-export commonly used types
pub use crate::core::{article::ArticleId, error::DomainError, language::Language};
pub use panel::{
    cached::{CachedPanel, CachedPanelSummary},
    consensus::{ConsensusSummary, consensus_level},
    market::{MarketData, MarketEvent, MarketSnapshot, PriceLevels, Technicals},
    opinion::{OpinionType, PanelOpinion, Sentiment},
    persona::{Persona, Speaker},
    phase::DiscussionPhase,
};
