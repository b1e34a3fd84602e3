//! Panel discussion domain
//!
//! Types describing a multi-persona analysis of a news article:
//! the individual [`opinion::PanelOpinion`]s, the optional
//! [`consensus::ConsensusSummary`], market data, and the persisted
//! [`cached::CachedPanel`].

pub mod cached;
pub mod consensus;
pub mod market;
pub mod opinion;
pub mod persona;
pub mod phase;
