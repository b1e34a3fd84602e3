//! Cached panel entity - the persisted unit of the panel cache

use super::consensus::ConsensusSummary;
use super::market::MarketData;
use super::opinion::PanelOpinion;
use crate::core::{article::ArticleId, language::Language};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A previously generated discussion stored for one article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedPanel {
    pub article_id: ArticleId,
    pub opinions: Vec<PanelOpinion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consensus: Option<ConsensusSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_data: Option<MarketData>,
    /// When the entry was cached
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub language: Language,
}

impl CachedPanel {
    /// Whether more than `ttl` has elapsed between caching and `now`
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.timestamp > ttl
    }

    pub fn summary(&self) -> CachedPanelSummary {
        CachedPanelSummary {
            article_id: self.article_id.clone(),
            opinion_count: self.opinions.len(),
            recommendation: self.consensus.as_ref().map(|c| c.recommendation.clone()),
            timestamp: self.timestamp,
            language: self.language.clone(),
        }
    }
}

/// Listing view of a cached panel
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedPanelSummary {
    pub article_id: ArticleId,
    pub opinion_count: usize,
    pub recommendation: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub language: Language,
}
