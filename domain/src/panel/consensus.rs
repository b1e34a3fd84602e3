//! Consensus summary and the derived consensus level

use super::opinion::PanelOpinion;
use serde::{Deserialize, Serialize};

/// Synthesized verdict for one article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsensusSummary {
    /// Free-form label such as "BUY" or "HOLD"
    pub recommendation: String,
    /// Confidence in the range 0-100
    pub confidence: u8,
    #[serde(default)]
    pub timeframe: String,
    #[serde(default)]
    pub risk_level: String,
    #[serde(default)]
    pub key_points: Vec<String>,
}

impl ConsensusSummary {
    /// Creates a summary; confidence is capped at 100.
    pub fn new(recommendation: impl Into<String>, confidence: u8) -> Self {
        Self {
            recommendation: recommendation.into(),
            confidence: confidence.min(100),
            timeframe: String::new(),
            risk_level: String::new(),
            key_points: Vec::new(),
        }
    }

    pub fn with_timeframe(mut self, timeframe: impl Into<String>) -> Self {
        self.timeframe = timeframe.into();
        self
    }

    pub fn with_risk_level(mut self, risk_level: impl Into<String>) -> Self {
        self.risk_level = risk_level.into();
        self
    }

    pub fn with_key_points(mut self, points: Vec<String>) -> Self {
        self.key_points = points;
        self
    }
}

/// Percentage of agreement across the given opinions.
///
/// Counts every agreement and disagreement point over all opinions and
/// returns `agreements / (agreements + disagreements) * 100`. With no
/// points at all the level is 100.
pub fn consensus_level(opinions: &[PanelOpinion]) -> f64 {
    let (agreements, disagreements) = opinions.iter().fold((0usize, 0usize), |(a, d), o| {
        (a + o.agreement_count(), d + o.disagreement_count())
    });
    let total = agreements + disagreements;
    if total == 0 {
        return 100.0;
    }
    agreements as f64 / total as f64 * 100.0
}
