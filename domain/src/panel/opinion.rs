//! Panel opinion entity - one analyst's contribution to a discussion

use super::persona::Persona;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Position of an opinion within the discussion.
///
/// Classifies the opinion only; the order of opinions is always the
/// order the backend returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpinionType {
    #[default]
    Analysis,
    Response,
    Synthesis,
}

impl OpinionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpinionType::Analysis => "analysis",
            OpinionType::Response => "response",
            OpinionType::Synthesis => "synthesis",
        }
    }
}

impl std::str::FromStr for OpinionType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "analysis" => Ok(OpinionType::Analysis),
            "response" => Ok(OpinionType::Response),
            "synthesis" => Ok(OpinionType::Synthesis),
            _ => Err(()),
        }
    }
}

/// Market direction an analyst leans towards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

impl std::str::FromStr for Sentiment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bullish" => Ok(Sentiment::Bullish),
            "bearish" => Ok(Sentiment::Bearish),
            "neutral" => Ok(Sentiment::Neutral),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Sentiment::Bullish => "bullish",
            Sentiment::Bearish => "bearish",
            Sentiment::Neutral => "neutral",
        };
        write!(f, "{}", s)
    }
}

/// One contributor's analysis of one article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelOpinion {
    /// Model label of the contributing persona
    pub model: String,
    pub role: String,
    pub icon: String,
    pub color: String,
    /// Formatted message body
    pub message: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type", default)]
    pub opinion_type: OpinionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agrees_with_points: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disagrees_with_points: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_insights: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
    /// Confidence in the range 0-1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_points: Option<Vec<String>>,
}

impl PanelOpinion {
    /// Creates an opinion styled after the given persona.
    ///
    /// The timestamp is truncated to milliseconds, the precision it is
    /// stored with.
    pub fn from_persona(
        persona: Persona,
        message: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            model: persona.display_name().to_string(),
            role: persona.role().to_string(),
            icon: persona.icon().to_string(),
            color: persona.color().to_string(),
            message: message.into(),
            timestamp: timestamp.trunc_subsecs(3),
            opinion_type: OpinionType::Analysis,
            agrees_with_points: None,
            disagrees_with_points: None,
            new_insights: None,
            sentiment: None,
            confidence: None,
            key_points: None,
        }
    }

    pub fn with_type(mut self, opinion_type: OpinionType) -> Self {
        self.opinion_type = opinion_type;
        self
    }

    pub fn with_agreements(mut self, points: Vec<String>) -> Self {
        self.agrees_with_points = Some(points);
        self
    }

    pub fn with_disagreements(mut self, points: Vec<String>) -> Self {
        self.disagrees_with_points = Some(points);
        self
    }

    pub fn with_sentiment(mut self, sentiment: Sentiment) -> Self {
        self.sentiment = Some(sentiment);
        self
    }

    /// Sets the confidence, clamped to 0-1.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence.clamp(0.0, 1.0));
        self
    }

    /// Persona this opinion belongs to, if the model label is on the roster
    pub fn persona(&self) -> Option<Persona> {
        Persona::resolve(&self.model)
    }

    pub fn agreement_count(&self) -> usize {
        self.agrees_with_points.as_ref().map_or(0, Vec::len)
    }

    pub fn disagreement_count(&self) -> usize {
        self.disagrees_with_points.as_ref().map_or(0, Vec::len)
    }
}
