//! Panel gateway port
//!
//! Defines the interface to the backend that generates panel discussions.

use async_trait::async_trait;
use panel_domain::{
    ArticleId, ConsensusSummary, Language, MarketData, MarketEvent, PanelOpinion,
};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while requesting a discussion
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Backend error ({status}): {}", message.as_deref().unwrap_or("no message"))]
    Backend { status: u16, message: Option<String> },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,
}

impl GatewayError {
    /// Message suitable for showing to the user, if the failure carried one.
    ///
    /// `None` means the caller should fall back to a generic notice.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            GatewayError::Backend { message, .. } => message.as_deref(),
            GatewayError::ConnectionError(message) => Some(message),
            GatewayError::InvalidResponse(_) | GatewayError::Timeout => None,
        }
    }
}

/// Body of a generation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelRequest {
    #[serde(skip)]
    pub article_id: ArticleId,
    pub regenerate: bool,
    pub language: Language,
}

impl PanelRequest {
    pub fn new(article_id: ArticleId, regenerate: bool, language: Language) -> Self {
        Self {
            article_id,
            regenerate,
            language,
        }
    }
}

/// A generated discussion as returned by the backend
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelResponse {
    /// Opinions in backend order
    pub discussion: Vec<PanelOpinion>,
    pub consensus: Option<ConsensusSummary>,
    pub market_data: Option<MarketData>,
    pub economic_calendar: Vec<MarketEvent>,
    /// Whether the backend served this from its own cache
    pub cached: bool,
}

/// Gateway to the panel-discussion backend
#[async_trait]
pub trait PanelGateway: Send + Sync {
    /// Generate (or fetch) the discussion for one article
    async fn generate_panel(&self, request: &PanelRequest) -> Result<PanelResponse, GatewayError>;
}
