//! HTTP panel gateway implementation

use super::response::{extract_error_message, normalize_panel_response};
use async_trait::async_trait;
use chrono::Utc;
use panel_application::{GatewayError, PanelGateway, PanelRequest, PanelResponse};
use panel_domain::ArticleId;
use reqwest::Url;
use std::time::Duration;
use tracing::{debug, info};

const USER_AGENT: &str = concat!("panel-desk/", env!("CARGO_PKG_VERSION"));

/// Panel gateway talking to the news backend over HTTP
///
/// Issues `POST {base_url}/api/panel-discussion/{articleId}` with a
/// `{ regenerate, language }` JSON body.
pub struct HttpPanelGateway {
    client: reqwest::Client,
    base_url: Url,
    auth_token: Option<String>,
}

impl HttpPanelGateway {
    /// Create a gateway for the given backend base URL
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let base_url = Url::parse(base_url).map_err(|e| {
            GatewayError::ConnectionError(format!("Invalid base URL {:?}: {}", base_url, e))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::ConnectionError(format!(
                "Invalid base URL {:?}",
                base_url.as_str()
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;

        info!("HttpPanelGateway initialized for {}", base_url);

        Ok(Self {
            client,
            base_url,
            auth_token: None,
        })
    }

    /// Send a bearer token with every request
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// URL of the generation endpoint for an article
    pub fn endpoint(&self, article_id: &ArticleId) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["api", "panel-discussion", article_id.as_str()]);
        }
        url
    }
}

fn map_transport_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::ConnectionError(e.to_string())
    }
}

#[async_trait]
impl PanelGateway for HttpPanelGateway {
    async fn generate_panel(&self, request: &PanelRequest) -> Result<PanelResponse, GatewayError> {
        let url = self.endpoint(&request.article_id);
        debug!(
            "POST {} (regenerate: {}, language: {})",
            url, request.regenerate, request.language
        );

        let mut builder = self.client.post(url).json(request);
        if let Some(token) = &self.auth_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let text = response.text().await.map_err(map_transport_error)?;

        if !status.is_success() {
            return Err(GatewayError::Backend {
                status: status.as_u16(),
                message: extract_error_message(&text),
            });
        }

        let body: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        normalize_panel_response(body, Utc::now())
    }
}
