// Quotation backend API: typed client, payloads and error normalization

pub mod error;
pub mod pricing;
pub mod types;

pub use error::{error_from_response, ApiError, NETWORK_ERROR_MESSAGE};
pub use pricing::{pricing_request_from, PricingRequestError, MIN_QUANTITY};
pub use types::{
    AnalyzeRequest, ChatReply, Coating, ConversationHistory, HealthStatus, HistoryEntry,
    PricingDimensions, PricingRequest, PricingResponse, ResetResponse, SendMessageRequest,
    SessionInfo, Stamping,
};

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;

use crate::config::StudioConfig;
use crate::models::StrengthAnalysis;

/// Conversation calls the session synchronizer depends on.
///
/// [`ApiClient`] is the production implementation; tests substitute their own.
pub trait ChatBackend: Send + Sync + 'static {
    fn send_message(
        &self,
        message: &str,
        session_id: Option<&str>,
    ) -> impl Future<Output = Result<ChatReply, ApiError>> + Send;

    fn reset_session(
        &self,
        session_id: &str,
    ) -> impl Future<Output = Result<ResetResponse, ApiError>> + Send;

    fn get_session(
        &self,
        session_id: &str,
    ) -> impl Future<Output = Result<SessionInfo, ApiError>> + Send;

    fn get_history(
        &self,
        session_id: &str,
        limit: Option<usize>,
    ) -> impl Future<Output = Result<ConversationHistory, ApiError>> + Send;
}

/// HTTP client for the quotation backend
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client from the effective configuration
    pub fn new(config: &StudioConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| ApiError::Setup(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header(reqwest::header::ACCEPT, "application/json")
    }

    /// Send a request and decode its JSON body. 204 responses yield `None`.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Option<T>, ApiError> {
        let response = request.send().await.map_err(|e| {
            log::warn!("Backend request failed: {}", e);
            ApiError::network(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let err = error_from_response(status.as_u16(), &body);
            log::warn!("Backend returned {}: {}", status, err);
            return Err(err);
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body = response.bytes().await.map_err(ApiError::network)?;
        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|e| ApiError::Decode {
                message: e.to_string(),
                status: status.as_u16(),
            })
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        self.execute(request).await?.ok_or_else(|| ApiError::Decode {
            message: "empty response body".to_string(),
            status: StatusCode::NO_CONTENT.as_u16(),
        })
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.fetch(self.request(Method::POST, path).json(body)).await
    }

    /// Delete a session on the backend
    pub async fn delete_session(&self, session_id: &str) -> Result<(), ApiError> {
        let path = format!("/api/chat/session/{}", session_id);
        self.execute::<serde_json::Value>(self.request(Method::DELETE, &path))
            .await
            .map(|_| ())
    }

    /// Price a box specification
    pub async fn calculate_price(
        &self,
        request: &PricingRequest,
    ) -> Result<PricingResponse, ApiError> {
        self.post_json("/api/pricing/calculate", request).await
    }

    /// Run the box compression strength analysis
    pub async fn analyze_strength(
        &self,
        request: &AnalyzeRequest,
    ) -> Result<StrengthAnalysis, ApiError> {
        self.post_json("/analyze", request).await
    }

    /// Raw health payload
    pub async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.fetch(self.request(Method::GET, "/health")).await
    }

    /// Whether the backend is up; every failure counts as down
    pub async fn check_health(&self) -> bool {
        match self.health().await {
            Ok(_) => true,
            Err(e) => {
                log::debug!("Health check failed: {}", e);
                false
            }
        }
    }
}

impl ChatBackend for ApiClient {
    async fn send_message(
        &self,
        message: &str,
        session_id: Option<&str>,
    ) -> Result<ChatReply, ApiError> {
        let body = SendMessageRequest {
            message,
            session_id,
        };
        self.post_json("/api/chat/message", &body).await
    }

    async fn reset_session(&self, session_id: &str) -> Result<ResetResponse, ApiError> {
        let path = format!("/api/chat/session/{}/reset", session_id);
        self.fetch(self.request(Method::POST, &path)).await
    }

    async fn get_session(&self, session_id: &str) -> Result<SessionInfo, ApiError> {
        let path = format!("/api/chat/session/{}", session_id);
        self.fetch(self.request(Method::GET, &path)).await
    }

    async fn get_history(
        &self,
        session_id: &str,
        limit: Option<usize>,
    ) -> Result<ConversationHistory, ApiError> {
        let path = match limit {
            Some(n) => format!("/api/chat/session/{}/history?limit={}", session_id, n),
            None => format!("/api/chat/session/{}/history", session_id),
        };
        self.fetch(self.request(Method::GET, &path)).await
    }
}
