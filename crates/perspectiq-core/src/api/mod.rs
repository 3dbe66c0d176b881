//! HTTP wrapper around the PerspectiQ backend.
//!
//! Every call goes through [`ApiClient::execute`]: JSON content type, bearer
//! token when one is stored, the configured timeout, and non-2xx responses
//! mapped to [`ApiError`].

mod error;
pub mod types;

use anyhow::{Context, Result};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use error::{ApiError, ApiErrorKind};
pub use types::*;

use crate::auth::Credentials;
use crate::config::Config;

const USER_AGENT: &str = concat!("perspectiq/", env!("CARGO_PKG_VERSION"));

/// Backend client. Cheap to clone (the underlying connection pool is shared).
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl ApiClient {
    /// Creates a client for `base_url` with an optional bearer token.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Option<std::time::Duration>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("build HTTP client")?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
            http,
        })
    }

    /// Creates a client from config and stored credentials.
    ///
    /// # Errors
    /// Returns an error if the backend URL is invalid.
    pub fn from_config(
        config: &Config,
        credentials: &Credentials,
        api_url_override: Option<&str>,
    ) -> Result<Self> {
        let base_url = config.resolve_api_base_url(api_url_override)?;
        Self::new(
            base_url,
            credentials.token.clone(),
            config.request_timeout(),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Returns a copy of this client using `token` for authorization.
    #[must_use]
    pub fn with_token(&self, token: Option<String>) -> Self {
        Self {
            base_url: self.base_url.clone(),
            token: token.filter(|t| !t.is_empty()),
            http: self.http.clone(),
        }
    }

    // ========================================================================
    // Auth
    // ========================================================================

    /// `POST /auth/login`
    ///
    /// # Errors
    /// Returns an [`ApiError`] (inside `anyhow`) on failure.
    pub async fn login(&self, req: &LoginRequest) -> Result<LoginResponse> {
        self.post("/auth/login", req).await
    }

    /// `GET /auth/me`
    ///
    /// # Errors
    /// Returns an [`ApiError`] (inside `anyhow`) on failure.
    pub async fn me(&self) -> Result<CurrentUser> {
        self.get("/auth/me").await
    }

    // ========================================================================
    // Chat
    // ========================================================================

    /// `GET /chat/personas`
    ///
    /// # Errors
    /// Returns an [`ApiError`] (inside `anyhow`) on failure.
    pub async fn personas(&self) -> Result<PersonasResponse> {
        self.get("/chat/personas").await
    }

    /// `POST /chat/start`
    ///
    /// # Errors
    /// Returns an [`ApiError`] (inside `anyhow`) on failure.
    pub async fn start_session(&self, req: &StartSessionRequest) -> Result<StartSessionResponse> {
        self.post("/chat/start", req).await
    }

    /// `POST /chat/message`
    ///
    /// # Errors
    /// Returns an [`ApiError`] (inside `anyhow`) on failure.
    pub async fn send_message(&self, req: &SendMessageRequest) -> Result<SendMessageResponse> {
        self.post("/chat/message", req).await
    }

    /// `GET /chat/messages/{session_id}`
    ///
    /// # Errors
    /// Returns an [`ApiError`] (inside `anyhow`) on failure.
    pub async fn messages(&self, session_id: i64) -> Result<GetMessagesResponse> {
        self.get(&format!("/chat/messages/{session_id}")).await
    }

    /// `POST /chat/end`
    ///
    /// # Errors
    /// Returns an [`ApiError`] (inside `anyhow`) on failure.
    pub async fn end_session(&self, session_id: i64) -> Result<EndSessionResponse> {
        self.post("/chat/end", &EndSessionRequest { session_id })
            .await
    }

    /// `GET /chat/history`
    ///
    /// # Errors
    /// Returns an [`ApiError`] (inside `anyhow`) on failure.
    pub async fn history(&self) -> Result<GetHistoryResponse> {
        self.get("/chat/history").await
    }

    /// `POST /chat/summary`
    ///
    /// # Errors
    /// Returns an [`ApiError`] (inside `anyhow`) on failure.
    pub async fn save_summary(&self, session_id: i64, summary: &str, evaluation: &str) -> Result<()> {
        let req = SaveSummaryRequest {
            session_id,
            summary: summary.to_string(),
            evaluation: evaluation.to_string(),
        };
        let _: serde_json::Value = self.post("/chat/summary", &req).await?;
        Ok(())
    }

    /// `DELETE /chat/delete/{session_id}`
    ///
    /// # Errors
    /// Returns an [`ApiError`] (inside `anyhow`) on failure.
    pub async fn delete_session(&self, session_id: i64) -> Result<DeleteSessionResponse> {
        let endpoint = format!("/chat/delete/{session_id}");
        self.execute(self.request(Method::DELETE, &endpoint), &endpoint)
            .await
    }

    // ========================================================================
    // System
    // ========================================================================

    /// `GET /health`
    ///
    /// # Errors
    /// Returns an [`ApiError`] (inside `anyhow`) on failure.
    pub async fn health(&self) -> Result<HealthResponse> {
        self.get("/health").await
    }

    // ========================================================================
    // Request plumbing
    // ========================================================================

    async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.execute(self.request(Method::GET, endpoint), endpoint)
            .await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        self.execute(self.request(Method::POST, endpoint).json(body), endpoint)
            .await
    }

    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, endpoint);
        let builder = self
            .http
            .request(method, url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json");
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        endpoint: &str,
    ) -> Result<T> {
        let response = builder.send().await.map_err(|e| {
            let err = error::classify_reqwest_error(&e);
            tracing::warn!(endpoint, kind = %err.kind, "request failed: {err}");
            err
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| error::classify_reqwest_error(&e))?;
        tracing::debug!(endpoint, status = status.as_u16(), "backend response");

        if !status.is_success() {
            tracing::warn!(endpoint, status = status.as_u16(), "backend error: {body}");
            return Err(ApiError::http_status(status.as_u16(), &body).into());
        }

        serde_json::from_str(&body).map_err(|e| {
            anyhow::Error::from(ApiError::parse(format!(
                "Invalid JSON from {endpoint}: {e}"
            )))
        })
    }
}

/// Extracts the [`ApiError`] from an `anyhow` chain, if any.
pub fn api_error(err: &anyhow::Error) -> Option<&ApiError> {
    err.chain().find_map(|e| e.downcast_ref::<ApiError>())
}
