//! Asynchronous action creators.
//!
//! Every operation follows the same shape: issue one request, and on a
//! success status parse the body and dispatch exactly one action into the
//! [`Store`](crate::store::Store). Non-success statuses and transport
//! failures are logged and returned as [`ClientError`] without touching the
//! store.

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

pub mod session;
pub mod spots;

pub const CSRF_HEADER: &str = "XSRF-Token";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed with status {status}: {body}")]
    Api { status: StatusCode, body: Value },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status(),
            ClientError::Decode(_) => None,
        }
    }
}

/// HTTP client for the spotbook API. Keeps the session cookie between calls.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    csrf_token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self::with_http(http, base_url))
    }

    pub fn with_http(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            csrf_token: None,
        }
    }

    /// Token echoed in the `XSRF-Token` header on every non-GET request.
    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mutating = method != Method::GET;
        let mut req = self
            .http
            .request(method, format!("{}{}", self.base_url, path));
        if mutating {
            if let Some(token) = &self.csrf_token {
                req = req.header(CSRF_HEADER, token);
            }
        }
        req
    }

    async fn send_raw(&self, req: RequestBuilder) -> Result<Vec<u8>, ClientError> {
        let res = req.send().await?;
        let status = res.status();
        let bytes = res.bytes().await?;
        if !status.is_success() {
            let body = serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
            return Err(ClientError::Api { status, body });
        }
        Ok(bytes.to_vec())
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
        let bytes = self.send_raw(req).await?;
        serde_json::from_slice(&bytes).map_err(ClientError::Decode)
    }
}
