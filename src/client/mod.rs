//! HTTP client for the TYTC service.
//!
//! Every call is a single request bounded by a per-operation deadline. When the
//! deadline passes the in-flight request is dropped and reported as
//! [`ClientError::Timeout`], separately from transport failures.

mod form;

pub use form::*;

use std::future::Future;
use std::time::Duration;

use reqwest::{header, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::models::{
    fallback_articles, JoinRequest, JoinResponse, Member, MemberCount, MemberList, NewsArticle,
};

/// Count shown when the backend cannot be reached.
pub const FALLBACK_MEMBER_COUNT: i64 = 0;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Service root including the route prefix, e.g. `https://host/make-server-0d02a0b5`
    pub base_url: String,
    /// Bearer token sent with every request
    pub api_token: Option<String>,
    pub submit_timeout: Duration,
    pub count_timeout: Duration,
    pub init_timeout: Duration,
    /// Member list and news
    pub read_timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, api_token: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token,
            submit_timeout: Duration::from_secs(12),
            count_timeout: Duration::from_secs(6),
            init_timeout: Duration::from_secs(6),
            read_timeout: Duration::from_secs(8),
        }
    }
}

/// Client-side error taxonomy.
#[derive(Debug)]
pub enum ClientError {
    /// No response within the deadline; the request was cancelled
    Timeout(Duration),
    /// Connection or transport failure
    Network(String),
    /// Non-success HTTP status, with the server's error message if it sent one
    Server { status: u16, message: Option<String> },
    /// Response body did not match the expected shape
    Decode(String),
    /// Submission rejected before sending
    Validation(String),
}

impl ClientError {
    /// Message suitable for a user-facing notification.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Timeout(_) => "Request timed out. Please try again.".to_string(),
            ClientError::Network(_) | ClientError::Decode(_) => {
                "Network error. Please try again.".to_string()
            }
            ClientError::Server {
                message: Some(msg), ..
            } => msg.clone(),
            ClientError::Server { .. } => "Network error. Please try again.".to_string(),
            ClientError::Validation(msg) => msg.clone(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Timeout(_))
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Timeout(after) => write!(f, "request timed out after {:?}", after),
            ClientError::Network(msg) => write!(f, "network error: {}", msg),
            ClientError::Server { status, message } => match message {
                Some(msg) => write!(f, "HTTP {}: {}", status, msg),
                None => write!(f, "HTTP {}", status),
            },
            ClientError::Decode(msg) => write!(f, "invalid response: {}", msg),
            ClientError::Validation(msg) => write!(f, "invalid submission: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

/// Client for the TYTC endpoints.
#[derive(Debug, Clone)]
pub struct TytcClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl TytcClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = &config.api_token {
            let value = header::HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ClientError::Validation(format!("Invalid API token: {}", e)))?;
            headers.insert(header::AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url, endpoint)
    }

    /// GET /members/count
    pub async fn member_count(&self) -> Result<i64, ClientError> {
        let request = self.http.get(self.url("/members/count"));
        let body: MemberCount = send(request, self.config.count_timeout).await?;
        Ok(body.count)
    }

    /// Member count, or [`FALLBACK_MEMBER_COUNT`] when the fetch fails.
    pub async fn member_count_or_fallback(&self) -> i64 {
        match self.member_count().await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!("Error fetching member count: {}", e);
                FALLBACK_MEMBER_COUNT
            }
        }
    }

    /// POST /members/join
    pub async fn join(&self, request: &JoinRequest) -> Result<JoinResponse, ClientError> {
        let builder = self.http.post(self.url("/members/join")).json(request);
        send(builder, self.config.submit_timeout).await
    }

    /// GET /admin/members
    pub async fn list_members(&self) -> Result<Vec<Member>, ClientError> {
        let request = self.http.get(self.url("/admin/members"));
        let body: MemberList = send(request, self.config.read_timeout).await?;
        Ok(body.members)
    }

    /// GET /news
    pub async fn news(&self) -> Result<Vec<NewsArticle>, ClientError> {
        let request = self.http.get(self.url("/news"));
        send(request, self.config.read_timeout).await
    }

    /// News, or the built-in fallback articles when the fetch fails.
    pub async fn news_or_fallback(&self) -> Vec<NewsArticle> {
        match self.news().await {
            Ok(news) => news,
            Err(e) => {
                tracing::warn!("Error fetching news: {}", e);
                fallback_articles()
            }
        }
    }

    /// POST /init. Failures are logged and otherwise ignored.
    pub async fn initialize(&self) -> bool {
        let request = self.http.post(self.url("/init"));
        match send::<serde_json::Value>(request, self.config.init_timeout).await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("Error initializing data: {}", e);
                false
            }
        }
    }
}

/// Send a request and decode a JSON body, all within `timeout`.
async fn send<T: DeserializeOwned>(
    request: RequestBuilder,
    timeout: Duration,
) -> Result<T, ClientError> {
    with_deadline(timeout, send_and_decode(request)).await
}

async fn send_and_decode<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| body.get("error").and_then(|e| e.as_str()).map(String::from));
        return Err(ClientError::Server {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.json::<T>().await?)
}

/// Run `fut` with a deadline. On expiry the future is dropped, cancelling it.
async fn with_deadline<T, F>(timeout: Duration, fut: F) -> Result<T, ClientError>
where
    F: Future<Output = Result<T, ClientError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(ClientError::Timeout(timeout)),
    }
}
