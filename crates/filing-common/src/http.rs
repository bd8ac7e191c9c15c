use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::CommonError;

#[derive(Clone, Debug)]
pub struct HttpClientConfig {
    pub user_agent: String,
    /// Per-request timeout. `None` leaves it to the transport default.
    pub timeout: Option<Duration>,
    pub max_error_body_bytes: usize,
}

impl HttpClientConfig {
    pub fn from_env(default_user_agent: &str) -> Self {
        let user_agent = std::env::var("HTTP_USER_AGENT")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| default_user_agent.to_string());

        let timeout = std::env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|&n| n > 0)
            .map(Duration::from_secs);

        let max_error_body_bytes = std::env::var("HTTP_MAX_ERROR_BODY_BYTES")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(8 * 1024);

        Self {
            user_agent,
            timeout,
            max_error_body_bytes,
        }
    }
}

/// Thin JSON-over-HTTP client.
///
/// One pooled `reqwest::Client` is shared by every call; each request's connection is
/// handed back to the pool once its body has been read. Bodies are decoded with
/// `serde_json` regardless of the `Content-Type` the upstream sends.
#[derive(Clone)]
pub struct JsonClient {
    config: HttpClientConfig,
    http: reqwest::Client,
}

impl JsonClient {
    pub fn new(config: HttpClientConfig) -> Result<Self, CommonError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, CommonError> {
        debug!(url, "GET");
        let resp = self.with_timeout(self.http.get(url)).send().await?;
        Self::parse_json_response(resp, self.config.max_error_body_bytes).await
    }

    pub async fn post_json<B, T>(&self, url: &str, body: &B) -> Result<T, CommonError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(url, "POST");
        let resp = self
            .with_timeout(self.http.post(url))
            .json(body)
            .send()
            .await?;
        Self::parse_json_response(resp, self.config.max_error_body_bytes).await
    }

    fn with_timeout(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.config.timeout {
            Some(timeout) => req.timeout(timeout),
            None => req,
        }
    }

    async fn parse_json_response<T: DeserializeOwned>(
        resp: reqwest::Response,
        max_error_body_bytes: usize,
    ) -> Result<T, CommonError> {
        let status = resp.status();
        if status.is_success() {
            let bytes = resp.bytes().await?;
            return Ok(serde_json::from_slice(&bytes)?);
        }
        let body = read_limited_text(resp, max_error_body_bytes).await;
        Err(CommonError::Upstream { status, body })
    }
}

async fn read_limited_text(resp: reqwest::Response, max_bytes: usize) -> String {
    match resp.bytes().await {
        Ok(mut b) => {
            if b.len() > max_bytes {
                b.truncate(max_bytes);
            }
            String::from_utf8_lossy(&b).to_string()
        }
        Err(e) => {
            warn!(error = %e, "failed to read upstream error body");
            "<failed to read error body>".to_string()
        }
    }
}
