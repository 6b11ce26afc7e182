//! GitHub contents API client used to fetch the mention map.

use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::{DEFAULT_GITHUB_API_URL, DEFAULT_HTTP_TIMEOUT, NotifierConfig};
use crate::error::{NotifierError, NotifierResult};
use crate::mention::MentionMap;

/// User-Agent for HTTP requests. GitHub rejects requests without one.
pub const USER_AGENT: &str = concat!("discussion-slack/", env!("CARGO_PKG_VERSION"));

/// The part of a contents API response we read.
#[derive(Debug, Deserialize)]
struct ContentsEnvelope {
    /// File bytes as base64, wrapped with newlines every 60 characters.
    content: String,
}

/// Client for the GitHub REST API.
#[derive(Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl GitHubClient {
    /// Create a client against `https://api.github.com`.
    pub fn new(token: impl Into<String>) -> NotifierResult<Self> {
        Self::with_base_url(DEFAULT_GITHUB_API_URL, token, DEFAULT_HTTP_TIMEOUT)
    }

    /// Create a client against another API root, e.g. GitHub Enterprise or a test server.
    pub fn with_base_url(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> NotifierResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| NotifierError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            token: token.into(),
        })
    }

    /// Create the client described by the configuration.
    pub fn from_config(config: &NotifierConfig) -> NotifierResult<Self> {
        Self::with_base_url(
            config.github_api_url.clone(),
            config.github_token(),
            config.http_timeout,
        )
    }

    fn contents_url(&self, repository: &str, path: &str) -> String {
        let path = path
            .trim_start_matches('/')
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!(
            "{}/repos/{}/contents/{}",
            self.base_url.trim_end_matches('/'),
            repository,
            path
        )
    }

    /// Fetch the raw bytes of `path` in `repository` (`owner/name`).
    pub async fn fetch_file(&self, repository: &str, path: &str) -> NotifierResult<Vec<u8>> {
        let url = self.contents_url(repository, path);
        debug!(%url, "Fetching file from GitHub");

        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifierError::Remote {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("unknown").to_string(),
            });
        }

        let body = response.bytes().await?;
        decode_contents(&body)
    }

    /// Fetch and decode the mention map stored at `path` in `repository`.
    pub async fn fetch_mention_map(
        &self,
        repository: &str,
        path: &str,
    ) -> NotifierResult<MentionMap> {
        let bytes = self.fetch_file(repository, path).await?;
        let mentions: MentionMap = serde_json::from_slice(&bytes)
            .map_err(|e| NotifierError::Decode(format!("invalid mention map: {}", e)))?;

        info!(entries = mentions.len(), %repository, %path, "Loaded mention map");
        Ok(mentions)
    }
}

/// Decode the file bytes out of a contents API response body.
fn decode_contents(body: &[u8]) -> NotifierResult<Vec<u8>> {
    let envelope: ContentsEnvelope = serde_json::from_slice(body)
        .map_err(|e| NotifierError::Decode(format!("invalid contents response: {}", e)))?;

    let encoded: String = envelope
        .content
        .chars()
        .filter(|c| *c != '\n' && *c != '\r')
        .collect();

    Ok(BASE64.decode(encoded)?)
}
