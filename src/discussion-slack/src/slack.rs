//! Slack Web API client.
//!
//! Delivery is judged by HTTP status alone. Slack also reports
//! application-level failures as `{"ok": false, "error": "..."}` with a 200
//! status; those are logged but do not fail the call.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::{DEFAULT_HTTP_TIMEOUT, DEFAULT_SLACK_API_URL, NotifierConfig};
use crate::error::{NotifierError, NotifierResult};
use crate::github::USER_AGENT;
use crate::message::OutboundMessage;

/// Slack's response envelope, as far as we look at it.
#[derive(Debug, Deserialize)]
struct SlackApiResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Client for posting messages to Slack.
#[derive(Clone)]
pub struct SlackClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl std::fmt::Debug for SlackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackClient")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl SlackClient {
    /// Create a client against `https://slack.com/api`.
    pub fn new(token: impl Into<String>) -> NotifierResult<Self> {
        Self::with_base_url(DEFAULT_SLACK_API_URL, token, DEFAULT_HTTP_TIMEOUT)
    }

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
            config.slack_api_url.clone(),
            config.slack_token(),
            config.http_timeout,
        )
    }

    /// Post a message with `chat.postMessage`.
    pub async fn post_message(&self, message: &OutboundMessage) -> NotifierResult<()> {
        let url = format!("{}/chat.postMessage", self.base_url.trim_end_matches('/'));
        debug!(%url, channel = %message.channel, "Posting message to Slack");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Content-Type", "application/json; charset=utf-8")
            .json(message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("unknown").to_string();
            return Err(NotifierError::Remote {
                status: status.as_u16(),
                reason,
            });
        }

        // The body only feeds the log; a read failure here is not a delivery failure.
        match response.json::<SlackApiResponse>().await {
            Ok(SlackApiResponse { ok: false, error }) => {
                warn!(
                    error = error.as_deref().unwrap_or("unknown"),
                    channel = %message.channel,
                    "Slack accepted the request but reported a failure"
                );
            }
            Ok(_) => {}
            Err(e) => debug!("Could not parse Slack response body: {}", e),
        }

        info!(channel = %message.channel, "Posted message to Slack");
        Ok(())
    }
}
