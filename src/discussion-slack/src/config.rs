//! Configuration for the notification bridge.
//!
//! The configuration is read once at process start, from the environment
//! variables GitHub Actions provides (`INPUT_*` for action inputs), and then
//! passed into each stage. Nothing else reads the environment.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::error::{NotifierError, NotifierResult};

/// Default GitHub REST API base URL.
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Default Slack Web API base URL.
pub const DEFAULT_SLACK_API_URL: &str = "https://slack.com/api";

/// Default timeout applied to every HTTP request.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const ENV_EVENT_PATH: &str = "GITHUB_EVENT_PATH";
const ENV_REPOSITORY: &str = "GITHUB_REPOSITORY";
const ENV_MENTION_MAP_PATH: &str = "INPUT_SLACK_MENTION_MAP_PATH";
const ENV_GITHUB_TOKEN: &str = "INPUT_GITHUB_TOKEN";
const ENV_SLACK_TOKEN: &str = "INPUT_SLACK_API_TOKEN";
const ENV_SLACK_CHANNEL: &str = "INPUT_SLACK_CHANNEL";
const ENV_GITHUB_API_URL: &str = "GITHUB_API_URL";
const ENV_SLACK_API_URL: &str = "SLACK_API_URL";
const ENV_HTTP_TIMEOUT: &str = "INPUT_HTTP_TIMEOUT_SECS";

/// Everything a single run needs.
#[derive(Clone)]
pub struct NotifierConfig {
    /// Location of the event payload file.
    pub event_path: PathBuf,
    /// Repository holding the mention map, as `owner/name`.
    pub repository: String,
    /// Mention map path relative to the repository root.
    pub mention_map_path: String,
    /// Token for the GitHub contents API.
    github_token: SecretString,
    /// Bot token for the Slack Web API.
    slack_token: SecretString,
    /// Channel the message is posted to.
    pub slack_channel: String,
    /// GitHub REST API base URL.
    pub github_api_url: String,
    /// Slack Web API base URL.
    pub slack_api_url: String,
    /// Timeout for each HTTP request.
    pub http_timeout: Duration,
}

impl std::fmt::Debug for NotifierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifierConfig")
            .field("event_path", &self.event_path)
            .field("repository", &self.repository)
            .field("mention_map_path", &self.mention_map_path)
            .field("github_token", &"[REDACTED]")
            .field("slack_token", &"[REDACTED]")
            .field("slack_channel", &self.slack_channel)
            .field("github_api_url", &self.github_api_url)
            .field("slack_api_url", &self.slack_api_url)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

impl NotifierConfig {
    /// Create a configuration with the default API endpoints.
    pub fn new(
        event_path: impl Into<PathBuf>,
        repository: impl Into<String>,
        mention_map_path: impl Into<String>,
        github_token: impl Into<String>,
        slack_token: impl Into<String>,
        slack_channel: impl Into<String>,
    ) -> Self {
        Self {
            event_path: event_path.into(),
            repository: repository.into(),
            mention_map_path: mention_map_path.into(),
            github_token: SecretString::new(github_token.into().into()),
            slack_token: SecretString::new(slack_token.into().into()),
            slack_channel: slack_channel.into(),
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            slack_api_url: DEFAULT_SLACK_API_URL.to_string(),
            http_timeout: DEFAULT_HTTP_TIMEOUT,
        }
    }

    /// Point both API clients at other base URLs.
    pub fn with_api_urls(
        mut self,
        github_api_url: impl Into<String>,
        slack_api_url: impl Into<String>,
    ) -> Self {
        self.github_api_url = github_api_url.into();
        self.slack_api_url = slack_api_url.into();
        self
    }

    /// Override the per-request HTTP timeout.
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Required variables:
    /// - `GITHUB_EVENT_PATH`
    /// - `GITHUB_REPOSITORY`
    /// - `INPUT_SLACK_MENTION_MAP_PATH`
    /// - `INPUT_GITHUB_TOKEN`
    /// - `INPUT_SLACK_API_TOKEN`
    /// - `INPUT_SLACK_CHANNEL`
    ///
    /// Optional variables:
    /// - `GITHUB_API_URL`
    /// - `SLACK_API_URL`
    /// - `INPUT_HTTP_TIMEOUT_SECS`
    pub fn from_env() -> NotifierResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    ///
    /// Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> NotifierResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| NotifierError::Config(format!("{} not set", key)))
        };

        let event_path = require(ENV_EVENT_PATH)?;
        let repository = require(ENV_REPOSITORY)?;
        let mention_map_path = require(ENV_MENTION_MAP_PATH)?;
        let github_token = require(ENV_GITHUB_TOKEN)?;
        let slack_token = require(ENV_SLACK_TOKEN)?;
        let slack_channel = require(ENV_SLACK_CHANNEL)?;

        let mut config = Self::new(
            event_path,
            repository,
            mention_map_path,
            github_token,
            slack_token,
            slack_channel,
        );

        if let Some(url) = get(ENV_GITHUB_API_URL) {
            config.github_api_url = url;
        }
        if let Some(url) = get(ENV_SLACK_API_URL) {
            config.slack_api_url = url;
        }
        if let Some(secs) = get(ENV_HTTP_TIMEOUT) {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                NotifierError::Config(format!(
                    "{} must be a whole number of seconds, got {:?}",
                    ENV_HTTP_TIMEOUT, secs
                ))
            })?;
            config.http_timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        debug!(?config, "Loaded configuration");
        Ok(config)
    }

    /// Get the GitHub token.
    pub fn github_token(&self) -> &str {
        self.github_token.expose_secret()
    }

    /// Get the Slack bot token.
    pub fn slack_token(&self) -> &str {
        self.slack_token.expose_secret()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> NotifierResult<()> {
        if self.event_path.as_os_str().is_empty() {
            return Err(NotifierError::Config("Event path is empty".to_string()));
        }
        if self.repository.is_empty() {
            return Err(NotifierError::Config("Repository is empty".to_string()));
        }
        if self.mention_map_path.is_empty() {
            return Err(NotifierError::Config(
                "Mention map path is empty".to_string(),
            ));
        }
        if self.github_token.expose_secret().is_empty() {
            return Err(NotifierError::Config("GitHub token is empty".to_string()));
        }
        if self.slack_token.expose_secret().is_empty() {
            return Err(NotifierError::Config("Slack token is empty".to_string()));
        }
        if self.slack_channel.is_empty() {
            return Err(NotifierError::Config("Slack channel is empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn full_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            (ENV_EVENT_PATH, "/github/workflow/event.json"),
            (ENV_REPOSITORY, "octo/discussions"),
            (ENV_MENTION_MAP_PATH, ".github/slack-mentions.json"),
            (ENV_GITHUB_TOKEN, "ghs_secret"),
            (ENV_SLACK_TOKEN, "xoxb-secret"),
            (ENV_SLACK_CHANNEL, "C0123"),
        ])
    }

    fn load(env: &HashMap<&'static str, &'static str>) -> NotifierResult<NotifierConfig> {
        NotifierConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn test_config_from_lookup() {
        let config = load(&full_env()).expect("config should load");

        assert_eq!(
            config.event_path,
            PathBuf::from("/github/workflow/event.json")
        );
        assert_eq!(config.repository, "octo/discussions");
        assert_eq!(config.mention_map_path, ".github/slack-mentions.json");
        assert_eq!(config.github_token(), "ghs_secret");
        assert_eq!(config.slack_token(), "xoxb-secret");
        assert_eq!(config.slack_channel, "C0123");
        assert_eq!(config.github_api_url, DEFAULT_GITHUB_API_URL);
        assert_eq!(config.slack_api_url, DEFAULT_SLACK_API_URL);
        assert_eq!(config.http_timeout, DEFAULT_HTTP_TIMEOUT);
    }

    #[test]
    fn test_config_missing_variable() {
        for key in [
            ENV_EVENT_PATH,
            ENV_REPOSITORY,
            ENV_MENTION_MAP_PATH,
            ENV_GITHUB_TOKEN,
            ENV_SLACK_TOKEN,
            ENV_SLACK_CHANNEL,
        ] {
            let mut env = full_env();
            env.remove(key);
            let err = load(&env).unwrap_err();
            assert!(matches!(err, NotifierError::Config(_)));
            assert!(err.to_string().contains(key), "{} should be named", key);
        }
    }

    #[test]
    fn test_config_empty_variable_is_missing() {
        let mut env = full_env();
        env.insert(ENV_SLACK_CHANNEL, "");
        let err = load(&env).unwrap_err();
        assert!(err.to_string().contains(ENV_SLACK_CHANNEL));
    }

    #[test]
    fn test_config_overrides() {
        let mut env = full_env();
        env.insert(ENV_GITHUB_API_URL, "http://127.0.0.1:9000");
        env.insert(ENV_SLACK_API_URL, "http://127.0.0.1:9001/api");
        env.insert(ENV_HTTP_TIMEOUT, "5");
        let config = load(&env).unwrap();

        assert_eq!(config.github_api_url, "http://127.0.0.1:9000");
        assert_eq!(config.slack_api_url, "http://127.0.0.1:9001/api");
        assert_eq!(config.http_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_config_invalid_timeout() {
        let mut env = full_env();
        env.insert(ENV_HTTP_TIMEOUT, "soon");
        assert!(matches!(load(&env), Err(NotifierError::Config(_))));
    }

    #[test]
    fn test_config_repository_checked_for_presence_only() {
        let mut env = full_env();
        env.insert(ENV_REPOSITORY, "not-a-slug");
        let config = load(&env).expect("any non-empty repository is accepted");
        assert_eq!(config.repository, "not-a-slug");
    }

    #[test]
    fn test_config_debug_redacts_secrets() {
        let config = load(&full_env()).unwrap();

        let debug_str = format!("{:?}", config);
        assert!(!debug_str.contains("ghs_secret"));
        assert!(!debug_str.contains("xoxb-secret"));
        assert!(debug_str.contains("[REDACTED]"));
    }
}
