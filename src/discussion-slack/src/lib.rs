//! Relays GitHub Discussion comments to Slack.
//!
//! One run reads a `discussion_comment` event payload, renders a one-line
//! message, rewrites `@login` mentions into Slack member mentions using a
//! JSON map stored in the repository, and posts the result with
//! `chat.postMessage`.
//!
//! # Example
//!
//! ```rust,ignore
//! use discussion_slack::{NotifierConfig, pipeline};
//!
//! let config = NotifierConfig::from_env()?;
//! pipeline::run(&config).await?;
//! ```
//!
//! # Configuration
//!
//! Required environment variables:
//! - `GITHUB_EVENT_PATH` - Event payload file
//! - `GITHUB_REPOSITORY` - Repository holding the mention map (`owner/name`)
//! - `INPUT_SLACK_MENTION_MAP_PATH` - Mention map path inside the repository
//! - `INPUT_GITHUB_TOKEN` - Token for the GitHub contents API
//! - `INPUT_SLACK_API_TOKEN` - Slack bot token (xoxb-...)
//! - `INPUT_SLACK_CHANNEL` - Target channel
//!
//! Optional:
//! - `GITHUB_API_URL` - GitHub API root
//! - `SLACK_API_URL` - Slack Web API root
//! - `INPUT_HTTP_TIMEOUT_SECS` - Per-request timeout

pub mod config;
pub mod error;
pub mod event;
pub mod github;
pub mod mention;
pub mod message;
pub mod pipeline;
pub mod slack;

// Re-export main types
pub use config::NotifierConfig;
pub use error::{NotifierError, NotifierResult, PipelineError, Stage};
pub use event::{Event, load_event};
pub use github::GitHubClient;
pub use mention::{MentionMap, rewrite_mentions};
pub use message::{OutboundMessage, format_message};
pub use slack::SlackClient;
