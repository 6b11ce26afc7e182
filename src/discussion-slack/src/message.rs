//! Message formatting for Slack.

use serde::{Deserialize, Serialize};

use crate::event::Event;

/// Render the one-line notification for a discussion comment.
///
/// Fields are substituted verbatim. Markdown characters in the title or the
/// body are not escaped, so a title containing `]` can break the link.
///
/// # Example
///
/// ```rust
/// use discussion_slack::event::Event;
/// use discussion_slack::format_message;
///
/// let mut event = Event::default();
/// event.comment.user.login = "bob".into();
/// event.comment.body = "lgtm".into();
/// assert!(format_message(&event).starts_with("New comment by [bob]"));
/// ```
pub fn format_message(event: &Event) -> String {
    format!(
        "New comment by [{}]({}) on [{}]({}) in category {}: {}",
        event.comment.user.login,
        event.comment.user.html_url,
        event.discussion.title,
        event.discussion.html_url,
        event.discussion.category.name,
        event.comment.body,
    )
}

/// Payload for Slack's `chat.postMessage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Channel ID or name.
    pub channel: String,
    /// Final message text, mentions already rewritten.
    pub text: String,
}

impl OutboundMessage {
    pub fn new(channel: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            text: text.into(),
        }
    }
}
