//! GitHub `discussion_comment` event payload.
//!
//! Only the fields the message needs are modelled. Every field defaults to
//! empty when absent or `null`, so partial payloads decode into a partially
//! filled event instead of failing.

use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::error::{NotifierError, NotifierResult};

/// The action GitHub sends when a comment is added to a discussion.
pub const ACTION_CREATED: &str = "created";

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Event {
    #[serde(deserialize_with = "null_as_default")]
    pub action: String,
    #[serde(deserialize_with = "null_as_default")]
    pub comment: Comment,
    #[serde(deserialize_with = "null_as_default")]
    pub discussion: Discussion,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Comment {
    #[serde(deserialize_with = "null_as_default")]
    pub body: String,
    #[serde(deserialize_with = "null_as_default")]
    pub html_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub user: User,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct User {
    #[serde(deserialize_with = "null_as_default")]
    pub login: String,
    #[serde(deserialize_with = "null_as_default")]
    pub html_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub avatar_url: String,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Discussion {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub html_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub category: Category,
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Category {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
}

/// Treat an explicit `null` like an absent key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Read and decode the event payload at `path`.
///
/// A missing file yields [`Event::default`] rather than an error, which
/// keeps dry runs without an event file working.
pub async fn load_event(path: &Path) -> NotifierResult<Event> {
    if path.as_os_str().is_empty() {
        return Err(NotifierError::Config(
            "event path not provided".to_string(),
        ));
    }

    let data = match tokio::fs::read(path).await {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "Event file not found, using an empty event");
            return Ok(Event::default());
        }
        Err(source) => {
            return Err(NotifierError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    debug!(path = %path.display(), bytes = data.len(), "Read event payload");

    // A bare `null` payload decodes to the empty event.
    let event: Event = serde_json::from_slice::<Option<Event>>(&data)
        .map_err(|e| NotifierError::Decode(format!("invalid event payload: {}", e)))?
        .unwrap_or_default();

    if event.action != ACTION_CREATED {
        warn!(action = %event.action, "Unexpected discussion comment action");
    }

    Ok(event)
}
