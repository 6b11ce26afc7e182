//! The end-to-end relay: event file in, Slack message out.

use tracing::info;

use crate::config::NotifierConfig;
use crate::error::{PipelineError, Stage, StageContext};
use crate::event::load_event;
use crate::github::GitHubClient;
use crate::mention::rewrite_mentions;
use crate::message::{OutboundMessage, format_message};
use crate::slack::SlackClient;

/// Run every stage once, in order, stopping at the first failure.
///
/// Returns the message that was delivered. When the mention map cannot be
/// fetched, Slack is never contacted.
pub async fn run(config: &NotifierConfig) -> Result<OutboundMessage, PipelineError> {
    let event = load_event(&config.event_path)
        .await
        .stage(Stage::LoadEvent)?;
    let text = format_message(&event);

    let github = GitHubClient::from_config(config).stage(Stage::FetchMentionMap)?;
    let mentions = github
        .fetch_mention_map(&config.repository, &config.mention_map_path)
        .await
        .stage(Stage::FetchMentionMap)?;

    let message = OutboundMessage::new(
        config.slack_channel.clone(),
        rewrite_mentions(&text, &mentions),
    );

    let slack = SlackClient::from_config(config).stage(Stage::PostMessage)?;
    slack
        .post_message(&message)
        .await
        .stage(Stage::PostMessage)?;

    info!(
        login = %event.comment.user.login,
        discussion = %event.discussion.html_url,
        "Relayed discussion comment"
    );
    Ok(message)
}
