//! Outbound chat notifications.
//!
//! Notifications are best effort: callers go through [`notify_best_effort`],
//! which logs a failed send and carries on.

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;

pub const SLACK_POST_MESSAGE_URL: &str = "https://slack.com/api/chat.postMessage";

/// Errors that can occur while sending a notification.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The HTTP call failed, timed out, or returned a non-success status.
    #[error("Notification request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Slack answered but refused the message.
    #[error("Slack rejected the message: {0}")]
    Rejected(String),
}

/// A one-way message channel.
#[automock]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends `message`. Delivery is not guaranteed.
    async fn notify(&self, message: &str) -> Result<(), NotifyError>;
}

/// Posts messages to a Slack channel through `chat.postMessage`.
pub struct SlackNotifier {
    client: reqwest::Client,
    endpoint: String,
    token: String,
    channel: String,
}

#[derive(Debug, Serialize)]
struct PostMessageRequest<'a> {
    channel: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct PostMessageResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

impl SlackNotifier {
    pub fn new(
        token: impl Into<String>,
        channel: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: SLACK_POST_MESSAGE_URL.to_string(),
            token: token.into(),
            channel: channel.into(),
        })
    }

    /// Points the notifier at a different `chat.postMessage` URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    #[tracing::instrument(skip(self))]
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&PostMessageRequest {
                channel: &self.channel,
                text: message,
            })
            .send()
            .await?
            .error_for_status()?;

        let body: PostMessageResponse = response.json().await?;
        if body.ok {
            Ok(())
        } else {
            Err(NotifyError::Rejected(
                body.error.unwrap_or_else(|| "unknown_error".to_string()),
            ))
        }
    }
}

/// Stands in when no Slack token is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        tracing::debug!("Notifications disabled, dropping message: {}", message);
        Ok(())
    }
}

/// Builds the notifier described by `config`.
pub fn notifier_from_config(config: &Config) -> anyhow::Result<Arc<dyn Notifier>> {
    match config.slackbot_api_key.as_deref() {
        Some(token) if !token.trim().is_empty() => {
            let notifier =
                SlackNotifier::new(token, config.slack_channel.clone(), config.notify_timeout())?;
            tracing::info!("Slack notifications enabled for #{}", config.slack_channel);
            Ok(Arc::new(notifier))
        }
        _ => {
            tracing::warn!("SLACKBOT_API_KEY is not set, task notifications are disabled");
            Ok(Arc::new(NoopNotifier))
        }
    }
}

/// Sends `message` and logs instead of failing when the send does not go through.
pub async fn notify_best_effort(notifier: &dyn Notifier, message: &str) {
    if let Err(err) = notifier.notify(message).await {
        tracing::warn!("Failed to send notification: {}", err);
    }
}
