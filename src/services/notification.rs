//! Outbound member notifications.
//!
//! Delivery is best-effort: every recipient gets its own detached task, and a
//! failed delivery is logged without affecting the caller or other recipients.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::models::Activity;
use crate::utils::error::{AppError, AppResult};

const RELAY_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub text: String,
}

impl Notification {
    pub fn activity_announcement(activity: &Activity) -> Self {
        Self {
            subject: format!("New activity: {}", activity.title),
            text: format!(
                "A new activity has been scheduled.\n\n{}\n{}\n\nDate: {}\nTime: {}\nLocation: {}\n\nPlease confirm or decline your participation.",
                activity.title,
                activity.description,
                activity.date.format("%Y-%m-%d"),
                activity.time,
                activity.location,
            ),
        }
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, to: &str, notification: &Notification) -> AppResult<()>;
}

/// Used when no mail relay is configured; records what would have been sent.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, to: &str, notification: &Notification) -> AppResult<()> {
        info!(recipient = %to, subject = %notification.subject, "Notification (not delivered, no relay configured)");
        Ok(())
    }
}

#[derive(Serialize)]
struct RelayMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

/// Hands messages to an HTTP mail relay as JSON.
pub struct MailRelayNotifier {
    client: reqwest::Client,
    endpoint: String,
    from: String,
}

impl MailRelayNotifier {
    pub fn new(endpoint: impl Into<String>, from: impl Into<String>) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(RELAY_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::InternalServerError(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            from: from.into(),
        })
    }
}

#[async_trait]
impl Notifier for MailRelayNotifier {
    async fn send(&self, to: &str, notification: &Notification) -> AppResult<()> {
        let message = RelayMessage {
            from: &self.from,
            to,
            subject: &notification.subject,
            text: &notification.text,
        };

        self.client
            .post(&self.endpoint)
            .json(&message)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|e| AppError::ExternalServiceError(format!("Mail relay request failed: {}", e)))?;

        debug!(recipient = %to, "Notification handed to mail relay");
        Ok(())
    }
}

/// Spawns one delivery task per recipient. Callers that do not care about
/// completion simply drop the returned handles.
pub fn dispatch(
    notifier: Arc<dyn Notifier>,
    recipients: Vec<String>,
    notification: Notification,
) -> Vec<JoinHandle<()>> {
    let notification = Arc::new(notification);

    recipients
        .into_iter()
        .map(|recipient| {
            let notifier = Arc::clone(&notifier);
            let notification = Arc::clone(&notification);
            tokio::spawn(async move {
                if let Err(e) = notifier.send(&recipient, &notification).await {
                    warn!(recipient = %recipient, error = %e, "Failed to deliver notification");
                }
            })
        })
        .collect()
}
