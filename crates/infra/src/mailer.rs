//! Outbound email.
//!
//! No delivery provider is wired in; [`LogMailer`] records messages in the
//! log so reset links are recoverable in development.

use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Error)]
#[error("failed to send email: {0}")]
pub struct MailError(pub String);

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: Email) -> Result<(), MailError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: Email) -> Result<(), MailError> {
        tracing::info!(to = %email.to, subject = %email.subject, "outbound email");
        tracing::debug!(body = %email.body, "outbound email body");
        Ok(())
    }
}

/// Collects sent mail; tests read it back with [`InMemoryMailer::sent`].
#[derive(Debug, Default)]
pub struct InMemoryMailer {
    outbox: Mutex<Vec<Email>>,
}

impl InMemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Email> {
        self.outbox
            .lock()
            .map(|outbox| outbox.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for InMemoryMailer {
    async fn send(&self, email: Email) -> Result<(), MailError> {
        self.outbox
            .lock()
            .map_err(|_| MailError("outbox lock poisoned".to_string()))?
            .push(email);
        Ok(())
    }
}
