//! # Notification Crate
//!
//! Sends HTML notifications over SMTP. The security mode is chosen from
//! configuration (`SSL`, `starttls`, anything else meaning plaintext) and
//! certificates are not verified, matching the relays the notifier is usually
//! pointed at.
//!
//! Delivery never fails the caller: [`deliver`] logs what went wrong and
//! reports whether the message left.

mod error;
pub mod smtp;

use async_trait::async_trait;
pub use error::Error;

/// A rendered email ready to be handed to a transport.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Email {
    /// Sender mailbox, e.g. `Cloud Portal <noreply@example.com>`.
    pub from: String,
    /// Recipient mailbox.
    pub to: String,
    pub subject: String,
    /// HTML body, sent as the only part of a multipart/alternative message.
    pub html: String,
}

/// Trait for notification clients that can send notifications.
#[async_trait]
pub trait NotificationClient: Send + Sync {
    /// Sends one email.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be built or no SMTP attempt
    /// delivered it.
    async fn send_notification(&self, email: &Email) -> Result<(), Error>;
}

/// Sends `email` and swallows any failure after logging it.
///
/// Returns `true` when the client reported success.
pub async fn deliver(client: &dyn NotificationClient, email: &Email) -> bool {
    tracing::info!(to = %email.to, "sending an email to: {}", email.to);

    if let Err(error) = client.send_notification(email).await {
        tracing::error!(%error, "{}", error.operator_hint());
        return false;
    }

    tracing::info!(to = %email.to, subject = %email.subject, "Email sent");
    true
}
