//! Verification ports - one-time codes and the mail transport that carries them.
//!
//! Delivery itself (SMTP, HTTP mail APIs) is an external collaborator; the
//! core only formats messages and hands them to a [`MailSender`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::foundation::DomainError;

/// Port for issuing and checking one-time verification codes.
#[async_trait]
pub trait VerificationCodeStore: Send + Sync {
    /// Issues a fresh code for `target` (an email address) valid for `ttl`.
    ///
    /// Issuing again replaces any previous code.
    async fn issue(&self, target: &str, ttl: Duration) -> Result<String, DomainError>;

    /// Returns true if `code` is the live code for `target`.
    async fn verify(&self, target: &str, code: &str) -> Result<bool, DomainError>;
}

/// A fully rendered outgoing email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMail {
    /// Sender mailbox, e.g. `LearnHub <no-reply@example.com>`.
    pub from: String,
    pub to: String,
    pub subject: String,
    pub content: String,
}

/// Port for handing mail to a transport.
#[async_trait]
pub trait MailSender: Send + Sync {
    /// Sends a message. Returns the number of accepted recipients.
    async fn send(&self, mail: &OutgoingMail) -> Result<usize, DomainError>;
}
