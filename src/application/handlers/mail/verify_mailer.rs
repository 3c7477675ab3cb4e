//! VerifyMailer - Sends one-time email verification codes.

use std::sync::Arc;
use std::time::Duration;

use crate::config::EmailConfig;
use crate::domain::foundation::DomainError;
use crate::ports::{MailSender, OutgoingMail, VerificationCodeStore};

pub const VERIFY_SUBJECT: &str = "Email verification code";

/// Sender identity and code lifetime.
#[derive(Debug, Clone)]
pub struct VerifyMailerConfig {
    pub from: String,
    pub code_ttl_minutes: u64,
}

impl From<&EmailConfig> for VerifyMailerConfig {
    fn from(config: &EmailConfig) -> Self {
        Self {
            from: config.from_header(),
            code_ttl_minutes: config.code_ttl_minutes,
        }
    }
}

pub struct VerifyMailer {
    codes: Arc<dyn VerificationCodeStore>,
    sender: Arc<dyn MailSender>,
    config: VerifyMailerConfig,
}

impl VerifyMailer {
    pub fn new(
        codes: Arc<dyn VerificationCodeStore>,
        sender: Arc<dyn MailSender>,
        config: VerifyMailerConfig,
    ) -> Self {
        Self {
            codes,
            sender,
            config,
        }
    }

    /// Issues a code for `email` and mails it.
    ///
    /// Returns true when the transport accepted at least one recipient.
    /// Failures are logged, never returned.
    pub async fn send(&self, email: &str) -> bool {
        match self.try_send(email).await {
            Ok(accepted) => accepted > 0,
            Err(err) => {
                tracing::error!(
                    code = %err.code,
                    message = %err.message,
                    "Send verify mail failed"
                );
                false
            }
        }
    }

    async fn try_send(&self, email: &str) -> Result<usize, DomainError> {
        let minutes = self.config.code_ttl_minutes;
        let code = self
            .codes
            .issue(email, Duration::from_secs(60 * minutes))
            .await?;

        let mail = OutgoingMail {
            from: self.config.from.clone(),
            to: email.to_string(),
            subject: VERIFY_SUBJECT.to_string(),
            content: format_content(&code, minutes),
        };

        self.sender.send(&mail).await
    }
}

fn format_content(code: &str, minutes: u64) -> String {
    format!(
        "Verification code: {}, valid for {} minutes. If you did not request this, please ignore it.",
        code, minutes
    )
}
