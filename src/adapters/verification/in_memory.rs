//! In-memory verification code store and recording mail sender.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{MailSender, OutgoingMail, VerificationCodeStore};

use super::generate_code;

#[derive(Debug, Clone)]
struct IssuedCode {
    code: String,
    expires_at: Instant,
}

/// In-memory code store. Expiry is checked when a code is verified.
#[derive(Debug, Clone, Default)]
pub struct InMemoryVerificationCodeStore {
    codes: Arc<RwLock<HashMap<String, IssuedCode>>>,
}

impl InMemoryVerificationCodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live code for a target, if one was issued and has not expired.
    pub async fn current_code(&self, target: &str) -> Option<String> {
        self.codes
            .read()
            .await
            .get(target)
            .filter(|issued| Instant::now() < issued.expires_at)
            .map(|issued| issued.code.clone())
    }
}

#[async_trait]
impl VerificationCodeStore for InMemoryVerificationCodeStore {
    async fn issue(&self, target: &str, ttl: Duration) -> Result<String, DomainError> {
        let code = generate_code();
        self.codes.write().await.insert(
            target.to_string(),
            IssuedCode {
                code: code.clone(),
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(code)
    }

    async fn verify(&self, target: &str, code: &str) -> Result<bool, DomainError> {
        Ok(self.current_code(target).await.as_deref() == Some(code))
    }
}

/// Mail sender that records every message instead of delivering it.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMailSender {
    sent: Arc<RwLock<Vec<OutgoingMail>>>,
    failing: Arc<AtomicBool>,
}

impl InMemoryMailSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent sends fail (or succeed again).
    pub fn fail_sends(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Messages accepted so far.
    pub async fn sent(&self) -> Vec<OutgoingMail> {
        self.sent.read().await.clone()
    }
}

#[async_trait]
impl MailSender for InMemoryMailSender {
    async fn send(&self, mail: &OutgoingMail) -> Result<usize, DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::MailError,
                format!("transport rejected mail to {}", mail.to),
            ));
        }
        self.sent.write().await.push(mail.clone());
        Ok(1)
    }
}
