//! Transactional mail handlers.

mod verify_mailer;

pub use verify_mailer::{VerifyMailer, VerifyMailerConfig, VERIFY_SUBJECT};
