//! Verification code and mail adapters.
//!
//! - `InMemoryVerificationCodeStore` / `RedisVerificationCodeStore`
//! - `InMemoryMailSender` - Records mail; real delivery is an external service

mod in_memory;
mod redis;

pub use in_memory::{InMemoryMailSender, InMemoryVerificationCodeStore};
pub use self::redis::RedisVerificationCodeStore;

/// Six random decimal digits, zero-padded.
pub(crate) fn generate_code() -> String {
    format!("{:06}", uuid::Uuid::new_v4().as_u128() % 1_000_000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_six_digits() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
