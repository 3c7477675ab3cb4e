//! Email configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Sender identity and verification code lifetime.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    #[serde(default = "default_from_email")]
    pub from_email: String,

    #[serde(default = "default_from_name")]
    pub from_name: String,

    /// Minutes a verification code stays valid
    #[serde(default = "default_code_ttl_minutes")]
    pub code_ttl_minutes: u64,
}

impl EmailConfig {
    /// Get formatted "From" header value
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.from_email.contains('@') {
            return Err(ValidationError::InvalidFromEmail);
        }
        if self.code_ttl_minutes == 0 || self.code_ttl_minutes > 60 {
            return Err(ValidationError::InvalidCodeTtl);
        }
        Ok(())
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            from_email: default_from_email(),
            from_name: default_from_name(),
            code_ttl_minutes: default_code_ttl_minutes(),
        }
    }
}

fn default_from_email() -> String {
    "no-reply@learnhub.local".to_string()
}

fn default_from_name() -> String {
    "LearnHub".to_string()
}

fn default_code_ttl_minutes() -> u64 {
    5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_config_defaults() {
        let config = EmailConfig::default();
        assert_eq!(config.from_email, "no-reply@learnhub.local");
        assert_eq!(config.code_ttl_minutes, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_header() {
        let config = EmailConfig {
            from_email: "support@example.com".to_string(),
            from_name: "Support Team".to_string(),
            ..Default::default()
        };
        assert_eq!(config.from_header(), "Support Team <support@example.com>");
    }

    #[test]
    fn test_validation_invalid_from_email() {
        let config = EmailConfig {
            from_email: "invalid-email".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ValidationError::InvalidFromEmail)));
    }

    #[test]
    fn test_validation_code_ttl_bounds() {
        let config = EmailConfig {
            code_ttl_minutes: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ValidationError::InvalidCodeTtl)));
    }
}
