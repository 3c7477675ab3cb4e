//! Clamp policy applied when a counter adjustment would go below zero.

use serde::Deserialize;

/// What the counter cache does with values that would drop below zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClampPolicy {
    /// Store the raw algebraic result, negatives included.
    #[default]
    Unclamped,
    /// Never store a value below zero.
    AtZero,
}

impl ClampPolicy {
    /// Applies the policy to a freshly computed value.
    pub fn apply(&self, value: i64) -> i64 {
        match self {
            ClampPolicy::Unclamped => value,
            ClampPolicy::AtZero => value.max(0),
        }
    }

    /// Computes `current + by` under this policy.
    pub fn adjust(&self, current: i64, by: i64) -> i64 {
        self.apply(current.saturating_add(by))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unclamped_keeps_negative_results() {
        assert_eq!(ClampPolicy::Unclamped.adjust(0, -1), -1);
        assert_eq!(ClampPolicy::Unclamped.adjust(3, -5), -2);
    }

    #[test]
    fn at_zero_floors_results() {
        assert_eq!(ClampPolicy::AtZero.adjust(0, -1), 0);
        assert_eq!(ClampPolicy::AtZero.adjust(3, -5), 0);
        assert_eq!(ClampPolicy::AtZero.adjust(3, 2), 5);
    }

    #[test]
    fn default_is_unclamped() {
        assert_eq!(ClampPolicy::default(), ClampPolicy::Unclamped);
    }

    #[test]
    fn deserializes_from_snake_case() {
        let policy: ClampPolicy = serde_json::from_str("\"at_zero\"").unwrap();
        assert_eq!(policy, ClampPolicy::AtZero);
    }
}
