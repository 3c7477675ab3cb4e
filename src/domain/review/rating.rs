//! Star rating value object for course reviews (1 to 5).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Review rating: one to five stars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum ReviewRating {
    OneStar = 1,
    TwoStars = 2,
    ThreeStars = 3,
    FourStars = 4,
    FiveStars = 5,
}

impl ReviewRating {
    /// Creates a rating from an integer, returning error if out of range.
    pub fn try_from_i64(value: i64) -> Result<Self, ValidationError> {
        match value {
            1 => Ok(ReviewRating::OneStar),
            2 => Ok(ReviewRating::TwoStars),
            3 => Ok(ReviewRating::ThreeStars),
            4 => Ok(ReviewRating::FourStars),
            5 => Ok(ReviewRating::FiveStars),
            _ => Err(ValidationError::out_of_range(
                "rating",
                1,
                5,
                value.clamp(i32::MIN as i64, i32::MAX as i64) as i32,
            )),
        }
    }

    /// Returns the number of stars.
    pub fn value(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for ReviewRating {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::try_from_i64(value as i64)
    }
}

impl From<ReviewRating> for u8 {
    fn from(rating: ReviewRating) -> Self {
        rating.value()
    }
}

impl fmt::Display for ReviewRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/5", self.value())
    }
}
