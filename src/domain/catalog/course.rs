//! Course records as read from the catalog.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{EntityId, ValidationError};

/// Delivery model of a course; decides lesson attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseModel {
    /// Video on demand.
    Vod,
    /// Live broadcast.
    Live,
    /// Article / reading.
    Read,
}

impl CourseModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseModel::Vod => "vod",
            CourseModel::Live => "live",
            CourseModel::Read => "read",
        }
    }
}

impl fmt::Display for CourseModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CourseModel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vod" => Ok(CourseModel::Vod),
            "live" => Ok(CourseModel::Live),
            "read" => Ok(CourseModel::Read),
            other => Err(ValidationError::invalid_format(
                "model",
                format!("unknown course model '{}'", other),
            )),
        }
    }
}

/// Difficulty level of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseLevel {
    Entry,
    Junior,
    Medium,
    Senior,
}

impl CourseLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseLevel::Entry => "entry",
            CourseLevel::Junior => "junior",
            CourseLevel::Medium => "medium",
            CourseLevel::Senior => "senior",
        }
    }
}

impl FromStr for CourseLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entry" => Ok(CourseLevel::Entry),
            "junior" => Ok(CourseLevel::Junior),
            "medium" => Ok(CourseLevel::Medium),
            "senior" => Ok(CourseLevel::Senior),
            other => Err(ValidationError::invalid_format(
                "level",
                format!("unknown course level '{}'", other),
            )),
        }
    }
}

/// A course row. Prices are stored in cents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: EntityId,
    pub title: String,
    pub model: CourseModel,
    pub level: CourseLevel,
    pub market_price: i64,
    pub vip_price: i64,
    pub score: f64,
    pub rating: f64,
    pub user_count: i64,
    pub lesson_count: i64,
    pub published: bool,
    pub deleted: bool,
}

impl Course {
    /// True when the course costs nothing at list price.
    pub fn is_free(&self) -> bool {
        self.market_price == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_model_parses_known_values() {
        assert_eq!("vod".parse::<CourseModel>().unwrap(), CourseModel::Vod);
        assert_eq!("live".parse::<CourseModel>().unwrap(), CourseModel::Live);
        assert_eq!("read".parse::<CourseModel>().unwrap(), CourseModel::Read);
        assert!("offline".parse::<CourseModel>().is_err());
    }

    #[test]
    fn course_level_parses_known_values() {
        assert_eq!("senior".parse::<CourseLevel>().unwrap(), CourseLevel::Senior);
        assert!("expert".parse::<CourseLevel>().is_err());
    }
}
