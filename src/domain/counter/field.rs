//! Counter vocabulary: which entity, which field.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{EntityId, ValidationError};

/// The kind of entity a counter belongs to.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Course,
    Chapter,
    Consult,
    Review,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Course,
        EntityKind::Chapter,
        EntityKind::Consult,
        EntityKind::Review,
    ];

    /// Returns the string representation of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Course => "course",
            EntityKind::Chapter => "chapter",
            EntityKind::Consult => "consult",
            EntityKind::Review => "review",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ValidationError::invalid_format("entity_kind", format!("unknown kind '{}'", s)))
    }
}

/// A named numeric attribute of an entity tracked by the counter cache.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterField {
    LikeCount,
    UserCount,
    LessonCount,
    CommentCount,
    ConsultCount,
    ReviewCount,
    FavoriteCount,
}

impl CounterField {
    pub const ALL: [CounterField; 7] = [
        CounterField::LikeCount,
        CounterField::UserCount,
        CounterField::LessonCount,
        CounterField::CommentCount,
        CounterField::ConsultCount,
        CounterField::ReviewCount,
        CounterField::FavoriteCount,
    ];

    /// Returns the column / hash field name.
    pub fn as_str(&self) -> &'static str {
        match self {
            CounterField::LikeCount => "like_count",
            CounterField::UserCount => "user_count",
            CounterField::LessonCount => "lesson_count",
            CounterField::CommentCount => "comment_count",
            CounterField::ConsultCount => "consult_count",
            CounterField::ReviewCount => "review_count",
            CounterField::FavoriteCount => "favorite_count",
        }
    }
}

impl fmt::Display for CounterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CounterField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CounterField::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| {
                ValidationError::invalid_format("counter_field", format!("unknown field '{}'", s))
            })
    }
}

/// Identifies one entity's counter hash: the unit of dirtiness and sync.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CounterKey {
    pub kind: EntityKind,
    pub id: EntityId,
}

impl CounterKey {
    pub fn new(kind: EntityKind, id: EntityId) -> Self {
        Self { kind, id }
    }

    pub fn consult(id: EntityId) -> Self {
        Self::new(EntityKind::Consult, id)
    }

    pub fn review(id: EntityId) -> Self {
        Self::new(EntityKind::Review, id)
    }

    pub fn chapter(id: EntityId) -> Self {
        Self::new(EntityKind::Chapter, id)
    }

    pub fn course(id: EntityId) -> Self {
        Self::new(EntityKind::Course, id)
    }

    /// Returns the Redis hash key holding this entity's counters.
    pub fn to_redis_key(&self) -> String {
        format!("counter:{}:{}", self.kind.as_str(), self.id)
    }
}

/// Short member form `kind:id`, used as a dirty set member.
impl fmt::Display for CounterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

impl FromStr for CounterKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = s
            .split_once(':')
            .ok_or_else(|| ValidationError::invalid_format("counter_key", "expected 'kind:id'"))?;
        Ok(Self::new(kind.parse()?, id.parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: i64) -> EntityId {
        EntityId::new(value).unwrap()
    }

    #[test]
    fn counter_field_names_round_trip() {
        for field in CounterField::ALL {
            assert_eq!(field.as_str().parse::<CounterField>().unwrap(), field);
        }
        assert!("dislike_count".parse::<CounterField>().is_err());
    }

    #[test]
    fn entity_kind_names_round_trip() {
        for kind in EntityKind::ALL {
            assert_eq!(kind.as_str().parse::<EntityKind>().unwrap(), kind);
        }
        assert!("package".parse::<EntityKind>().is_err());
    }

    #[test]
    fn counter_key_redis_format() {
        let key = CounterKey::consult(id(42));
        assert_eq!(key.to_redis_key(), "counter:consult:42");
    }

    #[test]
    fn counter_key_member_form_parses_back() {
        let key = CounterKey::review(id(9));
        let member = key.to_string();
        assert_eq!(member, "review:9");
        assert_eq!(member.parse::<CounterKey>().unwrap(), key);
    }

    #[test]
    fn counter_key_rejects_malformed_members() {
        assert!("review".parse::<CounterKey>().is_err());
        assert!("review:0".parse::<CounterKey>().is_err());
        assert!("lesson:3".parse::<CounterKey>().is_err());
    }
}
