//! Chapters and lessons.
//!
//! A chapter with `parent_id == None` is a top-level chapter; anything with a
//! parent is a lesson and carries attributes specific to the course model.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EntityId, Timestamp};

use super::CourseModel;

/// Processing state of an uploaded lesson video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Pending,
    Uploaded,
    Translating,
    Translated,
    Failed,
}

/// Model-specific lesson attributes, stored as a JSON column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum LessonAttrs {
    Vod {
        duration: u32,
        file_id: String,
        file_status: FileStatus,
    },
    Live {
        start_time: i64,
        end_time: i64,
    },
    Read {
        duration: u32,
        word_count: u32,
    },
}

impl LessonAttrs {
    /// Fresh attributes for a newly created lesson of the given model.
    pub fn defaults_for(model: CourseModel) -> Self {
        match model {
            CourseModel::Vod => LessonAttrs::Vod {
                duration: 0,
                file_id: String::new(),
                file_status: FileStatus::Pending,
            },
            CourseModel::Live => LessonAttrs::Live {
                start_time: 0,
                end_time: 0,
            },
            CourseModel::Read => LessonAttrs::Read {
                duration: 0,
                word_count: 0,
            },
        }
    }
}

/// A chapter or lesson row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: EntityId,
    pub course_id: EntityId,
    pub parent_id: Option<EntityId>,
    pub title: String,
    pub priority: i32,
    pub free: bool,
    /// Lesson attributes; always `None` for top-level chapters.
    pub attrs: Option<LessonAttrs>,
    pub like_count: i64,
    pub published: bool,
    pub deleted: bool,
    pub created_at: Timestamp,
}

/// Input for creating a chapter or lesson.
#[derive(Debug, Clone)]
pub struct NewChapter {
    pub course_id: EntityId,
    pub parent_id: Option<EntityId>,
    pub title: String,
    pub priority: i32,
    pub free: bool,
}

impl NewChapter {
    pub fn is_lesson(&self) -> bool {
        self.parent_id.is_some()
    }

    /// Materialises the row, attaching lesson defaults for the course model.
    pub fn into_chapter(self, id: EntityId, course_model: CourseModel) -> Chapter {
        let attrs = self
            .is_lesson()
            .then(|| LessonAttrs::defaults_for(course_model));

        Chapter {
            id,
            course_id: self.course_id,
            parent_id: self.parent_id,
            title: self.title,
            priority: self.priority,
            free: self.free,
            attrs,
            like_count: 0,
            published: false,
            deleted: false,
            created_at: Timestamp::now(),
        }
    }
}

impl Chapter {
    pub fn is_lesson(&self) -> bool {
        self.parent_id.is_some()
    }
}
