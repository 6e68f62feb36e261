// src/models/settings.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Platform-wide exam settings. At most one row exists (key `id = 1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ExamSettings {
    pub exam_time_limit_minutes: i32,

    /// Base number of questions in every exam.
    pub exam_question_count: i32,

    /// Extra major questions added for LET profiles that have a major.
    pub exam_major_question_count: i32,
}

impl ExamSettings {
    pub const DEFAULT_TIME_LIMIT_MINUTES: i32 = 90;
    pub const DEFAULT_QUESTION_COUNT: i32 = 50;
    pub const DEFAULT_MAJOR_QUESTION_COUNT: i32 = 50;

    pub fn base_count(&self) -> usize {
        usize::try_from(self.exam_question_count).unwrap_or(0)
    }

    pub fn major_count(&self) -> usize {
        usize::try_from(self.exam_major_question_count).unwrap_or(0)
    }
}

impl Default for ExamSettings {
    fn default() -> Self {
        Self {
            exam_time_limit_minutes: Self::DEFAULT_TIME_LIMIT_MINUTES,
            exam_question_count: Self::DEFAULT_QUESTION_COUNT,
            exam_major_question_count: Self::DEFAULT_MAJOR_QUESTION_COUNT,
        }
    }
}

/// DTO for updating the settings.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSettingsRequest {
    #[validate(range(min = 1, max = 600))]
    pub exam_time_limit_minutes: i32,
    #[validate(range(min = 1, max = 500))]
    pub exam_question_count: i32,
    #[validate(range(min = 1, max = 500))]
    pub exam_major_question_count: i32,
}

impl From<UpdateSettingsRequest> for ExamSettings {
    fn from(req: UpdateSettingsRequest) -> Self {
        Self {
            exam_time_limit_minutes: req.exam_time_limit_minutes,
            exam_question_count: req.exam_question_count,
            exam_major_question_count: req.exam_major_question_count,
        }
    }
}
