// src/models/profile.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Exam type whose questions are split into education buckets plus a major.
pub const MULTI_BUCKET_EXAM_TYPE: &str = "LET";

/// Track that sits the multi-bucket exam without a major component.
pub const MAJOR_EXEMPT_TRACK: &str = "Elementary";

/// Represents the 'student_profiles' table.
/// Written by the profile screens; read-only for the exam engine.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct StudentProfile {
    /// Owning user (the JWT subject).
    pub user_id: i64,

    /// Licensure the student is reviewing for (e.g. "LET", "CPA").
    pub target_licensure: String,

    /// "Elementary" or "Secondary" for LET, unset otherwise.
    pub let_track: Option<String>,

    pub major_specialization: Option<String>,

    /// Subjects the student is assigned to review.
    pub assigned_review_subjects: Vec<String>,

    /// Percentage (1-100) needed for a PASS verdict.
    pub required_passing_threshold: i32,
}

impl StudentProfile {
    /// Whether this profile's exam is composed from classified buckets.
    pub fn uses_buckets(&self) -> bool {
        self.target_licensure
            .trim()
            .eq_ignore_ascii_case(MULTI_BUCKET_EXAM_TYPE)
    }

    pub fn is_major_exempt(&self) -> bool {
        self.let_track
            .as_deref()
            .is_some_and(|t| t.trim().eq_ignore_ascii_case(MAJOR_EXEMPT_TRACK))
    }

    /// The configured major, if it is non-blank.
    pub fn major(&self) -> Option<&str> {
        self.major_specialization
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}
