// src/models/exam_result.rs

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::question::{Choice, Difficulty};

/// Outcome of an attempt against the profile's passing threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Pass => "PASS",
            Verdict::Fail => "FAIL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PASS" => Some(Verdict::Pass),
            "FAIL" => Some(Verdict::Fail),
            _ => None,
        }
    }
}

/// Correct/total tally for one reporting bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketStats {
    pub correct: u32,
    pub total: u32,
}

/// Review entry for a question the student got wrong.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncorrectQuestion {
    pub id: i64,
    pub subject: String,
    pub topic: String,
    pub difficulty: Difficulty,
    pub question: String,
    pub correct_answer: Choice,
    pub student_answer: Choice,
    pub reference: String,
}

/// A graded submission. Append-only once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamResult {
    pub user_id: i64,
    pub exam_type: String,
    pub score: u32,
    pub total: u32,
    /// Rounded to two decimals.
    pub percentage: f64,
    pub result: Verdict,
    /// Keyed by bucket label.
    pub subject_performance: BTreeMap<String, BucketStats>,
    pub incorrect_questions: Vec<IncorrectQuestion>,
    pub created_at: DateTime<Utc>,
}

/// A result as read back from the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamRecord {
    pub id: i64,
    #[serde(flatten)]
    pub result: ExamResult,
}

/// Aggregates over every stored result, used by the staff dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, FromRow)]
pub struct ResultSummary {
    pub attempts: i64,
    pub avg_percentage: f64,
    pub total_answered: i64,
}

/// Response body for the staff statistics endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExamStatsResponse {
    pub avg_score: f64,
    pub completion_rate: f64,
    pub active_students: i64,
    pub recent_scores: Vec<f64>,
}

/// DTO for submitting an attempt.
#[derive(Debug, Deserialize)]
pub struct SubmitExamRequest {
    /// User's answers map.
    /// Key: Question ID
    /// Value: selected option letter ("A".."D")
    pub answers: HashMap<i64, String>,
}
