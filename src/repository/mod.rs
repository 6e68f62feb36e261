// src/repository/mod.rs

//! Collaborators the exam engine reads from and writes to.
//!
//! The engine only sees these traits. `PgStore` backs the running service;
//! `MemoryStore` backs tests and local tooling.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    exam_result::{ExamRecord, ExamResult, ResultSummary},
    profile::StudentProfile,
    question::Question,
    settings::ExamSettings,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row that does not map onto a valid domain value.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// Read access to the question bank.
#[async_trait]
pub trait QuestionBank: Send + Sync {
    /// Questions of `exam_type`, optionally restricted to the listed subjects.
    async fn find_questions(
        &self,
        exam_type: &str,
        subjects: Option<&[String]>,
    ) -> Result<Vec<Question>, StoreError>;

    /// Questions with the given ids; unknown ids are simply absent.
    async fn get_questions(&self, ids: &[i64]) -> Result<Vec<Question>, StoreError>;

    async fn count_questions(&self) -> Result<i64, StoreError>;
}

#[async_trait]
pub trait ProfileReader: Send + Sync {
    async fn get_profile(&self, user_id: i64) -> Result<Option<StudentProfile>, StoreError>;

    async fn count_profiles(&self) -> Result<i64, StoreError>;
}

#[async_trait]
pub trait ResultStore: Send + Sync {
    async fn get_latest_result(
        &self,
        user_id: i64,
        exam_type: &str,
    ) -> Result<Option<ExamRecord>, StoreError>;

    /// Appends a result and returns its id.
    async fn save_result(&self, result: &ExamResult) -> Result<i64, StoreError>;

    /// All results of one user, newest first.
    async fn list_results(&self, user_id: i64) -> Result<Vec<ExamRecord>, StoreError>;

    async fn summarize_results(&self) -> Result<ResultSummary, StoreError>;

    /// Percentages of the latest `limit` results, newest first.
    async fn recent_percentages(&self, limit: i64) -> Result<Vec<f64>, StoreError>;
}

#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// The settings row, if one was ever saved. Never creates one.
    async fn get_settings(&self) -> Result<Option<ExamSettings>, StoreError>;

    /// Insert-or-update of the single settings row.
    async fn save_settings(&self, settings: &ExamSettings) -> Result<ExamSettings, StoreError>;
}

/// Everything the HTTP layer needs behind one handle.
pub trait ReviewStore: QuestionBank + ProfileReader + ResultStore + SettingsStore {}

impl<T> ReviewStore for T where T: QuestionBank + ProfileReader + ResultStore + SettingsStore {}
