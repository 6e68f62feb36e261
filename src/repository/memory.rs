// src/repository/memory.rs

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    models::{
        exam_result::{ExamRecord, ExamResult, ResultSummary},
        profile::StudentProfile,
        question::Question,
        settings::ExamSettings,
    },
    repository::{ProfileReader, QuestionBank, ResultStore, SettingsStore, StoreError},
};

#[derive(Default)]
struct Inner {
    questions: Vec<Question>,
    profiles: HashMap<i64, StudentProfile>,
    results: Vec<ExamRecord>,
    settings: Option<ExamSettings>,
}

/// Process-local store with the same semantics as `PgStore`.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_questions(&self, questions: impl IntoIterator<Item = Question>) {
        self.inner.write().await.questions.extend(questions);
    }

    pub async fn remove_question(&self, id: i64) {
        self.inner.write().await.questions.retain(|q| q.id != id);
    }

    pub async fn put_profile(&self, profile: StudentProfile) {
        self.inner
            .write()
            .await
            .profiles
            .insert(profile.user_id, profile);
    }
}

#[async_trait]
impl QuestionBank for MemoryStore {
    async fn find_questions(
        &self,
        exam_type: &str,
        subjects: Option<&[String]>,
    ) -> Result<Vec<Question>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .questions
            .iter()
            .filter(|q| q.exam_type == exam_type)
            .filter(|q| subjects.is_none_or(|s| s.contains(&q.subject)))
            .cloned()
            .collect())
    }

    async fn get_questions(&self, ids: &[i64]) -> Result<Vec<Question>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .questions
            .iter()
            .filter(|q| ids.contains(&q.id))
            .cloned()
            .collect())
    }

    async fn count_questions(&self) -> Result<i64, StoreError> {
        Ok(self.inner.read().await.questions.len() as i64)
    }
}

#[async_trait]
impl ProfileReader for MemoryStore {
    async fn get_profile(&self, user_id: i64) -> Result<Option<StudentProfile>, StoreError> {
        Ok(self.inner.read().await.profiles.get(&user_id).cloned())
    }

    async fn count_profiles(&self) -> Result<i64, StoreError> {
        Ok(self.inner.read().await.profiles.len() as i64)
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn get_latest_result(
        &self,
        user_id: i64,
        exam_type: &str,
    ) -> Result<Option<ExamRecord>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .results
            .iter()
            .filter(|r| r.result.user_id == user_id && r.result.exam_type == exam_type)
            .max_by_key(|r| (r.result.created_at, r.id))
            .cloned())
    }

    async fn save_result(&self, result: &ExamResult) -> Result<i64, StoreError> {
        let mut inner = self.inner.write().await;
        let id = inner.results.len() as i64 + 1;
        inner.results.push(ExamRecord {
            id,
            result: result.clone(),
        });
        Ok(id)
    }

    async fn list_results(&self, user_id: i64) -> Result<Vec<ExamRecord>, StoreError> {
        let inner = self.inner.read().await;
        let mut records: Vec<ExamRecord> = inner
            .results
            .iter()
            .filter(|r| r.result.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by_key(|r| std::cmp::Reverse((r.result.created_at, r.id)));
        Ok(records)
    }

    async fn summarize_results(&self) -> Result<ResultSummary, StoreError> {
        let inner = self.inner.read().await;
        let attempts = inner.results.len() as i64;
        if attempts == 0 {
            return Ok(ResultSummary::default());
        }
        let sum: f64 = inner.results.iter().map(|r| r.result.percentage).sum();
        Ok(ResultSummary {
            attempts,
            avg_percentage: sum / attempts as f64,
            total_answered: inner.results.iter().map(|r| r.result.total as i64).sum(),
        })
    }

    async fn recent_percentages(&self, limit: i64) -> Result<Vec<f64>, StoreError> {
        let inner = self.inner.read().await;
        let mut records: Vec<&ExamRecord> = inner.results.iter().collect();
        records.sort_by_key(|r| std::cmp::Reverse((r.result.created_at, r.id)));
        Ok(records
            .into_iter()
            .take(usize::try_from(limit).unwrap_or(0))
            .map(|r| r.result.percentage)
            .collect())
    }
}

#[async_trait]
impl SettingsStore for MemoryStore {
    async fn get_settings(&self) -> Result<Option<ExamSettings>, StoreError> {
        Ok(self.inner.read().await.settings)
    }

    async fn save_settings(&self, settings: &ExamSettings) -> Result<ExamSettings, StoreError> {
        // Replacing under the write lock keeps a single settings value.
        self.inner.write().await.settings = Some(*settings);
        Ok(*settings)
    }
}
