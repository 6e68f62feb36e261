// src/repository/postgres.rs

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, types::Json};

use crate::{
    models::{
        exam_result::{BucketStats, ExamRecord, ExamResult, IncorrectQuestion, ResultSummary, Verdict},
        profile::StudentProfile,
        question::{Choice, Difficulty, Question},
        settings::ExamSettings,
    },
    repository::{ProfileReader, QuestionBank, ResultStore, SettingsStore, StoreError},
};

/// PostgreSQL-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Raw 'questions' row; difficulty and answer are plain TEXT columns.
#[derive(FromRow)]
struct QuestionRow {
    id: i64,
    exam_type: String,
    subject: String,
    topic: String,
    difficulty: String,
    question: String,
    a: String,
    b: String,
    c: String,
    d: String,
    answer: String,
}

impl TryFrom<QuestionRow> for Question {
    type Error = StoreError;

    fn try_from(row: QuestionRow) -> Result<Self, Self::Error> {
        let difficulty = row
            .difficulty
            .parse::<Difficulty>()
            .map_err(|e| StoreError::Corrupt(format!("question {}: {}", row.id, e)))?;
        let answer = row
            .answer
            .parse::<Choice>()
            .map_err(|e| StoreError::Corrupt(format!("question {}: {}", row.id, e)))?;

        Ok(Question {
            id: row.id,
            exam_type: row.exam_type,
            subject: row.subject,
            topic: row.topic,
            difficulty,
            question: row.question,
            a: row.a,
            b: row.b,
            c: row.c,
            d: row.d,
            answer,
        })
    }
}

/// Raw 'exam_results' row.
#[derive(FromRow)]
struct ResultRow {
    id: i64,
    user_id: i64,
    exam_type: String,
    score: i32,
    total: i32,
    percentage: f64,
    result: String,
    subject_performance: Json<BTreeMap<String, BucketStats>>,
    incorrect_questions: Json<Vec<IncorrectQuestion>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ResultRow> for ExamRecord {
    type Error = StoreError;

    fn try_from(row: ResultRow) -> Result<Self, Self::Error> {
        let corrupt = |what: &str| StoreError::Corrupt(format!("exam result {}: {}", row.id, what));
        let verdict = Verdict::parse(&row.result).ok_or_else(|| corrupt("unknown verdict"))?;
        let score = u32::try_from(row.score).map_err(|_| corrupt("negative score"))?;
        let total = u32::try_from(row.total).map_err(|_| corrupt("negative total"))?;

        Ok(ExamRecord {
            id: row.id,
            result: ExamResult {
                user_id: row.user_id,
                exam_type: row.exam_type,
                score,
                total,
                percentage: row.percentage,
                result: verdict,
                subject_performance: row.subject_performance.0,
                incorrect_questions: row.incorrect_questions.0,
                created_at: row.created_at,
            },
        })
    }
}

const QUESTION_COLUMNS: &str =
    "id, exam_type, subject, topic, difficulty, question, a, b, c, d, answer";

const RESULT_COLUMNS: &str = "id, user_id, exam_type, score, total, percentage, result, \
     subject_performance, incorrect_questions, created_at";

fn to_questions(rows: Vec<QuestionRow>) -> Result<Vec<Question>, StoreError> {
    rows.into_iter().map(Question::try_from).collect()
}

#[async_trait]
impl QuestionBank for PgStore {
    async fn find_questions(
        &self,
        exam_type: &str,
        subjects: Option<&[String]>,
    ) -> Result<Vec<Question>, StoreError> {
        let rows = sqlx::query_as::<_, QuestionRow>(&format!(
            "SELECT {} FROM questions \
             WHERE exam_type = $1 AND ($2::TEXT[] IS NULL OR subject = ANY($2)) \
             ORDER BY id",
            QUESTION_COLUMNS
        ))
        .bind(exam_type)
        .bind(subjects.map(<[String]>::to_vec))
        .fetch_all(&self.pool)
        .await?;

        to_questions(rows)
    }

    async fn get_questions(&self, ids: &[i64]) -> Result<Vec<Question>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, QuestionRow>(&format!(
            "SELECT {} FROM questions WHERE id = ANY($1)",
            QUESTION_COLUMNS
        ))
        .bind(ids.to_vec())
        .fetch_all(&self.pool)
        .await?;

        to_questions(rows)
    }

    async fn count_questions(&self) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM questions")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl ProfileReader for PgStore {
    async fn get_profile(&self, user_id: i64) -> Result<Option<StudentProfile>, StoreError> {
        let profile = sqlx::query_as::<_, StudentProfile>(
            r#"
            SELECT
                user_id,
                target_licensure,
                let_track,
                major_specialization,
                assigned_review_subjects,
                required_passing_threshold
            FROM student_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    async fn count_profiles(&self) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM student_profiles")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl ResultStore for PgStore {
    async fn get_latest_result(
        &self,
        user_id: i64,
        exam_type: &str,
    ) -> Result<Option<ExamRecord>, StoreError> {
        let row = sqlx::query_as::<_, ResultRow>(&format!(
            "SELECT {} FROM exam_results \
             WHERE user_id = $1 AND exam_type = $2 \
             ORDER BY created_at DESC, id DESC \
             LIMIT 1",
            RESULT_COLUMNS
        ))
        .bind(user_id)
        .bind(exam_type)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ExamRecord::try_from).transpose()
    }

    async fn save_result(&self, result: &ExamResult) -> Result<i64, StoreError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO exam_results (
                user_id, exam_type, score, total, percentage, result,
                subject_performance, incorrect_questions, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(result.user_id)
        .bind(&result.exam_type)
        .bind(result.score as i32)
        .bind(result.total as i32)
        .bind(result.percentage)
        .bind(result.result.as_str())
        .bind(Json(&result.subject_performance))
        .bind(Json(&result.incorrect_questions))
        .bind(result.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list_results(&self, user_id: i64) -> Result<Vec<ExamRecord>, StoreError> {
        let rows = sqlx::query_as::<_, ResultRow>(&format!(
            "SELECT {} FROM exam_results WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
            RESULT_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ExamRecord::try_from).collect()
    }

    async fn summarize_results(&self) -> Result<ResultSummary, StoreError> {
        let summary = sqlx::query_as::<_, ResultSummary>(
            r#"
            SELECT
                COUNT(*) AS attempts,
                COALESCE(AVG(percentage), 0)::DOUBLE PRECISION AS avg_percentage,
                COALESCE(SUM(total), 0)::BIGINT AS total_answered
            FROM exam_results
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(summary)
    }

    async fn recent_percentages(&self, limit: i64) -> Result<Vec<f64>, StoreError> {
        let scores = sqlx::query_scalar::<_, f64>(
            "SELECT percentage FROM exam_results ORDER BY created_at DESC, id DESC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(scores)
    }
}

#[async_trait]
impl SettingsStore for PgStore {
    async fn get_settings(&self) -> Result<Option<ExamSettings>, StoreError> {
        let settings = sqlx::query_as::<_, ExamSettings>(
            r#"
            SELECT exam_time_limit_minutes, exam_question_count, exam_major_question_count
            FROM exam_settings
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(settings)
    }

    async fn save_settings(&self, settings: &ExamSettings) -> Result<ExamSettings, StoreError> {
        // Single statement keyed on the fixed id: concurrent writers converge
        // on one row instead of each inserting their own.
        let saved = sqlx::query_as::<_, ExamSettings>(
            r#"
            INSERT INTO exam_settings (
                id, exam_time_limit_minutes, exam_question_count, exam_major_question_count
            )
            VALUES (1, $1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET
                exam_time_limit_minutes = EXCLUDED.exam_time_limit_minutes,
                exam_question_count = EXCLUDED.exam_question_count,
                exam_major_question_count = EXCLUDED.exam_major_question_count
            RETURNING exam_time_limit_minutes, exam_question_count, exam_major_question_count
            "#,
        )
        .bind(settings.exam_time_limit_minutes)
        .bind(settings.exam_question_count)
        .bind(settings.exam_major_question_count)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }
}
