// tests/pg_store_tests.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use reviewer::{
    models::{
        exam_result::{BucketStats, ExamResult, IncorrectQuestion, Verdict},
        question::{Choice, Difficulty},
        settings::ExamSettings,
    },
    repository::{PgStore, ProfileReader, QuestionBank, ResultStore, SettingsStore},
};
use sqlx::{PgPool, postgres::PgPoolOptions};

/// Connects to the database from DATABASE_URL and applies migrations.
/// Returns `None` (and the test is skipped) when no database is configured.
async fn setup() -> Option<(PgPool, PgStore)> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping Postgres store test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .expect("Failed to connect to Postgres for testing. Make sure DATABASE_URL is set.");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let store = PgStore::new(pool.clone());
    Some((pool, store))
}

/// A value no other test run will reuse, for exam types and user ids.
fn unique_tag() -> i64 {
    Utc::now().timestamp_nanos_opt().unwrap_or_default() / 1000
}

async fn insert_question(pool: &PgPool, exam_type: &str, subject: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO questions (exam_type, subject, topic, difficulty, question, a, b, c, d, answer)
        VALUES ($1, $2, 'Basics', 'Medium', 'Which one?', 'w', 'x', 'y', 'z', 'C')
        RETURNING id
        "#,
    )
    .bind(exam_type)
    .bind(subject)
    .fetch_one(pool)
    .await
    .expect("Failed to insert question")
}

#[tokio::test]
async fn test_settings_upsert_keeps_one_row() {
    let Some((pool, store)) = setup().await else {
        return;
    };

    sqlx::query("DELETE FROM exam_settings")
        .execute(&pool)
        .await
        .unwrap();

    // Reads never create the row
    assert_eq!(store.get_settings().await.unwrap(), None);
    assert_eq!(store.get_settings().await.unwrap(), None);

    let first = ExamSettings {
        exam_time_limit_minutes: 60,
        exam_question_count: 40,
        exam_major_question_count: 20,
    };
    let second = ExamSettings {
        exam_time_limit_minutes: 120,
        exam_question_count: 80,
        exam_major_question_count: 30,
    };
    assert_eq!(store.save_settings(&first).await.unwrap(), first);
    assert_eq!(store.save_settings(&second).await.unwrap(), second);

    // Concurrent writers converge on the same row
    let (a, b) = tokio::join!(store.save_settings(&first), store.save_settings(&second));
    a.unwrap();
    b.unwrap();

    let rows = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM exam_settings")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 1);

    let current = store.get_settings().await.unwrap().expect("settings row");
    assert!(current == first || current == second);
}

#[tokio::test]
async fn test_result_round_trip() {
    let Some((_pool, store)) = setup().await else {
        return;
    };
    let user_id = unique_tag();

    let mut subject_performance = BTreeMap::new();
    subject_performance.insert(
        "General Education".to_string(),
        BucketStats { correct: 3, total: 4 },
    );
    subject_performance.insert(
        "English Major".to_string(),
        BucketStats { correct: 0, total: 2 },
    );

    let older = ExamResult {
        user_id,
        exam_type: "LET".to_string(),
        score: 3,
        total: 6,
        percentage: 50.0,
        result: Verdict::Fail,
        subject_performance,
        incorrect_questions: vec![IncorrectQuestion {
            id: 42,
            subject: "English".to_string(),
            topic: "Poetry".to_string(),
            difficulty: Difficulty::Hard,
            question: "Who wrote it?".to_string(),
            correct_answer: Choice::B,
            student_answer: Choice::D,
            reference: "Review: Poetry".to_string(),
        }],
        created_at: "2026-01-10T08:30:00Z".parse::<DateTime<Utc>>().unwrap(),
    };
    let newer = ExamResult {
        score: 6,
        percentage: 100.0,
        result: Verdict::Pass,
        incorrect_questions: vec![],
        created_at: "2026-01-11T08:30:00Z".parse::<DateTime<Utc>>().unwrap(),
        ..older.clone()
    };

    let older_id = store.save_result(&older).await.unwrap();
    let newer_id = store.save_result(&newer).await.unwrap();

    let latest = store
        .get_latest_result(user_id, "LET")
        .await
        .unwrap()
        .expect("latest result");
    assert_eq!(latest.id, newer_id);
    assert_eq!(latest.result, newer);

    let history = store.list_results(user_id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].id, older_id);
    assert_eq!(history[1].result, older);

    assert!(store.get_latest_result(user_id, "CPA").await.unwrap().is_none());
}

#[tokio::test]
async fn test_find_questions_subject_filter() {
    let Some((pool, store)) = setup().await else {
        return;
    };
    let exam_type = format!("TEST-{}", unique_tag());

    let far = insert_question(&pool, &exam_type, "FAR").await;
    let audit = insert_question(&pool, &exam_type, "Auditing").await;
    let tax = insert_question(&pool, &exam_type, "Taxation").await;

    let all = store.find_questions(&exam_type, None).await.unwrap();
    let ids: Vec<i64> = all.iter().map(|q| q.id).collect();
    assert_eq!(ids, vec![far, audit, tax]);
    assert_eq!(all[0].answer, Choice::C);
    assert_eq!(all[0].difficulty, Difficulty::Medium);

    let subjects = vec!["Auditing".to_string(), "Taxation".to_string()];
    let filtered = store
        .find_questions(&exam_type, Some(subjects.as_slice()))
        .await
        .unwrap();
    let ids: Vec<i64> = filtered.iter().map(|q| q.id).collect();
    assert_eq!(ids, vec![audit, tax]);

    let by_id = store.get_questions(&[tax, far, -1]).await.unwrap();
    assert_eq!(by_id.len(), 2);

    assert!(store.find_questions("NO-SUCH-EXAM", None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_profile_reads_subject_array() {
    let Some((pool, store)) = setup().await else {
        return;
    };
    let user_id = unique_tag();

    sqlx::query(
        r#"
        INSERT INTO student_profiles (
            user_id, target_licensure, let_track, major_specialization,
            assigned_review_subjects, required_passing_threshold
        )
        VALUES ($1, 'LET', 'Secondary', 'English', $2, 75)
        "#,
    )
    .bind(user_id)
    .bind(vec!["GenEd".to_string(), "ProfEd".to_string()])
    .execute(&pool)
    .await
    .unwrap();

    let profile = store
        .get_profile(user_id)
        .await
        .unwrap()
        .expect("profile");
    assert_eq!(profile.assigned_review_subjects, vec!["GenEd", "ProfEd"]);
    assert_eq!(profile.major(), Some("English"));
    assert!(store.get_profile(-user_id).await.unwrap().is_none());
}
