// src/handlers/exam.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};

use crate::{
    engine::{self, scorer::round2},
    error::AppError,
    models::exam_result::{ExamStatsResponse, SubmitExamRequest},
    repository::{ProfileReader, ResultStore, SettingsStore},
    state::AppState,
    utils::jwt::Claims,
};

/// Number of latest percentages shown on the staff dashboard.
const RECENT_SCORES: i64 = 7;

/// Starts a new attempt for the caller.
///
/// Returns the composed questions without their answer key.
pub async fn start_exam(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let questions = engine::compose_exam(state.store.as_ref(), user_id).await?;
    Ok(Json(questions))
}

/// Submits the caller's answers.
///
/// * Grades every answer against the current bank.
/// * Tallies results per reporting bucket.
/// * Appends the result to the caller's history.
pub async fn submit_exam(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SubmitExamRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let record = engine::score_exam(state.store.as_ref(), user_id, &req.answers).await?;
    Ok(Json(record))
}

/// Lists the caller's past results, newest first.
pub async fn list_results(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;
    let results = state.store.list_results(user_id).await?;
    Ok(Json(results))
}

/// Aggregate statistics for instructors and admins.
pub async fn get_stats(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let summary = state.store.summarize_results().await?;
    let settings = state.store.get_settings().await?.unwrap_or_default();
    let active_students = state.store.count_profiles().await?;

    let mut recent_scores = state.store.recent_percentages(RECENT_SCORES).await?;
    recent_scores.reverse();

    let expected = summary.attempts * i64::from(settings.exam_question_count);
    let completion_rate = if expected > 0 {
        (summary.total_answered as f64 / expected as f64 * 100.0)
            .round()
            .min(100.0)
    } else {
        0.0
    };

    Ok(Json(ExamStatsResponse {
        avg_score: round2(summary.avg_percentage),
        completion_rate,
        active_students,
        recent_scores,
    }))
}
