// src/handlers/settings.rs

use axum::{Json, extract::State, response::IntoResponse};
use validator::Validate;

use crate::{
    error::AppError,
    models::settings::{ExamSettings, UpdateSettingsRequest},
    repository::{QuestionBank, SettingsStore},
    state::AppState,
};

/// Returns the effective settings; platform defaults when none were saved.
pub async fn get_settings(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let settings = state.store.get_settings().await?.unwrap_or_default();
    Ok(Json(settings))
}

/// Updates the settings (Admin only).
///
/// Neither count may exceed the size of the whole question bank.
pub async fn update_settings(
    State(state): State<AppState>,
    Json(req): Json<UpdateSettingsRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let available = state.store.count_questions().await?;
    let checks = [
        ("Exam item count", req.exam_question_count),
        ("Major item count", req.exam_major_question_count),
    ];
    for (what, requested) in checks {
        if i64::from(requested) > available {
            return Err(AppError::BadRequest(format!(
                "{} exceeds the available question bank. Requested {}, but only {} available.",
                what, requested, available
            )));
        }
    }

    let saved = state
        .store
        .save_settings(&ExamSettings::from(req))
        .await?;

    tracing::info!(
        "Exam settings updated: {} minutes, {} questions, {} major questions",
        saved.exam_time_limit_minutes,
        saved.exam_question_count,
        saved.exam_major_question_count
    );

    Ok(Json(saved))
}
