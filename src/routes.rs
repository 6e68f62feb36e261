// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{exam, settings},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware, staff_middleware},
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (exam, settings).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (store handle and config).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let auth = middleware::from_fn_with_state(state.clone(), auth_middleware);

    let exam_routes = Router::new()
        .route("/start", post(exam::start_exam))
        .route("/submit", post(exam::submit_exam))
        .route("/results", get(exam::list_results))
        // Staff-only dashboard
        .merge(
            Router::new()
                .route("/stats", get(exam::get_stats))
                .layer(middleware::from_fn(staff_middleware)),
        )
        .layer(auth.clone());

    let settings_routes = Router::new()
        .route("/public", get(settings::get_settings))
        .merge(
            Router::new()
                .route("/", get(settings::get_settings).put(settings::update_settings))
                .layer(middleware::from_fn(admin_middleware)),
        )
        // Auth runs first, then the admin check
        .layer(auth);

    Router::new()
        .nest("/api/exam", exam_routes)
        .nest("/api/settings", settings_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
