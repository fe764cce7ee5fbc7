pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::screening::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/models", get(handlers::handle_list_models))
        .route("/api/v1/resumes/review", post(handlers::handle_review))
        .route("/api/v1/resumes/match", post(handlers::handle_match))
        .route("/api/v1/resumes/rank", post(handlers::handle_rank_directory))
        .route(
            "/api/v1/resumes/rank/upload",
            post(handlers::handle_rank_upload),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
