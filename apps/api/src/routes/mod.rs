pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::intake::handlers as intake;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.upload_body_limit_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Resources API
        .route(
            "/api/v1/resources",
            post(intake::handle_upload).get(intake::handle_list_resources),
        )
        .route(
            "/api/v1/resources/:id",
            get(intake::handle_get_resource).delete(intake::handle_delete_resource),
        )
        // Analysis API
        .route("/api/v1/analysis", post(analysis::handle_analysis))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
