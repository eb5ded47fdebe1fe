mod handlers;
mod models;

use axum::{routing::post, Router};

use crate::AppState;

pub use handlers::{estimate_build, estimate_repair, not_found};
pub use models::{EstimationRequest, EstimationResponse};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/estimate-build", post(estimate_build))
        .route("/estimate-repair", post(estimate_repair))
        .fallback(not_found)
        .with_state(state)
}
