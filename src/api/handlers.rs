use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::EstimateError;
use crate::estimate::EstimateKind;
use crate::provider::build_chat_request;
use crate::AppState;

use super::models::{EstimationRequest, EstimationResponse};

type EstimateResult = Result<Json<EstimationResponse>, EstimateError>;

pub async fn estimate_build(
    State(state): State<AppState>,
    payload: Result<Json<EstimationRequest>, JsonRejection>,
) -> EstimateResult {
    estimate(&state, EstimateKind::Build, payload).await
}

pub async fn estimate_repair(
    State(state): State<AppState>,
    payload: Result<Json<EstimationRequest>, JsonRejection>,
) -> EstimateResult {
    estimate(&state, EstimateKind::Repair, payload).await
}

async fn estimate(
    state: &AppState,
    kind: EstimateKind,
    payload: Result<Json<EstimationRequest>, JsonRejection>,
) -> EstimateResult {
    let image_url = match image_url_from(payload) {
        Some(url) => url,
        None => {
            tracing::warn!(endpoint = kind.endpoint(), "rejected request without image URL");
            return Err(EstimateError::Validation);
        }
    };

    let request = build_chat_request(kind, &image_url);
    match state.provider.complete(request).await {
        Ok(estimation) => Ok(Json(EstimationResponse::success(estimation))),
        Err(err) => {
            tracing::error!(endpoint = kind.endpoint(), "Error in {}: {err}", kind.endpoint());
            Err(err.into())
        }
    }
}

fn image_url_from(payload: Result<Json<EstimationRequest>, JsonRejection>) -> Option<String> {
    let Json(request) = payload
        .map_err(|rejection| tracing::debug!(%rejection, "unreadable request body"))
        .ok()?;
    request.image_url.filter(|url| !url.is_empty())
}

pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(EstimationResponse::failure("Not found".to_string())),
    )
        .into_response()
}
