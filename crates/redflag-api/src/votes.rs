use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use redflag_types::api::CastVoteRequest;

use crate::error::ApiError;
use crate::{AppState, blocking};

/// POST /traits/{id}/votes: one atomic increment, no per-voter bookkeeping.
pub async fn cast_vote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CastVoteRequest>,
) -> Result<StatusCode, ApiError> {
    blocking(&state, move |catalog| catalog.increment_vote(id, req.category)).await?;

    Ok(StatusCode::NO_CONTENT)
}
