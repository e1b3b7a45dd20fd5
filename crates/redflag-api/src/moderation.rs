use axum::{
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::error::ApiError;
use crate::{AppState, blocking};

/// POST /moderation/traits/{id}/approve: the manual approval flag.
pub async fn approve(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    blocking(&state, move |catalog| catalog.approve(id)).await?;

    Ok(StatusCode::NO_CONTENT)
}
