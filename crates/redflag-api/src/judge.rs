use std::collections::HashSet;

use axum::{Json, extract::State};
use uuid::Uuid;

use redflag_core::Selection;
use redflag_types::api::{NextUnseenRequest, NextUnseenResponse};

use crate::error::ApiError;
use crate::{AppState, blocking, to_response};

/// POST /judge/next: the client owns the list of ids it already judged and
/// sends it with every request.
pub async fn next_unseen(
    State(state): State<AppState>,
    Json(req): Json<NextUnseenRequest>,
) -> Result<Json<NextUnseenResponse>, ApiError> {
    let exclude: HashSet<Uuid> = req.exclude.into_iter().collect();
    let selection = blocking(&state, move |catalog| catalog.next_unseen(&exclude)).await?;

    Ok(Json(match selection {
        Selection::Next(behavior) => NextUnseenResponse::Next {
            behavior: to_response(behavior),
        },
        Selection::Exhausted => NextUnseenResponse::Exhausted,
    }))
}
