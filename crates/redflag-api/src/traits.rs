use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use redflag_types::VoteCategory;
use redflag_types::api::{BehaviorResponse, PageResponse, SubmitBehaviorRequest, SubmitBehaviorResponse};

use crate::error::ApiError;
use crate::{AppState, blocking, to_response};

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Opaque cursor from the previous page's `nextCursor`.
    pub cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
}

#[derive(Debug, Deserialize)]
pub struct RandomQuery {
    #[serde(default = "default_random_count")]
    pub count: u32,
}

fn default_limit() -> u32 {
    20
}

fn default_random_count() -> u32 {
    10
}

/// POST /traits: new behaviors wait for moderation before anyone sees them.
pub async fn submit(
    State(state): State<AppState>,
    Json(req): Json<SubmitBehaviorRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let id = blocking(&state, move |catalog| catalog.submit(&req.text)).await?;

    Ok((StatusCode::CREATED, Json(SubmitBehaviorResponse { id })))
}

pub async fn get_trait(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BehaviorResponse>, ApiError> {
    let behavior = blocking(&state, move |catalog| catalog.get_by_id(id)).await?;

    Ok(Json(to_response(behavior)))
}

/// GET /traits/recent: newest first, cursor paged.
pub async fn list_recent(
    State(state): State<AppState>,
    Query(query): Query<RecentQuery>,
) -> Result<Json<PageResponse>, ApiError> {
    let page = blocking(&state, move |catalog| {
        catalog.list_recent(query.limit, query.cursor.as_deref())
    })
    .await?;

    Ok(Json(PageResponse {
        items: page.items.into_iter().map(to_response).collect(),
        next_cursor: page.next_cursor,
    }))
}

pub async fn list_popular(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<BehaviorResponse>>, ApiError> {
    let items = blocking(&state, move |catalog| catalog.popular(query.limit as usize)).await?;

    Ok(Json(items.into_iter().map(to_response).collect()))
}

/// GET /traits/approved: the whole ranking window, newest first.
pub async fn list_approved(State(state): State<AppState>) -> Result<Json<Vec<BehaviorResponse>>, ApiError> {
    let items = blocking(&state, |catalog| catalog.list_all_approved()).await?;

    Ok(Json(items.into_iter().map(to_response).collect()))
}

pub async fn list_by_verdict(
    State(state): State<AppState>,
    Path(category): Path<VoteCategory>,
) -> Result<Json<Vec<BehaviorResponse>>, ApiError> {
    let items = blocking(&state, move |catalog| catalog.by_verdict(category)).await?;

    Ok(Json(items.into_iter().map(to_response).collect()))
}

pub async fn list_random(
    State(state): State<AppState>,
    Query(query): Query<RandomQuery>,
) -> Result<Json<Vec<BehaviorResponse>>, ApiError> {
    let items = blocking(&state, move |catalog| catalog.random_batch(query.count as usize)).await?;

    Ok(Json(items.into_iter().map(to_response).collect()))
}
