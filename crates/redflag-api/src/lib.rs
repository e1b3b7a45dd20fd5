pub mod error;
pub mod judge;
pub mod middleware;
pub mod moderation;
pub mod traits;
pub mod votes;

use std::sync::Arc;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use tracing::error;

use redflag_core::{Catalog, aggregate};
use redflag_db::Database;
use redflag_types::Behavior;
use redflag_types::api::BehaviorResponse;

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub catalog: Catalog<Database>,
    pub moderator_key: String,
}

/// All routes, without transport layers (CORS, tracing) which the binary adds.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/traits", post(traits::submit))
        .route("/traits/recent", get(traits::list_recent))
        .route("/traits/popular", get(traits::list_popular))
        .route("/traits/approved", get(traits::list_approved))
        .route("/traits/random", get(traits::list_random))
        .route("/traits/verdict/{category}", get(traits::list_by_verdict))
        .route("/traits/{id}", get(traits::get_trait))
        .route("/traits/{id}/votes", post(votes::cast_vote))
        .route("/judge/next", post(judge::next_unseen))
        .with_state(state.clone());

    let moderation_routes = Router::new()
        .route("/moderation/traits/{id}/approve", post(moderation::approve))
        .layer(from_fn_with_state(state.clone(), middleware::require_moderator))
        .with_state(state);

    Router::new().merge(public_routes).merge(moderation_routes)
}

async fn health() -> &'static str {
    "ok"
}

/// Run a catalog call off the async runtime; SQLite access blocks.
pub(crate) async fn blocking<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Catalog<Database>) -> redflag_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.catalog))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::internal()
        })?
        .map_err(ApiError::from)
}

pub(crate) fn to_response(behavior: Behavior) -> BehaviorResponse {
    BehaviorResponse {
        aggregate: aggregate(&behavior.votes),
        behavior,
    }
}
