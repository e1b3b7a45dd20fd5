use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Aggregate, Behavior, VoteCategory};

// -- Submission --

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubmitBehaviorRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitBehaviorResponse {
    pub id: Uuid,
}

// -- Votes --

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CastVoteRequest {
    pub category: VoteCategory,
}

// -- Listings --

/// A behavior with its derived tallies attached, so clients never divide.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorResponse {
    #[serde(flatten)]
    pub behavior: Behavior,
    pub aggregate: Aggregate,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub items: Vec<BehaviorResponse>,
    /// Absent once the page came back short.
    pub next_cursor: Option<String>,
}

// -- Judging --

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NextUnseenRequest {
    #[serde(default)]
    pub exclude: Vec<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum NextUnseenResponse {
    Next {
        #[serde(rename = "trait")]
        behavior: BehaviorResponse,
    },
    Exhausted,
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
