use axum::extract::Extension;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::auth::{authorize, Capability};
use crate::common::Caller;
use crate::domains::votes::{Vote, VoteOutcome, VoteTarget, VoteTargetKind};
use crate::server::app::AppState;
use crate::server::error::ApiError;

#[derive(Deserialize)]
pub struct CastVoteRequest {
    pub target_kind: VoteTargetKind,
    pub target_id: Uuid,
    pub value: i16,
}

#[derive(Serialize)]
pub struct CastVoteResponse {
    pub outcome: VoteOutcome,
    pub score: i64,
}

/// Cast, flip, or retract a vote. Re-casting the same value removes it.
pub async fn cast_vote(
    Extension(state): Extension<AppState>,
    caller: Caller,
    Json(payload): Json<CastVoteRequest>,
) -> Result<Json<CastVoteResponse>, ApiError> {
    authorize(&caller, Capability::Vote, None)?;

    let target = VoteTarget {
        kind: payload.target_kind,
        id: payload.target_id,
    };

    let outcome = Vote::cast(target, caller.id, payload.value, &state.db_pool).await?;
    let score = Vote::score(target, &state.db_pool).await?;

    Ok(Json(CastVoteResponse { outcome, score }))
}
