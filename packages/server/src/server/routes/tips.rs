use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::common::auth::{authorize, Capability};
use crate::common::{Caller, Paginated, PaginationArgs, TipId};
use crate::domains::moderation::{self, ContentKind, ContentStatus};
use crate::domains::tips::Tip;
use crate::domains::votes::{Vote, VoteTarget, VoteTargetKind};
use crate::server::app::AppState;
use crate::server::error::{require_len, ApiError};

#[derive(Serialize)]
pub struct TipWithScore {
    #[serde(flatten)]
    pub tip: Tip,
    pub score: i64,
}

#[derive(Deserialize)]
pub struct CreateTipRequest {
    pub title: String,
    pub content: String,
    pub category: Option<String>,
}

#[derive(Serialize)]
pub struct TipResponse {
    pub data: Tip,
}

pub async fn create_tip(
    Extension(state): Extension<AppState>,
    caller: Caller,
    Json(payload): Json<CreateTipRequest>,
) -> Result<(StatusCode, Json<TipResponse>), ApiError> {
    authorize(&caller, Capability::CreateEditorial, None)?;
    require_len("title", &payload.title, 5)?;
    require_len("content", &payload.content, 20)?;

    let tip = Tip::create(
        &payload.title,
        &payload.content,
        payload.category.as_deref(),
        caller.id,
        &state.db_pool,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(TipResponse { data: tip })))
}

pub async fn list_tips(
    Extension(state): Extension<AppState>,
    Query(args): Query<PaginationArgs>,
) -> Result<Json<Paginated<TipWithScore>>, ApiError> {
    let args = args
        .validate()
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
    let rows = Tip::find_published(&args, &state.db_pool).await?;

    let ids: Vec<_> = rows.iter().map(|t| t.id.into_uuid()).collect();
    let scores = Vote::scores_for(VoteTargetKind::Tip, &ids, &state.db_pool).await?;

    let rows: Vec<TipWithScore> = rows
        .into_iter()
        .map(|tip| {
            let score = scores.get(&tip.id.into_uuid()).copied().unwrap_or(0);
            TipWithScore { tip, score }
        })
        .collect();

    Ok(Json(Paginated::new(rows, &args, |t| t.tip.id.into_uuid())))
}

#[derive(Serialize)]
pub struct TipDetailResponse {
    pub data: TipWithScore,
}

pub async fn get_tip(
    Extension(state): Extension<AppState>,
    caller: Option<Caller>,
    Path(id): Path<TipId>,
) -> Result<Json<TipDetailResponse>, ApiError> {
    let tip = Tip::find_by_id(id, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound("tip"))?;

    let visible = tip.status.is_public()
        || caller
            .as_ref()
            .map(|c| c.role.is_admin() || c.id == tip.author_id)
            .unwrap_or(false);
    if !visible {
        return Err(ApiError::NotFound("tip"));
    }

    let score = Vote::score(
        VoteTarget {
            kind: VoteTargetKind::Tip,
            id: tip.id.into_uuid(),
        },
        &state.db_pool,
    )
    .await?;

    Ok(Json(TipDetailResponse {
        data: TipWithScore { tip, score },
    }))
}

#[derive(Deserialize)]
pub struct PublicationRequest {
    pub publish: bool,
}

#[derive(Serialize)]
pub struct PublicationResponse {
    pub status: ContentStatus,
}

pub async fn set_tip_publication(
    Extension(state): Extension<AppState>,
    caller: Caller,
    Path(id): Path<TipId>,
    Json(payload): Json<PublicationRequest>,
) -> Result<Json<PublicationResponse>, ApiError> {
    let status = moderation::service::set_publication(
        ContentKind::Tip,
        id.into_uuid(),
        payload.publish,
        &caller,
        &state.db_pool,
    )
    .await?;
    Ok(Json(PublicationResponse { status }))
}
