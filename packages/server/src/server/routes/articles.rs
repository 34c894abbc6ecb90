use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::common::auth::{authorize, Capability};
use crate::common::{ArticleId, Caller, Paginated, PaginationArgs};
use crate::domains::articles::Article;
use crate::domains::moderation::{self, ContentKind, ContentStatus};
use crate::domains::votes::{Vote, VoteTarget, VoteTargetKind};
use crate::server::app::AppState;
use crate::server::error::{require_len, ApiError};

/// Article plus its vote score, as list and detail endpoints return it.
#[derive(Serialize)]
pub struct ArticleWithScore {
    #[serde(flatten)]
    pub article: Article,
    pub score: i64,
}

#[derive(Deserialize)]
pub struct CreateArticleRequest {
    pub title: String,
    pub body: String,
    pub summary: Option<String>,
}

#[derive(Serialize)]
pub struct ArticleResponse {
    pub data: Article,
}

pub async fn create_article(
    Extension(state): Extension<AppState>,
    caller: Caller,
    Json(payload): Json<CreateArticleRequest>,
) -> Result<(StatusCode, Json<ArticleResponse>), ApiError> {
    authorize(&caller, Capability::CreateEditorial, None)?;
    require_len("title", &payload.title, 5)?;
    require_len("body", &payload.body, 20)?;

    let article = Article::create(
        &payload.title,
        &payload.body,
        payload.summary.as_deref(),
        caller.id,
        &state.db_pool,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ArticleResponse { data: article })))
}

pub async fn list_articles(
    Extension(state): Extension<AppState>,
    Query(args): Query<PaginationArgs>,
) -> Result<Json<Paginated<ArticleWithScore>>, ApiError> {
    let args = args
        .validate()
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
    let rows = Article::find_published(&args, &state.db_pool).await?;

    let ids: Vec<_> = rows.iter().map(|a| a.id.into_uuid()).collect();
    let scores = Vote::scores_for(VoteTargetKind::Article, &ids, &state.db_pool).await?;

    let rows: Vec<ArticleWithScore> = rows
        .into_iter()
        .map(|article| {
            let score = scores.get(&article.id.into_uuid()).copied().unwrap_or(0);
            ArticleWithScore { article, score }
        })
        .collect();

    Ok(Json(Paginated::new(rows, &args, |a| {
        a.article.id.into_uuid()
    })))
}

#[derive(Serialize)]
pub struct ArticleDetailResponse {
    pub data: ArticleWithScore,
}

pub async fn get_article(
    Extension(state): Extension<AppState>,
    caller: Option<Caller>,
    Path(id): Path<ArticleId>,
) -> Result<Json<ArticleDetailResponse>, ApiError> {
    let article = Article::find_by_id(id, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound("article"))?;

    let visible = article.status.is_public()
        || caller
            .as_ref()
            .map(|c| c.role.is_admin() || c.id == article.author_id)
            .unwrap_or(false);
    if !visible {
        return Err(ApiError::NotFound("article"));
    }

    let score = Vote::score(
        VoteTarget {
            kind: VoteTargetKind::Article,
            id: article.id.into_uuid(),
        },
        &state.db_pool,
    )
    .await?;

    Ok(Json(ArticleDetailResponse {
        data: ArticleWithScore { article, score },
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

pub async fn set_article_publication(
    Extension(state): Extension<AppState>,
    caller: Caller,
    Path(id): Path<ArticleId>,
    Json(payload): Json<PublicationRequest>,
) -> Result<Json<PublicationResponse>, ApiError> {
    let status = moderation::service::set_publication(
        ContentKind::Article,
        id.into_uuid(),
        payload.publish,
        &caller,
        &state.db_pool,
    )
    .await?;
    Ok(Json(PublicationResponse { status }))
}
