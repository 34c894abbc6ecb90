//! Forum threads and comments.
//!
//! Posts and comments go live immediately and are moderated post-hoc, so
//! there is no review queue on the write path here.

use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::common::auth::{authorize, Capability};
use crate::common::{Caller, ForumCommentId, ForumPostId, Paginated, PaginationArgs};
use crate::domains::forum::{ForumComment, ForumPost};
use crate::domains::moderation::{self, ContentKind, ContentStatus};
use crate::domains::votes::{Vote, VoteTargetKind};
use crate::server::app::AppState;
use crate::server::error::{require_len, ApiError};

#[derive(Serialize)]
pub struct PostWithScore {
    #[serde(flatten)]
    pub post: ForumPost,
    pub score: i64,
}

#[derive(Serialize)]
pub struct CommentWithScore {
    #[serde(flatten)]
    pub comment: ForumComment,
    pub score: i64,
}

#[derive(Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
}

#[derive(Serialize)]
pub struct PostResponse {
    pub data: ForumPost,
}

pub async fn create_post(
    Extension(state): Extension<AppState>,
    caller: Caller,
    Json(payload): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    authorize(&caller, Capability::CreateForum, None)?;
    require_len("title", &payload.title, 5)?;
    require_len("content", &payload.content, 20)?;

    let post = ForumPost::create(&payload.title, &payload.content, caller.id, &state.db_pool)
        .await?;

    Ok((StatusCode::CREATED, Json(PostResponse { data: post })))
}

pub async fn list_posts(
    Extension(state): Extension<AppState>,
    Query(args): Query<PaginationArgs>,
) -> Result<Json<Paginated<PostWithScore>>, ApiError> {
    let args = args
        .validate()
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
    let rows = ForumPost::find_published(&args, &state.db_pool).await?;

    let ids: Vec<_> = rows.iter().map(|p| p.id.into_uuid()).collect();
    let scores = Vote::scores_for(VoteTargetKind::ForumPost, &ids, &state.db_pool).await?;

    let rows: Vec<PostWithScore> = rows
        .into_iter()
        .map(|post| {
            let score = scores.get(&post.id.into_uuid()).copied().unwrap_or(0);
            PostWithScore { post, score }
        })
        .collect();

    Ok(Json(Paginated::new(rows, &args, |p| p.post.id.into_uuid())))
}

#[derive(Serialize)]
pub struct PostDetailResponse {
    pub data: PostWithScore,
    pub comments: Vec<CommentWithScore>,
}

/// Thread view: the post plus its published comments, scored.
pub async fn get_post(
    Extension(state): Extension<AppState>,
    caller: Option<Caller>,
    Path(id): Path<ForumPostId>,
) -> Result<Json<PostDetailResponse>, ApiError> {
    let post = ForumPost::find_by_id(id, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound("forum post"))?;

    let visible = post.status.is_public()
        || caller
            .as_ref()
            .map(|c| c.role.is_admin() || c.id == post.author_id)
            .unwrap_or(false);
    if !visible {
        return Err(ApiError::NotFound("forum post"));
    }

    let comments = ForumComment::find_for_post(id, &state.db_pool).await?;

    let comment_ids: Vec<_> = comments.iter().map(|c| c.id.into_uuid()).collect();
    let comment_scores =
        Vote::scores_for(VoteTargetKind::ForumComment, &comment_ids, &state.db_pool).await?;

    let post_score = Vote::scores_for(
        VoteTargetKind::ForumPost,
        &[post.id.into_uuid()],
        &state.db_pool,
    )
    .await?
    .get(&post.id.into_uuid())
    .copied()
    .unwrap_or(0);

    let comments = comments
        .into_iter()
        .map(|comment| {
            let score = comment_scores
                .get(&comment.id.into_uuid())
                .copied()
                .unwrap_or(0);
            CommentWithScore { comment, score }
        })
        .collect();

    Ok(Json(PostDetailResponse {
        data: PostWithScore {
            post,
            score: post_score,
        },
        comments,
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

pub async fn set_post_publication(
    Extension(state): Extension<AppState>,
    caller: Caller,
    Path(id): Path<ForumPostId>,
    Json(payload): Json<PublicationRequest>,
) -> Result<Json<PublicationResponse>, ApiError> {
    let status = moderation::service::set_publication(
        ContentKind::ForumPost,
        id.into_uuid(),
        payload.publish,
        &caller,
        &state.db_pool,
    )
    .await?;
    Ok(Json(PublicationResponse { status }))
}

#[derive(Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
    pub parent_id: Option<ForumCommentId>,
}

#[derive(Serialize)]
pub struct CommentResponse {
    pub data: ForumComment,
}

pub async fn create_comment(
    Extension(state): Extension<AppState>,
    caller: Caller,
    Path(post_id): Path<ForumPostId>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiError> {
    authorize(&caller, Capability::CreateForum, None)?;
    require_len("content", &payload.content, 3)?;

    let comment = ForumComment::create(
        post_id,
        payload.parent_id,
        &payload.content,
        caller.id,
        &state.db_pool,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(CommentResponse { data: comment })))
}
