//! Admin surface: review queues, moderation decisions, role requests, users.
//!
//! Every handler authorizes up front; the `{kind}` path segment selects the
//! content table through [`ContentKind`].

use axum::extract::{Extension, Path, Query};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::auth::{authorize, Capability, Role};
use crate::common::{Caller, Paginated, PaginationArgs, RoleRequestId, UserId};
use crate::domains::articles::Article;
use crate::domains::initiatives::Initiative;
use crate::domains::moderation::{self, ContentHead, ContentKind, ContentStatus};
use crate::domains::roles::{ProcessAction, RoleRequest};
use crate::domains::tips::Tip;
use crate::domains::users::User;
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::routes::auth::UserProfile;

fn parse_kind(kind: &str) -> Result<ContentKind, ApiError> {
    ContentKind::parse(kind)
        .ok_or_else(|| ApiError::InvalidRequest(format!("Unknown content kind: {kind}")))
}

// ============================================================================
// Review queues
// ============================================================================

#[derive(Serialize)]
pub struct QueueOverviewResponse {
    pub pending: Vec<QueueCount>,
}

#[derive(Serialize)]
pub struct QueueCount {
    pub kind: &'static str,
    pub count: i64,
}

/// Pending counts per editorial kind.
pub async fn queue_overview(
    Extension(state): Extension<AppState>,
    caller: Caller,
) -> Result<Json<QueueOverviewResponse>, ApiError> {
    authorize(&caller, Capability::Approve, None)?;

    let mut pending = Vec::new();
    for kind in [ContentKind::Initiative, ContentKind::Article, ContentKind::Tip] {
        let count = moderation::service::pending_count(kind, &state.db_pool).await?;
        pending.push(QueueCount {
            kind: kind.as_str(),
            count,
        });
    }
    Ok(Json(QueueOverviewResponse { pending }))
}

#[derive(Serialize)]
pub struct QueueResponse {
    pub data: Vec<serde_json::Value>,
}

/// Review queue for one kind, oldest submissions first.
///
/// Forum kinds are published on creation and moderated post-hoc, so their
/// queues are always empty.
pub async fn list_queue(
    Extension(state): Extension<AppState>,
    caller: Caller,
    Path(kind): Path<String>,
) -> Result<Json<QueueResponse>, ApiError> {
    authorize(&caller, Capability::Approve, None)?;
    let kind = parse_kind(&kind)?;

    let data = match kind {
        ContentKind::Initiative => {
            to_values(Initiative::find_pending(&state.db_pool).await?)?
        }
        ContentKind::Article => to_values(Article::find_pending(&state.db_pool).await?)?,
        ContentKind::Tip => to_values(Tip::find_pending(&state.db_pool).await?)?,
        ContentKind::ForumPost | ContentKind::ForumComment => Vec::new(),
    };

    Ok(Json(QueueResponse { data }))
}

fn to_values<T: Serialize>(rows: Vec<T>) -> Result<Vec<serde_json::Value>, ApiError> {
    rows.into_iter()
        .map(|r| serde_json::to_value(r).map_err(|e| ApiError::Internal(e.into())))
        .collect()
}

// ============================================================================
// Moderation decisions
// ============================================================================

#[derive(Serialize)]
pub struct DecisionResponse {
    pub status: ContentStatus,
}

pub async fn approve_content(
    Extension(state): Extension<AppState>,
    caller: Caller,
    Path((kind, id)): Path<(String, Uuid)>,
) -> Result<Json<DecisionResponse>, ApiError> {
    let kind = parse_kind(&kind)?;
    let status = moderation::service::approve(kind, id, &caller, &state.db_pool).await?;

    notify_author(&state, kind, id, "Your submission was approved", |name| {
        format!("<p>Hi {name}, your submission was approved and is now live.</p>")
    })
    .await;

    Ok(Json(DecisionResponse { status }))
}

#[derive(Deserialize, Default)]
pub struct RejectRequest {
    pub note: Option<String>,
}

pub async fn reject_content(
    Extension(state): Extension<AppState>,
    caller: Caller,
    Path((kind, id)): Path<(String, Uuid)>,
    Json(payload): Json<RejectRequest>,
) -> Result<Json<DecisionResponse>, ApiError> {
    let kind = parse_kind(&kind)?;
    let status = moderation::service::reject(
        kind,
        id,
        &caller,
        payload.note.as_deref(),
        &state.db_pool,
    )
    .await?;

    notify_author(&state, kind, id, "Your submission was not approved", |name| {
        format!("<p>Hi {name}, your submission did not pass review.</p>")
    })
    .await;

    Ok(Json(DecisionResponse { status }))
}

/// Best-effort decision mail to the content author. Failures are logged and
/// never affect the decision itself.
async fn notify_author(
    state: &AppState,
    kind: ContentKind,
    id: Uuid,
    subject: &str,
    body: impl Fn(&str) -> String,
) {
    let author = match ContentHead::fetch(kind, id, &state.db_pool).await {
        Ok(Some(head)) => User::find_by_id(head.author_id, &state.db_pool).await.ok().flatten(),
        _ => None,
    };

    if let Some(author) = author {
        if let Err(e) = state
            .mailer
            .send(&author.email, subject, &body(&author.display_name))
            .await
        {
            tracing::warn!(error = %e, "Failed to send moderation email");
        }
    }
}

// ============================================================================
// Role requests
// ============================================================================

#[derive(Serialize)]
pub struct RoleRequestQueueResponse {
    pub data: Vec<RoleRequest>,
}

pub async fn list_role_requests(
    Extension(state): Extension<AppState>,
    caller: Caller,
) -> Result<Json<RoleRequestQueueResponse>, ApiError> {
    authorize(&caller, Capability::ProcessRoleRequests, None)?;
    let requests = RoleRequest::find_pending(&state.db_pool).await?;
    Ok(Json(RoleRequestQueueResponse { data: requests }))
}

#[derive(Deserialize)]
pub struct ProcessRoleRequestRequest {
    pub action: ProcessAction,
    pub admin_notes: Option<String>,
}

#[derive(Serialize)]
pub struct ProcessRoleRequestResponse {
    pub data: RoleRequest,
}

/// Approve or reject a pending promotion. Approval updates the user's role
/// in the same transaction.
pub async fn process_role_request(
    Extension(state): Extension<AppState>,
    caller: Caller,
    Path(id): Path<RoleRequestId>,
    Json(payload): Json<ProcessRoleRequestRequest>,
) -> Result<Json<ProcessRoleRequestResponse>, ApiError> {
    authorize(&caller, Capability::ProcessRoleRequests, None)?;

    let request = RoleRequest::process(
        id,
        payload.action,
        payload.admin_notes.as_deref(),
        caller.id,
        &state.db_pool,
    )
    .await?;

    if let Ok(Some(user)) = User::find_by_id(request.user_id, &state.db_pool).await {
        let (subject, body) = match payload.action {
            ProcessAction::Approve => (
                "Your role request was approved",
                format!(
                    "<p>Hi {}, you are now a {}.</p>",
                    user.display_name,
                    request.requested_role.as_str()
                ),
            ),
            ProcessAction::Reject => (
                "Your role request was declined",
                format!("<p>Hi {}, your role request was declined.</p>", user.display_name),
            ),
        };
        if let Err(e) = state.mailer.send(&user.email, subject, &body).await {
            tracing::warn!(error = %e, "Failed to send role request email");
        }
    }

    Ok(Json(ProcessRoleRequestResponse { data: request }))
}

// ============================================================================
// Users
// ============================================================================

pub async fn list_users(
    Extension(state): Extension<AppState>,
    caller: Caller,
    Query(args): Query<PaginationArgs>,
) -> Result<Json<Paginated<UserProfile>>, ApiError> {
    authorize(&caller, Capability::ManageUsers, None)?;
    let args = args
        .validate()
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;

    let users = User::find_paginated(&args, &state.db_pool).await?;
    let users: Vec<UserProfile> = users.into_iter().map(Into::into).collect();
    Ok(Json(Paginated::new(users, &args, |u| u.id.into_uuid())))
}

#[derive(Deserialize)]
pub struct SetRoleRequest {
    pub role: Role,
}

#[derive(Serialize)]
pub struct SetRoleResponse {
    pub data: UserProfile,
}

/// Directly set a user's role, bypassing the request workflow.
pub async fn set_user_role(
    Extension(state): Extension<AppState>,
    caller: Caller,
    Path(id): Path<UserId>,
    Json(payload): Json<SetRoleRequest>,
) -> Result<Json<SetRoleResponse>, ApiError> {
    authorize(&caller, Capability::ManageUsers, None)?;

    let user = User::set_role(id, payload.role, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    Ok(Json(SetRoleResponse { data: user.into() }))
}
