use axum::extract::Extension;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::common::auth::{authorize, Capability, Role};
use crate::common::Caller;
use crate::domains::roles::RoleRequest;
use crate::server::app::AppState;
use crate::server::error::{require_len, ApiError};

#[derive(Deserialize)]
pub struct CreateRoleRequestRequest {
    pub requested_role: Role,
    pub reason: String,
}

#[derive(Serialize)]
pub struct RoleRequestResponse {
    pub data: RoleRequest,
}

/// Ask for a promotion. One pending request per user.
pub async fn create_role_request(
    Extension(state): Extension<AppState>,
    caller: Caller,
    Json(payload): Json<CreateRoleRequestRequest>,
) -> Result<(StatusCode, Json<RoleRequestResponse>), ApiError> {
    authorize(&caller, Capability::RequestPromotion, None)?;
    require_len("reason", &payload.reason, 10)?;

    let request = RoleRequest::create_pending(
        caller.id,
        caller.role,
        payload.requested_role,
        payload.reason.trim(),
        &state.db_pool,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(RoleRequestResponse { data: request }),
    ))
}

#[derive(Serialize)]
pub struct RoleRequestListResponse {
    pub data: Vec<RoleRequest>,
}

/// The caller's own request history, newest first.
pub async fn list_own_role_requests(
    Extension(state): Extension<AppState>,
    caller: Caller,
) -> Result<Json<RoleRequestListResponse>, ApiError> {
    let requests = RoleRequest::find_by_user(caller.id, &state.db_pool).await?;
    Ok(Json(RoleRequestListResponse { data: requests }))
}
