use axum::extract::{FromRequestParts, Request};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use axum::Extension;

use crate::common::Caller;
use crate::domains::users::User;
use crate::server::app::AppState;
use crate::server::error::ApiError;

/// Middleware to resolve the session token into the current caller.
///
/// This middleware:
/// 1. Extracts the bearer token from the Authorization header
/// 2. Looks up the session, then loads the user row for a fresh role
/// 3. Stores a `Caller` in request extensions
///
/// Note: it does NOT block requests - it only extracts identity.
/// Authorization happens in handlers via `authorize`.
pub async fn session_auth_middleware(
    Extension(state): Extension<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(caller) = extract_caller(request.headers(), &state).await {
        request.extensions_mut().insert(caller);
    }

    next.run(request).await
}

/// Extract and verify the caller from a request
async fn extract_caller(headers: &axum::http::HeaderMap, state: &AppState) -> Option<Caller> {
    let auth_header = headers.get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str);

    let session = state.sessions.get_session(token).await?;

    // Role and confirmation state come from the store, not the session, so
    // an approved promotion is visible on the next request.
    let user = User::find_by_id(session.user_id, &state.db_pool).await.ok()??;
    Some(user.caller())
}

/// Extractor for handlers that require authentication: yields the caller or
/// responds 401.
#[async_trait::async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Caller>()
            .copied()
            .ok_or(ApiError::Unauthenticated)
    }
}
