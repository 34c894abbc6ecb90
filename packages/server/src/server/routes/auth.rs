//! Registration, login, and email confirmation.

use axum::extract::{Extension, Path};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::auth::Role;
use crate::common::{Caller, UserId};
use crate::domains::users::{User, VerificationToken};
use crate::server::app::AppState;
use crate::server::auth::{hash_password, verify_password};
use crate::server::error::{require_len, ApiError};

/// Public view of a user; never exposes the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub email_confirmed: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            display_name: user.display_name,
            role: user.role,
            email_confirmed: user.email_confirmed,
            created_at: user.created_at,
        }
    }
}

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub display_name: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub data: UserProfile,
}

pub async fn register(
    Extension(state): Extension<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    if !payload.email.contains('@') {
        return Err(ApiError::InvalidRequest("Invalid email address".to_string()));
    }
    require_len("display_name", &payload.display_name, 2)?;
    require_len("password", &payload.password, 8)?;

    let password_hash = hash_password(&payload.password);
    let user = match User::create(
        &payload.email,
        payload.display_name.trim(),
        &password_hash,
        &state.db_pool,
    )
    .await
    {
        Ok(user) => user,
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            return Err(ApiError::InvalidRequest(
                "Email is already registered".to_string(),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    let token = VerificationToken::issue(user.id, &state.db_pool).await?;

    // Best effort: a failed confirmation mail never fails registration.
    if let Err(e) = state
        .mailer
        .send(
            &user.email,
            "Confirm your Verdant account",
            &format!(
                "<p>Welcome to Verdant, {}!</p>\
                 <p>Confirm your email by visiting /auth/confirm/{}</p>",
                user.display_name, token.token
            ),
        )
        .await
    {
        tracing::warn!(error = %e, "Failed to send confirmation email");
    }

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse { data: user.into() }),
    ))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub data: UserProfile,
}

pub async fn login(
    Extension(state): Extension<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = User::find_by_email(&payload.email, &state.db_pool)
        .await?
        .filter(|u| verify_password(&payload.password, &u.password_hash))
        .ok_or(ApiError::Unauthenticated)?;

    let token = state.sessions.create_session(user.id).await;

    Ok(Json(LoginResponse {
        token,
        data: user.into(),
    }))
}

pub async fn logout(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    _caller: Caller,
) -> Result<StatusCode, ApiError> {
    if let Some(token) = bearer_token(&headers) {
        state
            .sessions
            .delete_session(token)
            .await
            .map_err(ApiError::Internal)?;
    }
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Serialize)]
pub struct MeResponse {
    pub data: UserProfile,
}

pub async fn me(
    Extension(state): Extension<AppState>,
    caller: Caller,
) -> Result<Json<MeResponse>, ApiError> {
    let user = User::find_by_id(caller.id, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    Ok(Json(MeResponse { data: user.into() }))
}

#[derive(Serialize)]
pub struct ConfirmResponse {
    pub data: UserProfile,
}

/// Confirm an email address and send the welcome mail.
///
/// The mail send is explicitly non-critical: failure is logged, the
/// confirmation still succeeds.
pub async fn confirm_email(
    Extension(state): Extension<AppState>,
    Path(token): Path<String>,
) -> Result<Json<ConfirmResponse>, ApiError> {
    let user_id = VerificationToken::consume(&token, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound("verification token"))?;

    let user = User::confirm_email(user_id, &state.db_pool)
        .await?
        .ok_or(ApiError::NotFound("user"))?;

    if let Err(e) = state
        .mailer
        .send(
            &user.email,
            "Welcome to Verdant",
            &format!(
                "<p>Hi {}, your email is confirmed.</p>\
                 <p>Browse initiatives near you and say hello in the forum!</p>",
                user.display_name
            ),
        )
        .await
    {
        tracing::warn!(error = %e, user_id = %user.id, "Failed to send welcome email");
    }

    Ok(Json(ConfirmResponse { data: user.into() }))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get("authorization")?.to_str().ok()?;
    Some(value.strip_prefix("Bearer ").unwrap_or(value))
}
