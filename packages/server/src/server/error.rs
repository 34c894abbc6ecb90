//! Error taxonomy for the request boundary.
//!
//! Every handler error funnels into [`ApiError`] and leaves as a JSON
//! `{error}` body with the matching status code. Internal detail is logged,
//! never surfaced.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::common::auth::AuthError;
use crate::domains::forum::CommentError;
use crate::domains::moderation::ModerationError;
use crate::domains::roles::RoleRequestError;
use crate::domains::tasks::TaskError;
use crate::domains::votes::VoteError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    InvalidState(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::InvalidRequest(_) | ApiError::InvalidState(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(e) = &self {
            tracing::error!(error = %e, "Request failed");
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Validate a minimum field length, rejecting whitespace padding.
pub fn require_len(field: &str, value: &str, min: usize) -> Result<(), ApiError> {
    if value.trim().chars().count() < min {
        return Err(ApiError::InvalidRequest(format!(
            "{field} must be at least {min} characters"
        )));
    }
    Ok(())
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::AuthenticationRequired => ApiError::Unauthenticated,
            AuthError::PermissionDenied(msg) => ApiError::Forbidden(msg),
            AuthError::AdminRequired => ApiError::Forbidden("Admin access required".to_string()),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Internal(e.into())
    }
}

impl From<ModerationError> for ApiError {
    fn from(e: ModerationError) -> Self {
        match e {
            ModerationError::NotFound(kind) => ApiError::NotFound(kind),
            ModerationError::InvalidState(msg) => ApiError::InvalidState(msg),
            ModerationError::Auth(e) => e.into(),
            ModerationError::Database(e) => e.into(),
        }
    }
}

impl From<VoteError> for ApiError {
    fn from(e: VoteError) -> Self {
        match e {
            VoteError::TargetNotFound => ApiError::NotFound("vote target"),
            VoteError::TargetNotPublished => {
                ApiError::InvalidState("Content is not published".to_string())
            }
            VoteError::InvalidValue => {
                ApiError::InvalidRequest("Vote value must be +1 or -1".to_string())
            }
            VoteError::Database(e) => e.into(),
        }
    }
}

impl From<CommentError> for ApiError {
    fn from(e: CommentError) -> Self {
        match e {
            CommentError::PostNotFound => ApiError::NotFound("forum post"),
            CommentError::ParentNotFound
            | CommentError::NestedReply
            | CommentError::ParentWrongPost => ApiError::InvalidRequest(e.to_string()),
            CommentError::Database(e) => e.into(),
        }
    }
}

impl From<RoleRequestError> for ApiError {
    fn from(e: RoleRequestError) -> Self {
        match e {
            RoleRequestError::NotAPromotion | RoleRequestError::AlreadyPending => {
                ApiError::InvalidRequest(e.to_string())
            }
            RoleRequestError::NotFound => ApiError::NotFound("role request"),
            RoleRequestError::AlreadyProcessed => {
                ApiError::InvalidState("Role request already processed".to_string())
            }
            RoleRequestError::Database(e) => e.into(),
        }
    }
}

impl From<TaskError> for ApiError {
    fn from(e: TaskError) -> Self {
        match e {
            TaskError::ListFull => ApiError::InvalidRequest(e.to_string()),
            TaskError::NotFound => ApiError::NotFound("task"),
            TaskError::Database(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::Forbidden("no".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::InvalidRequest("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotFound("tip").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::InvalidState("done".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_internal_error_hides_detail() {
        let err = ApiError::Internal(anyhow::anyhow!("connection refused to db at 10.0.0.3"));
        assert_eq!(err.to_string(), "Internal server error");
    }

    #[test]
    fn test_require_len() {
        assert!(require_len("title", "hello", 5).is_ok());
        assert!(require_len("title", "hi", 5).is_err());
        assert!(require_len("title", "   hi   ", 5).is_err());
    }
}
