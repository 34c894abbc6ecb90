//! Role-promotion workflow.
//!
//! A user asks for a role strictly above their current one; an admin
//! approves or rejects. Approval writes the request status and the user's
//! new role in one transaction. Terminal states are immutable.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;

use crate::common::auth::Role;
use crate::common::{RoleRequestId, UserId};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "role_request_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RoleRequestStatus {
    Pending,
    Approved,
    Rejected,
}

/// Admin decision on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessAction {
    Approve,
    Reject,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct RoleRequest {
    pub id: RoleRequestId,
    pub user_id: UserId,
    pub requested_role: Role,
    pub status: RoleRequestStatus,
    pub reason: String,
    pub admin_notes: Option<String>,
    pub processed_by: Option<UserId>,
    pub processed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Error, Debug)]
pub enum RoleRequestError {
    #[error("Requested role must be above your current role")]
    NotAPromotion,

    #[error("You already have a pending role request")]
    AlreadyPending,

    #[error("Role request not found")]
    NotFound,

    #[error("Role request already processed")]
    AlreadyProcessed,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl RoleRequest {
    /// Create a pending request for a role strictly above `current_role`.
    pub async fn create_pending(
        user_id: UserId,
        current_role: Role,
        requested_role: Role,
        reason: &str,
        pool: &PgPool,
    ) -> Result<Self, RoleRequestError> {
        if requested_role <= current_role {
            return Err(RoleRequestError::NotAPromotion);
        }

        let result = sqlx::query_as::<_, Self>(
            "INSERT INTO role_requests (id, user_id, requested_role, status, reason)
             VALUES ($1, $2, $3, 'pending', $4)
             RETURNING *",
        )
        .bind(RoleRequestId::new())
        .bind(user_id)
        .bind(requested_role)
        .bind(reason)
        .fetch_one(pool)
        .await;

        // The partial unique index on (user_id) WHERE status = 'pending'
        // backs the one-pending-request invariant.
        match result {
            Ok(request) => Ok(request),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(RoleRequestError::AlreadyPending)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Process a pending request. Approval copies the requested role onto
    /// the user in the same transaction; both writes commit or neither.
    pub async fn process(
        id: RoleRequestId,
        action: ProcessAction,
        admin_notes: Option<&str>,
        admin_id: UserId,
        pool: &PgPool,
    ) -> Result<Self, RoleRequestError> {
        let mut tx = pool.begin().await?;

        let request: Self = sqlx::query_as::<_, Self>(
            "SELECT * FROM role_requests WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RoleRequestError::NotFound)?;

        if request.status != RoleRequestStatus::Pending {
            return Err(RoleRequestError::AlreadyProcessed);
        }

        let status = match action {
            ProcessAction::Approve => RoleRequestStatus::Approved,
            ProcessAction::Reject => RoleRequestStatus::Rejected,
        };

        let updated = sqlx::query_as::<_, Self>(
            "UPDATE role_requests
             SET status = $2, admin_notes = $3, processed_by = $4, processed_at = now()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(status)
        .bind(admin_notes)
        .bind(admin_id)
        .fetch_one(&mut *tx)
        .await?;

        if action == ProcessAction::Approve {
            sqlx::query("UPDATE users SET role = $2 WHERE id = $1")
                .bind(request.user_id)
                .bind(request.requested_role)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(updated)
    }

    /// Pending queue, oldest first.
    pub async fn find_pending(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM role_requests WHERE status = 'pending' ORDER BY id ASC",
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// A user's own requests, newest first.
    pub async fn find_by_user(user_id: UserId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM role_requests WHERE user_id = $1 ORDER BY id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
