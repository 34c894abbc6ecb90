//! Applies moderation transitions against the store.
//!
//! Works uniformly over every content table: fetch the status head, run the
//! pure transition, persist the new status and the audit entry in one
//! transaction.

use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use super::audit::{ModerationAction, ModerationLogEntry};
use super::status::{ContentKind, ContentStatus, Transition};
use crate::common::auth::{authorize, AuthError, Caller, Capability};
use crate::common::UserId;

/// The moderation-relevant head of a content row.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct ContentHead {
    pub id: Uuid,
    pub author_id: UserId,
    pub status: ContentStatus,
}

#[derive(Error, Debug)]
pub enum ModerationError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    InvalidState(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl ContentHead {
    /// Load id/author/status for any content kind.
    pub async fn fetch(
        kind: ContentKind,
        id: Uuid,
        pool: &PgPool,
    ) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT id, author_id, status FROM {} WHERE id = $1",
            kind.table()
        );
        sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}

/// Approve content. Admin only; idempotent on already-approved rows.
pub async fn approve(
    kind: ContentKind,
    id: Uuid,
    caller: &Caller,
    pool: &PgPool,
) -> Result<ContentStatus, ModerationError> {
    authorize(caller, Capability::Approve, None)?;

    let head = ContentHead::fetch(kind, id, pool)
        .await?
        .ok_or(ModerationError::NotFound(kind.as_str()))?;

    match head.status.approve() {
        Ok(Transition::Unchanged) => Ok(head.status),
        Ok(Transition::Changed(next)) => {
            persist(kind, id, next, ModerationAction::Approved, caller.id, None, pool).await?;
            Ok(next)
        }
        Err(e) => Err(ModerationError::InvalidState(e.0)),
    }
}

/// Reject content. Admin only; the row is retained in the terminal
/// `rejected` state. Rejecting a top-level comment also rejects its replies.
pub async fn reject(
    kind: ContentKind,
    id: Uuid,
    caller: &Caller,
    note: Option<&str>,
    pool: &PgPool,
) -> Result<ContentStatus, ModerationError> {
    authorize(caller, Capability::Reject, None)?;

    let head = ContentHead::fetch(kind, id, pool)
        .await?
        .ok_or(ModerationError::NotFound(kind.as_str()))?;

    match head.status.reject() {
        Ok(Transition::Changed(next)) => {
            let mut tx = pool.begin().await?;
            let sql = format!("UPDATE {} SET status = $2 WHERE id = $1", kind.table());
            sqlx::query(&sql)
                .bind(id)
                .bind(next)
                .execute(&mut *tx)
                .await?;

            if kind == ContentKind::ForumComment {
                sqlx::query(
                    "UPDATE forum_comments SET status = 'rejected'
                     WHERE parent_id = $1 AND status <> 'rejected'",
                )
                .bind(id)
                .execute(&mut *tx)
                .await?;
            }

            ModerationLogEntry::record(kind, id, ModerationAction::Rejected, caller.id, note, &mut tx)
                .await?;
            tx.commit().await?;
            Ok(next)
        }
        Ok(Transition::Unchanged) => Ok(head.status),
        Err(e) => Err(ModerationError::InvalidState(e.0)),
    }
}

/// Toggle publication. Author or admin; only legal between published and
/// unpublished.
pub async fn set_publication(
    kind: ContentKind,
    id: Uuid,
    publish: bool,
    caller: &Caller,
    pool: &PgPool,
) -> Result<ContentStatus, ModerationError> {
    let head = ContentHead::fetch(kind, id, pool)
        .await?
        .ok_or(ModerationError::NotFound(kind.as_str()))?;

    authorize(caller, Capability::Publish, Some(head.author_id))?;

    match head.status.set_publication(publish) {
        Ok(Transition::Unchanged) => Ok(head.status),
        Ok(Transition::Changed(next)) => {
            let action = if publish {
                ModerationAction::Published
            } else {
                ModerationAction::Unpublished
            };
            persist(kind, id, next, action, caller.id, None, pool).await?;
            Ok(next)
        }
        Err(e) => Err(ModerationError::InvalidState(e.0)),
    }
}

/// Write the status change and its log entry atomically.
async fn persist(
    kind: ContentKind,
    id: Uuid,
    next: ContentStatus,
    action: ModerationAction,
    actor_id: UserId,
    note: Option<&str>,
    pool: &PgPool,
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    let sql = format!("UPDATE {} SET status = $2 WHERE id = $1", kind.table());
    sqlx::query(&sql)
        .bind(id)
        .bind(next)
        .execute(&mut *tx)
        .await?;
    ModerationLogEntry::record(kind, id, action, actor_id, note, &mut tx).await?;
    tx.commit().await?;
    Ok(())
}

/// Cursor-window listing over a base `SELECT ... WHERE <filter>` against a
/// moderated table. Newest first on the forward path; V7 ids carry the
/// ordering.
pub async fn find_listed<T>(
    base: &str,
    args: &crate::common::ValidatedPaginationArgs,
    pool: &PgPool,
) -> anyhow::Result<Vec<T>>
where
    T: Send + Unpin + for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow>,
{
    let rows = if args.is_forward() {
        let sql = format!("{base} AND ($1::uuid IS NULL OR id < $1) ORDER BY id DESC LIMIT $2");
        sqlx::query_as::<_, T>(&sql)
            .bind(args.cursor)
            .bind(args.fetch_limit())
            .fetch_all(pool)
            .await?
    } else {
        let sql = format!("{base} AND ($1::uuid IS NULL OR id > $1) ORDER BY id ASC LIMIT $2");
        let mut rows = sqlx::query_as::<_, T>(&sql)
            .bind(args.cursor)
            .bind(args.fetch_limit())
            .fetch_all(pool)
            .await?;
        rows.reverse();
        rows
    };
    Ok(rows)
}

/// Count of rows awaiting review per kind (admin dashboard).
pub async fn pending_count(kind: ContentKind, pool: &PgPool) -> Result<i64, sqlx::Error> {
    let sql = format!(
        "SELECT COUNT(*) FROM {} WHERE status = 'pending_review'",
        kind.table()
    );
    sqlx::query_scalar::<_, i64>(&sql).fetch_one(pool).await
}
