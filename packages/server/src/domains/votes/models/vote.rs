//! Votes over published content.
//!
//! The target is a tagged union `(kind, id)`, so "exactly one target" is
//! structural. Casting is upsert-with-toggle: create if absent, delete if
//! re-casting the same value, update in place on the opposite value. The
//! whole read-modify-write runs in one transaction with the existing row
//! locked, which closes the same-user double-submit race.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

use crate::common::{UserId, VoteId};
use crate::domains::moderation::{ContentHead, ContentKind};

/// What a vote is attached to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "vote_target_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum VoteTargetKind {
    Article,
    Tip,
    ForumPost,
    ForumComment,
}

impl VoteTargetKind {
    pub fn content_kind(&self) -> ContentKind {
        match self {
            VoteTargetKind::Article => ContentKind::Article,
            VoteTargetKind::Tip => ContentKind::Tip,
            VoteTargetKind::ForumPost => ContentKind::ForumPost,
            VoteTargetKind::ForumComment => ContentKind::ForumComment,
        }
    }
}

/// Tagged vote target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTarget {
    pub kind: VoteTargetKind,
    pub id: Uuid,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Vote {
    pub id: VoteId,
    pub user_id: UserId,
    pub target_kind: VoteTargetKind,
    pub target_id: Uuid,
    pub value: i16,
    pub created_at: DateTime<Utc>,
}

/// Observable outcome of a cast, reported back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteOutcome {
    /// First vote on this target.
    Created,
    /// Same value re-cast: the vote was removed.
    Removed,
    /// Opposite value: the vote was flipped in place.
    Switched,
}

#[derive(Error, Debug)]
pub enum VoteError {
    #[error("Vote target not found")]
    TargetNotFound,

    #[error("Content is not published")]
    TargetNotPublished,

    #[error("Vote value must be +1 or -1")]
    InvalidValue,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl Vote {
    /// Cast a vote with upsert-with-toggle semantics.
    ///
    /// After the call exactly one or zero vote rows exist for
    /// `(user, target)`.
    pub async fn cast(
        target: VoteTarget,
        user_id: UserId,
        value: i16,
        pool: &PgPool,
    ) -> Result<VoteOutcome, VoteError> {
        if value != 1 && value != -1 {
            return Err(VoteError::InvalidValue);
        }

        let head = ContentHead::fetch(target.kind.content_kind(), target.id, pool)
            .await?
            .ok_or(VoteError::TargetNotFound)?;
        if !head.status.is_public() {
            return Err(VoteError::TargetNotPublished);
        }

        let mut tx = pool.begin().await?;

        // Lock the existing row (if any) so a rapid double-submit from the
        // same user serializes instead of losing an update.
        let existing: Option<(VoteId, i16)> = sqlx::query_as(
            "SELECT id, value FROM votes
             WHERE user_id = $1 AND target_kind = $2 AND target_id = $3
             FOR UPDATE",
        )
        .bind(user_id)
        .bind(target.kind)
        .bind(target.id)
        .fetch_optional(&mut *tx)
        .await?;

        let outcome = match existing {
            None => {
                sqlx::query(
                    "INSERT INTO votes (id, user_id, target_kind, target_id, value)
                     VALUES ($1, $2, $3, $4, $5)",
                )
                .bind(VoteId::new())
                .bind(user_id)
                .bind(target.kind)
                .bind(target.id)
                .bind(value)
                .execute(&mut *tx)
                .await?;
                VoteOutcome::Created
            }
            Some((id, prior)) if prior == value => {
                sqlx::query("DELETE FROM votes WHERE id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
                VoteOutcome::Removed
            }
            Some((id, _)) => {
                sqlx::query("UPDATE votes SET value = $2 WHERE id = $1")
                    .bind(id)
                    .bind(value)
                    .execute(&mut *tx)
                    .await?;
                VoteOutcome::Switched
            }
        };

        tx.commit().await?;
        Ok(outcome)
    }

    /// Aggregate score of a target, computed on read.
    pub async fn score(target: VoteTarget, pool: &PgPool) -> Result<i64> {
        let score: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(value), 0)::bigint FROM votes
             WHERE target_kind = $1 AND target_id = $2",
        )
        .bind(target.kind)
        .bind(target.id)
        .fetch_one(pool)
        .await?;
        Ok(score)
    }

    /// Scores for a batch of targets of one kind (list rendering).
    pub async fn scores_for(
        kind: VoteTargetKind,
        ids: &[Uuid],
        pool: &PgPool,
    ) -> Result<HashMap<Uuid, i64>> {
        let rows: Vec<(Uuid, i64)> = sqlx::query_as(
            "SELECT target_id, COALESCE(SUM(value), 0)::bigint FROM votes
             WHERE target_kind = $1 AND target_id = ANY($2)
             GROUP BY target_id",
        )
        .bind(kind)
        .bind(ids)
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().collect())
    }

    /// The caller's own vote on a target, if any.
    pub async fn find_own(
        target: VoteTarget,
        user_id: UserId,
        pool: &PgPool,
    ) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM votes
             WHERE user_id = $1 AND target_kind = $2 AND target_id = $3",
        )
        .bind(user_id)
        .bind(target.kind)
        .bind(target.id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }
}
