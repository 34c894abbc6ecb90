//! Moderation audit log.
//!
//! Every status transition writes an entry: who acted, on what, and why.
//! Rejection retains the content row, so the log plus the row together
//! preserve the full history.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::status::ContentKind;
use crate::common::UserId;

/// Action recorded in the moderation log.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[sqlx(type_name = "moderation_action", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ModerationAction {
    Approved,
    Rejected,
    Published,
    Unpublished,
}

#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct ModerationLogEntry {
    pub id: Uuid,
    pub entity_kind: String,
    pub entity_id: Uuid,
    pub action: ModerationAction,
    pub actor_id: UserId,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ModerationLogEntry {
    /// Record a transition inside the caller's transaction so the log entry
    /// commits or rolls back with the status change.
    pub async fn record(
        kind: ContentKind,
        entity_id: Uuid,
        action: ModerationAction,
        actor_id: UserId,
        note: Option<&str>,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO moderation_log (id, entity_kind, entity_id, action, actor_id, note)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(Uuid::now_v7())
        .bind(kind.as_str())
        .bind(entity_id)
        .bind(action)
        .bind(actor_id)
        .bind(note)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    /// History of a single entity, oldest first.
    pub async fn find_for_entity(
        kind: ContentKind,
        entity_id: Uuid,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM moderation_log
             WHERE entity_kind = $1 AND entity_id = $2
             ORDER BY created_at ASC",
        )
        .bind(kind.as_str())
        .bind(entity_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
