use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::common::{TipId, UserId, ValidatedPaginationArgs};
use crate::domains::moderation::service::find_listed;
use crate::domains::moderation::{ContentKind, ContentStatus};

/// Short practical tip, optionally categorized.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Tip {
    pub id: TipId,
    pub author_id: UserId,
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    pub status: ContentStatus,
    pub created_at: DateTime<Utc>,
}

impl Tip {
    pub async fn create(
        title: &str,
        content: &str,
        category: Option<&str>,
        author_id: UserId,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO tips (id, author_id, title, content, category, status)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(TipId::new())
        .bind(author_id)
        .bind(title)
        .bind(content)
        .bind(category)
        .bind(ContentKind::Tip.initial_status())
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: TipId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM tips WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_published(args: &ValidatedPaginationArgs, pool: &PgPool) -> Result<Vec<Self>> {
        find_listed("SELECT * FROM tips WHERE status = 'published'", args, pool).await
    }

    pub async fn find_pending(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM tips WHERE status = 'pending_review' ORDER BY id ASC",
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
