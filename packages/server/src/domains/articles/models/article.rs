use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::common::{ArticleId, UserId, ValidatedPaginationArgs};
use crate::domains::moderation::service::find_listed;
use crate::domains::moderation::{ContentKind, ContentStatus};

/// Long-form article.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Article {
    pub id: ArticleId,
    pub author_id: UserId,
    pub title: String,
    pub body: String,
    pub summary: Option<String>,
    pub status: ContentStatus,
    pub created_at: DateTime<Utc>,
}

impl Article {
    pub async fn create(
        title: &str,
        body: &str,
        summary: Option<&str>,
        author_id: UserId,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO articles (id, author_id, title, body, summary, status)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(ArticleId::new())
        .bind(author_id)
        .bind(title)
        .bind(body)
        .bind(summary)
        .bind(ContentKind::Article.initial_status())
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: ArticleId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM articles WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_published(args: &ValidatedPaginationArgs, pool: &PgPool) -> Result<Vec<Self>> {
        find_listed(
            "SELECT * FROM articles WHERE status = 'published'",
            args,
            pool,
        )
        .await
    }

    pub async fn find_pending(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM articles WHERE status = 'pending_review' ORDER BY id ASC",
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
