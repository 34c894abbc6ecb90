use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::common::{ForumPostId, UserId, ValidatedPaginationArgs};
use crate::domains::moderation::service::find_listed;
use crate::domains::moderation::{ContentKind, ContentStatus};

/// Forum thread starter. Published on creation; moderated post-hoc.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct ForumPost {
    pub id: ForumPostId,
    pub author_id: UserId,
    pub title: String,
    pub content: String,
    pub status: ContentStatus,
    pub created_at: DateTime<Utc>,
}

impl ForumPost {
    pub async fn create(
        title: &str,
        content: &str,
        author_id: UserId,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO forum_posts (id, author_id, title, content, status)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(ForumPostId::new())
        .bind(author_id)
        .bind(title)
        .bind(content)
        .bind(ContentKind::ForumPost.initial_status())
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: ForumPostId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM forum_posts WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_published(args: &ValidatedPaginationArgs, pool: &PgPool) -> Result<Vec<Self>> {
        find_listed(
            "SELECT * FROM forum_posts WHERE status = 'published'",
            args,
            pool,
        )
        .await
    }
}
