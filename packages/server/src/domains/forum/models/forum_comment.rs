use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;

use crate::common::{ForumCommentId, ForumPostId, UserId};
use crate::domains::moderation::{ContentKind, ContentStatus};

/// Forum comment. At most one level of replies: a reply's parent must be a
/// top-level comment on the same post.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct ForumComment {
    pub id: ForumCommentId,
    pub post_id: ForumPostId,
    pub author_id: UserId,
    pub parent_id: Option<ForumCommentId>,
    pub content: String,
    pub status: ContentStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Error, Debug)]
pub enum CommentError {
    #[error("Forum post not found")]
    PostNotFound,

    #[error("Parent comment not found")]
    ParentNotFound,

    #[error("Replies to replies are not allowed")]
    NestedReply,

    #[error("Parent comment belongs to a different post")]
    ParentWrongPost,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl ForumComment {
    /// Create a comment, enforcing the nesting rules.
    pub async fn create(
        post_id: ForumPostId,
        parent_id: Option<ForumCommentId>,
        content: &str,
        author_id: UserId,
        pool: &PgPool,
    ) -> Result<Self, CommentError> {
        let post_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM forum_posts WHERE id = $1 AND status = 'published')",
        )
        .bind(post_id)
        .fetch_one(pool)
        .await?;
        if !post_exists {
            return Err(CommentError::PostNotFound);
        }

        if let Some(parent_id) = parent_id {
            let parent = sqlx::query_as::<_, Self>("SELECT * FROM forum_comments WHERE id = $1")
                .bind(parent_id)
                .fetch_optional(pool)
                .await?
                .ok_or(CommentError::ParentNotFound)?;
            if parent.parent_id.is_some() {
                return Err(CommentError::NestedReply);
            }
            if parent.post_id != post_id {
                return Err(CommentError::ParentWrongPost);
            }
        }

        let comment = sqlx::query_as::<_, Self>(
            "INSERT INTO forum_comments (id, post_id, author_id, parent_id, content, status)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(ForumCommentId::new())
        .bind(post_id)
        .bind(author_id)
        .bind(parent_id)
        .bind(content)
        .bind(ContentKind::ForumComment.initial_status())
        .fetch_one(pool)
        .await?;

        Ok(comment)
    }

    pub async fn find_by_id(id: ForumCommentId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM forum_comments WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// All published comments of a thread, oldest first (threading is
    /// reassembled client-side from parent_id).
    pub async fn find_for_post(post_id: ForumPostId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM forum_comments
             WHERE post_id = $1 AND status = 'published'
             ORDER BY id ASC",
        )
        .bind(post_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
