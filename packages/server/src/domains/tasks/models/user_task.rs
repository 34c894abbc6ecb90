use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;

use crate::common::{UserId, UserTaskId};

/// Maximum live tasks per user.
pub const MAX_TASKS_PER_USER: i64 = 5;

/// Per-user scratch list entry. Independent of moderation.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct UserTask {
    pub id: UserTaskId,
    pub user_id: UserId,
    pub title: String,
    pub done: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Task list is full ({MAX_TASKS_PER_USER} tasks)")]
    ListFull,

    #[error("Task not found")]
    NotFound,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl UserTask {
    /// Create a task, enforcing the per-user cap. The user row is locked so
    /// two concurrent creates cannot both pass the count check.
    pub async fn create(user_id: UserId, title: &str, pool: &PgPool) -> Result<Self, TaskError> {
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM user_tasks WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&mut *tx)
                .await?;
        if count >= MAX_TASKS_PER_USER {
            return Err(TaskError::ListFull);
        }

        let task = sqlx::query_as::<_, Self>(
            "INSERT INTO user_tasks (id, user_id, title) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(UserTaskId::new())
        .bind(user_id)
        .bind(title)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(task)
    }

    pub async fn find_by_user(user_id: UserId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM user_tasks WHERE user_id = $1 ORDER BY id ASC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn set_done(
        id: UserTaskId,
        user_id: UserId,
        done: bool,
        pool: &PgPool,
    ) -> Result<Self, TaskError> {
        sqlx::query_as::<_, Self>(
            "UPDATE user_tasks SET done = $3 WHERE id = $1 AND user_id = $2 RETURNING *",
        )
        .bind(id)
        .bind(user_id)
        .bind(done)
        .fetch_optional(pool)
        .await?
        .ok_or(TaskError::NotFound)
    }

    /// Delete one of the caller's own tasks.
    pub async fn delete(id: UserTaskId, user_id: UserId, pool: &PgPool) -> Result<(), TaskError> {
        let result = sqlx::query("DELETE FROM user_tasks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(TaskError::NotFound);
        }
        Ok(())
    }
}
