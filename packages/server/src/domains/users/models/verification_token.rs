use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::UserId;

/// Email verification token, consumed on confirmation.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct VerificationToken {
    pub token: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl VerificationToken {
    /// Issue a fresh 48-hour token for a user, replacing any prior one.
    pub async fn issue(user_id: UserId, pool: &PgPool) -> Result<Self> {
        let token = Uuid::new_v4().to_string();
        let expires_at = Utc::now() + Duration::hours(48);

        sqlx::query("DELETE FROM verification_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;

        sqlx::query_as::<_, Self>(
            "INSERT INTO verification_tokens (token, user_id, expires_at)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(&token)
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Consume a token: delete it and return the owning user if it was
    /// still valid. Expired or unknown tokens yield None.
    pub async fn consume(token: &str, pool: &PgPool) -> Result<Option<UserId>> {
        let row: Option<Self> = sqlx::query_as::<_, Self>(
            "DELETE FROM verification_tokens WHERE token = $1 RETURNING *",
        )
        .bind(token)
        .fetch_optional(pool)
        .await?;

        Ok(row.filter(|t| t.expires_at > Utc::now()).map(|t| t.user_id))
    }
}
