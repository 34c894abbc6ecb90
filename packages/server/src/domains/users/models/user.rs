use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::common::auth::Role;
use crate::common::{Caller, UserId, ValidatedPaginationArgs};

/// User model - SQL persistence layer.
///
/// Rows are never hard-deleted; role is mutated only through an admin
/// action or an approved role request.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub role: Role,
    pub email_confirmed: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub async fn find_by_id(id: UserId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_email(email: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE lower(email) = lower($1)")
            .bind(email)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Insert a new explorer with an unconfirmed email.
    pub async fn create(
        email: &str,
        display_name: &str,
        password_hash: &str,
        pool: &PgPool,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO users (id, email, display_name, password_hash, role, email_confirmed)
             VALUES ($1, $2, $3, $4, 'explorer', false)
             RETURNING *",
        )
        .bind(UserId::new())
        .bind(email)
        .bind(display_name)
        .bind(password_hash)
        .fetch_one(pool)
        .await
    }

    /// Set the role directly (admin action; promotions go through the
    /// role-request workflow instead).
    pub async fn set_role(id: UserId, role: Role, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("UPDATE users SET role = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(role)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn confirm_email(id: UserId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>(
            "UPDATE users SET email_confirmed = true WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(Into::into)
    }

    /// Admin listing, newest first, cursor-paginated.
    pub async fn find_paginated(args: &ValidatedPaginationArgs, pool: &PgPool) -> Result<Vec<Self>> {
        let rows = if args.is_forward() {
            sqlx::query_as::<_, Self>(
                "SELECT * FROM users
                 WHERE ($1::uuid IS NULL OR id < $1)
                 ORDER BY id DESC LIMIT $2",
            )
            .bind(args.cursor)
            .bind(args.fetch_limit())
            .fetch_all(pool)
            .await?
        } else {
            let mut rows = sqlx::query_as::<_, Self>(
                "SELECT * FROM users
                 WHERE ($1::uuid IS NULL OR id > $1)
                 ORDER BY id ASC LIMIT $2",
            )
            .bind(args.cursor)
            .bind(args.fetch_limit())
            .fetch_all(pool)
            .await?;
            rows.reverse();
            rows
        };
        Ok(rows)
    }

    /// The identity the authorization layer works with.
    pub fn caller(&self) -> Caller {
        Caller {
            id: self.id,
            role: self.role,
            email_confirmed: self.email_confirmed,
        }
    }
}
