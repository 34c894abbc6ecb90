use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::common::{InitiativeId, UserId, ValidatedPaginationArgs};
use crate::domains::moderation::service::find_listed;
use crate::domains::moderation::{ContentKind, ContentStatus};

/// Geolocated community initiative.
///
/// Location is coarse (point + display name), enough for map pins.
#[derive(sqlx::FromRow, Debug, Clone, Serialize)]
pub struct Initiative {
    pub id: InitiativeId,
    pub author_id: UserId,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location_name: Option<String>,
    pub status: ContentStatus,
    pub created_at: DateTime<Utc>,
}

pub struct NewInitiative {
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location_name: Option<String>,
}

impl Initiative {
    pub async fn create(new: NewInitiative, author_id: UserId, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO initiatives
                (id, author_id, title, description, category, latitude, longitude, location_name, status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *",
        )
        .bind(InitiativeId::new())
        .bind(author_id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.category)
        .bind(new.latitude)
        .bind(new.longitude)
        .bind(&new.location_name)
        .bind(ContentKind::Initiative.initial_status())
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: InitiativeId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM initiatives WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Public listing: published only, newest first.
    pub async fn find_published(args: &ValidatedPaginationArgs, pool: &PgPool) -> Result<Vec<Self>> {
        find_listed(
            "SELECT * FROM initiatives WHERE status = 'published'",
            args,
            pool,
        )
        .await
    }

    /// An author's own initiatives in any non-rejected state.
    pub async fn find_by_author(
        author_id: UserId,
        args: &ValidatedPaginationArgs,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, Self>(
            "SELECT * FROM initiatives
             WHERE author_id = $1 AND status <> 'rejected'
               AND ($2::uuid IS NULL OR id < $2)
             ORDER BY id DESC LIMIT $3",
        )
        .bind(author_id)
        .bind(args.cursor)
        .bind(args.fetch_limit())
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// Review queue, oldest submissions first.
    pub async fn find_pending(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM initiatives WHERE status = 'pending_review' ORDER BY id ASC",
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
