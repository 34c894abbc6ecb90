//! Test fixtures for creating test data.
//!
//! Users go through the real register/login endpoints so session tokens are
//! valid against the client's app instance; content fixtures use the model
//! methods directly.

use anyhow::Result;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use server_core::common::auth::Role;
use server_core::common::{ArticleId, ForumPostId, TipId, UserId};
use server_core::domains::articles::Article;
use server_core::domains::forum::ForumPost;
use server_core::domains::tips::Tip;
use server_core::domains::users::User;

use super::ApiClient;

pub const TEST_PASSWORD: &str = "password123";

/// A logged-in test user.
pub struct TestUser {
    pub id: UserId,
    pub email: String,
    pub token: String,
}

/// Register a user, force the given role, confirm the email, and log in.
pub async fn signup(client: &ApiClient, pool: &PgPool, role: Role) -> Result<TestUser> {
    let email = format!("user-{}@example.com", Uuid::new_v4().simple());

    let response = client
        .post(
            "/auth/register",
            None,
            json!({
                "email": email,
                "display_name": "Test User",
                "password": TEST_PASSWORD,
            }),
        )
        .await;
    assert_eq!(
        response.status, 201,
        "registration failed: {}",
        response.body
    );

    let id: UserId = serde_json::from_value(response.get("data.id"))?;

    if role != Role::Explorer {
        User::set_role(id, role, pool).await?;
    }
    User::confirm_email(id, pool).await?;

    let response = client
        .post(
            "/auth/login",
            None,
            json!({ "email": email, "password": TEST_PASSWORD }),
        )
        .await;
    assert_eq!(response.status, 200, "login failed: {}", response.body);
    let token = response.get("token").as_str().unwrap().to_string();

    Ok(TestUser { id, email, token })
}

pub async fn explorer(client: &ApiClient, pool: &PgPool) -> Result<TestUser> {
    signup(client, pool, Role::Explorer).await
}

pub async fn contributor(client: &ApiClient, pool: &PgPool) -> Result<TestUser> {
    signup(client, pool, Role::Contributor).await
}

pub async fn admin(client: &ApiClient, pool: &PgPool) -> Result<TestUser> {
    signup(client, pool, Role::Admin).await
}

/// Create an article and force it straight to published.
pub async fn create_published_article(pool: &PgPool, author: UserId) -> Result<ArticleId> {
    let article = Article::create(
        "Test article",
        "A long enough body for validation.",
        None,
        author,
        pool,
    )
    .await?;
    force_status(pool, "articles", article.id.into_uuid(), "published").await?;
    Ok(article.id)
}

/// Create a tip and force it straight to published.
pub async fn create_published_tip(pool: &PgPool, author: UserId) -> Result<TipId> {
    let tip = Tip::create(
        "Test tip",
        "A long enough tip body for validation.",
        Some("energy"),
        author,
        pool,
    )
    .await?;
    force_status(pool, "tips", tip.id.into_uuid(), "published").await?;
    Ok(tip.id)
}

/// Create a forum post (published on creation).
pub async fn create_forum_post(pool: &PgPool, author: UserId) -> Result<ForumPostId> {
    let post = ForumPost::create("Test thread", "Hello there", author, pool).await?;
    Ok(post.id)
}

async fn force_status(pool: &PgPool, table: &str, id: Uuid, status: &str) -> Result<()> {
    let sql = format!("UPDATE {table} SET status = $2::content_status WHERE id = $1");
    sqlx::query(&sql).bind(id).bind(status).execute(pool).await?;
    Ok(())
}
