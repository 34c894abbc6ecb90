//! Registration, login, and session behavior.

mod common;

use common::*;
use serde_json::json;
use test_context::test_context;

#[test_context(TestHarness)]
#[tokio::test]
async fn register_login_and_me(ctx: &TestHarness) {
    let client = ctx.api();

    let email = format!("reg-{}@example.com", uuid::Uuid::new_v4().simple());
    let response = client
        .post(
            "/auth/register",
            None,
            json!({
                "email": email,
                "display_name": "Robin",
                "password": "password123",
            }),
        )
        .await;
    assert_eq!(response.status, 201);
    assert_eq!(response.get("data.email"), json!(email));
    assert_eq!(response.get("data.role"), json!("explorer"));
    // The password hash never leaves the server
    assert!(response.get("data.password_hash").is_null());

    let response = client
        .post(
            "/auth/login",
            None,
            json!({ "email": email, "password": "password123" }),
        )
        .await;
    assert_eq!(response.status, 200);
    let token = response.get("token").as_str().unwrap().to_string();

    let response = client.get("/auth/me", Some(&token)).await;
    assert_eq!(response.status, 200);
    assert_eq!(response.get("data.email"), json!(email));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn login_with_wrong_password_is_rejected(ctx: &TestHarness) {
    let client = ctx.api();
    let user = explorer(&client, &ctx.db_pool).await.unwrap();

    let response = client
        .post(
            "/auth/login",
            None,
            json!({ "email": user.email, "password": "not-the-password" }),
        )
        .await;
    assert_eq!(response.status, 401);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn duplicate_email_is_rejected(ctx: &TestHarness) {
    let client = ctx.api();
    let user = explorer(&client, &ctx.db_pool).await.unwrap();

    let response = client
        .post(
            "/auth/register",
            None,
            json!({
                // Same address, different case
                "email": user.email.to_uppercase(),
                "display_name": "Impostor",
                "password": "password123",
            }),
        )
        .await;
    assert_eq!(response.status, 400);
    assert!(response.error().contains("already registered"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn short_password_is_rejected(ctx: &TestHarness) {
    let client = ctx.api();

    let response = client
        .post(
            "/auth/register",
            None,
            json!({
                "email": "short@example.com",
                "display_name": "Shorty",
                "password": "short",
            }),
        )
        .await;
    assert_eq!(response.status, 400);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn me_without_token_is_unauthorized(ctx: &TestHarness) {
    let client = ctx.api();
    let response = client.get("/auth/me", None).await;
    assert_eq!(response.status, 401);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn logout_invalidates_the_session(ctx: &TestHarness) {
    let client = ctx.api();
    let user = explorer(&client, &ctx.db_pool).await.unwrap();

    let response = client.post("/auth/logout", Some(&user.token), json!({})).await;
    assert_eq!(response.status, 204);

    let response = client.get("/auth/me", Some(&user.token)).await;
    assert_eq!(response.status, 401);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn email_confirmation_consumes_the_token(ctx: &TestHarness) {
    let client = ctx.api();

    let email = format!("confirm-{}@example.com", uuid::Uuid::new_v4().simple());
    let response = client
        .post(
            "/auth/register",
            None,
            json!({
                "email": email,
                "display_name": "Confirmer",
                "password": "password123",
            }),
        )
        .await;
    assert_eq!(response.status, 201);

    // Fetch the issued token straight from the store
    let token: String = sqlx::query_scalar(
        "SELECT token FROM verification_tokens v
         JOIN users u ON u.id = v.user_id
         WHERE lower(u.email) = lower($1)",
    )
    .bind(&email)
    .fetch_one(&ctx.db_pool)
    .await
    .unwrap();

    let response = client.get(&format!("/auth/confirm/{token}"), None).await;
    assert_eq!(response.status, 200);
    assert_eq!(response.get("data.email_confirmed"), json!(true));

    // Second use fails: the token was consumed
    let response = client.get(&format!("/auth/confirm/{token}"), None).await;
    assert_eq!(response.status, 404);
}
