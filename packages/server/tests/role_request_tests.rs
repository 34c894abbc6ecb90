//! The role-promotion workflow.

mod common;

use common::*;
use serde_json::json;
use test_context::test_context;

fn promotion_body() -> serde_json::Value {
    json!({
        "requested_role": "contributor",
        "reason": "I run a local repair cafe and want to write about it.",
    })
}

#[test_context(TestHarness)]
#[tokio::test]
async fn request_approve_and_gain_the_role(ctx: &TestHarness) {
    let client = ctx.api();
    let user = explorer(&client, &ctx.db_pool).await.unwrap();
    let boss = admin(&client, &ctx.db_pool).await.unwrap();

    let response = client
        .post("/role-requests", Some(&user.token), promotion_body())
        .await;
    assert_eq!(response.status, 201);
    assert_eq!(response.get("data.status"), json!("pending"));
    let id = response.get("data.id").as_str().unwrap().to_string();

    // Visible in the admin queue
    let response = client.get("/admin/role-requests", Some(&boss.token)).await;
    assert!(response.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|r| r["id"] == json!(id)));

    let response = client
        .post(
            &format!("/admin/role-requests/{id}/process"),
            Some(&boss.token),
            json!({ "action": "approve", "admin_notes": "Welcome aboard" }),
        )
        .await;
    assert_eq!(response.status, 200);
    assert_eq!(response.get("data.status"), json!("approved"));

    // The new role applies without a fresh login
    let response = client
        .post(
            "/articles",
            Some(&user.token),
            json!({ "title": "Repair cafe diary", "body": "What we fixed this month at the cafe." }),
        )
        .await;
    assert_eq!(response.status, 201);

    // And it shows in the user's own history
    let response = client.get("/role-requests/mine", Some(&user.token)).await;
    assert_eq!(response.get("data.0.status"), json!("approved"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn only_one_pending_request_per_user(ctx: &TestHarness) {
    let client = ctx.api();
    let user = explorer(&client, &ctx.db_pool).await.unwrap();

    let response = client
        .post("/role-requests", Some(&user.token), promotion_body())
        .await;
    assert_eq!(response.status, 201);

    let response = client
        .post("/role-requests", Some(&user.token), promotion_body())
        .await;
    assert_eq!(response.status, 400);
    assert!(response.error().contains("pending"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn requested_role_must_be_a_promotion(ctx: &TestHarness) {
    let client = ctx.api();
    let user = contributor(&client, &ctx.db_pool).await.unwrap();

    // Same role
    let response = client
        .post("/role-requests", Some(&user.token), promotion_body())
        .await;
    assert_eq!(response.status, 400);

    // Downgrade
    let response = client
        .post(
            "/role-requests",
            Some(&user.token),
            json!({
                "requested_role": "explorer",
                "reason": "I would like to do less around here please.",
            }),
        )
        .await;
    assert_eq!(response.status, 400);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn processing_twice_is_rejected(ctx: &TestHarness) {
    let client = ctx.api();
    let user = explorer(&client, &ctx.db_pool).await.unwrap();
    let boss = admin(&client, &ctx.db_pool).await.unwrap();

    let response = client
        .post("/role-requests", Some(&user.token), promotion_body())
        .await;
    let id = response.get("data.id").as_str().unwrap().to_string();

    let response = client
        .post(
            &format!("/admin/role-requests/{id}/process"),
            Some(&boss.token),
            json!({ "action": "reject" }),
        )
        .await;
    assert_eq!(response.status, 200);

    let response = client
        .post(
            &format!("/admin/role-requests/{id}/process"),
            Some(&boss.token),
            json!({ "action": "approve" }),
        )
        .await;
    assert_eq!(response.status, 400);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn rejection_leaves_the_role_unchanged(ctx: &TestHarness) {
    let client = ctx.api();
    let user = explorer(&client, &ctx.db_pool).await.unwrap();
    let boss = admin(&client, &ctx.db_pool).await.unwrap();

    let response = client
        .post("/role-requests", Some(&user.token), promotion_body())
        .await;
    let id = response.get("data.id").as_str().unwrap().to_string();

    client
        .post(
            &format!("/admin/role-requests/{id}/process"),
            Some(&boss.token),
            json!({ "action": "reject", "admin_notes": "Not yet" }),
        )
        .await;

    let response = client.get("/auth/me", Some(&user.token)).await;
    assert_eq!(response.get("data.role"), json!("explorer"));

    // A rejected request does not block a new one
    let response = client
        .post("/role-requests", Some(&user.token), promotion_body())
        .await;
    assert_eq!(response.status, 201);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn processing_requires_admin(ctx: &TestHarness) {
    let client = ctx.api();
    let user = explorer(&client, &ctx.db_pool).await.unwrap();
    let peer = explorer(&client, &ctx.db_pool).await.unwrap();

    let response = client
        .post("/role-requests", Some(&user.token), promotion_body())
        .await;
    let id = response.get("data.id").as_str().unwrap().to_string();

    let response = client
        .post(
            &format!("/admin/role-requests/{id}/process"),
            Some(&peer.token),
            json!({ "action": "approve" }),
        )
        .await;
    assert_eq!(response.status, 403);
}
