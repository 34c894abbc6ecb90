//! Initiative submission and listing.

mod common;

use common::*;
use serde_json::json;
use test_context::test_context;

fn initiative_body() -> serde_json::Value {
    json!({
        "title": "Community garden",
        "description": "Turning the empty lot on 5th into a shared garden.",
        "category": "food",
        "latitude": 52.52,
        "longitude": 13.405,
        "location_name": "5th Street lot",
    })
}

#[test_context(TestHarness)]
#[tokio::test]
async fn submission_waits_for_review(ctx: &TestHarness) {
    let client = ctx.api();
    let author = contributor(&client, &ctx.db_pool).await.unwrap();
    let boss = admin(&client, &ctx.db_pool).await.unwrap();

    let response = client
        .post("/initiatives", Some(&author.token), initiative_body())
        .await;
    assert_eq!(response.status, 201);
    assert_eq!(response.get("data.status"), json!("pending_review"));
    let id = response.get("data.id").as_str().unwrap().to_string();

    // Listed for the author, absent from the public list
    let response = client.get("/initiatives/mine", Some(&author.token)).await;
    assert!(response.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|row| row["id"] == json!(id)));

    let response = client.get("/initiatives?first=100", None).await;
    assert!(!response.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|row| row["id"] == json!(id)));

    // The pending count reflects it
    let response = client.get("/admin/moderation", Some(&boss.token)).await;
    let count = response.body["pending"]
        .as_array()
        .unwrap()
        .iter()
        .find(|entry| entry["kind"] == json!("initiative"))
        .map(|entry| entry["count"].as_i64().unwrap())
        .unwrap();
    assert!(count >= 1);

    // Approval puts it on the map
    let response = client
        .post(
            &format!("/admin/moderation/initiatives/{id}/approve"),
            Some(&boss.token),
            json!({}),
        )
        .await;
    assert_eq!(response.status, 200);

    let response = client.get("/initiatives?first=100", None).await;
    assert!(response.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|row| row["id"] == json!(id)));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn explorers_are_pointed_at_the_promotion_workflow(ctx: &TestHarness) {
    let client = ctx.api();
    let user = explorer(&client, &ctx.db_pool).await.unwrap();

    let response = client
        .post("/initiatives", Some(&user.token), initiative_body())
        .await;
    assert_eq!(response.status, 403);
    assert!(response.error().contains("role-requests"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn coordinates_are_validated(ctx: &TestHarness) {
    let client = ctx.api();
    let author = contributor(&client, &ctx.db_pool).await.unwrap();

    let mut body = initiative_body();
    body["latitude"] = json!(123.0);
    let response = client.post("/initiatives", Some(&author.token), body).await;
    assert_eq!(response.status, 400);

    let mut body = initiative_body();
    body["longitude"] = json!(-400.0);
    let response = client.post("/initiatives", Some(&author.token), body).await;
    assert_eq!(response.status, 400);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn location_is_optional(ctx: &TestHarness) {
    let client = ctx.api();
    let author = contributor(&client, &ctx.db_pool).await.unwrap();

    let response = client
        .post(
            "/initiatives",
            Some(&author.token),
            json!({
                "title": "Online swap group",
                "description": "A neighbourhood swap group that lives entirely online.",
            }),
        )
        .await;
    assert_eq!(response.status, 201);
    assert!(response.get("data.latitude").is_null());
}
