//! Forum threads, comments, and the single-level reply rule.

mod common;

use common::*;
use serde_json::json;
use test_context::test_context;

#[test_context(TestHarness)]
#[tokio::test]
async fn posts_are_visible_immediately(ctx: &TestHarness) {
    let client = ctx.api();
    let user = explorer(&client, &ctx.db_pool).await.unwrap();

    let response = client
        .post(
            "/forum/posts",
            Some(&user.token),
            json!({ "title": "Seed swap", "content": "Anyone up for a seed swap this weekend?" }),
        )
        .await;
    assert_eq!(response.status, 201);
    let id = response.get("data.id").as_str().unwrap().to_string();

    // No review step: a stranger sees it right away
    let response = client.get(&format!("/forum/posts/{id}"), None).await;
    assert_eq!(response.status, 200);
    assert_eq!(response.get("data.title"), json!("Seed swap"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn thread_view_includes_comments_and_scores(ctx: &TestHarness) {
    let client = ctx.api();
    let user = explorer(&client, &ctx.db_pool).await.unwrap();
    let voter = explorer(&client, &ctx.db_pool).await.unwrap();
    let post_id = create_forum_post(&ctx.db_pool, user.id).await.unwrap();

    let response = client
        .post(
            &format!("/forum/posts/{post_id}/comments"),
            Some(&user.token),
            json!({ "content": "Count me in" }),
        )
        .await;
    assert_eq!(response.status, 201);
    let comment_id = response.get("data.id").as_str().unwrap().to_string();

    client
        .post(
            "/votes",
            Some(&voter.token),
            json!({ "target_kind": "forum_comment", "target_id": comment_id, "value": 1 }),
        )
        .await;

    let response = client.get(&format!("/forum/posts/{post_id}"), None).await;
    assert_eq!(response.status, 200);
    let comments = response.body["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["score"], json!(1));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn replies_nest_exactly_one_level(ctx: &TestHarness) {
    let client = ctx.api();
    let user = explorer(&client, &ctx.db_pool).await.unwrap();
    let post_id = create_forum_post(&ctx.db_pool, user.id).await.unwrap();

    let response = client
        .post(
            &format!("/forum/posts/{post_id}/comments"),
            Some(&user.token),
            json!({ "content": "Top level" }),
        )
        .await;
    let top_id = response.get("data.id").as_str().unwrap().to_string();

    let response = client
        .post(
            &format!("/forum/posts/{post_id}/comments"),
            Some(&user.token),
            json!({ "content": "A reply", "parent_id": top_id }),
        )
        .await;
    assert_eq!(response.status, 201);
    let reply_id = response.get("data.id").as_str().unwrap().to_string();

    // Replying to a reply is refused
    let response = client
        .post(
            &format!("/forum/posts/{post_id}/comments"),
            Some(&user.token),
            json!({ "content": "Too deep", "parent_id": reply_id }),
        )
        .await;
    assert_eq!(response.status, 400);
    assert!(response.error().contains("Replies to replies"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn reply_parent_must_belong_to_the_same_post(ctx: &TestHarness) {
    let client = ctx.api();
    let user = explorer(&client, &ctx.db_pool).await.unwrap();
    let post_a = create_forum_post(&ctx.db_pool, user.id).await.unwrap();
    let post_b = create_forum_post(&ctx.db_pool, user.id).await.unwrap();

    let response = client
        .post(
            &format!("/forum/posts/{post_a}/comments"),
            Some(&user.token),
            json!({ "content": "On post A" }),
        )
        .await;
    let parent_id = response.get("data.id").as_str().unwrap().to_string();

    let response = client
        .post(
            &format!("/forum/posts/{post_b}/comments"),
            Some(&user.token),
            json!({ "content": "Wrong thread", "parent_id": parent_id }),
        )
        .await;
    assert_eq!(response.status, 400);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn commenting_on_a_missing_post_is_not_found(ctx: &TestHarness) {
    let client = ctx.api();
    let user = explorer(&client, &ctx.db_pool).await.unwrap();

    let response = client
        .post(
            &format!("/forum/posts/{}/comments", uuid::Uuid::now_v7()),
            Some(&user.token),
            json!({ "content": "Hello?" }),
        )
        .await;
    assert_eq!(response.status, 404);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn post_list_paginates_newest_first(ctx: &TestHarness) {
    let client = ctx.api();
    let user = explorer(&client, &ctx.db_pool).await.unwrap();

    let mut ids = Vec::new();
    for _ in 0..3 {
        ids.push(create_forum_post(&ctx.db_pool, user.id).await.unwrap());
    }

    // Other tests share the database, so assert on the relative order of
    // our own posts rather than absolute positions.
    let response = client.get("/forum/posts?first=100", None).await;
    assert_eq!(response.status, 200);
    let page = response.body["data"].as_array().unwrap();
    let positions: Vec<usize> = ids
        .iter()
        .map(|id| {
            page.iter()
                .position(|row| row["id"] == json!(id.to_string()))
                .expect("created post missing from listing")
        })
        .collect();
    // Newest first: later creations appear earlier in the page
    assert!(positions[2] < positions[1]);
    assert!(positions[1] < positions[0]);

    // A tiny page reports more results behind the cursor
    let response = client.get("/forum/posts?first=1", None).await;
    assert_eq!(response.body["data"].as_array().unwrap().len(), 1);
    assert_eq!(response.get("pagination.has_next_page"), json!(true));
    assert!(response.get("pagination.end_cursor").is_string());
}
