//! HTTP tests for the toggle, deactivate, and listing endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, delete_auth, get_auth, post_json, seed_content, seed_dynamic,
    seed_user, token_for,
};
use serde_json::json;
use sqlx::PgPool;

async fn toggle_like(pool: &PgPool, user_id: i64, content_id: i64) -> serde_json::Value {
    let app = build_test_app(pool.clone());
    let response = post_json(
        app,
        "/api/v1/interactions/like/content/toggle",
        &token_for(user_id, "user"),
        json!({ "target_id": content_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Toggle
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn like_toggle_scenario(pool: PgPool) {
    let content = seed_content(&pool).await;

    let json = toggle_like(&pool, 1, content).await;
    assert_eq!(json["message"], "liked");
    assert_eq!(json["data"]["created"], true);
    assert_eq!(json["data"]["record"]["status"], "active");
    assert_eq!(json["data"]["record"]["kind"], "like");
    assert_eq!(json["data"]["record"]["target_type"], "content");
    assert_eq!(json["data"]["counter"]["field"], "like_count");
    assert_eq!(json["data"]["counter"]["value"], 1);

    let json = toggle_like(&pool, 1, content).await;
    assert_eq!(json["message"], "unliked");
    assert_eq!(json["data"]["created"], false);
    assert_eq!(json["data"]["record"]["status"], "inactive");
    assert_eq!(json["data"]["counter"]["value"], 0);

    let json = toggle_like(&pool, 2, content).await;
    assert_eq!(json["message"], "liked");
    assert_eq!(json["data"]["counter"]["value"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn favorite_and_downvote_messages(pool: PgPool) {
    let content = seed_content(&pool).await;
    let dynamic = seed_dynamic(&pool).await;
    let token = token_for(3, "user");

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/interactions/favorite/dynamic/toggle",
        &token,
        json!({ "target_id": dynamic }),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["message"], "favorited");
    assert_eq!(json["data"]["counter"]["field"], "favorite_count");

    let uri = "/api/v1/interactions/downvote/content/toggle";
    post_json(build_test_app(pool.clone()), uri, &token, json!({ "target_id": content })).await;
    let response =
        post_json(build_test_app(pool.clone()), uri, &token, json!({ "target_id": content })).await;
    let json = body_json(response).await;
    assert_eq!(json["message"], "downvote removed");
    assert_eq!(json["data"]["counter"]["value"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn follow_toggle_updates_both_users(pool: PgPool) {
    let follower = seed_user(&pool, "follower").await;
    let followee = seed_user(&pool, "followee").await;
    let token = token_for(follower, "user");

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/follows/toggle",
        &token,
        json!({ "followee_id": followee }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "followed");
    assert_eq!(json["data"]["counter"]["field"], "followers_count");
    assert_eq!(json["data"]["counter"]["value"], 1);

    let response = get_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/targets/user/{follower}/counters"),
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["counters"]["following_count"], 1);
    assert_eq!(json["data"]["counters"]["followers_count"], 0);

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/follows/toggle",
        &token,
        json!({ "followee_id": followee }),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["message"], "unfollowed");
    assert_eq!(json["data"]["counter"]["value"], 0);

    let response = get_auth(
        build_test_app(pool.clone()),
        &format!("/api/v1/targets/user/{follower}/counters"),
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["counters"]["following_count"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn self_follow_is_rejected_without_record(pool: PgPool) {
    let user = seed_user(&pool, "narcissus").await;
    let token = token_for(user, "user");

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/follows/toggle",
        &token,
        json!({ "followee_id": user }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_OPERATION");

    let response = get_auth(
        build_test_app(pool.clone()),
        "/api/v1/interactions/follow/user",
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["pagination"]["total"], 0);
}

// ---------------------------------------------------------------------------
// Rejections
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_target_returns_404(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/api/v1/interactions/like/content/toggle",
        &token_for(1, "user"),
        json!({ "target_id": 999_999 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Content with id 999999 not found");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unsupported_pair_returns_400(pool: PgPool) {
    let dynamic = seed_dynamic(&pool).await;

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/interactions/downvote/dynamic/toggle",
        &token_for(1, "user"),
        json!({ "target_id": dynamic }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_OPERATION");

    let response = post_json(
        build_test_app(pool),
        "/api/v1/interactions/applaud/content/toggle",
        &token_for(1, "user"),
        json!({ "target_id": 1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_OPERATION");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_positive_target_id_returns_400(pool: PgPool) {
    let response = post_json(
        build_test_app(pool),
        "/api/v1/interactions/like/content/toggle",
        &token_for(1, "user"),
        json!({ "target_id": 0 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_OPERATION");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_target_id_uses_error_envelope(pool: PgPool) {
    let token = token_for(1, "user");

    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/interactions/like/content/toggle",
        &token,
        json!({ "target_id": "abc" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.headers()["content-type"], "application/json");
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_OPERATION");
    assert!(json["error"].as_str().unwrap().contains("target_id"));

    let response = delete_auth(
        build_test_app(pool.clone()),
        "/api/v1/interactions/like/content/abc",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_OPERATION");

    let response = get_auth(
        build_test_app(pool.clone()),
        "/api/v1/follows?follower_id=abc",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_OPERATION");

    let response = post_json(
        build_test_app(pool),
        "/api/v1/follows/toggle",
        &token,
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_OPERATION");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn toggle_requires_token(pool: PgPool) {
    let response = common::get(build_test_app(pool), "/api/v1/interactions/like/content").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_token_is_rejected(pool: PgPool) {
    let response = get_auth(
        build_test_app(pool),
        "/api/v1/interactions/like/content",
        "definitely.not.valid",
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

// ---------------------------------------------------------------------------
// Deactivate
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_deactivates_once(pool: PgPool) {
    let content = seed_content(&pool).await;
    toggle_like(&pool, 4, content).await;
    toggle_like(&pool, 5, content).await;
    let token = token_for(4, "user");
    let uri = format!("/api/v1/interactions/like/content/{content}");

    let response = delete_auth(build_test_app(pool.clone()), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "unliked");
    assert_eq!(json["data"]["record"]["status"], "inactive");
    assert_eq!(json["data"]["counter"]["value"], 1);

    // Repeating the delete is a no-op for the counter.
    let response = delete_auth(build_test_app(pool.clone()), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["counter"]["value"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_after_target_removed_still_deactivates(pool: PgPool) {
    let content = seed_content(&pool).await;
    toggle_like(&pool, 6, content).await;
    sqlx::query("DELETE FROM contents WHERE id = $1")
        .bind(content)
        .execute(&pool)
        .await
        .unwrap();

    let uri = format!("/api/v1/interactions/like/content/{content}");
    let response = delete_auth(build_test_app(pool.clone()), &uri, &token_for(6, "user")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "unliked");
    assert_eq!(json["data"]["record"]["status"], "inactive");
    assert!(json["data"]["counter"].is_null());

    let status: String = sqlx::query_scalar(
        "SELECT status FROM interactions WHERE actor_id = $1 AND target_id = $2",
    )
    .bind(6_i64)
    .bind(content)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(status, "inactive");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_without_record_returns_404(pool: PgPool) {
    let content = seed_content(&pool).await;

    let response = delete_auth(
        build_test_app(pool),
        &format!("/api/v1/interactions/like/content/{content}"),
        &token_for(1, "user"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn active_ids_and_pagination(pool: PgPool) {
    let a = seed_content(&pool).await;
    let b = seed_content(&pool).await;
    let c = seed_content(&pool).await;
    for id in [a, b, c, b] {
        toggle_like(&pool, 8, id).await;
    }
    let token = token_for(8, "user");

    let response = get_auth(
        build_test_app(pool.clone()),
        "/api/v1/interactions/like/content/active-ids",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], json!([a, c]));

    let response = get_auth(
        build_test_app(pool.clone()),
        "/api/v1/interactions/like/content?currentPage=1&pageSize=2",
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["pagination"]["total"], 3);
    assert_eq!(json["data"]["pagination"]["total_pages"], 2);
    assert_eq!(json["data"]["results"].as_array().unwrap().len(), 2);

    let response = get_auth(
        build_test_app(pool.clone()),
        "/api/v1/interactions/like/content?currentPage=5&pageSize=2",
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert!(json["data"]["results"].as_array().unwrap().is_empty());

    let response = get_auth(
        build_test_app(pool),
        "/api/v1/interactions/like/content?status=inactive",
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["pagination"]["total"], 1);
    assert_eq!(json["data"]["results"][0]["target_id"], b);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_follows_by_followee(pool: PgPool) {
    let star = seed_user(&pool, "star").await;
    let fan_a = seed_user(&pool, "fan_a").await;
    let fan_b = seed_user(&pool, "fan_b").await;

    for fan in [fan_a, fan_b] {
        post_json(
            build_test_app(pool.clone()),
            "/api/v1/follows/toggle",
            &token_for(fan, "user"),
            json!({ "followee_id": star }),
        )
        .await;
    }

    let response = get_auth(
        build_test_app(pool),
        &format!("/api/v1/follows?followee_id={star}"),
        &token_for(star, "user"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["pagination"]["total"], 2);
    for record in json["data"]["results"].as_array().unwrap() {
        assert_eq!(record["target_id"], star);
        assert_eq!(record["kind"], "follow");
    }
}
