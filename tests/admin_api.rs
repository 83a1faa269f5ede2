mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::*;

#[tokio::test]
async fn admin_surface_is_staff_only() {
    let (app, state) = test_app().await;

    // 匿名访问和其它受保护页面一样重定向到登录页
    let response = get(&app, "/admin/groups/", None).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(location(&response).starts_with("/auth/login/?next="));

    // 普通登录用户拿到 403
    let token = signup_and_login(&app, "civilian").await;
    let response = get(&app, "/admin/groups/", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // staff 可以访问
    promote_to_staff(&state, "civilian").await;
    let response = get(&app, "/admin/groups/", Some(&token)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn staff_can_manage_groups() {
    let (app, state) = test_app().await;

    let token = signup_and_login(&app, "moderator").await;
    promote_to_staff(&state, "moderator").await;

    // slug 省略时由标题生成
    let response = post(
        &app,
        "/admin/groups/",
        Some(&token),
        json!({ "title": "Rust Fans", "description": "all things rust" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["slug"], "rust-fans");
    let group_id = body["data"]["id"].as_i64().unwrap();

    // 重复的 slug 被拒绝
    let response = post(
        &app,
        "/admin/groups/",
        Some(&token),
        json!({ "title": "Other", "slug": "rust-fans" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // 更新标题
    let response = send(
        &app,
        Method::PUT,
        &format!("/admin/groups/{}/", group_id),
        Some(&token),
        Some(json!({ "title": "Rust Enthusiasts" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["title"], "Rust Enthusiasts");
    assert_eq!(body["data"]["slug"], "rust-fans");
}

#[tokio::test]
async fn deleting_a_group_keeps_its_posts() {
    let (app, state) = test_app().await;

    let token = signup_and_login(&app, "keeper").await;
    promote_to_staff(&state, "keeper").await;
    let group_id = create_group(&state, "Doomed", "doomed").await;

    post(&app, "/create/", Some(&token), json!({ "text": "survivor", "group": group_id })).await;

    let response = send(
        &app,
        Method::DELETE,
        &format!("/admin/groups/{}/", group_id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // 帖子保留，群组引用被数据库置空
    assert_eq!(post_count(&state).await, 1);
    let group_ref: Option<i64> = sqlx::query_scalar("SELECT group_id FROM posts LIMIT 1")
        .fetch_one(state.db.pool())
        .await
        .unwrap();
    assert_eq!(group_ref, None);

    // 群组页随之消失
    let response = get(&app, "/group/doomed/", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_author_cascades_to_posts_and_comments() {
    let (app, state) = test_app().await;

    let author_token = signup_and_login(&app, "leaving").await;
    let commenter_token = signup_and_login(&app, "remains").await;

    post(&app, "/create/", Some(&author_token), json!({ "text": "to be erased" })).await;
    let post_id: i64 = sqlx::query_scalar("SELECT id FROM posts LIMIT 1")
        .fetch_one(state.db.pool())
        .await
        .unwrap();
    post(
        &app,
        &format!("/posts/{}/comment/", post_id),
        Some(&commenter_token),
        json!({ "text": "goodbye" }),
    )
    .await;

    // 删除作者：帖子级联删除，帖子下的评论一并消失
    sqlx::query("DELETE FROM users WHERE username = 'leaving'")
        .execute(state.db.pool())
        .await
        .unwrap();

    assert_eq!(post_count(&state).await, 0);
    let comment_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments")
        .fetch_one(state.db.pool())
        .await
        .unwrap();
    assert_eq!(comment_count, 0);
}
