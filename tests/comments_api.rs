mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::*;

async fn create_post_returning_id(
    app: &axum::Router,
    state: &yatube::state::AppState,
    token: &str,
    text: &str,
) -> i64 {
    let response = post(app, "/create/", Some(token), json!({ "text": text })).await;
    assert_eq!(response.status(), StatusCode::FOUND);

    sqlx::query_scalar("SELECT id FROM posts ORDER BY id DESC LIMIT 1")
        .fetch_one(state.db.pool())
        .await
        .unwrap()
}

#[tokio::test]
async fn anonymous_comment_redirects_to_login() {
    let (app, state) = test_app().await;

    let token = signup_and_login(&app, "author1").await;
    let post_id = create_post_returning_id(&app, &state, &token, "commentable").await;

    let path = format!("/posts/{}/comment/", post_id);
    let response = post(&app, &path, None, json!({ "text": "anon comment" })).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        location(&response),
        format!("/auth/login/?next={}", urlencoding::encode(&path))
    );

    // 没有评论落库
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments")
        .fetch_one(state.db.pool())
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn comment_is_stamped_with_author_and_post_and_redirects_to_detail() {
    let (app, state) = test_app().await;

    let author_token = signup_and_login(&app, "blogauthor").await;
    let commenter_token = signup_and_login(&app, "commenter").await;
    let post_id = create_post_returning_id(&app, &state, &author_token, "discuss me").await;

    let response = post(
        &app,
        &format!("/posts/{}/comment/", post_id),
        Some(&commenter_token),
        json!({ "text": "great post" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), format!("/posts/{}/", post_id));

    // 详情页能看到评论，作者是服务端标记的当前用户
    let response = get(&app, &format!("/posts/{}/", post_id), None).await;
    let body = body_json(response).await;
    let comments = body["data"]["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["text"], "great post");
    assert_eq!(comments[0]["author"]["username"], "commenter");
}

#[tokio::test]
async fn comment_on_missing_post_returns_not_found() {
    let (app, _state) = test_app().await;

    let token = signup_and_login(&app, "lostcommenter").await;

    let response = post(
        &app,
        "/posts/999/comment/",
        Some(&token),
        json!({ "text": "into the void" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_comment_is_rejected() {
    let (app, state) = test_app().await;

    let token = signup_and_login(&app, "quietuser").await;
    let post_id = create_post_returning_id(&app, &state, &token, "say something").await;

    let response = post(
        &app,
        &format!("/posts/{}/comment/", post_id),
        Some(&token),
        json!({ "text": "  \n " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn post_detail_paginates_comments_newest_first() {
    let (app, state) = test_app().await;

    let token = signup_and_login(&app, "busyauthor").await;
    let post_id = create_post_returning_id(&app, &state, &token, "popular post").await;

    for i in 0..13 {
        let response = post(
            &app,
            &format!("/posts/{}/comment/", post_id),
            Some(&token),
            json!({ "text": format!("comment {}", i) }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FOUND);
    }

    // 评论分页与帖子列表共用同一套契约
    let response = get(&app, &format!("/posts/{}/", post_id), None).await;
    let body = body_json(response).await;
    assert_eq!(body["data"]["comments"].as_array().unwrap().len(), 10);
    assert_eq!(body["data"]["comments"][0]["text"], "comment 12");
    assert_eq!(body["data"]["comments_pagination"]["total_pages"], 2);

    let response = get(&app, &format!("/posts/{}/?page=2", post_id), None).await;
    let body = body_json(response).await;
    assert_eq!(body["data"]["comments"].as_array().unwrap().len(), 3);
}
