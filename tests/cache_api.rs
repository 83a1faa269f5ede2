mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::*;

#[tokio::test]
async fn index_is_served_from_cache_until_explicitly_cleared() {
    let (app, state) = test_app().await;

    let token = signup_and_login(&app, "cachedauthor").await;
    // 会话在每次请求时都回表解析用户，staff 标记立即生效
    promote_to_staff(&state, "cachedauthor").await;

    post(&app, "/create/", Some(&token), json!({ "text": "first post" })).await;

    // 第一次请求渲染并写入缓存
    let warm = get(&app, "/", None).await;
    assert_eq!(warm.status(), StatusCode::OK);
    let warm_bytes = body_bytes(warm).await;

    // 缓存窗口内新帖子对主页不可见，响应逐字节一致
    post(&app, "/create/", Some(&token), json!({ "text": "second post" })).await;

    let still_warm = get(&app, "/", None).await;
    let still_warm_bytes = body_bytes(still_warm).await;
    assert_eq!(warm_bytes, still_warm_bytes);

    // 显式清空缓存后新内容可见
    let response = post(&app, "/admin/cache/clear/", Some(&token), json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let fresh = get(&app, "/", None).await;
    let fresh_bytes = body_bytes(fresh).await;
    assert_ne!(warm_bytes, fresh_bytes);

    let fresh_body: serde_json::Value = serde_json::from_slice(&fresh_bytes).unwrap();
    assert_eq!(fresh_body["data"]["posts"].as_array().unwrap().len(), 2);
    assert_eq!(fresh_body["data"]["posts"][0]["text"], "second post");
}

#[tokio::test]
async fn other_listings_are_not_cached() {
    let (app, _state) = test_app().await;

    let token = signup_and_login(&app, "livefeed").await;

    // 个人页在两次请求之间立即反映新帖子
    let response = get(&app, "/profile/livefeed/", None).await;
    let body = body_json(response).await;
    assert_eq!(body["data"]["posts"].as_array().unwrap().len(), 0);

    post(&app, "/create/", Some(&token), json!({ "text": "instant post" })).await;

    let response = get(&app, "/profile/livefeed/", None).await;
    let body = body_json(response).await;
    assert_eq!(body["data"]["posts"].as_array().unwrap().len(), 1);
}
