// 各个测试二进制只用到这里的一部分辅助函数
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use yatube::{config::Config, routes, state::AppState};

/// 测试配置：内存数据库，单连接池
pub fn test_config() -> Config {
    Config {
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        environment: "test".to_string(),
        log_level: "debug".to_string(),
        database_url: "sqlite::memory:".to_string(),
        database_max_connections: 1,
        session_ttl_hours: 1,
        password_reset_ttl_minutes: 60,
        session_cleanup_interval: 3600,
        cache_ttl: 30,
        posts_per_page: 10,
        comments_per_page: 10,
        max_post_length: 20000,
        max_comment_length: 3000,
        enable_registrations: true,
        cors_allowed_origins: "http://localhost:3001".to_string(),
    }
}

/// 组装一个完整的应用实例（路由 + 状态）
pub async fn test_app() -> (Router, Arc<AppState>) {
    let state = Arc::new(
        AppState::build(test_config())
            .await
            .expect("failed to build test state"),
    );
    (routes::app(state.clone()), state)
}

/// 发送一个请求，可选携带会话令牌和 JSON 请求体
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&value).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> Response {
    send(app, Method::GET, uri, token, None).await
}

pub async fn post(app: &Router, uri: &str, token: Option<&str>, body: Value) -> Response {
    send(app, Method::POST, uri, token, Some(body)).await
}

/// 读出响应体的原始字节
pub async fn body_bytes(response: Response) -> Vec<u8> {
    hyper::body::to_bytes(response.into_body())
        .await
        .unwrap()
        .to_vec()
}

/// 读出响应体并解析为 JSON
pub async fn body_json(response: Response) -> Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}

/// Location 头的值
pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("missing Location header")
        .to_str()
        .unwrap()
        .to_string()
}

/// 注册一个用户并登录，返回会话令牌
pub async fn signup_and_login(app: &Router, username: &str) -> String {
    let response = post(
        app,
        "/auth/signup/",
        None,
        json!({
            "first_name": "Test",
            "last_name": "User",
            "username": username,
            "email": format!("{}@example.com", username),
            "password1": "test-password-1",
            "password2": "test-password-1"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND, "signup should redirect");

    login(app, username).await
}

/// 用默认测试密码登录已有用户
pub async fn login(app: &Router, username: &str) -> String {
    let response = post(
        app,
        "/auth/login/",
        None,
        json!({
            "username": username,
            "password": "test-password-1"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "login should succeed");

    let body = body_json(response).await;
    body["data"]["token"].as_str().unwrap().to_string()
}

/// 把用户提升为 staff（管理接口需要）
pub async fn promote_to_staff(state: &AppState, username: &str) {
    sqlx::query("UPDATE users SET is_staff = 1 WHERE username = ?")
        .bind(username)
        .execute(state.db.pool())
        .await
        .unwrap();
}

/// 创建一个测试群组，返回 (id, slug)
pub async fn create_group(state: &AppState, title: &str, slug: &str) -> i64 {
    let group = state
        .group_service
        .create_group(yatube::models::group::CreateGroupRequest {
            title: title.to_string(),
            slug: Some(slug.to_string()),
            description: Some("test group".to_string()),
        })
        .await
        .unwrap();
    group.id
}

/// 通过 HTTP 接口发一条帖子，返回数据库里的帖子总数
pub async fn post_count(state: &AppState) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM posts")
        .fetch_one(state.db.pool())
        .await
        .unwrap()
}
