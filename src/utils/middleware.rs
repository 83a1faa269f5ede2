use crate::{error::AppError, models::user::User, state::AppState};
use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, warn};

/// 登录页地址，未认证的保护页面访问都重定向到这里
pub const LOGIN_URL: &str = "/auth/login/";

/// 认证中间件：从 Authorization 头解析会话令牌，
/// 命中会话存储时把用户放进请求扩展；匿名请求原样放行
pub async fn auth_middleware(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request<Body>,
    next: Next<Body>,
) -> Result<Response, AppError> {
    if let Some(auth_header) = headers.get("authorization") {
        if let Ok(auth_str) = auth_header.to_str() {
            if auth_str.starts_with("Bearer ") {
                let token = &auth_str[7..];

                match app_state.auth_service.resolve_session(token).await {
                    Ok(Some(user)) => {
                        debug!("Authenticated user: {} ({})", user.id, user.username);
                        request.extensions_mut().insert(user);
                    }
                    Ok(None) => {
                        // 令牌无效或会话已过期，按匿名请求继续处理
                        debug!("Session token did not resolve to a user");
                    }
                    Err(e) => {
                        warn!("Failed to resolve session: {}", e);
                        // 不返回错误，让请求继续处理（作为未认证请求）
                    }
                }
            }
        }
    }

    Ok(next.run(request).await)
}

/// 可选认证提取器
pub struct OptionalAuth(pub Option<User>);

#[async_trait::async_trait]
impl<S> axum::extract::FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts.extensions.get::<User>().cloned();
        Ok(OptionalAuth(user))
    }
}

/// 302 重定向（与浏览器端表单提交的语义一致）
pub fn redirect_found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// 重定向到登录页，并带上原始请求路径作为 next 参数，
/// 登录成功后客户端据此回到最初请求的页面
pub fn login_redirect(next: &str) -> Response {
    redirect_found(&format!("{}?next={}", LOGIN_URL, urlencoding::encode(next)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_found_sets_location() {
        let response = redirect_found("/posts/1/");
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/posts/1/"
        );
    }

    #[test]
    fn test_login_redirect_encodes_next() {
        let response = login_redirect("/create/");
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/auth/login/?next=%2Fcreate%2F"
        );
    }
}
