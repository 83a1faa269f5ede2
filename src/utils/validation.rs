use crate::error::{AppError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap()
});

/// 验证用户名格式
pub fn validate_username(username: &str) -> Result<()> {
    if username.trim().is_empty() {
        return Err(AppError::Validation("用户名不能为空".to_string()));
    }

    if username.len() < 3 {
        return Err(AppError::Validation("用户名至少需要3个字符".to_string()));
    }

    if username.len() > 30 {
        return Err(AppError::Validation("用户名不能超过30个字符".to_string()));
    }

    // 用户名只能包含字母、数字、下划线和连字符
    if !USERNAME_REGEX.is_match(username) {
        return Err(AppError::Validation("用户名只能包含字母、数字、下划线和连字符".to_string()));
    }

    Ok(())
}

/// 验证帖子/评论正文：不允许只有空白字符
pub fn validate_text_body(text: &str, max_length: usize) -> Result<()> {
    if text.trim().is_empty() {
        return Err(AppError::Validation("正文不能为空".to_string()));
    }

    if text.len() > max_length {
        return Err(AppError::Validation(format!("正文不能超过{}个字符", max_length)));
    }

    Ok(())
}

/// 验证两次输入的密码一致且满足最小长度
pub fn validate_password_pair(password1: &str, password2: &str) -> Result<()> {
    if password1 != password2 {
        return Err(AppError::Validation("两次输入的密码不一致".to_string()));
    }

    if password1.len() < 8 {
        return Err(AppError::Validation("密码至少需要8个字符".to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        // 有效用户名
        assert!(validate_username("user123").is_ok());
        assert!(validate_username("test_user").is_ok());
        assert!(validate_username("user-name").is_ok());

        // 无效用户名
        assert!(validate_username("").is_err());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("user@name").is_err());
        assert!(validate_username("user name").is_err());
        assert!(validate_username(&"a".repeat(31)).is_err());
    }

    #[test]
    fn test_validate_text_body() {
        assert!(validate_text_body("hello", 100).is_ok());

        // 空白正文被拒绝
        assert!(validate_text_body("", 100).is_err());
        assert!(validate_text_body("   \n\t ", 100).is_err());

        // 超长正文被拒绝
        assert!(validate_text_body(&"a".repeat(101), 100).is_err());
    }

    #[test]
    fn test_validate_password_pair() {
        assert!(validate_password_pair("secret-password", "secret-password").is_ok());

        assert!(validate_password_pair("secret-password", "other-password").is_err());
        assert!(validate_password_pair("short", "short").is_err());
    }
}
