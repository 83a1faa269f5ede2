use crate::{
    config::Config,
    error::{AppError, Result},
    models::user::{PasswordResetConfirmRequest, SignupRequest, User},
    services::Database,
    utils::validation,
};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{Duration, Utc};
use rand::{distributions::Alphanumeric, Rng};
use std::sync::Arc;
use tracing::{debug, info, warn};
use validator::Validate;

/// 认证服务：注册、登录、会话存储、密码重置
#[derive(Clone)]
pub struct AuthService {
    db: Arc<Database>,
    config: Config,
}

impl AuthService {
    pub async fn new(db: Arc<Database>, config: &Config) -> Result<Self> {
        Ok(Self {
            db,
            config: config.clone(),
        })
    }

    /// 注册新用户，成功后返回用户记录
    pub async fn signup(&self, request: SignupRequest) -> Result<User> {
        request.validate()?;
        validation::validate_username(&request.username)?;
        validation::validate_password_pair(&request.password1, &request.password2)?;

        let password_hash = hash_password(&request.password1)?;
        let now = Utc::now();

        let result = sqlx::query_as::<_, User>(
            r#"
                INSERT INTO users (username, email, password_hash, first_name, last_name, is_staff, date_joined)
                VALUES (?, ?, ?, ?, ?, 0, ?)
                RETURNING *
            "#,
        )
        .bind(&request.username)
        .bind(&request.email)
        .bind(&password_hash)
        .bind(request.first_name.unwrap_or_default())
        .bind(request.last_name.unwrap_or_default())
        .bind(now)
        .fetch_one(self.db.pool())
        .await;

        match result {
            Ok(user) => {
                info!("Registered new user: {} ({})", user.username, user.id);
                Ok(user)
            }
            Err(e) => {
                // 用户名唯一约束由数据库保证
                let err = AppError::from(e);
                if err.is_unique_violation() {
                    Err(AppError::conflict("Username already taken"))
                } else {
                    Err(err)
                }
            }
        }
    }

    /// 校验凭据并创建会话，返回用户与不透明令牌
    pub async fn login(&self, username: &str, password: &str) -> Result<(User, String)> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(self.db.pool())
            .await?;

        // 用户不存在和密码错误返回同一个错误，不泄露账号是否存在
        let user = match user {
            Some(user) if verify_password(password, &user.password_hash) => user,
            _ => {
                debug!("Login failed for username: {}", username);
                return Err(AppError::unauthorized("Invalid username or password"));
            }
        };

        let token = generate_token();
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.config.session_ttl_hours);

        sqlx::query("INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)")
            .bind(&token)
            .bind(user.id)
            .bind(now)
            .bind(expires_at)
            .execute(self.db.pool())
            .await?;

        info!("User {} logged in", user.username);
        Ok((user, token))
    }

    /// 销毁会话
    pub async fn logout(&self, token: &str) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(self.db.pool())
            .await?;
        Ok(())
    }

    /// 从会话令牌解析当前用户；令牌无效或过期时返回 None
    pub async fn resolve_session(&self, token: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
                SELECT u.*
                FROM sessions s
                JOIN users u ON u.id = s.user_id
                WHERE s.token = ? AND s.expires_at > ?
            "#,
        )
        .bind(token)
        .bind(Utc::now())
        .fetch_optional(self.db.pool())
        .await?;

        Ok(user)
    }

    /// 发起密码重置。无论邮箱是否存在都返回成功，避免账号探测；
    /// 令牌的投递（邮件等）是部署层面的事，这里只记录日志
    pub async fn request_password_reset(&self, email: &str) -> Result<()> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(self.db.pool())
            .await?;

        let user = match user {
            Some(user) => user,
            None => {
                debug!("Password reset requested for unknown email");
                return Ok(());
            }
        };

        let token = generate_token();
        let now = Utc::now();
        let expires_at = now + Duration::minutes(self.config.password_reset_ttl_minutes);

        sqlx::query(
            "INSERT INTO password_resets (token, user_id, created_at, expires_at, used) VALUES (?, ?, ?, ?, 0)",
        )
        .bind(&token)
        .bind(user.id)
        .bind(now)
        .bind(expires_at)
        .execute(self.db.pool())
        .await?;

        info!("Password reset token issued for user {}: {}", user.id, token);
        Ok(())
    }

    /// 用一次性令牌设置新密码，并吊销该用户的所有会话
    pub async fn confirm_password_reset(&self, request: PasswordResetConfirmRequest) -> Result<()> {
        request.validate()?;
        validation::validate_password_pair(&request.new_password1, &request.new_password2)?;

        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT user_id FROM password_resets WHERE token = ? AND used = 0 AND expires_at > ?",
        )
        .bind(&request.token)
        .bind(Utc::now())
        .fetch_optional(self.db.pool())
        .await?;

        let user_id = match row {
            Some((user_id,)) => user_id,
            None => return Err(AppError::bad_request("Invalid or expired reset token")),
        };

        let password_hash = hash_password(&request.new_password1)?;

        sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(&password_hash)
            .bind(user_id)
            .execute(self.db.pool())
            .await?;

        sqlx::query("UPDATE password_resets SET used = 1 WHERE token = ?")
            .bind(&request.token)
            .execute(self.db.pool())
            .await?;

        // 改密后旧会话全部作废
        sqlx::query("DELETE FROM sessions WHERE user_id = ?")
            .bind(user_id)
            .execute(self.db.pool())
            .await?;

        info!("Password reset completed for user {}", user_id);
        Ok(())
    }

    /// 清理过期会话和重置令牌（由后台任务周期调用）
    pub async fn cleanup_expired_sessions(&self) -> Result<()> {
        let now = Utc::now();

        let sessions = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now)
            .execute(self.db.pool())
            .await?;

        let resets = sqlx::query("DELETE FROM password_resets WHERE expires_at <= ? OR used = 1")
            .bind(now)
            .execute(self.db.pool())
            .await?;

        debug!(
            "Cleaned {} expired sessions and {} stale reset tokens",
            sessions.rows_affected(),
            resets.rows_affected()
        );
        Ok(())
    }
}

/// 生成不透明的会话/重置令牌
fn generate_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(48)
        .map(char::from)
        .collect()
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!("Stored password hash is malformed: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_roundtrip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn test_generate_token_shape() {
        let token = generate_token();
        assert_eq!(token.len(), 48);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        // 两次生成的令牌不应相同
        assert_ne!(token, generate_token());
    }
}
