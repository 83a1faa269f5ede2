use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Server configuration
    pub server_host: String,
    pub server_port: u16,
    pub environment: String,
    pub log_level: String,

    // Database configuration
    pub database_url: String,
    pub database_max_connections: u32,

    // Session configuration
    pub session_ttl_hours: i64,
    pub password_reset_ttl_minutes: i64,
    pub session_cleanup_interval: u64,

    // Feed cache
    pub cache_ttl: u64,

    // Content settings
    pub posts_per_page: usize,
    pub comments_per_page: usize,
    pub max_post_length: usize,
    pub max_comment_length: usize,

    // Feature flags
    pub enable_registrations: bool,

    // CORS configuration
    pub cors_allowed_origins: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),

            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://yatube.db?mode=rwc".to_string()),
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()?,

            session_ttl_hours: env::var("SESSION_TTL_HOURS")
                .unwrap_or_else(|_| "336".to_string())
                .parse()?,
            password_reset_ttl_minutes: env::var("PASSWORD_RESET_TTL_MINUTES")
                .unwrap_or_else(|_| "60".to_string())
                .parse()?,
            session_cleanup_interval: env::var("SESSION_CLEANUP_INTERVAL")
                .unwrap_or_else(|_| "3600".to_string())
                .parse()?,

            // 主页信息流的响应缓存窗口（秒）
            cache_ttl: env::var("CACHE_TTL")
                .unwrap_or_else(|_| "20".to_string())
                .parse()?,

            posts_per_page: env::var("POSTS_PER_PAGE")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,
            comments_per_page: env::var("COMMENTS_PER_PAGE")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,
            max_post_length: env::var("MAX_POST_LENGTH")
                .unwrap_or_else(|_| "20000".to_string())
                .parse()?,
            max_comment_length: env::var("MAX_COMMENT_LENGTH")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,

            enable_registrations: env::var("ENABLE_REGISTRATIONS")
                .unwrap_or_else(|_| "true".to_string())
                .parse()?,

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost:3001".to_string()),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
