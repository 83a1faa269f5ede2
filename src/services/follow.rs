use crate::{
    error::{AppError, Result},
    models::follow::FollowStats,
    services::Database,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

/// 关注关系服务
#[derive(Clone)]
pub struct FollowService {
    db: Arc<Database>,
}

impl FollowService {
    pub async fn new(db: Arc<Database>) -> Result<Self> {
        Ok(Self { db })
    }

    /// 关注作者。幂等：重复关注不产生新边；
    /// 自己关注自己是无操作。并发下的重复插入由唯一约束兜底，
    /// ON CONFLICT DO NOTHING 把第二个写入者静默吸收掉
    pub async fn follow(&self, user_id: i64, author_id: i64) -> Result<()> {
        if user_id == author_id {
            debug!("User {} attempted to follow themself, ignoring", user_id);
            return Ok(());
        }

        let result = sqlx::query(
            r#"
                INSERT INTO follows (user_id, author_id, created_at)
                VALUES (?, ?, ?)
                ON CONFLICT (user_id, author_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(author_id)
        .bind(Utc::now())
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() > 0 {
            info!("User {} followed author {}", user_id, author_id);
        } else {
            debug!("User {} already follows author {}", user_id, author_id);
        }
        Ok(())
    }

    /// 取消关注。不存在的边是调用方错误，返回 NotFound；
    /// 自己对自己的取消关注与关注对称，直接无操作
    pub async fn unfollow(&self, user_id: i64, author_id: i64) -> Result<()> {
        if user_id == author_id {
            return Ok(());
        }

        let result = sqlx::query("DELETE FROM follows WHERE user_id = ? AND author_id = ?")
            .bind(user_id)
            .bind(author_id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Follow"));
        }

        info!("User {} unfollowed author {}", user_id, author_id);
        Ok(())
    }

    pub async fn is_following(&self, user_id: i64, author_id: i64) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM follows WHERE user_id = ? AND author_id = ?",
        )
        .bind(user_id)
        .bind(author_id)
        .fetch_one(self.db.pool())
        .await?;

        Ok(count > 0)
    }

    /// 某作者的被关注数和关注数
    pub async fn stats(&self, user_id: i64) -> Result<FollowStats> {
        let followers_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE author_id = ?")
                .bind(user_id)
                .fetch_one(self.db.pool())
                .await?;

        let following_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE user_id = ?")
                .bind(user_id)
                .fetch_one(self.db.pool())
                .await?;

        Ok(FollowStats {
            followers_count,
            following_count,
        })
    }
}
