use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 关注关系：user_id 关注 author_id
/// (user_id, author_id) 对上有唯一约束
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Follow {
    pub id: i64,
    pub user_id: i64,
    pub author_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FollowStats {
    pub followers_count: i64,
    pub following_count: i64,
}
