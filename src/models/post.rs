use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{group::GroupInfo, user::AuthorInfo};

/// 帖子（posts 表的一行）
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub text: String,
    pub author_id: i64,
    pub group_id: Option<i64>,
    pub image: Option<String>,
    pub pub_date: DateTime<Utc>,
}

/// 列表查询的联结行：帖子 + 作者 + 所属群组 + 评论数
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRow {
    pub id: i64,
    pub text: String,
    pub image: Option<String>,
    pub pub_date: DateTime<Utc>,
    pub author_id: i64,
    pub author_username: String,
    pub group_id: Option<i64>,
    pub group_title: Option<String>,
    pub group_slug: Option<String>,
    pub comment_count: i64,
}

/// 信息流里的一条帖子
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListItem {
    pub id: i64,
    pub text: String,
    pub image: Option<String>,
    pub pub_date: DateTime<Utc>,
    pub author: AuthorInfo,
    pub group: Option<GroupInfo>,
    pub comment_count: i64,
}

impl From<PostRow> for PostListItem {
    fn from(row: PostRow) -> Self {
        // group_id 为空说明帖子不属于任何群组（或群组已被删除）
        let group = match (row.group_id, row.group_title, row.group_slug) {
            (Some(id), Some(title), Some(slug)) => Some(GroupInfo { id, title, slug }),
            _ => None,
        };

        Self {
            id: row.id,
            text: row.text,
            image: row.image,
            pub_date: row.pub_date,
            author: AuthorInfo {
                id: row.author_id,
                username: row.author_username,
            },
            group,
            comment_count: row.comment_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 20000))]
    pub text: String,

    /// 可选的群组 id
    pub group: Option<i64>,

    /// 可选的配图（已上传文件的引用）
    #[validate(length(max = 500))]
    pub image: Option<String>,
}

/// 编辑沿用创建的字段集：文本必填，群组和配图整体替换
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 20000))]
    pub text: String,

    pub group: Option<i64>,

    #[validate(length(max = 500))]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct PageQuery {
    pub page: Option<usize>,
}
