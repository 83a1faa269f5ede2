use crate::{
    error::{AppError, Result},
    models::post::{CreatePostRequest, Post, PostListItem, PostRow, UpdatePostRequest},
    services::Database,
    utils::{pagination, validation},
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

/// 列表查询共用的联结投影
const POST_LIST_COLUMNS: &str = r#"
    p.id, p.text, p.image, p.pub_date,
    p.author_id, u.username AS author_username,
    p.group_id, g.title AS group_title, g.slug AS group_slug,
    (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count
"#;

/// 帖子服务：创建、编辑、各类信息流查询
#[derive(Clone)]
pub struct PostService {
    db: Arc<Database>,
}

impl PostService {
    pub async fn new(db: Arc<Database>) -> Result<Self> {
        Ok(Self { db })
    }

    /// 创建帖子。作者一律取当前登录用户，不信任请求体
    pub async fn create_post(&self, author_id: i64, request: CreatePostRequest) -> Result<Post> {
        request.validate()?;
        validation::validate_text_body(&request.text, 20000)?;

        if let Some(group_id) = request.group {
            self.ensure_group_exists(group_id).await?;
        }

        let post = sqlx::query_as::<_, Post>(
            r#"
                INSERT INTO posts (text, author_id, group_id, image, pub_date)
                VALUES (?, ?, ?, ?, ?)
                RETURNING *
            "#,
        )
        .bind(&request.text)
        .bind(author_id)
        .bind(request.group)
        .bind(&request.image)
        .bind(Utc::now())
        .fetch_one(self.db.pool())
        .await?;

        info!("User {} created post {}", author_id, post.id);
        Ok(post)
    }

    pub async fn get_post(&self, post_id: i64) -> Result<Post> {
        sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = ?")
            .bind(post_id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| AppError::not_found("Post"))
    }

    /// 单个帖子的列表视图（含作者和群组信息）
    pub async fn get_post_item(&self, post_id: i64) -> Result<PostListItem> {
        let sql = format!(
            r#"
                SELECT {POST_LIST_COLUMNS}
                FROM posts p
                JOIN users u ON u.id = p.author_id
                LEFT JOIN groups g ON g.id = p.group_id
                WHERE p.id = ?
            "#
        );

        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(post_id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| AppError::not_found("Post"))?;

        Ok(row.into())
    }

    /// 编辑帖子：文本、群组、配图整体替换。
    /// 调用方负责先做作者归属检查
    pub async fn update_post(&self, post_id: i64, request: UpdatePostRequest) -> Result<Post> {
        request.validate()?;
        validation::validate_text_body(&request.text, 20000)?;

        if let Some(group_id) = request.group {
            self.ensure_group_exists(group_id).await?;
        }

        let post = sqlx::query_as::<_, Post>(
            r#"
                UPDATE posts
                SET text = ?, group_id = ?, image = ?
                WHERE id = ?
                RETURNING *
            "#,
        )
        .bind(&request.text)
        .bind(request.group)
        .bind(&request.image)
        .bind(post_id)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or_else(|| AppError::not_found("Post"))?;

        info!("Post {} updated", post.id);
        Ok(post)
    }

    /// 主页信息流：全部帖子，最新在前
    pub async fn index_page(
        &self,
        page: Option<usize>,
        per_page: usize,
    ) -> Result<pagination::Page<PostListItem>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(self.db.pool())
            .await?;

        self.fetch_page("", &[], total as usize, page, per_page).await
    }

    /// 群组信息流
    pub async fn group_page(
        &self,
        group_id: i64,
        page: Option<usize>,
        per_page: usize,
    ) -> Result<pagination::Page<PostListItem>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE group_id = ?")
            .bind(group_id)
            .fetch_one(self.db.pool())
            .await?;

        self.fetch_page("WHERE p.group_id = ?", &[group_id], total as usize, page, per_page)
            .await
    }

    /// 作者个人页信息流
    pub async fn profile_page(
        &self,
        author_id: i64,
        page: Option<usize>,
        per_page: usize,
    ) -> Result<pagination::Page<PostListItem>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE author_id = ?")
            .bind(author_id)
            .fetch_one(self.db.pool())
            .await?;

        self.fetch_page("WHERE p.author_id = ?", &[author_id], total as usize, page, per_page)
            .await
    }

    /// 关注信息流：当前用户关注的所有作者的帖子。
    /// 每次请求基于当前的关注边重新计算，不做缓存
    pub async fn feed_page(
        &self,
        user_id: i64,
        page: Option<usize>,
        per_page: usize,
    ) -> Result<pagination::Page<PostListItem>> {
        let total: i64 = sqlx::query_scalar(
            r#"
                SELECT COUNT(*)
                FROM posts p
                JOIN follows f ON f.author_id = p.author_id
                WHERE f.user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_one(self.db.pool())
        .await?;

        self.fetch_page(
            "JOIN follows f ON f.author_id = p.author_id WHERE f.user_id = ?",
            &[user_id],
            total as usize,
            page,
            per_page,
        )
        .await
    }

    /// 公共的分页取数逻辑：规范化页码后按固定排序取一页
    async fn fetch_page(
        &self,
        filter: &str,
        binds: &[i64],
        total_items: usize,
        page: Option<usize>,
        per_page: usize,
    ) -> Result<pagination::Page<PostListItem>> {
        let total_pages = pagination::total_pages(total_items, per_page);
        let number = pagination::resolve_page(page, total_pages);

        let sql = format!(
            r#"
                SELECT {POST_LIST_COLUMNS}
                FROM posts p
                JOIN users u ON u.id = p.author_id
                LEFT JOIN groups g ON g.id = p.group_id
                {filter}
                ORDER BY p.pub_date DESC, p.id DESC
                LIMIT ? OFFSET ?
            "#
        );

        let mut query = sqlx::query_as::<_, PostRow>(&sql);
        for bind in binds {
            query = query.bind(*bind);
        }
        let rows = query
            .bind(per_page as i64)
            .bind(pagination::offset(number, per_page))
            .fetch_all(self.db.pool())
            .await?;

        debug!("Fetched {} posts for page {}/{}", rows.len(), number, total_pages);

        Ok(pagination::Page {
            items: rows.into_iter().map(PostListItem::from).collect(),
            number,
            per_page,
            total_items,
            total_pages,
        })
    }

    async fn ensure_group_exists(&self, group_id: i64) -> Result<()> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM groups WHERE id = ?")
            .bind(group_id)
            .fetch_one(self.db.pool())
            .await?;

        if count == 0 {
            return Err(AppError::validation("Group does not exist"));
        }
        Ok(())
    }
}
