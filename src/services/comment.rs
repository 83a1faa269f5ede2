use crate::{
    error::{AppError, Result},
    models::comment::{Comment, CommentRow, CommentWithAuthor, CreateCommentRequest},
    services::Database,
    utils::{pagination, validation},
};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

/// 评论服务
#[derive(Clone)]
pub struct CommentService {
    db: Arc<Database>,
}

impl CommentService {
    pub async fn new(db: Arc<Database>) -> Result<Self> {
        Ok(Self { db })
    }

    /// 给帖子添加评论。作者和目标帖子都由服务端确定
    pub async fn add_comment(
        &self,
        post_id: i64,
        author_id: i64,
        request: CreateCommentRequest,
    ) -> Result<Comment> {
        request.validate()?;
        validation::validate_text_body(&request.text, 3000)?;

        // 目标帖子必须存在
        let post_exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE id = ?")
            .bind(post_id)
            .fetch_one(self.db.pool())
            .await?;
        if post_exists == 0 {
            return Err(AppError::not_found("Post"));
        }

        let comment = sqlx::query_as::<_, Comment>(
            r#"
                INSERT INTO comments (post_id, author_id, text, pub_date)
                VALUES (?, ?, ?, ?)
                RETURNING *
            "#,
        )
        .bind(post_id)
        .bind(author_id)
        .bind(&request.text)
        .bind(Utc::now())
        .fetch_one(self.db.pool())
        .await?;

        info!("User {} commented on post {}", author_id, post_id);
        Ok(comment)
    }

    /// 帖子的评论列表，分页，最新在前
    pub async fn post_comments(
        &self,
        post_id: i64,
        page: Option<usize>,
        per_page: usize,
    ) -> Result<pagination::Page<CommentWithAuthor>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments WHERE post_id = ?")
            .bind(post_id)
            .fetch_one(self.db.pool())
            .await?;

        let total_items = total as usize;
        let total_pages = pagination::total_pages(total_items, per_page);
        let number = pagination::resolve_page(page, total_pages);

        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
                SELECT c.id, c.post_id, c.text, c.pub_date,
                       c.author_id, u.username AS author_username
                FROM comments c
                JOIN users u ON u.id = c.author_id
                WHERE c.post_id = ?
                ORDER BY c.pub_date DESC, c.id DESC
                LIMIT ? OFFSET ?
            "#,
        )
        .bind(post_id)
        .bind(per_page as i64)
        .bind(pagination::offset(number, per_page))
        .fetch_all(self.db.pool())
        .await?;

        Ok(pagination::Page {
            items: rows.into_iter().map(CommentWithAuthor::from).collect(),
            number,
            per_page,
            total_items,
            total_pages,
        })
    }
}
