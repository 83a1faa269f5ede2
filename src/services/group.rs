use crate::{
    error::{AppError, Result},
    models::group::{CreateGroupRequest, Group, UpdateGroupRequest},
    services::Database,
    utils::slug,
};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

/// 群组服务。群组只通过管理接口维护
#[derive(Clone)]
pub struct GroupService {
    db: Arc<Database>,
}

impl GroupService {
    pub async fn new(db: Arc<Database>) -> Result<Self> {
        Ok(Self { db })
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Group> {
        sqlx::query_as::<_, Group>("SELECT * FROM groups WHERE slug = ?")
            .bind(slug)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| AppError::not_found("Group"))
    }

    pub async fn get_by_id(&self, group_id: i64) -> Result<Group> {
        sqlx::query_as::<_, Group>("SELECT * FROM groups WHERE id = ?")
            .bind(group_id)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| AppError::not_found("Group"))
    }

    pub async fn list(&self) -> Result<Vec<Group>> {
        let groups = sqlx::query_as::<_, Group>("SELECT * FROM groups ORDER BY title")
            .fetch_all(self.db.pool())
            .await?;
        Ok(groups)
    }

    /// 创建群组；slug 省略时由标题生成
    pub async fn create_group(&self, request: CreateGroupRequest) -> Result<Group> {
        request.validate()?;

        let group_slug = match &request.slug {
            Some(s) => {
                if !slug::is_valid_slug(s) {
                    return Err(AppError::validation("Invalid slug format"));
                }
                s.clone()
            }
            None => slug::generate_slug(&request.title),
        };

        let result = sqlx::query_as::<_, Group>(
            "INSERT INTO groups (title, slug, description) VALUES (?, ?, ?) RETURNING *",
        )
        .bind(&request.title)
        .bind(&group_slug)
        .bind(request.description.unwrap_or_default())
        .fetch_one(self.db.pool())
        .await;

        match result {
            Ok(group) => {
                info!("Created group '{}' ({})", group.title, group.slug);
                Ok(group)
            }
            Err(e) => {
                let err = AppError::from(e);
                if err.is_unique_violation() {
                    Err(AppError::conflict("Group slug already in use"))
                } else {
                    Err(err)
                }
            }
        }
    }

    pub async fn update_group(&self, group_id: i64, request: UpdateGroupRequest) -> Result<Group> {
        request.validate()?;

        let current = self.get_by_id(group_id).await?;

        if let Some(s) = &request.slug {
            if !slug::is_valid_slug(s) {
                return Err(AppError::validation("Invalid slug format"));
            }
        }

        let result = sqlx::query_as::<_, Group>(
            "UPDATE groups SET title = ?, slug = ?, description = ? WHERE id = ? RETURNING *",
        )
        .bind(request.title.unwrap_or(current.title))
        .bind(request.slug.unwrap_or(current.slug))
        .bind(request.description.unwrap_or(current.description))
        .bind(group_id)
        .fetch_one(self.db.pool())
        .await;

        match result {
            Ok(group) => Ok(group),
            Err(e) => {
                let err = AppError::from(e);
                if err.is_unique_violation() {
                    Err(AppError::conflict("Group slug already in use"))
                } else {
                    Err(err)
                }
            }
        }
    }

    /// 删除群组。帖子不级联删除，群组引用由数据库置空
    pub async fn delete_group(&self, group_id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM groups WHERE id = ?")
            .bind(group_id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Group"));
        }

        info!("Deleted group {}", group_id);
        Ok(())
    }
}
