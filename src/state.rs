use crate::{
    config::Config,
    services::{
        auth::AuthService,
        comment::CommentService,
        database::Database,
        follow::FollowService,
        group::GroupService,
        post::PostService,
        user::UserService,
    },
    utils::cache::FeedCache,
};

/// 应用程序的共享状态
/// 包含所有服务和配置的引用
#[derive(Clone)]
pub struct AppState {
    /// 应用配置
    pub config: Config,

    /// 数据库连接
    pub db: Database,

    /// 认证服务
    pub auth_service: AuthService,

    /// 用户服务
    pub user_service: UserService,

    /// 帖子服务
    pub post_service: PostService,

    /// 群组服务
    pub group_service: GroupService,

    /// 评论服务
    pub comment_service: CommentService,

    /// 关注服务
    pub follow_service: FollowService,

    /// 主页信息流的响应缓存
    pub feed_cache: FeedCache,
}

impl AppState {
    /// 连接数据库并初始化所有服务
    pub async fn build(config: Config) -> crate::error::Result<Self> {
        let db = Database::connect(&config).await?;
        let shared_db = std::sync::Arc::new(db.clone());

        let auth_service = AuthService::new(shared_db.clone(), &config).await?;
        let user_service = UserService::new(shared_db.clone()).await?;
        let post_service = PostService::new(shared_db.clone()).await?;
        let group_service = GroupService::new(shared_db.clone()).await?;
        let comment_service = CommentService::new(shared_db.clone()).await?;
        let follow_service = FollowService::new(shared_db).await?;

        let feed_cache = FeedCache::new(std::time::Duration::from_secs(config.cache_ttl));

        Ok(Self {
            config,
            db,
            auth_service,
            user_service,
            post_service,
            group_service,
            comment_service,
            follow_service,
            feed_cache,
        })
    }

    /// 检查是否为生产环境
    pub fn is_production(&self) -> bool {
        self.config.is_production()
    }

    /// 检查是否为开发环境
    pub fn is_development(&self) -> bool {
        self.config.is_development()
    }
}
