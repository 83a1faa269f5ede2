use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::time::sleep;

/// 缓存项
#[derive(Debug, Clone)]
struct CacheItem<T> {
    value: T,
    expires_at_ms: u128,
}

/// 简单的内存缓存实现，毫秒级过期
#[derive(Debug, Clone)]
pub struct Cache<T: Clone + Send + Sync> {
    data: Arc<RwLock<HashMap<String, CacheItem<T>>>>,
    default_ttl: Duration,
}

fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

impl<T: Clone + Send + Sync + 'static> Cache<T> {
    /// 创建新的缓存实例
    pub fn new(default_ttl: Duration) -> Self {
        let cache = Self {
            data: Arc::new(RwLock::new(HashMap::new())),
            default_ttl,
        };

        // 启动后台清理任务
        let data_ref = cache.data.clone();
        tokio::spawn(async move {
            loop {
                sleep(Duration::from_secs(300)).await; // 每5分钟清理一次
                Self::cleanup_expired(&data_ref);
            }
        });

        cache
    }

    /// 设置缓存项
    pub fn set(&self, key: String, value: T) -> Result<(), String> {
        self.set_with_ttl(key, value, self.default_ttl)
    }

    /// 设置带有自定义TTL的缓存项
    pub fn set_with_ttl(&self, key: String, value: T, ttl: Duration) -> Result<(), String> {
        let item = CacheItem {
            value,
            expires_at_ms: now_ms() + ttl.as_millis(),
        };

        let mut data = self.data.write().map_err(|e| e.to_string())?;
        data.insert(key, item);
        Ok(())
    }

    /// 获取缓存项
    pub fn get(&self, key: &str) -> Result<Option<T>, String> {
        let data = self.data.read().map_err(|e| e.to_string())?;

        if let Some(item) = data.get(key) {
            if item.expires_at_ms > now_ms() {
                Ok(Some(item.value.clone()))
            } else {
                // 过期了，需要删除（在读锁下不能删除，所以先返回None）
                Ok(None)
            }
        } else {
            Ok(None)
        }
    }

    /// 删除缓存项
    pub fn delete(&self, key: &str) -> Result<bool, String> {
        let mut data = self.data.write().map_err(|e| e.to_string())?;
        Ok(data.remove(key).is_some())
    }

    /// 清空所有缓存
    pub fn clear(&self) -> Result<(), String> {
        let mut data = self.data.write().map_err(|e| e.to_string())?;
        data.clear();
        Ok(())
    }

    /// 获取缓存大小
    pub fn size(&self) -> Result<usize, String> {
        let data = self.data.read().map_err(|e| e.to_string())?;
        Ok(data.len())
    }

    /// 清理过期项
    fn cleanup_expired(data: &Arc<RwLock<HashMap<String, CacheItem<T>>>>) {
        if let Ok(mut data) = data.write() {
            let current = now_ms();
            data.retain(|_, item| item.expires_at_ms > current);
        }
    }
}

/// 主页信息流的响应缓存：按页码缓存渲染好的响应体。
/// 缓存窗口内新帖子不会出现在主页上；
/// 显式清空（管理端点）或超过 TTL 后才能看到新内容。
pub type FeedCache = Cache<serde_json::Value>;

/// 生成主页信息流的缓存键
pub fn index_page_key(page: usize) -> String {
    format!("index:page:{}", page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    #[tokio::test]
    async fn test_cache_basic_operations() {
        let cache = Cache::new(Duration::from_secs(1));

        // 测试设置和获取
        cache.set("key1".to_string(), "value1".to_string()).unwrap();
        assert_eq!(cache.get("key1").unwrap(), Some("value1".to_string()));

        // 测试不存在的键
        assert_eq!(cache.get("nonexistent").unwrap(), None);

        // 测试删除
        assert!(cache.delete("key1").unwrap());
        assert_eq!(cache.get("key1").unwrap(), None);
    }

    #[tokio::test]
    async fn test_cache_expiration() {
        let cache = Cache::new(Duration::from_millis(100));

        cache.set("temp_key".to_string(), "temp_value".to_string()).unwrap();
        assert_eq!(cache.get("temp_key").unwrap(), Some("temp_value".to_string()));

        sleep(Duration::from_millis(150)).await;
        assert_eq!(cache.get("temp_key").unwrap(), None);
    }

    #[tokio::test]
    async fn test_cache_clear() {
        let cache = Cache::new(Duration::from_secs(60));

        cache.set(index_page_key(1), "page1".to_string()).unwrap();
        cache.set(index_page_key(2), "page2".to_string()).unwrap();
        assert_eq!(cache.size().unwrap(), 2);

        // 显式清空后所有页都失效
        cache.clear().unwrap();
        assert_eq!(cache.size().unwrap(), 0);
        assert_eq!(cache.get(&index_page_key(1)).unwrap(), None);
    }

    #[test]
    fn test_index_page_key() {
        assert_eq!(index_page_key(1), "index:page:1");
        assert_eq!(index_page_key(42), "index:page:42");
    }
}
