//! # 内存缓存管理服务
//!
//! 提供基于内存的缓存层，减少重复的网络请求：
//! - **分类列表缓存**：分类几乎不变，带时间戳按 TTL 判断有效性
//! - **文章详情缓存**：LRU 缓存最近打开的文章，编辑器可立即回填
//!
//! ## 缓存失效策略
//! - 分类列表：超过 TTL 后重新获取
//! - 文章详情：超过 TTL 后重新获取（审核结果在服务端变更）；
//!   保存、提交审核或删除成功后按 id 失效
//!
//! ## 线程安全
//! 使用 `std::sync::RwLock` / `Mutex` 保证多线程安全访问。
//! Tauri 的 command 可能在不同线程上并发执行，RwLock 允许多个读操作并发进行。

use std::num::NonZeroUsize;
use std::sync::{Mutex, RwLock};
use std::time::{Duration, Instant};

use lru::LruCache;

use crate::models::article::Article;
use crate::models::dashboard::Category;

/// 分类列表缓存的默认有效期
const CATEGORY_CACHE_TTL: Duration = Duration::from_secs(300);

/// 文章详情缓存的默认有效期
const ARTICLE_CACHE_TTL: Duration = Duration::from_secs(60);

/// 文章详情缓存的最大容量
///
/// 缓存满时，最久未访问的文章将被淘汰。
const ARTICLE_CACHE_MAX_ENTRIES: NonZeroUsize = match NonZeroUsize::new(20) {
    Some(n) => n,
    None => panic!("capacity must be non-zero"),
};

/// 应用全局缓存状态
pub struct AppCache {
    /// 分类列表缓存：最近一次获取的结果和获取时间
    categories: RwLock<Option<CategoryCacheEntry>>,
    /// 文章详情缓存：以文章 id 为 key
    ///
    /// `LruCache::get` 需要可变借用来更新访问顺序，因此使用 Mutex
    articles: Mutex<LruCache<String, ArticleCacheEntry>>,
    category_ttl: Duration,
    article_ttl: Duration,
}

struct CategoryCacheEntry {
    data: Vec<Category>,
    cached_at: Instant,
}

struct ArticleCacheEntry {
    article: Article,
    cached_at: Instant,
}

impl AppCache {
    /// 创建新的空缓存实例
    pub fn new() -> Self {
        Self::with_ttl(CATEGORY_CACHE_TTL, ARTICLE_CACHE_TTL)
    }

    pub fn with_ttl(category_ttl: Duration, article_ttl: Duration) -> Self {
        Self {
            categories: RwLock::new(None),
            articles: Mutex::new(LruCache::new(ARTICLE_CACHE_MAX_ENTRIES)),
            category_ttl,
            article_ttl,
        }
    }

    // ======== 分类列表缓存方法 ========

    /// 获取缓存的分类列表（如果缓存仍然有效）
    ///
    /// # 返回值
    /// - `Some(categories)` - 缓存有效时返回缓存数据的克隆
    /// - `None` - 缓存不存在或已过期
    pub fn get_categories(&self) -> Option<Vec<Category>> {
        let cache = self.categories.read().ok()?;
        let entry = cache.as_ref()?;

        if entry.cached_at.elapsed() <= self.category_ttl {
            Some(entry.data.clone())
        } else {
            None
        }
    }

    pub fn set_categories(&self, categories: Vec<Category>) {
        if let Ok(mut cache) = self.categories.write() {
            *cache = Some(CategoryCacheEntry {
                data: categories,
                cached_at: Instant::now(),
            });
        }
    }

    pub fn invalidate_categories(&self) {
        if let Ok(mut cache) = self.categories.write() {
            *cache = None;
        }
    }

    // ======== 文章详情缓存方法 ========

    /// 获取缓存的文章详情；已过期的条目会被移除并返回 `None`
    pub fn get_article(&self, id: &str) -> Option<Article> {
        let mut cache = self.articles.lock().ok()?;
        let fresh = cache.get(id)?.cached_at.elapsed() <= self.article_ttl;
        if fresh {
            cache.get(id).map(|entry| entry.article.clone())
        } else {
            cache.pop(id);
            None
        }
    }

    /// 写入文章详情，缓存满时淘汰最久未访问的条目
    pub fn set_article(&self, article: Article) {
        if let Ok(mut cache) = self.articles.lock() {
            cache.put(
                article.id.clone(),
                ArticleCacheEntry {
                    article,
                    cached_at: Instant::now(),
                },
            );
        }
    }

    /// 使指定文章的缓存失效（保存或删除之后调用）
    pub fn invalidate_article(&self, id: &str) {
        if let Ok(mut cache) = self.articles.lock() {
            cache.pop(id);
        }
    }

    /// 清空全部缓存（登出时调用，避免下一个用户看到上一个用户的数据）
    pub fn clear(&self) {
        self.invalidate_categories();
        if let Ok(mut cache) = self.articles.lock() {
            cache.clear();
        }
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(id: &str) -> Article {
        serde_json::from_value(serde_json::json!({ "id": id, "title": id })).unwrap()
    }

    #[test]
    fn test_categories_expire_after_ttl() {
        let cache = AppCache::with_ttl(Duration::ZERO, ARTICLE_CACHE_TTL);
        cache.set_categories(vec![Category {
            id: "c1".into(),
            name: "News".into(),
        }]);
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get_categories().is_none());

        let cache = AppCache::new();
        cache.set_categories(vec![]);
        assert_eq!(cache.get_categories(), Some(vec![]));
        cache.invalidate_categories();
        assert!(cache.get_categories().is_none());
    }

    #[test]
    fn test_article_cache_evicts_least_recently_used() {
        let cache = AppCache::new();
        for i in 0..ARTICLE_CACHE_MAX_ENTRIES.get() {
            cache.set_article(article(&format!("a{i}")));
        }
        // 访问 a0，使 a1 成为最久未访问
        assert!(cache.get_article("a0").is_some());
        cache.set_article(article("overflow"));

        assert!(cache.get_article("a0").is_some());
        assert!(cache.get_article("a1").is_none());
        assert!(cache.get_article("overflow").is_some());
    }

    #[test]
    fn test_invalidate_and_clear() {
        let cache = AppCache::new();
        cache.set_article(article("a1"));
        cache.set_article(article("a2"));
        cache.invalidate_article("a1");
        assert!(cache.get_article("a1").is_none());

        cache.clear();
        assert!(cache.get_article("a2").is_none());
    }

    #[test]
    fn test_articles_expire_after_ttl() {
        let cache = AppCache::with_ttl(CATEGORY_CACHE_TTL, Duration::ZERO);
        cache.set_article(article("a1"));
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache.get_article("a1").is_none());

        let cache = AppCache::new();
        cache.set_article(article("a1"));
        assert_eq!(cache.get_article("a1").unwrap().id, "a1");
    }
}
