//! # 文章与话题搜索
//!
//! 使用 `memchr::memmem::Finder` 在小写化文本上做子串匹配，rayon 并行过滤。
//! 结果保持原列表顺序；搜索词为空时匹配全部。

use memchr::memmem::Finder;
use rayon::prelude::*;
use serde::Deserialize;

use crate::models::article::{Article, ArticleStatus};
use crate::models::dashboard::TrendingTopic;

/// 文章列表筛选条件
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleQuery {
    /// `None` 表示全部状态
    #[serde(default)]
    pub status: Option<ArticleStatus>,
    #[serde(default)]
    pub search: String,
}

fn matches_any(finder: &Finder<'_>, fields: &[Option<&str>]) -> bool {
    fields
        .iter()
        .flatten()
        .any(|text| finder.find(text.to_lowercase().as_bytes()).is_some())
}

/// 按状态和搜索词（匹配标题或摘要，大小写不敏感）过滤文章
pub fn filter_articles(articles: &[Article], query: &ArticleQuery) -> Vec<Article> {
    let needle = query.search.trim().to_lowercase();
    let finder = Finder::new(needle.as_bytes());

    articles
        .par_iter()
        .filter(|a| query.status.is_none_or(|s| a.status == s))
        .filter(|a| {
            needle.is_empty()
                || matches_any(&finder, &[Some(a.title.as_str()), a.excerpt.as_deref()])
        })
        .cloned()
        .collect()
}

/// 按搜索词（匹配标题或描述）过滤趋势话题
pub fn filter_topics(topics: &[TrendingTopic], term: &str) -> Vec<TrendingTopic> {
    let needle = term.trim().to_lowercase();
    let finder = Finder::new(needle.as_bytes());

    topics
        .par_iter()
        .filter(|t| {
            needle.is_empty()
                || matches_any(&finder, &[Some(t.title.as_str()), Some(t.description.as_str())])
        })
        .cloned()
        .collect()
}
