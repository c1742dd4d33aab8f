//! # 仪表盘相关数据模型
//!
//! 分类、趋势话题、统计概览、通知计数和分析页面的聚合结果。

use serde::{Deserialize, Serialize};

use crate::models::article::{Article, ArticleStatus};

/// 文章分类（`GET /api/categories`，公开接口）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// 趋势话题（`GET /api/trending-topics/active`）
///
/// 创作者可以从话题直接开始一篇新文章。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingTopic {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub order: i32,
}

/// 仪表盘统计汇总
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    #[serde(default)]
    pub total_views: u64,
    #[serde(default)]
    pub total_articles: u64,
    #[serde(default)]
    pub published_articles: u64,
    #[serde(default)]
    pub total_likes: u64,
    #[serde(default)]
    pub total_shares: u64,
}

/// `GET /api/dashboard/stats` 的响应
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub stats: StatsSummary,
    #[serde(default)]
    pub recent_articles: Vec<Article>,
}

/// 侧边栏通知计数
///
/// 由轮询任务维护；单次请求失败时对应计数保持上一次的值。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationCounts {
    pub unread_messages: u64,
    pub pending_articles: u64,
}

/// 单个状态的文章数量
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: ArticleStatus,
    pub count: usize,
}

/// 分析页面的聚合结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsOverview {
    pub total_views: u64,
    pub total_likes: u64,
    pub total_shares: u64,
    pub total_articles: usize,
    pub published_articles: usize,
    pub status_breakdown: Vec<StatusCount>,
    /// 浏览量最高的已发布文章（最多 5 篇）
    pub top_articles: Vec<Article>,
}
