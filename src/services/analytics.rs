//! # 数据分析
//!
//! 由文章列表在客户端计算分析页面的全部数据。

use crate::models::article::{Article, ArticleStatus};
use crate::models::dashboard::{AnalyticsOverview, StatusCount};

/// 热门文章榜的最大篇数
pub const TOP_ARTICLES: usize = 5;

/// 汇总文章列表
///
/// - 浏览/点赞/分享总数覆盖全部文章
/// - 状态分布按 `ArticleStatus::ALL` 的顺序，数量为 0 的状态也保留
/// - 热门文章只取已发布文章，按浏览量降序；浏览量相同时保持原列表顺序
pub fn summarize(articles: &[Article]) -> AnalyticsOverview {
    let status_breakdown = ArticleStatus::ALL
        .iter()
        .map(|&status| StatusCount {
            status,
            count: articles.iter().filter(|a| a.status == status).count(),
        })
        .collect::<Vec<_>>();

    let mut published: Vec<&Article> = articles
        .iter()
        .filter(|a| a.status == ArticleStatus::Published)
        .collect();
    // sort_by 是稳定排序
    published.sort_by(|a, b| b.views_count.cmp(&a.views_count));

    AnalyticsOverview {
        total_views: articles.iter().map(|a| a.views_count).sum(),
        total_likes: articles.iter().map(|a| a.likes_count).sum(),
        total_shares: articles.iter().map(|a| a.shares_count).sum(),
        total_articles: articles.len(),
        published_articles: published.len(),
        status_breakdown,
        top_articles: published
            .into_iter()
            .take(TOP_ARTICLES)
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(id: &str, status: ArticleStatus, views: u64) -> Article {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": id,
            "status": status.as_str(),
            "viewsCount": views,
            "likesCount": 2,
            "sharesCount": 1
        }))
        .unwrap()
    }

    #[test]
    fn test_totals_and_breakdown() {
        let articles = vec![
            article("a", ArticleStatus::Published, 100),
            article("b", ArticleStatus::Draft, 5),
            article("c", ArticleStatus::Published, 40),
            article("d", ArticleStatus::PendingReview, 0),
        ];
        let overview = summarize(&articles);

        assert_eq!(overview.total_views, 145);
        assert_eq!(overview.total_likes, 8);
        assert_eq!(overview.total_shares, 4);
        assert_eq!(overview.total_articles, 4);
        assert_eq!(overview.published_articles, 2);

        let breakdown: Vec<(ArticleStatus, usize)> = overview
            .status_breakdown
            .iter()
            .map(|s| (s.status, s.count))
            .collect();
        assert_eq!(
            breakdown,
            vec![
                (ArticleStatus::Published, 2),
                (ArticleStatus::PendingReview, 1),
                (ArticleStatus::Draft, 1),
                (ArticleStatus::Rejected, 0),
            ]
        );
    }

    #[test]
    fn test_top_articles_are_published_sorted_and_capped() {
        let articles = vec![
            article("draft-hit", ArticleStatus::Draft, 9999),
            article("p1", ArticleStatus::Published, 10),
            article("p2", ArticleStatus::Published, 50),
            article("p3", ArticleStatus::Published, 50),
            article("p4", ArticleStatus::Published, 5),
            article("p5", ArticleStatus::Published, 70),
            article("p6", ArticleStatus::Published, 1),
        ];
        let ids: Vec<String> = summarize(&articles)
            .top_articles
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec!["p5", "p2", "p3", "p1", "p4"]);
    }

    #[test]
    fn test_empty_list() {
        let overview = summarize(&[]);
        assert_eq!(overview.total_views, 0);
        assert!(overview.top_articles.is_empty());
        assert_eq!(overview.status_breakdown.len(), 4);
    }
}
