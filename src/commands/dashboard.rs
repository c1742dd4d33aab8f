//! # 仪表盘 Tauri Commands
//!
//! - `dashboard_stats` - 统计概览和最近文章
//! - `analytics_overview` - 分析页面的聚合数据
//! - `notification_counts` / `refresh_notifications` - 侧边栏通知计数
//! - `start_notifications` / `stop_notifications` - 随仪表盘挂载/卸载启停轮询

use tauri::State;

use crate::error::AppError;
use crate::models::dashboard::{AnalyticsOverview, DashboardStats, NotificationCounts};
use crate::services::analytics;
use crate::state::AppState;

#[tauri::command]
pub async fn dashboard_stats(state: State<'_, AppState>) -> Result<DashboardStats, AppError> {
    let token = state.token()?;
    let result = state.api()?.dashboard_stats(&token).await;
    state.guard(result).await
}

#[tauri::command]
pub async fn analytics_overview(
    state: State<'_, AppState>,
) -> Result<AnalyticsOverview, AppError> {
    let token = state.token()?;
    let articles = state.guard(state.api()?.list_articles(&token).await).await?;
    Ok(analytics::summarize(&articles))
}

#[tauri::command]
pub fn notification_counts(state: State<'_, AppState>) -> NotificationCounts {
    state.poller.counts()
}

/// 周期外立即刷新一次
#[tauri::command]
pub async fn refresh_notifications(
    state: State<'_, AppState>,
) -> Result<NotificationCounts, AppError> {
    let token = state.token()?;
    let result = state.poller.refresh_once(&state.api()?, &token).await;
    state.guard(result).await
}

#[tauri::command]
pub fn start_notifications(state: State<'_, AppState>) -> Result<(), AppError> {
    state.start_polling()
}

#[tauri::command]
pub fn stop_notifications(state: State<'_, AppState>) {
    state.poller.stop();
}
