//! # 应用配置数据模型
//!
//! 定义了应用配置（AppConfig）和主题偏好（Theme）。
//! 配置存储在 `~/.creator-dashboard/config.json`，首次启动时文件不存在，使用默认值。

use serde::{Deserialize, Serialize};

/// 默认后端地址
pub const DEFAULT_API_URL: &str = "http://localhost:3003";

/// 覆盖后端地址的环境变量名
pub const API_URL_ENV: &str = "DASHBOARD_API_URL";

/// 主题偏好
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    /// 跟随系统
    System,
}

impl Theme {
    /// 解析实际生效的主题：`System` 时由调用方传入系统是否为深色模式
    pub fn resolve(self, system_prefers_dark: bool) -> Theme {
        match self {
            Theme::System if system_prefers_dark => Theme::Dark,
            Theme::System => Theme::Light,
            other => other,
        }
    }
}

/// 应用配置
///
/// 对应前端 TypeScript 接口：
/// ```typescript
/// interface AppConfig {
///   apiUrl: string;
///   pollIntervalSecs: number;
///   requestTimeoutSecs: number;
///   theme: 'light' | 'dark' | 'system';
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// 后端 API 基础地址（不含结尾的 `/`）
    pub api_url: String,
    /// 通知轮询周期（秒）
    pub poll_interval_secs: u64,
    /// 单个请求的超时时间（秒）
    pub request_timeout_secs: u64,
    pub theme: Theme,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            poll_interval_secs: 30,
            request_timeout_secs: 30,
            theme: Theme::Light,
        }
    }
}

impl AppConfig {
    /// 应用环境变量覆盖
    ///
    /// `lookup` 通常为 `|k| std::env::var(k).ok()`，测试中可替换。
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(API_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.api_url = url;
        }
        self.normalized()
    }

    /// 去除 API 地址末尾的 `/`，并把 0 值周期修正为默认值
    pub fn normalized(mut self) -> Self {
        let trimmed = self.api_url.trim().trim_end_matches('/');
        self.api_url = if trimmed.is_empty() {
            DEFAULT_API_URL.to_string()
        } else {
            trimmed.to_string()
        };
        let defaults = AppConfig::default();
        if self.poll_interval_secs == 0 {
            self.poll_interval_secs = defaults.poll_interval_secs;
        }
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = defaults.request_timeout_secs;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "apiUrl": "https://api.example.com/" }"#).unwrap();
        let config = config.normalized();
        assert_eq!(config.api_url, "https://api.example.com");
        assert_eq!(config.poll_interval_secs, 30);
        assert_eq!(config.theme, Theme::Light);
    }

    #[test]
    fn test_env_override_wins() {
        let config = AppConfig::default().with_env_overrides(|key| {
            (key == API_URL_ENV).then(|| "http://10.0.0.2:4000/".to_string())
        });
        assert_eq!(config.api_url, "http://10.0.0.2:4000");
    }

    #[test]
    fn test_system_theme_resolution() {
        assert_eq!(Theme::System.resolve(true), Theme::Dark);
        assert_eq!(Theme::System.resolve(false), Theme::Light);
        assert_eq!(Theme::Dark.resolve(false), Theme::Dark);
    }
}
