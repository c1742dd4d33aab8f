//! # 应用配置读写
//!
//! 配置文件不存在时（首次启动）返回默认值；读取后统一应用环境变量覆盖并规范化。

use std::path::Path;

use crate::error::AppResult;
use crate::models::settings::AppConfig;

/// 从指定路径加载配置
///
/// # 错误
/// 文件存在但无法读取或 JSON 解析失败时返回错误
pub async fn load_config(config_path: &Path) -> AppResult<AppConfig> {
    let config = if config_path.exists() {
        let content = tokio::fs::read_to_string(config_path).await?;
        serde_json::from_str::<AppConfig>(&content)?
    } else {
        log::info!("配置文件不存在，使用默认配置: {}", config_path.display());
        AppConfig::default()
    };

    Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
}

/// 保存配置到指定路径，父目录不存在时递归创建
///
/// 写入的是规范化后的配置（不含环境变量覆盖），并返回该配置。
pub async fn save_config(config_path: &Path, config: AppConfig) -> AppResult<AppConfig> {
    let config = config.normalized();

    if let Some(parent) = config_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let content = serde_json::to_string_pretty(&config)?;
    tokio::fs::write(config_path, content).await?;
    log::info!("配置已保存: {}", config_path.display());

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::Theme;

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("config.json")).await.unwrap();
        assert_eq!(config.poll_interval_secs, 30);
        assert_eq!(config.theme, Theme::Light);
    }

    #[tokio::test]
    async fn test_save_then_load_keeps_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let saved = save_config(
            &path,
            AppConfig {
                api_url: "https://api.example.com/".into(),
                poll_interval_secs: 0,
                request_timeout_secs: 10,
                theme: Theme::Dark,
            },
        )
        .await
        .unwrap();
        assert_eq!(saved.api_url, "https://api.example.com");
        assert_eq!(saved.poll_interval_secs, 30);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"requestTimeoutSecs\": 10"));
        assert!(raw.contains("\"theme\": \"dark\""));
    }

    #[tokio::test]
    async fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_config(&path).await.unwrap_err().kind(), "config");
    }
}
