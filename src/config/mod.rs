use anyhow::Context;
use config::{Config, FileFormat};
use serde::Deserialize;
use std::sync::LazyLock;

pub static CONFIG: LazyLock<AppConfig> =
    LazyLock::new(|| AppConfig::load().expect("Failed to initialize config"));

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// 后端 API 地址
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// 登录令牌保存路径
    #[serde(default = "default_token_file")]
    pub token_file: String,
    /// 日志目录
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

fn default_api_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_token_file() -> String {
    ".kaodian-token".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let config: AppConfig = Config::builder()
            .add_source(
                config::File::with_name("application")
                    .format(FileFormat::Yaml)
                    .required(false),
            )
            .add_source(config::Environment::with_prefix("APP").try_parsing(true))
            .build()
            .with_context(|| anyhow::anyhow!("Failed to load config"))?
            .try_deserialize()
            .with_context(|| anyhow::anyhow!("Failed to deserialize config"))?;

        Ok(config)
    }
}

pub fn get() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config() {
        let config = AppConfig::load().expect("Failed to load config");
        assert!(!config.api_base_url.is_empty());
        assert!(!config.token_file.is_empty());
        println!("{:#?}", config);
    }
}
