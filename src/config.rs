//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `BOOKTRIAGE__*` 覆盖（双下划线表示嵌套，
//! 如 `BOOKTRIAGE__STORE__BASE_URL=https://kinto.example.org/v1`）。

use std::path::PathBuf;

use serde::Deserialize;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub review: ReviewSection,
}

/// [store] 段：远端端点与集合定位；base_url 未设置时使用内存 Mock 后端
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    pub base_url: Option<String>,
    #[serde(default = "default_bucket")]
    pub bucket: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    /// 单次请求超时（秒）
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// 可选 Authorization 头原文（如 "Basic dXNlcjpwYXNz"）
    pub auth: Option<String>,
}

fn default_bucket() -> String {
    "Carlos".to_string()
}

fn default_collection() -> String {
    "books".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            base_url: None,
            bucket: default_bucket(),
            collection: default_collection(),
            timeout_secs: default_timeout_secs(),
            auth: None,
        }
    }
}

/// [review] 段：批大小、排序字段、续看文件路径
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReviewSection {
    /// 单页最大记录数
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// 列表排序字段（升序）
    #[serde(default = "default_sort")]
    pub sort: String,
    /// 上次浏览位置的 JSON 文件
    #[serde(default = "default_resume_path")]
    pub resume_path: PathBuf,
}

fn default_batch_size() -> usize {
    3233
}

fn default_sort() -> String {
    "title".to_string()
}

fn default_resume_path() -> PathBuf {
    PathBuf::from(".booktriage/last_index.json")
}

impl Default for ReviewSection {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            sort: default_sort(),
            resume_path: default_resume_path(),
        }
    }
}

/// 从 config 目录加载配置，环境变量 BOOKTRIAGE__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 BOOKTRIAGE__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("BOOKTRIAGE")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_shipped_config() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.review.batch_size, 3233);
        assert_eq!(cfg.review.sort, "title");
        assert_eq!(cfg.store.bucket, "Carlos");
        assert_eq!(cfg.store.collection, "books");
        assert!(cfg.store.base_url.is_none());
    }

    #[test]
    fn test_section_defaults_fill_missing_fields() {
        let cfg: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(
                "[review]\nbatch_size = 10\n",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(cfg.review.batch_size, 10);
        assert_eq!(cfg.review.sort, "title");
        assert_eq!(cfg.store.timeout_secs, 15);
    }
}
