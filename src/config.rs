use crate::listing::view::DEFAULT_PAGE_SIZE;
use crate::model::{SearchQuery, SortOrder};
use serde::Deserialize;
use std::fs;
use thiserror::Error;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub feed_url: String,
    pub api_base: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_site_name")]
    pub site_name: String,
    #[serde(default)]
    pub search: SearchQuery,
    #[serde(default)]
    pub sort: SortOrder,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Pages of the listing to reveal on each refresh.
    #[serde(default = "default_pages")]
    pub pages: usize,
    #[serde(default)]
    pub detail_stock_numbers: Vec<String>,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_seconds: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

fn default_site_name() -> String {
    "TrueVin".to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_pages() -> usize {
    1
}

fn default_refresh_interval() -> u64 {
    300
}

fn default_request_timeout() -> u64 {
    10
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = serde_json::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    if config.feed_url.trim().is_empty() {
        return Err(ConfigError::Invalid("feed_url must not be empty".into()));
    }
    if config.api_base.trim().is_empty() {
        return Err(ConfigError::Invalid("api_base must not be empty".into()));
    }
    if config.page_size == 0 {
        return Err(ConfigError::Invalid("page_size must be greater than 0".into()));
    }
    if config.pages == 0 {
        return Err(ConfigError::Invalid("pages must be greater than 0".into()));
    }
    if config.refresh_interval_seconds == 0 {
        return Err(ConfigError::Invalid("refresh_interval_seconds must be greater than 0".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SearchMode;

    #[test]
    fn minimal_config_gets_defaults() {
        let config = parse_config(
            r#"{ "feed_url": "https://api.example.test/vehicles", "api_base": "https://api.example.test/prod" }"#,
        )
        .unwrap();
        assert_eq!(config.site_name, "TrueVin");
        assert_eq!(config.page_size, 15);
        assert_eq!(config.pages, 1);
        assert_eq!(config.sort, SortOrder::Newest);
        assert_eq!(config.search, SearchQuery::default());
        assert_eq!(config.refresh_interval_seconds, 300);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn search_and_sort_labels_are_accepted() {
        let config = parse_config(
            r#"{
                "feed_url": "https://api.example.test/vehicles",
                "api_base": "https://api.example.test/prod",
                "search": { "mode": "VIN", "query": "1HGCM82633A" },
                "sort": "Price: Low to High",
                "detail_stock_numbers": ["40117822"]
            }"#,
        )
        .unwrap();
        assert_eq!(config.search.mode, SearchMode::Vin);
        assert_eq!(config.sort, SortOrder::PriceAsc);
        assert_eq!(config.detail_stock_numbers, vec!["40117822"]);
    }

    #[test]
    fn rejects_bad_values() {
        let zero_page = parse_config(
            r#"{ "feed_url": "https://a", "api_base": "https://b", "page_size": 0 }"#,
        );
        assert!(matches!(zero_page, Err(ConfigError::Invalid(_))));

        let bad_sort = parse_config(r#"{ "feed_url": "https://a", "api_base": "https://b", "sort": "random" }"#);
        assert!(matches!(bad_sort, Err(ConfigError::Json(_))));

        assert!(matches!(load_config("does/not/exist.json"), Err(ConfigError::Io(_))));
    }
}
