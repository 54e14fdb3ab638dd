// Core types: VehicleRecord, FieldSource, search settings, feed errors
use crate::utils::{lenient_flag, lenient_map, lenient_string, lenient_text, string_list};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One vehicle as delivered by the feed API. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VehicleRecord {
    #[serde(default, deserialize_with = "lenient_text")]
    pub stock_number: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub final_bid: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub ocr_result: Option<String>,
    #[serde(default, deserialize_with = "lenient_map")]
    pub allpagedata_fields: Option<Map<String, Value>>,
    #[serde(default)]
    pub details: Option<FieldSource>,
    #[serde(default)]
    pub newdata: Option<FieldSource>,
    #[serde(default, deserialize_with = "string_list")]
    pub allpagedata_images: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub images: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub one_image: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub html_s3_url: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub allpagedata_3sixty: Vec<String>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub allpagedata_passed: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub newdata_passed: bool,
    #[serde(default, deserialize_with = "lenient_string")]
    pub vin_display: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub stock_number_href: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub timestamp: Option<String>,
}

/// The shapes `details` and `newdata` are seen in.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldSource {
    /// Plain object of field name to value.
    Mapping(Map<String, Value>),
    /// Legacy encoding: `[{"Year": "2020"}, {"Make": "Honda"}]`.
    Pairs(Vec<Value>),
    /// Either of the above, JSON-encoded into a string.
    Encoded(String),
    Unrecognized(Value),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum SearchMode {
    #[default]
    Stock,
    Vin,
    Name,
}

impl FromStr for SearchMode {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stock" => Ok(SearchMode::Stock),
            "vin" => Ok(SearchMode::Vin),
            "name" => Ok(SearchMode::Name),
            _ => Err(ParseSettingError::SearchMode(s.to_string())),
        }
    }
}

impl TryFrom<String> for SearchMode {
    type Error = ParseSettingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::Stock => write!(f, "Stock"),
            SearchMode::Vin => write!(f, "VIN"),
            SearchMode::Name => write!(f, "Name"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum SortOrder {
    #[default]
    Newest,
    PriceAsc,
    PriceDesc,
}

impl FromStr for SortOrder {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(SortOrder::Newest),
            "priceasc" | "price: low to high" => Ok(SortOrder::PriceAsc),
            "pricedesc" | "price: high to low" => Ok(SortOrder::PriceDesc),
            _ => Err(ParseSettingError::SortOrder(s.to_string())),
        }
    }
}

impl TryFrom<String> for SortOrder {
    type Error = ParseSettingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Newest => write!(f, "Newest"),
            SortOrder::PriceAsc => write!(f, "Price: Low to High"),
            SortOrder::PriceDesc => write!(f, "Price: High to Low"),
        }
    }
}

/// What the user typed and which field it targets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub mode: SearchMode,
    #[serde(default)]
    pub query: String,
}

impl SearchQuery {
    #[cfg(test)]
    pub fn new(mode: SearchMode, query: impl Into<String>) -> Self {
        Self {
            mode,
            query: query.into(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseSettingError {
    #[error("unknown search mode '{0}' (expected Stock, VIN or Name)")]
    SearchMode(String),
    #[error("unknown sort order '{0}' (expected Newest, PriceAsc or PriceDesc)")]
    SortOrder(String),
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid url: {0}")]
    Url(String),
    #[error("feed responded with status {0}")]
    Status(reqwest::StatusCode),
    #[error("feed body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unexpected feed shape: {0}")]
    Shape(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_each_field_source_shape() {
        let record: VehicleRecord = serde_json::from_value(json!({
            "stock_number": 40117,
            "details": "[{\"VIN\":\"X\"}]",
            "newdata": [{"Year": "2020"}],
            "allpagedata_passed": "true",
            "newdata_passed": null,
            "final_bid": 12500,
            "allpagedata_images": null,
            "allpagedata_3sixty": ["a.jpg", 3, "b.jpg"]
        }))
        .unwrap();

        assert_eq!(record.stock_number, "40117");
        assert_eq!(record.final_bid.as_deref(), Some("12500"));
        assert!(record.allpagedata_passed);
        assert!(!record.newdata_passed);
        assert!(matches!(record.details, Some(FieldSource::Encoded(_))));
        assert!(matches!(record.newdata, Some(FieldSource::Pairs(_))));
        assert!(record.allpagedata_images.is_empty());
        assert_eq!(record.allpagedata_3sixty, vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn odd_field_source_is_kept_as_unrecognized() {
        let record: VehicleRecord =
            serde_json::from_value(json!({ "details": 42, "newdata": {"Make": "Honda"} })).unwrap();
        assert!(matches!(record.details, Some(FieldSource::Unrecognized(_))));
        assert!(matches!(record.newdata, Some(FieldSource::Mapping(_))));
    }

    #[test]
    fn settings_parse_case_insensitively() {
        assert_eq!("vin".parse::<SearchMode>(), Ok(SearchMode::Vin));
        assert_eq!(" Name ".parse::<SearchMode>(), Ok(SearchMode::Name));
        assert_eq!("Price: High to Low".parse::<SortOrder>(), Ok(SortOrder::PriceDesc));
        assert_eq!("priceasc".parse::<SortOrder>(), Ok(SortOrder::PriceAsc));
        assert!("cheapest".parse::<SortOrder>().is_err());
    }
}
