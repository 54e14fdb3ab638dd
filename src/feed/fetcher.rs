use crate::config::AppConfig;
use crate::feed::traits::VehicleFeed;
use crate::model::{FeedError, VehicleRecord};
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) TrueVinListing/0.1";
const API_KEY_HEADER: &str = "x-api-key";

pub struct HttpFeed {
    client: Client,
    feed_url: String,
    api_base: String,
    api_key: Option<String>,
}

impl HttpFeed {
    pub fn new(
        feed_url: String,
        api_base: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, FeedError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            feed_url,
            api_base,
            api_key: api_key.filter(|k| !k.is_empty()),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, FeedError> {
        Self::new(
            config.feed_url.clone(),
            config.api_base.clone(),
            config.api_key.clone(),
            Duration::from_secs(config.request_timeout_seconds),
        )
    }

    /// `{api_base}/stocks/{stock}` with the stock number percent-encoded as one segment.
    pub fn stock_url(&self, stock_number: &str) -> Result<Url, FeedError> {
        let mut url = Url::parse(&self.api_base).map_err(|e| FeedError::Url(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| FeedError::Url(format!("{} cannot be a base url", self.api_base)))?
            .pop_if_empty()
            .push("stocks")
            .push(stock_number);
        Ok(url)
    }

    async fn get_body(&self, url: Url) -> Result<String, FeedError> {
        let mut request = self.client.get(url.clone());
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("❌ Feed responded [{}] for {}", status, url);
            return Err(FeedError::Status(status));
        }
        Ok(response.text().await?)
    }
}

#[async_trait::async_trait]
impl VehicleFeed for HttpFeed {
    async fn fetch_vehicles(&self) -> Result<Vec<VehicleRecord>, FeedError> {
        let url = Url::parse(&self.feed_url).map_err(|e| FeedError::Url(e.to_string()))?;
        let body = self.get_body(url).await?;
        let records = decode_feed(&body)?;
        info!("📦 Fetched {} vehicle records", records.len());
        Ok(records)
    }

    async fn fetch_stock(&self, stock_number: &str) -> Result<Option<VehicleRecord>, FeedError> {
        let url = self.stock_url(stock_number)?;
        let body = self.get_body(url).await?;
        Ok(decode_feed(&body)?.into_iter().next())
    }
}

/// Decodes a feed body: a JSON array of vehicle objects.
///
/// Entries are decoded one by one; an entry that does not fit the record shape is
/// logged and skipped instead of failing the whole feed.
pub fn decode_feed(body: &str) -> Result<Vec<VehicleRecord>, FeedError> {
    let value: Value = serde_json::from_str(body)?;
    let Value::Array(items) = value else {
        return Err(FeedError::Shape("expected a JSON array of vehicles".into()));
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<VehicleRecord>(item) {
            Ok(record) => records.push(record),
            Err(e) => warn!("Skipping feed entry #{}: {}", index, e),
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::build_view;
    use crate::model::{SearchQuery, SortOrder};
    use crate::normalizer;

    fn feed(api_base: &str) -> HttpFeed {
        HttpFeed::new(
            "https://api.example.test/vehicles".into(),
            api_base.into(),
            Some(String::new()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn decode_skips_entries_that_do_not_fit() {
        let body = r#"[
            {"stock_number": "A1", "final_bid": "$1,000", "allpagedata_passed": true},
            42,
            "A2",
            {"stock_number": "A3", "details": "{broken"}
        ]"#;
        let records = decode_feed(body).unwrap();
        let stocks: Vec<&str> = records.iter().map(|r| r.stock_number.as_str()).collect();
        assert_eq!(stocks, vec!["A1", "A3"]);
    }

    #[test]
    fn non_object_allpagedata_fields_keeps_the_vehicle() {
        let body = r#"[
            {"stock_number": "B1", "allpagedata_passed": true, "final_bid": "$2,000",
             "allpagedata_fields": [], "timestamp": "2024-02-01"},
            {"stock_number": "B2", "newdata_passed": true, "final_bid": "$3,000",
             "allpagedata_fields": "", "timestamp": "2024-01-01",
             "newdata": {"Year": "2020", "Make": "Honda", "Model": "Civic"}},
            {"stock_number": "B3", "allpagedata_passed": true, "final_bid": "$4,000",
             "allpagedata_fields": 7}
        ]"#;
        let records = decode_feed(body).unwrap();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.allpagedata_fields.is_none()));

        let view = build_view(&records, &SearchQuery::default(), SortOrder::Newest);
        let stocks: Vec<&str> = view.iter().map(|r| r.stock_number.as_str()).collect();
        assert_eq!(stocks, vec!["B1", "B2", "B3"]);
        assert_eq!(normalizer::title(view[1], &normalizer::normalize(view[1])), "2020 Honda Civic");
    }

    #[test]
    fn decode_rejects_non_array_bodies() {
        assert!(matches!(decode_feed(r#"{"items": []}"#), Err(FeedError::Shape(_))));
        assert!(matches!(decode_feed("<html>"), Err(FeedError::Json(_))));
        assert!(decode_feed("[]").unwrap().is_empty());
    }

    #[tokio::test]
    async fn stock_url_encodes_the_stock_number() {
        let url = feed("https://api.example.test/prod").stock_url("40117 822/B").unwrap();
        assert_eq!(url.as_str(), "https://api.example.test/prod/stocks/40117%20822%2FB");

        let trailing = feed("https://api.example.test/prod/").stock_url("1").unwrap();
        assert_eq!(trailing.as_str(), "https://api.example.test/prod/stocks/1");
    }

    #[tokio::test]
    async fn empty_api_key_is_not_sent() {
        assert!(feed("https://api.example.test/prod").api_key.is_none());
        assert!(matches!(
            feed("not a url").stock_url("1"),
            Err(FeedError::Url(_))
        ));
    }
}
