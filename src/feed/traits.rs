use crate::model::{FeedError, VehicleRecord};

#[async_trait::async_trait]
pub trait VehicleFeed: Send + Sync {
    /// Full listing feed.
    async fn fetch_vehicles(&self) -> Result<Vec<VehicleRecord>, FeedError>;
    /// Single vehicle by stock number, `None` when the API knows nothing about it.
    async fn fetch_stock(&self, stock_number: &str) -> Result<Option<VehicleRecord>, FeedError>;
}
