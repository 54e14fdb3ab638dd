pub mod fetcher;
pub mod state;
pub mod traits;

pub use fetcher::HttpFeed;
pub use state::{FeedState, FetchTicket};
pub use traits::VehicleFeed;
