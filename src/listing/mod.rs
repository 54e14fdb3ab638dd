// Listing module: eligibility, search matching, ordering and paging of the vehicle grid.

pub mod eligibility;
pub mod matcher;
pub mod sort;
pub mod view;

// Re-export the pipeline entry points for ease of use.
pub use view::{build_view, Pagination};
