use crate::model::VehicleRecord;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

/// Order in which fetches were started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

/// Latest applied feed snapshot.
///
/// Fetches can finish out of order; a result whose ticket is older than the one
/// already applied is stale and gets dropped.
#[derive(Debug, Default)]
pub struct FeedState {
    issued: u64,
    applied: Option<FetchTicket>,
    records: Arc<Vec<VehicleRecord>>,
    fetched_at: Option<DateTime<Utc>>,
}

impl FeedState {
    pub fn issue(&mut self) -> FetchTicket {
        self.issued += 1;
        FetchTicket(self.issued)
    }

    /// Stores `records` unless a newer fetch already landed. Returns whether it was applied.
    pub fn apply(
        &mut self,
        ticket: FetchTicket,
        records: Vec<VehicleRecord>,
        fetched_at: DateTime<Utc>,
    ) -> bool {
        if self.applied.is_some_and(|latest| ticket <= latest) {
            debug!("Dropping stale fetch {:?} (applied {:?})", ticket, self.applied);
            return false;
        }
        self.applied = Some(ticket);
        self.records = Arc::new(records);
        self.fetched_at = Some(fetched_at);
        true
    }

    pub fn records(&self) -> Arc<Vec<VehicleRecord>> {
        self.records.clone()
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// True while no newer fetch has been started after `ticket`.
    pub fn is_latest(&self, ticket: FetchTicket) -> bool {
        ticket.0 == self.issued
    }
}
