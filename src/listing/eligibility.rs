use crate::model::VehicleRecord;

/// Sentinel the auction feed uses for "no bid recorded".
pub const NO_BID_SENTINEL: &str = "N/A";

/// A record is listed once either ingestion pipeline passed it and it carries a real bid.
pub fn is_eligible(record: &VehicleRecord) -> bool {
    let passed = record.allpagedata_passed || record.newdata_passed;
    let has_bid = record
        .final_bid
        .as_deref()
        .is_some_and(|bid| !bid.is_empty() && !bid.contains(NO_BID_SENTINEL));
    passed && has_bid
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> VehicleRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn sentinel_bid_is_excluded() {
        let v = record(json!({ "allpagedata_passed": true, "final_bid": "N/A" }));
        assert!(!is_eligible(&v));
        let v = record(json!({ "allpagedata_passed": true, "final_bid": "$N/A USD" }));
        assert!(!is_eligible(&v));
    }

    #[test]
    fn newdata_pass_with_bid_is_included() {
        let v = record(json!({ "newdata_passed": true, "final_bid": "$12,500" }));
        assert!(is_eligible(&v));
    }

    #[test]
    fn needs_a_pass_flag_and_a_bid() {
        assert!(!is_eligible(&record(json!({ "final_bid": "$900" }))));
        assert!(!is_eligible(&record(json!({ "allpagedata_passed": true }))));
        assert!(!is_eligible(&record(json!({ "allpagedata_passed": true, "final_bid": "" }))));
        assert!(is_eligible(&record(json!({ "allpagedata_passed": "true", "final_bid": 900 }))));
    }
}
