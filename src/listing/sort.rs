use crate::model::{SortOrder, VehicleRecord};
use std::cmp::Ordering;

/// Numeric value of a bid such as "$12,500.00".
///
/// Everything but digits and dots is stripped, then the longest leading number is
/// read ("1.2.3" gives 1.2). `None` when nothing numeric is left.
pub fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let mut end = 0;
    let mut seen_dot = false;
    for (i, c) in cleaned.char_indices() {
        if c == '.' {
            if seen_dot {
                break;
            }
            seen_dot = true;
        }
        end = i + 1;
    }

    let number = &cleaned[..end];
    if number.chars().any(|c| c.is_ascii_digit()) {
        number.parse().ok()
    } else {
        None
    }
}

/// Unpriced records rank below every priced one.
fn compare_prices(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
    }
}

/// Stable in-place sort; ties keep their incoming order.
pub fn sort_records(records: &mut Vec<&VehicleRecord>, order: SortOrder) {
    match order {
        SortOrder::Newest => {
            records.sort_by(|a, b| b.timestamp.as_deref().cmp(&a.timestamp.as_deref()));
        }
        SortOrder::PriceAsc | SortOrder::PriceDesc => {
            let mut keyed: Vec<(Option<f64>, &VehicleRecord)> = records
                .iter()
                .map(|r| (r.final_bid.as_deref().and_then(parse_price), *r))
                .collect();
            if order == SortOrder::PriceAsc {
                keyed.sort_by(|a, b| compare_prices(a.0, b.0));
            } else {
                keyed.sort_by(|a, b| compare_prices(b.0, a.0));
            }
            *records = keyed.into_iter().map(|(_, r)| r).collect();
        }
    }
}
