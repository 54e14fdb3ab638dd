use crate::model::VehicleRecord;
use crate::normalizer::{self, CanonicalFields, VIN_PREFIX_LEN, VIN_SUFFIX_LEN};
use crate::utils::{take_prefix, take_suffix};

/// Aligned OCR tail characters that must agree for a long-form VIN hit.
pub const VIN_SUFFIX_MIN_AGREEMENT: usize = 2;

/// VIN queries are compared uppercased and trimmed.
pub fn normalize_vin_query(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Partial-VIN match.
///
/// Queries of 11+ characters must match the page VIN prefix exactly, and at least two
/// of the last six characters must line up with the OCR tail. Shorter queries are a
/// plain substring search over the page VIN followed by the OCR reading.
pub fn matches_vin(record: &VehicleRecord, fields: &CanonicalFields, query: &str) -> bool {
    let vin = fields.get("VIN").unwrap_or("");
    let ocr = record.ocr_result.as_deref().unwrap_or("");
    let query_chars: Vec<char> = query.chars().collect();

    if query_chars.len() < VIN_PREFIX_LEN {
        return format!("{}{}", vin, ocr).to_uppercase().contains(query);
    }

    let query_prefix: String = query_chars[..VIN_PREFIX_LEN].iter().collect();
    let query_suffix = &query_chars[query_chars.len() - VIN_SUFFIX_LEN..];

    if take_prefix(vin, VIN_PREFIX_LEN).to_uppercase() != query_prefix {
        return false;
    }

    let candidate_suffix: Vec<char> = take_suffix(ocr, VIN_SUFFIX_LEN)
        .to_uppercase()
        .chars()
        .collect();
    let agreeing = query_suffix
        .iter()
        .zip(candidate_suffix.iter())
        .filter(|(q, c)| q == c)
        .count();
    agreeing >= VIN_SUFFIX_MIN_AGREEMENT
}

/// Case-insensitive substring match against the derived title.
pub fn matches_name(record: &VehicleRecord, fields: &CanonicalFields, query: &str) -> bool {
    normalizer::title(record, fields)
        .to_lowercase()
        .contains(&query.trim().to_lowercase())
}

/// Case-insensitive substring match against the stock number.
pub fn matches_stock(record: &VehicleRecord, query: &str) -> bool {
    record
        .stock_number
        .to_lowercase()
        .contains(&query.trim().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::normalize;
    use serde_json::json;

    fn candidate() -> VehicleRecord {
        serde_json::from_value(json!({
            "stock_number": "40117822",
            "allpagedata_fields": { "VIN": "1hgcm82633a******", "Year": "2003", "Make": "Honda", "Model": "Accord" },
            "ocr_result": "1HGCM82633A004352"
        }))
        .unwrap()
    }

    fn vin_hit(query: &str) -> bool {
        let v = candidate();
        matches_vin(&v, &normalize(&v), &normalize_vin_query(query))
    }

    #[test]
    fn long_form_accepts_fuzzy_suffix() {
        // 0,0,4 agree at positions 0..2
        assert!(vin_hit("1HGCM82633A004999"));
        assert!(vin_hit("1hgcm82633a004352"));
    }

    #[test]
    fn long_form_rejects_prefix_mismatch_regardless_of_suffix() {
        assert!(!vin_hit("1HGCM82633B004352"));
    }

    #[test]
    fn long_form_needs_two_agreeing_positions() {
        // only position 0 agrees
        assert!(!vin_hit("1HGCM82633A099999"));
        // positions 0 and 5 agree
        assert!(vin_hit("1HGCM82633A099992"));
    }

    #[test]
    fn eleven_char_query_uses_its_own_tail_as_suffix() {
        // suffix is "82633A" against "004352": only position 3 lines up
        assert!(!vin_hit("1HGCM82633A"));
    }

    #[test]
    fn short_ocr_tail_is_compared_index_aligned() {
        let v: VehicleRecord = serde_json::from_value(json!({
            "allpagedata_fields": { "VIN": "1HGCM82633A" },
            "ocr_result": "00"
        }))
        .unwrap();
        assert!(matches_vin(&v, &normalize(&v), "1HGCM82633A00ZZZZ"));
        assert!(!matches_vin(&v, &normalize(&v), "1HGCM82633A0ZZZZZ"));
    }

    #[test]
    fn short_form_is_substring_over_vin_and_ocr() {
        assert!(vin_hit("82633"));
        assert!(vin_hit("**1HG"));
        assert!(vin_hit(" 4352 "));
        assert!(!vin_hit("ZZZ"));
    }

    #[test]
    fn missing_vin_never_matches_long_form() {
        let v: VehicleRecord =
            serde_json::from_value(json!({ "ocr_result": "1HGCM82633A004352" })).unwrap();
        assert!(!matches_vin(&v, &normalize(&v), "1HGCM82633A004352"));
    }

    #[test]
    fn name_and_stock_matching() {
        let v = candidate();
        let fields = normalize(&v);
        assert!(matches_name(&v, &fields, "honda acc"));
        assert!(!matches_name(&v, &fields, "civic"));
        assert!(matches_stock(&v, "4011"));
        assert!(matches_stock(&v, "40117822"));
        assert!(!matches_stock(&v, "999"));
    }
}
