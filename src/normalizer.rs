use crate::model::{FieldSource, VehicleRecord};
use crate::utils::{take_prefix, take_suffix};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Characters of the structural VIN taken from the page data.
pub const VIN_PREFIX_LEN: usize = 11;
/// Characters of the OCR reading that complete the VIN.
pub const VIN_SUFFIX_LEN: usize = 6;

/// Flattened vehicle attributes merged from every schema a record carries.
///
/// Writes are first-writer-wins: a key is only filled while it is absent or empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalFields(BTreeMap<String, String>);

impl CanonicalFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Value for `key` unless it is missing or empty.
    pub fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Stores `value` if `key` has no usable value yet. Returns whether it was written.
    pub fn fill(&mut self, key: &str, value: String) -> bool {
        match self.0.get(key) {
            Some(existing) if !existing.is_empty() => false,
            _ => {
                self.0.insert(key.to_string(), value);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Merges `allpagedata_fields`, then `details`, then `newdata` into one mapping.
/// Never fails: undecodable sources contribute nothing.
pub fn normalize(record: &VehicleRecord) -> CanonicalFields {
    let mut fields = legacy_fields(record);
    if let Some(source) = &record.newdata {
        merge_source(&mut fields, source, "newdata", &record.stock_number);
    }
    fields
}

/// Fields from the older schema only (`allpagedata_fields` and `details`).
pub fn legacy_fields(record: &VehicleRecord) -> CanonicalFields {
    let mut fields = CanonicalFields::new();
    if let Some(map) = record.allpagedata_fields.as_ref().filter(|m| !m.is_empty()) {
        merge_mapping(&mut fields, map);
    }
    if let Some(source) = &record.details {
        merge_source(&mut fields, source, "details", &record.stock_number);
    }
    fields
}

/// Fields from the newest schema only (`newdata`).
pub fn fresh_fields(record: &VehicleRecord) -> CanonicalFields {
    let mut fields = CanonicalFields::new();
    if let Some(source) = &record.newdata {
        merge_source(&mut fields, source, "newdata", &record.stock_number);
    }
    fields
}

fn merge_source(fields: &mut CanonicalFields, source: &FieldSource, origin: &str, stock: &str) {
    match source {
        FieldSource::Mapping(map) => merge_mapping(fields, map),
        FieldSource::Pairs(items) => merge_pairs(fields, items),
        FieldSource::Encoded(text) => merge_encoded(fields, text, origin, stock),
        FieldSource::Unrecognized(value) => {
            debug!("Ignoring {} of stock {}: unsupported shape {}", origin, stock, value);
        }
    }
}

fn merge_mapping(fields: &mut CanonicalFields, map: &Map<String, Value>) {
    for (key, value) in map {
        if let Some(text) = flatten_value(value) {
            fields.fill(key, text);
        }
    }
}

fn merge_pairs(fields: &mut CanonicalFields, items: &[Value]) {
    for item in items {
        if let Value::Object(map) = item {
            merge_mapping(fields, map);
        }
    }
}

fn merge_encoded(fields: &mut CanonicalFields, text: &str, origin: &str, stock: &str) {
    match serde_json::from_str::<FieldSource>(text) {
        Ok(FieldSource::Mapping(map)) => merge_mapping(fields, &map),
        Ok(FieldSource::Pairs(items)) => merge_pairs(fields, &items),
        Ok(_) => debug!("Ignoring {} of stock {}: encoded value is not an object or array", origin, stock),
        Err(e) => debug!("Ignoring malformed {} of stock {}: {}", origin, stock, e),
    }
}

fn flatten_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(_) | Value::Number(_) => Some(value.to_string()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

/// Display title: `VehicleTitle`, else "Year Make Model", else the stock number.
pub fn title(record: &VehicleRecord, fields: &CanonicalFields) -> String {
    if let Some(title) = fields.non_empty("VehicleTitle") {
        return title.to_string();
    }
    match (
        fields.non_empty("Year"),
        fields.non_empty("Make"),
        fields.non_empty("Model"),
    ) {
        (Some(year), Some(make), Some(model)) => format!("{} {} {}", year, make, model),
        _ => record.stock_number.clone(),
    }
}

/// "Year Make Model" with missing parts left blank.
pub fn subtitle(fields: &CanonicalFields) -> String {
    format!(
        "{} {} {}",
        fields.get("Year").unwrap_or(""),
        fields.get("Make").unwrap_or(""),
        fields.get("Model").unwrap_or("")
    )
    .trim()
    .to_string()
}

/// First 11 characters of the page VIN joined with the last 6 of the OCR reading.
pub fn composed_vin(record: &VehicleRecord, fields: &CanonicalFields) -> String {
    let prefix = take_prefix(fields.get("VIN").unwrap_or(""), VIN_PREFIX_LEN);
    let suffix = take_suffix(record.ocr_result.as_deref().unwrap_or(""), VIN_SUFFIX_LEN);
    prefix + &suffix
}
