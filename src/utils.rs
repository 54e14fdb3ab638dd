// Utility functions
use scraper::Html;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Text of a JSON scalar: strings as-is, numbers in their JSON form.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Optional text field that tolerates numbers and odd types on the wire.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_text))
}

/// Like [`lenient_string`], but an absent value is the empty string.
pub fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

/// Pipeline pass flags arrive as `true` or as the string `"true"`.
pub fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(flag)) => flag,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    })
}

/// List of URLs; `null` and non-string entries are dropped.
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Object field; anything that is not a JSON object reads as absent.
pub fn lenient_map<'de, D>(deserializer: D) -> Result<Option<Map<String, Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Object(map)) => Some(map),
        _ => None,
    })
}

/// First `n` characters of `text`.
pub fn take_prefix(text: &str, n: usize) -> String {
    text.chars().take(n).collect()
}

/// Last `n` characters of `text` (the whole string if it is shorter).
pub fn take_suffix(text: &str, n: usize) -> String {
    let len = text.chars().count();
    text.chars().skip(len.saturating_sub(n)).collect()
}

/// Reduces an HTML fragment to its visible text with whitespace collapsed.
pub fn html_to_text(fragment: &str) -> String {
    let document = Html::parse_fragment(fragment);
    let raw: String = document.root_element().text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
