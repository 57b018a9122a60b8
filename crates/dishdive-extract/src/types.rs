//! Extracted item schema and extraction outcomes.

use serde::{Deserialize, Deserializer, Serialize};

/// Positive and negative sentiment tokens attached to one dish.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentLists {
    #[serde(default, deserialize_with = "null_as_default")]
    pub positive: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub negative: Vec<String>,
}

/// One dish mentioned in a review.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub restaurant: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dish: String,
    #[serde(default)]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub restriction: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sentiment: SentimentLists,
}

/// Models sometimes send `null` where a list or string belongs.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// What the extractor is asked to read.
#[derive(Debug, Clone, Default)]
pub struct ExtractRequest {
    pub restaurant: String,
    pub review: String,
    pub dish_hint: Option<String>,
}

impl ExtractRequest {
    pub fn new(restaurant: impl Into<String>, review: impl Into<String>) -> Self {
        Self {
            restaurant: restaurant.into(),
            review: review.into(),
            dish_hint: None,
        }
    }

    pub fn with_hint(mut self, hint: Option<String>) -> Self {
        self.dish_hint = hint.filter(|h| !h.trim().is_empty());
        self
    }
}

/// Why the model output was replaced by rule-based output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// Transport, auth or HTTP status failure, or no provider configured.
    Unavailable,
    Timeout,
    EmptyResponse,
    Unparseable,
    /// Parsed fine, but no usable dish name.
    PlaceholderOnly,
}

impl std::fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Unavailable => "unavailable",
            Self::Timeout => "timeout",
            Self::EmptyResponse => "empty response",
            Self::Unparseable => "unparseable",
            Self::PlaceholderOnly => "placeholder-only",
        };
        f.write_str(s)
    }
}

/// Which path produced the final items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "reason", rename_all = "snake_case")]
pub enum ExtractSource {
    /// The primary extractor's own output.
    Primary,
    Rules(FallbackReason),
}

/// Items plus the path that produced them.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub items: Vec<ExtractItem>,
    pub source: ExtractSource,
}

/// One review to extract and persist.
#[derive(Debug, Clone)]
pub struct ExtractionInput {
    pub source_id: i64,
    pub source_type: dishdive_store::SourceType,
    pub restaurant: String,
    pub review: String,
    pub dish_hint: Option<String>,
    pub known_cuisine: Option<String>,
    pub known_restriction: Option<String>,
}

/// Summary of one extraction run.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    #[serde(rename = "sourceId")]
    pub source_id: i64,
    pub items: usize,
    pub source: ExtractSource,
    #[serde(rename = "durationMs")]
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_tolerates_nulls_and_missing_fields() {
        let item: ExtractItem = serde_json::from_str(
            r#"{"restaurant": null, "dish": "ลาบหมู", "sentiment": {"positive": null, "negative": ["เค็ม"]}}"#,
        )
        .unwrap();
        assert_eq!(item.restaurant, "");
        assert_eq!(item.dish, "ลาบหมู");
        assert!(item.cuisine.is_none());
        assert!(item.sentiment.positive.is_empty());
        assert_eq!(item.sentiment.negative, vec!["เค็ม"]);
    }

    #[test]
    fn test_hint_blank_is_dropped() {
        let req = ExtractRequest::new("r", "t").with_hint(Some("  ".into()));
        assert!(req.dish_hint.is_none());
    }
}
