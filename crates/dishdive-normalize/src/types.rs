//! Normalization and recompute reports.

use serde::Serialize;

use dishdive_store::AggregateCounts;

/// Result of one aggregate recompute pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AggregateReport {
    #[serde(flatten)]
    pub counts: AggregateCounts,
    #[serde(rename = "durationMs")]
    pub duration_ms: u64,
}

/// Result of normalizing one review's extract.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NormalizationReport {
    #[serde(rename = "sourceId")]
    pub source_id: i64,
    /// True when there was no usable payload and nothing was written.
    pub skipped: bool,
    #[serde(rename = "reviewDishId", skip_serializing_if = "Option::is_none")]
    pub review_dish_id: Option<i64>,
    pub items: usize,
    #[serde(rename = "keywordsCreated")]
    pub keywords_created: usize,
    #[serde(rename = "linksCreated")]
    pub links_created: usize,
    #[serde(rename = "frequenciesBumped")]
    pub frequencies_bumped: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregates: Option<AggregateReport>,
    #[serde(rename = "durationMs")]
    pub duration_ms: u64,
}
