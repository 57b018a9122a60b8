//! Runtime types: submissions, background jobs and their status.

use serde::{Deserialize, Serialize};

use dishdive_extract::ExtractionInput;
use dishdive_store::SourceType;

/// A review as submitted by a user.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewSubmission {
    pub user_id: i64,
    pub dish_id: i64,
    pub restaurant_id: i64,
    pub review_text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitReceipt {
    pub success: bool,
    pub review_id: i64,
}

/// One review handed to the background workers.
#[derive(Debug, Clone)]
pub struct ReviewJob {
    pub source_id: i64,
    pub source_type: SourceType,
    pub dish_id: i64,
    pub restaurant_id: i64,
    pub restaurant_name: String,
    pub review_text: String,
    pub dish_hint: Option<String>,
    pub known_cuisine: Option<String>,
    pub known_restriction: Option<String>,
}

impl ReviewJob {
    pub fn key(&self) -> JobKey {
        (self.source_type, self.source_id)
    }

    pub fn extraction_input(&self) -> ExtractionInput {
        ExtractionInput {
            source_id: self.source_id,
            source_type: self.source_type,
            restaurant: self.restaurant_name.clone(),
            review: self.review_text.clone(),
            dish_hint: self.dish_hint.clone(),
            known_cuisine: self.known_cuisine.clone(),
            known_restriction: self.known_restriction.clone(),
        }
    }
}

pub type JobKey = (SourceType, i64);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Pending,
    Extracted,
    Normalized,
    Failed,
}

impl JobState {
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Normalized | Self::Failed)
    }
}

/// In-memory progress of one background job.
#[derive(Debug, Clone, Serialize)]
pub struct JobRecord {
    pub state: JobState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub queued_at: i64,
    pub updated_at: i64,
    /// Order in which jobs finished, for pruning.
    #[serde(skip)]
    pub(crate) finished_seq: Option<u64>,
}

/// Diagnostic status for one review.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewStatus {
    pub source_id: i64,
    pub source_type: SourceType,
    pub has_extract: bool,
    pub has_normalized: bool,
    /// `None` when this process never saw the job.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<JobState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
