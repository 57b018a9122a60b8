//! Review submission and status boundary.

use std::sync::Arc;

use tracing::{error, info, warn};

use dishdive_core::{Error, Result, WorkerSettings};
use dishdive_extract::{ExtractionService, StructuredExtractor};
use dishdive_llm::CompletionModel;
use dishdive_normalize::NormalizationService;
use dishdive_store::{SourceType, SqliteStore};

use crate::board::JobBoard;
use crate::pipeline::ReviewPipeline;
use crate::types::{ReviewJob, ReviewStatus, ReviewSubmission, SubmitReceipt};
use crate::worker::{start_review_worker, ReviewQueue};

pub struct ReviewService {
    store: Arc<SqliteStore>,
    queue: ReviewQueue,
    board: Arc<JobBoard>,
}

impl ReviewService {
    /// Wire the model-backed pipeline and start the workers. Must be called
    /// inside a tokio runtime.
    pub fn start(
        store: Arc<SqliteStore>,
        model: Arc<dyn CompletionModel>,
        settings: &WorkerSettings,
    ) -> Result<Self> {
        let extractor = StructuredExtractor::with_model(model, settings.extract_timeout());
        let extraction = ExtractionService::new(extractor, store.clone());
        let normalization = Arc::new(NormalizationService::new(store.clone())?);
        let pipeline = Arc::new(ReviewPipeline::new(extraction, normalization));
        Ok(Self::with_pipeline(store, pipeline, settings))
    }

    pub fn with_pipeline(
        store: Arc<SqliteStore>,
        pipeline: Arc<ReviewPipeline>,
        settings: &WorkerSettings,
    ) -> Self {
        let board = Arc::new(JobBoard::default());
        let queue = start_review_worker(pipeline, board.clone(), settings);
        Self { store, queue, board }
    }

    /// Persist the review and its dish link, then queue extraction and
    /// normalization. Succeeds once the review row is written.
    pub async fn submit_review(&self, submission: ReviewSubmission) -> Result<SubmitReceipt> {
        let text = submission.review_text.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput("review text is empty".into()));
        }
        let dish = self
            .store
            .get_dish(submission.dish_id)?
            .ok_or_else(|| Error::NotFound(format!("dish {}", submission.dish_id)))?;
        let restaurant_name = self
            .store
            .get_restaurant(submission.restaurant_id)?
            .map(|r| r.name)
            .unwrap_or_default();

        let review = self.store.add_review(
            submission.user_id,
            submission.dish_id,
            submission.restaurant_id,
            text,
        )?;
        if let Err(e) = self.store.get_or_create_review_dish(
            review.id,
            SourceType::User,
            submission.dish_id,
            submission.restaurant_id,
        ) {
            warn!("Could not link review {} to dish {}: {}", review.id, dish.id, e);
        }

        let job = ReviewJob {
            source_id: review.id,
            source_type: SourceType::User,
            dish_id: dish.id,
            restaurant_id: submission.restaurant_id,
            restaurant_name,
            review_text: review.text.clone(),
            dish_hint: Some(dish.name),
            known_cuisine: dish.cuisine,
            known_restriction: dish.restriction,
        };
        let key = job.key();
        self.board.queued(key);
        if let Err(e) = self.queue.enqueue(job).await {
            error!("Review {} was saved but not queued: {}", review.id, e);
            self.board.fail(key, e.to_string());
        }

        info!("Review {} submitted by user {}", review.id, submission.user_id);
        Ok(SubmitReceipt {
            success: true,
            review_id: review.id,
        })
    }

    pub fn status(&self, source_id: i64, source_type: SourceType) -> Result<ReviewStatus> {
        let record = self.board.get((source_type, source_id));
        Ok(ReviewStatus {
            source_id,
            source_type,
            has_extract: self.store.has_review_extract(source_id, source_type)?,
            has_normalized: self.store.has_review_dish(source_id, source_type)?,
            state: record.as_ref().map(|r| r.state),
            error: record.and_then(|r| r.error),
        })
    }

    /// Raw stored extract payload, for diagnostics.
    pub fn raw_extract(&self, source_id: i64, source_type: SourceType) -> Result<Option<String>> {
        self.store.review_extract(source_id, source_type)
    }

    pub fn store(&self) -> &Arc<SqliteStore> {
        &self.store
    }
}
