//! extract → normalize → recompute for one review.

use std::sync::Arc;

use tracing::debug;

use dishdive_core::{Error, Result};
use dishdive_extract::ExtractionService;
use dishdive_normalize::{NormalizationReport, NormalizationService};

use crate::board::JobBoard;
use crate::types::{JobState, ReviewJob};

pub struct ReviewPipeline {
    extraction: ExtractionService,
    normalization: Arc<NormalizationService>,
}

impl ReviewPipeline {
    pub fn new(extraction: ExtractionService, normalization: Arc<NormalizationService>) -> Self {
        Self {
            extraction,
            normalization,
        }
    }

    /// Run every step in order, recording progress on the board. The
    /// caller records failures.
    pub async fn process(&self, job: &ReviewJob, board: &JobBoard) -> Result<NormalizationReport> {
        let key = job.key();
        let extracted = self.extraction.run(job.extraction_input()).await?;
        board.advance(key, JobState::Extracted);
        debug!("Review {} extracted ({} items)", job.source_id, extracted.items);

        let normalization = self.normalization.clone();
        let (source_type, source_id, dish_id, res_id) =
            (job.source_type, job.source_id, job.dish_id, job.restaurant_id);
        let report = tokio::task::spawn_blocking(move || {
            normalization.run(source_type, source_id, dish_id, res_id)
        })
        .await
        .map_err(|e| Error::Internal(format!("normalization task failed: {}", e)))??;

        board.advance(key, JobState::Normalized);
        Ok(report)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::time::Duration;

    use futures::future::BoxFuture;
    use tempfile::TempDir;

    use dishdive_extract::StructuredExtractor;
    use dishdive_llm::{CompletionModel, CompletionRequest, LlmError};
    use dishdive_store::{Category, SourceType, SqliteStore};

    pub(crate) const MODEL_REPLY: &str = r#"[{"restaurant":"Jeh O","dish":"มาม่าต้มยำ",
        "cuisine":"thai","restriction":null,
        "sentiment":{"positive":["อร่อย"],"negative":["เค็ม"]}}]"#;

    /// Answers every request with a fixed reply, or never answers.
    pub(crate) struct FixedModel(pub Option<&'static str>);

    impl CompletionModel for FixedModel {
        fn complete<'a>(
            &'a self,
            _request: &'a CompletionRequest,
        ) -> BoxFuture<'a, std::result::Result<String, LlmError>> {
            match self.0 {
                Some(reply) => Box::pin(async move { Ok(reply.to_string()) }),
                None => Box::pin(futures::future::pending()),
            }
        }
    }

    pub(crate) struct Fixture {
        pub store: Arc<SqliteStore>,
        pub res: i64,
        pub dish: i64,
        pub _dir: TempDir,
    }

    pub(crate) fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(SqliteStore::open(dir.path()).unwrap());
        let res = store.add_restaurant("Jeh O", Some("thai"), None).unwrap();
        let dish = store.add_dish(res, "มาม่าต้มยำ", Some("thai"), None).unwrap();
        Fixture {
            store,
            res,
            dish,
            _dir: dir,
        }
    }

    pub(crate) fn pipeline(store: &Arc<SqliteStore>, model: FixedModel) -> ReviewPipeline {
        let extractor = StructuredExtractor::with_model(Arc::new(model), Duration::from_secs(30));
        let extraction = ExtractionService::new(extractor, store.clone());
        let normalization = Arc::new(NormalizationService::new(store.clone()).unwrap());
        ReviewPipeline::new(extraction, normalization)
    }

    #[tokio::test]
    async fn test_process_runs_every_step() {
        let f = fixture();
        let review = f.store.add_review(1, f.dish, f.res, "มาม่าต้มยำ อร่อย แต่เค็ม").unwrap();
        let job = ReviewJob {
            source_id: review.id,
            source_type: SourceType::User,
            dish_id: f.dish,
            restaurant_id: f.res,
            restaurant_name: "Jeh O".into(),
            review_text: review.text.clone(),
            dish_hint: Some("มาม่าต้มยำ".into()),
            known_cuisine: Some("thai".into()),
            known_restriction: None,
        };
        let board = JobBoard::default();
        board.queued(job.key());

        let report = pipeline(&f.store, FixedModel(Some(MODEL_REPLY)))
            .process(&job, &board)
            .await
            .unwrap();
        assert_eq!(report.links_created, 2);
        assert_eq!(board.get(job.key()).unwrap().state, JobState::Normalized);
        assert!(f.store.has_review_extract(review.id, SourceType::User).unwrap());
        assert!(f.store.find_keyword("อรอย", Category::Flavor).unwrap().is_some());
        assert_eq!(f.store.review_counts(f.dish).unwrap(), (1, 1, 1));
    }
}
