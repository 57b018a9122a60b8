//! Extract one review and persist the payload.

use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use dishdive_core::{Error, Result};
use dishdive_store::SqliteStore;

use crate::structured::StructuredExtractor;
use crate::types::{ExtractItem, ExtractRequest, ExtractionInput, ExtractionReport};

pub struct ExtractionService {
    extractor: StructuredExtractor,
    store: Arc<SqliteStore>,
}

impl ExtractionService {
    pub fn new(extractor: StructuredExtractor, store: Arc<SqliteStore>) -> Self {
        Self { extractor, store }
    }

    /// Extract items for one review and upsert them keyed by
    /// (source id, source type). Only the upsert can fail.
    pub async fn run(&self, input: ExtractionInput) -> Result<ExtractionReport> {
        let start = Instant::now();
        let request = ExtractRequest::new(&input.restaurant, &input.review)
            .with_hint(input.dish_hint.clone());

        let extraction = self.extractor.extract(&request).await;
        let mut items = extraction.items;
        apply_known_attributes(
            &mut items,
            input.known_cuisine.as_deref(),
            input.known_restriction.as_deref(),
        );

        let payload = serde_json::to_string(&items)?;
        let store = self.store.clone();
        let (source_id, source_type) = (input.source_id, input.source_type);
        tokio::task::spawn_blocking(move || {
            store.upsert_review_extract(source_id, source_type, &payload)
        })
        .await
        .map_err(|e| Error::Internal(format!("extract upsert task failed: {}", e)))??;

        let report = ExtractionReport {
            source_id,
            items: items.len(),
            source: extraction.source,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            "Extracted {}:{}: {} item(s) via {:?} in {}ms",
            source_type, source_id, report.items, report.source, report.duration_ms
        );
        Ok(report)
    }
}

/// The reviewed dish's own attributes override whatever the model guessed.
pub fn apply_known_attributes(
    items: &mut [ExtractItem],
    cuisine: Option<&str>,
    restriction: Option<&str>,
) {
    let cuisine = cuisine.map(str::trim).filter(|c| !c.is_empty());
    let restriction = restriction.map(str::trim).filter(|r| !r.is_empty());
    for item in items.iter_mut() {
        if let Some(c) = cuisine {
            item.cuisine = Some(c.to_string());
        }
        if let Some(r) = restriction {
            item.restriction = Some(r.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::rules::RuleBasedExtractor;
    use crate::types::ExtractSource;
    use dishdive_store::SourceType;

    fn service() -> (ExtractionService, Arc<SqliteStore>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(SqliteStore::open(dir.path()).unwrap());
        let extractor = StructuredExtractor::new(Arc::new(RuleBasedExtractor), Duration::from_secs(1));
        (ExtractionService::new(extractor, store.clone()), store, dir)
    }

    fn input(review: &str) -> ExtractionInput {
        ExtractionInput {
            source_id: 11,
            source_type: SourceType::User,
            restaurant: "ร้านส้มตำ".into(),
            review: review.into(),
            dish_hint: None,
            known_cuisine: Some("isan".into()),
            known_restriction: Some(" ".into()),
        }
    }

    #[tokio::test]
    async fn test_run_persists_items_with_known_attributes() {
        let (service, store, _dir) = service();
        let report = service.run(input("ส้มตำ อร่อย")).await.unwrap();
        assert_eq!(report.items, 1);
        assert_eq!(report.source, ExtractSource::Primary);

        let raw = store.review_extract(11, SourceType::User).unwrap().unwrap();
        let items: Vec<ExtractItem> = serde_json::from_str(&raw).unwrap();
        assert_eq!(items[0].dish, "ส้มตำ");
        assert_eq!(items[0].cuisine.as_deref(), Some("isan"));
        assert!(items[0].restriction.is_none());
    }

    #[tokio::test]
    async fn test_rerun_overwrites() {
        let (service, store, _dir) = service();
        service.run(input("ส้มตำ อร่อย")).await.unwrap();
        let report = service.run(input("ไม่มีอะไรเลย")).await.unwrap();
        assert_eq!(report.items, 0);
        assert_eq!(store.review_extract(11, SourceType::User).unwrap().as_deref(), Some("[]"));
        assert_eq!(store.get_stats().unwrap().extracts, 1);
    }

    #[test]
    fn test_apply_known_attributes() {
        let mut items = vec![ExtractItem {
            cuisine: Some("chinese".into()),
            restriction: Some("vegan".into()),
            ..ExtractItem::default()
        }];
        apply_known_attributes(&mut items, None, Some("halal"));
        assert_eq!(items[0].cuisine.as_deref(), Some("chinese"));
        assert_eq!(items[0].restriction.as_deref(), Some("halal"));
    }
}
