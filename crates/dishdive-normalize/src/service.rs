//! Turn one review's stored extract into keyword links and frequencies.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use dishdive_core::Result;
use dishdive_extract::ExtractItem;
use dishdive_store::{Sentiment, SourceType, SqliteStore};

use crate::aggregate::AggregateRecomputer;
use crate::canonical::KeywordCanonicalizer;
use crate::categorize::categorize_keyword;
use crate::types::NormalizationReport;

pub struct NormalizationService {
    store: Arc<SqliteStore>,
    canonicalizer: KeywordCanonicalizer,
    recomputer: AggregateRecomputer,
}

impl NormalizationService {
    /// Load the alias table once and keep it for the life of the service.
    pub fn new(store: Arc<SqliteStore>) -> Result<Self> {
        let canonicalizer = KeywordCanonicalizer::load(&store)?;
        info!("Normalization ready with {} keyword aliases", canonicalizer.len());
        Ok(Self::with_canonicalizer(store, canonicalizer))
    }

    pub fn with_canonicalizer(store: Arc<SqliteStore>, canonicalizer: KeywordCanonicalizer) -> Self {
        Self {
            recomputer: AggregateRecomputer::new(store.clone()),
            store,
            canonicalizer,
        }
    }

    pub fn recomputer(&self) -> &AggregateRecomputer {
        &self.recomputer
    }

    /// Normalize the extract stored for (source type, source id) against
    /// the given dish, then recompute aggregates. A missing or malformed
    /// payload is a successful no-op.
    ///
    /// A dish↔keyword frequency is bumped only when this review's link to
    /// the keyword is new, so re-running on the same payload leaves
    /// frequencies unchanged.
    pub fn run(
        &self,
        source_type: SourceType,
        source_id: i64,
        dish_id: i64,
        res_id: i64,
    ) -> Result<NormalizationReport> {
        let start = Instant::now();
        let mut report = NormalizationReport {
            source_id,
            ..NormalizationReport::default()
        };

        let items = match self.load_items(source_type, source_id)? {
            Some(items) => items,
            None => {
                report.skipped = true;
                debug!("Nothing to normalize for {}:{}", source_type, source_id);
                return Ok(report);
            }
        };
        report.items = items.len();

        let (review_dish, _) = self
            .store
            .get_or_create_review_dish(source_id, source_type, dish_id, res_id)?;
        report.review_dish_id = Some(review_dish.id);

        for item in &items {
            let tokens = item
                .sentiment
                .positive
                .iter()
                .map(|t| (t, Sentiment::Positive))
                .chain(item.sentiment.negative.iter().map(|t| (t, Sentiment::Negative)));

            for (token, polarity) in tokens {
                let text = self.canonicalizer.canonicalize(token);
                if text.is_empty() {
                    continue;
                }
                let (category, sentiment) = categorize_keyword(&text, polarity);
                let (keyword, created) = self.store.get_or_create_keyword(&text, category, sentiment)?;
                if created {
                    report.keywords_created += 1;
                }
                if self.store.link_and_bump(review_dish.id, dish_id, keyword.id)? {
                    report.links_created += 1;
                    report.frequencies_bumped += 1;
                }
            }
        }

        report.aggregates = Some(self.recomputer.run()?);
        report.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            "Normalized {}:{} → dish {}: items={}, keywords_created={}, links_created={}, bumped={}, duration={}ms",
            source_type,
            source_id,
            dish_id,
            report.items,
            report.keywords_created,
            report.links_created,
            report.frequencies_bumped,
            report.duration_ms
        );
        Ok(report)
    }

    /// Stored items, or `None` when there is no row or it does not parse.
    fn load_items(&self, source_type: SourceType, source_id: i64) -> Result<Option<Vec<ExtractItem>>> {
        let Some(raw) = self.store.review_extract(source_id, source_type)? else {
            return Ok(None);
        };
        match serde_json::from_str::<Vec<ExtractItem>>(raw.trim()) {
            Ok(items) => Ok(Some(items)),
            Err(e) => {
                debug!("Ignoring malformed extract for {}:{}: {}", source_type, source_id, e);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dishdive_store::Category;
    use tempfile::TempDir;

    struct Fixture {
        store: Arc<SqliteStore>,
        service: NormalizationService,
        res: i64,
        dish: i64,
        _dir: TempDir,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(SqliteStore::open(dir.path()).unwrap());
        let res = store.add_restaurant("Jeh O", Some("thai"), None).unwrap();
        let dish = store.add_dish(res, "มาม่าต้มยำ", Some("thai"), None).unwrap();
        let (chili, _) = store
            .get_or_create_keyword("พริก", Category::Others, Sentiment::Positive)
            .unwrap();
        store.add_keyword_alias(chili.id, "ซอสพริก").unwrap();
        let service = NormalizationService::new(store.clone()).unwrap();
        Fixture {
            store,
            service,
            res,
            dish,
            _dir: dir,
        }
    }

    const PAYLOAD: &str = r#"[{"restaurant":"Jeh O","dish":"มาม่าต้มยำ",
        "sentiment":{"positive":["อร่อย"," ซอสพริก ","",  "อร่อย"],"negative":["เค็ม"]}}]"#;

    #[test]
    fn test_run_links_keywords_and_recomputes() {
        let f = fixture();
        f.store.upsert_review_extract(1, SourceType::User, PAYLOAD).unwrap();

        let report = f.service.run(SourceType::User, 1, f.dish, f.res).unwrap();
        assert!(!report.skipped);
        assert_eq!(report.items, 1);
        // อร่อย and เค็ม are new; พริก came through its alias.
        assert_eq!(report.keywords_created, 2);
        assert_eq!(report.links_created, 3);
        assert_eq!(report.frequencies_bumped, 3);
        assert!(report.aggregates.is_some());

        let chili = f.store.find_keyword("พริก", Category::Others).unwrap().unwrap();
        assert_eq!(f.store.dish_keyword_frequency(f.dish, chili.id).unwrap(), Some(1));
        let salty = f.store.find_keyword("เคม", Category::Flavor).unwrap().unwrap();
        assert_eq!(salty.sentiment, Sentiment::Negative);

        // One review with both a positive and a negative keyword.
        assert_eq!(f.store.review_counts(f.dish).unwrap(), (1, 1, 1));
    }

    #[test]
    fn test_rerun_does_not_double_frequencies() {
        let f = fixture();
        f.store.upsert_review_extract(1, SourceType::User, PAYLOAD).unwrap();
        f.service.run(SourceType::User, 1, f.dish, f.res).unwrap();

        let again = f.service.run(SourceType::User, 1, f.dish, f.res).unwrap();
        assert_eq!(again.keywords_created, 0);
        assert_eq!(again.links_created, 0);
        assert_eq!(again.frequencies_bumped, 0);

        for kw in f.store.dish_keywords(f.dish).unwrap() {
            assert_eq!(f.store.dish_keyword_frequency(f.dish, kw).unwrap(), Some(1));
        }
        assert_eq!(f.store.review_counts(f.dish).unwrap(), (1, 1, 1));
    }

    #[test]
    fn test_rerun_after_failed_write_counts_once() {
        let f = fixture();
        f.store.upsert_review_extract(1, SourceType::User, PAYLOAD).unwrap();

        let side = rusqlite::Connection::open(f.store.db_path()).unwrap();
        side.execute_batch(
            "CREATE TRIGGER block_bump BEFORE INSERT ON dish_keywords
             BEGIN SELECT RAISE(ABORT, 'busy'); END;",
        )
        .unwrap();
        assert!(f.service.run(SourceType::User, 1, f.dish, f.res).is_err());
        side.execute_batch("DROP TRIGGER block_bump;").unwrap();

        let report = f.service.run(SourceType::User, 1, f.dish, f.res).unwrap();
        assert_eq!(report.links_created, 3);
        assert_eq!(report.frequencies_bumped, 3);

        let keywords = f.store.dish_keywords(f.dish).unwrap();
        assert_eq!(keywords.len(), 3);
        for kw in keywords {
            assert_eq!(f.store.dish_keyword_frequency(f.dish, kw).unwrap(), Some(1));
        }
        assert!(f.store.has_review_dish(1, SourceType::User).unwrap());
        assert_eq!(f.store.review_counts(f.dish).unwrap(), (1, 1, 1));
    }

    #[test]
    fn test_second_review_bumps_shared_keyword() {
        let f = fixture();
        f.store.upsert_review_extract(1, SourceType::User, PAYLOAD).unwrap();
        f.store.upsert_review_extract(2, SourceType::User, PAYLOAD).unwrap();
        f.service.run(SourceType::User, 1, f.dish, f.res).unwrap();
        f.service.run(SourceType::User, 2, f.dish, f.res).unwrap();

        let chili = f.store.find_keyword("พริก", Category::Others).unwrap().unwrap();
        assert_eq!(f.store.dish_keyword_frequency(f.dish, chili.id).unwrap(), Some(2));
        assert_eq!(f.store.review_counts(f.dish).unwrap(), (2, 2, 2));
    }

    #[test]
    fn test_malformed_or_missing_payload_is_noop() {
        let f = fixture();
        let report = f.service.run(SourceType::Web, 9, f.dish, f.res).unwrap();
        assert!(report.skipped);

        f.store.upsert_review_extract(9, SourceType::Web, "not json").unwrap();
        let report = f.service.run(SourceType::Web, 9, f.dish, f.res).unwrap();
        assert!(report.skipped);
        assert!(report.aggregates.is_none());
        assert!(!f.store.has_review_dish(9, SourceType::Web).unwrap());
    }

    #[test]
    fn test_empty_payload_still_links_and_recomputes() {
        let f = fixture();
        f.store.upsert_review_extract(4, SourceType::User, "[]").unwrap();
        let report = f.service.run(SourceType::User, 4, f.dish, f.res).unwrap();
        assert!(!report.skipped);
        assert!(f.store.has_review_dish(4, SourceType::User).unwrap());
        assert_eq!(f.store.review_counts(f.dish).unwrap(), (0, 0, 1));
    }
}
