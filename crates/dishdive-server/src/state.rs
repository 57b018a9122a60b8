//! Shared application state.

use std::sync::Arc;

use dishdive_core::{DishDiveConfig, Result};
use dishdive_llm::CompletionModel;
use dishdive_recommend::{KeywordGroups, Recommender, TasteSettings};
use dishdive_runtime::ReviewService;
use dishdive_store::SqliteStore;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: DishDiveConfig,
    pub store: Arc<SqliteStore>,
    pub reviews: ReviewService,
    pub recommender: Recommender,
    pub settings: TasteSettings,
}

impl AppState {
    /// Resolve the keyword groups once and start the review workers.
    pub fn new(
        config: DishDiveConfig,
        store: Arc<SqliteStore>,
        model: Arc<dyn CompletionModel>,
    ) -> Result<Self> {
        let groups = Arc::new(KeywordGroups::load(
            &config.data_paths.keyword_mapping_file,
            &store,
        )?);
        let reviews = ReviewService::start(store.clone(), model, &config.workers)?;
        Ok(Self {
            recommender: Recommender::new(store.clone(), groups.clone()),
            settings: TasteSettings::new(store.clone(), groups),
            reviews,
            store,
            config,
        })
    }
}
