//! Set-based recompute of derived dish and restaurant fields.

use std::sync::Arc;

use tracing::info;

use dishdive_core::Result;
use dishdive_store::SqliteStore;

use crate::types::AggregateReport;

/// Recomputes every dish's review counts and every restaurant's menu size,
/// majority cuisine and majority restriction from the link tables. Fully
/// derived, so running it again on unchanged data changes nothing.
#[derive(Clone)]
pub struct AggregateRecomputer {
    store: Arc<SqliteStore>,
}

impl AggregateRecomputer {
    pub fn new(store: Arc<SqliteStore>) -> Self {
        Self { store }
    }

    pub fn run(&self) -> Result<AggregateReport> {
        let start = std::time::Instant::now();
        let counts = self.store.recompute_aggregates()?;
        let report = AggregateReport {
            counts,
            duration_ms: start.elapsed().as_millis() as u64,
        };
        info!(
            "Aggregates recomputed: dishes={}, restaurants={}, cuisines={}, restrictions={}, duration={}ms",
            counts.dishes_scored,
            counts.menus_sized,
            counts.cuisines_assigned,
            counts.restrictions_assigned,
            report.duration_ms
        );
        Ok(report)
    }
}
