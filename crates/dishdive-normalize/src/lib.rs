//! DishDive Normalize: keyword canonicalization, review-dish linking and
//! aggregate recompute.

pub mod aggregate;
pub mod canonical;
pub mod categorize;
pub mod service;
pub mod types;

pub use aggregate::AggregateRecomputer;
pub use canonical::KeywordCanonicalizer;
pub use categorize::categorize_keyword;
pub use service::NormalizationService;
pub use types::*;
