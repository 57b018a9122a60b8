//! DishDive Extract: dish and sentiment extraction from review text.
//!
//! A completion model does the primary extraction; a rule-based scanner over
//! Thai ingredient roots takes over whenever the model fails or answers with
//! nothing usable.

pub mod lexicon;
pub mod parse;
pub mod rules;
pub mod service;
pub mod structured;
pub mod types;

pub use parse::{needs_fallback, parse_items};
pub use rules::RuleBasedExtractor;
pub use service::ExtractionService;
pub use structured::{ExtractFailure, Extractor, ModelExtractor, StructuredExtractor};
pub use types::*;
