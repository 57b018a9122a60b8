//! Runtime: review submission, the background extract → normalize →
//! recompute workers, and the status boundary.

pub mod board;
pub mod pipeline;
pub mod service;
pub mod types;
pub mod worker;

pub use board::JobBoard;
pub use pipeline::ReviewPipeline;
pub use service::ReviewService;
pub use types::*;
pub use worker::{start_review_worker, ReviewQueue};
