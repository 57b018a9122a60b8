//! Model-backed extraction composed with the rule-based fallback.
//!
//! Model trouble never escapes this module: every failure degrades to
//! [`RuleBasedExtractor`] output.

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use thiserror::Error;
use tracing::{debug, info, warn};

use dishdive_llm::{CompletionModel, CompletionRequest, LlmError};

use crate::lexicon::mentions_dish_root;
use crate::parse::{needs_fallback, parse_items, repair_items};
use crate::rules::RuleBasedExtractor;
use crate::types::{ExtractItem, ExtractRequest, ExtractSource, Extraction, FallbackReason};

/// Instructions sent with every review.
const SYSTEM_PROMPT: &str = r#"You read Thai restaurant reviews and list the dishes they talk about.

Reply with raw JSON only: an array with one object per dish.

Guidelines:
- Dishes joined by และ, กับ, และก็, หรือ or commas are separate entries.
- Use the most specific dish name the review gives.
- Keep a mentioned dish even when nothing is said about it (empty lists).
- Sentiment words cover taste, texture, doneness, temperature and presentation.
- A dish name needs a real ingredient or preparation (e.g. ปลาหมึกนึ่งมะนาว, ข้าวผัดกุ้ง, กุ้งเผา).
- Never use placeholders such as เมนูรวม, อาหาร or เมนู, and never a bare quality,
  ambience or price word (อร่อย, บรรยากาศดี, ราคาไม่แพง, คุ้มค่า) as a dish.
- No dish in the review means the answer is [].
- Copy the restaurant name exactly into every object.
- cuisine is one of thai, chinese, japanese, korean, italian, american, vietnamese,
  indian, mexican, fusion, others.
- restriction is one of "halal", "vegan", "buddhist vegan" or null.

Object shape:
{"restaurant": "...", "dish": "...", "cuisine": "...", "restriction": null,
 "sentiment": {"positive": [], "negative": []}}"#;

/// Why an extractor produced no items.
#[derive(Error, Debug)]
pub enum ExtractFailure {
    #[error("model unavailable: {0}")]
    Unavailable(LlmError),

    #[error("model returned nothing")]
    Empty,

    #[error("model output could not be parsed")]
    Unparseable,

    #[error("model call exceeded {0:?}")]
    Timeout(Duration),
}

impl From<LlmError> for ExtractFailure {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::EmptyResponse => ExtractFailure::Empty,
            other => ExtractFailure::Unavailable(other),
        }
    }
}

impl ExtractFailure {
    fn reason(&self) -> FallbackReason {
        match self {
            ExtractFailure::Unavailable(_) => FallbackReason::Unavailable,
            ExtractFailure::Empty => FallbackReason::EmptyResponse,
            ExtractFailure::Unparseable => FallbackReason::Unparseable,
            ExtractFailure::Timeout(_) => FallbackReason::Timeout,
        }
    }
}

/// Text in, candidate items out, or a failure.
pub trait Extractor: Send + Sync {
    fn extract<'a>(
        &'a self,
        request: &'a ExtractRequest,
    ) -> BoxFuture<'a, Result<Vec<ExtractItem>, ExtractFailure>>;
}

/// Asks a completion model and parses its answer.
pub struct ModelExtractor {
    model: Arc<dyn CompletionModel>,
}

impl ModelExtractor {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self { model }
    }

    fn build_request(request: &ExtractRequest) -> CompletionRequest {
        let review = match &request.dish_hint {
            Some(hint) => format!("(dish mentioned: {}) {}", hint, request.review),
            None => request.review.clone(),
        };
        let user = format!("Restaurant: {}\nReview: {}", request.restaurant, review);
        CompletionRequest::new(SYSTEM_PROMPT, user).json()
    }
}

impl Extractor for ModelExtractor {
    fn extract<'a>(
        &'a self,
        request: &'a ExtractRequest,
    ) -> BoxFuture<'a, Result<Vec<ExtractItem>, ExtractFailure>> {
        Box::pin(async move {
            let completion = Self::build_request(request);
            let raw = self.model.complete(&completion).await?;
            if raw.trim().is_empty() {
                return Err(ExtractFailure::Empty);
            }
            let mut items = parse_items(&raw).ok_or(ExtractFailure::Unparseable)?;
            repair_items(&mut items, &request.restaurant);
            Ok(items)
        })
    }
}

/// Primary extractor behind a timeout, with rule-based fallback.
pub struct StructuredExtractor {
    primary: Arc<dyn Extractor>,
    rules: RuleBasedExtractor,
    timeout: Duration,
}

impl StructuredExtractor {
    pub fn new(primary: Arc<dyn Extractor>, timeout: Duration) -> Self {
        Self {
            primary,
            rules: RuleBasedExtractor,
            timeout,
        }
    }

    /// Model-backed extraction over a completion model.
    pub fn with_model(model: Arc<dyn CompletionModel>, timeout: Duration) -> Self {
        Self::new(Arc::new(ModelExtractor::new(model)), timeout)
    }

    /// Never fails. Transport, timeout and empty-response failures return
    /// rule output as is; unparseable or placeholder-only output returns
    /// rule output with the dish hint naming the first item.
    pub async fn extract(&self, request: &ExtractRequest) -> Extraction {
        let outcome = match tokio::time::timeout(self.timeout, self.primary.extract(request)).await {
            Ok(result) => result,
            Err(_) => Err(ExtractFailure::Timeout(self.timeout)),
        };

        match outcome {
            Ok(items) if !needs_fallback(&items) => {
                debug!("Model extracted {} item(s)", items.len());
                Extraction {
                    items,
                    source: ExtractSource::Primary,
                }
            }
            Ok(_) => {
                if mentions_dish_root(&request.review) {
                    info!("Model found no usable dish but the review mentions one, using rules");
                }
                self.fallback(request, FallbackReason::PlaceholderOnly, true)
            }
            Err(failure) => {
                let reason = failure.reason();
                match &failure {
                    ExtractFailure::Unavailable(LlmError::NotConfigured) => {
                        debug!("No model configured, using rules")
                    }
                    _ => warn!("Extraction model failed ({}): {}", reason, failure),
                }
                let override_hint = reason == FallbackReason::Unparseable;
                self.fallback(request, reason, override_hint)
            }
        }
    }

    fn fallback(&self, request: &ExtractRequest, reason: FallbackReason, override_hint: bool) -> Extraction {
        let mut items = self.rules.extract(&request.restaurant, &request.review);
        if override_hint {
            if let (Some(hint), Some(first)) = (&request.dish_hint, items.first_mut()) {
                first.dish = hint.clone();
            }
        }
        info!("Rule-based fallback ({}): {} item(s)", reason, items.len());
        Extraction {
            items,
            source: ExtractSource::Rules(reason),
        }
    }
}
