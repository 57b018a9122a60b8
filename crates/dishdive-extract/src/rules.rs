//! Deterministic dish/sentiment extraction from ingredient roots.

use std::collections::HashSet;

use futures::future::BoxFuture;

use crate::lexicon::{
    is_forbidden_dish, starts_with_any, COOKING_METHODS, FLAVOR_PARTS, INGREDIENT_ROOTS,
    NEGATIVE_TOKENS, POSITIVE_TOKENS,
};
use crate::structured::{ExtractFailure, Extractor};
use crate::types::{ExtractItem, ExtractRequest, SentimentLists};

/// Characters scanned for sentiment tokens after each dish occurrence.
const SENTIMENT_WINDOW_CHARS: usize = 40;
/// Method/flavor tokens that may extend a root.
const MAX_EXTENSIONS: usize = 3;
const TOKEN_TRIM: &[char] = &['.', ',', '!', '?', ':', ';', '"', '\t'];

#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedExtractor;

impl RuleBasedExtractor {
    /// Extract candidate dishes with nearby sentiment tokens.
    /// Candidates keep first-found order (root order, then position).
    pub fn extract(&self, restaurant: &str, review: &str) -> Vec<ExtractItem> {
        let mut candidates = rooted_phrases(review);
        if candidates.is_empty() {
            candidates = INGREDIENT_ROOTS
                .iter()
                .filter(|root| review.contains(*root) && !is_forbidden_dish(root))
                .map(|root| root.to_string())
                .collect();
        }

        candidates
            .into_iter()
            .map(|dish| ExtractItem {
                restaurant: restaurant.to_string(),
                sentiment: window_sentiment(review, &dish),
                dish,
                cuisine: Some("thai".to_string()),
                restriction: None,
            })
            .collect()
    }
}

impl Extractor for RuleBasedExtractor {
    fn extract<'a>(
        &'a self,
        request: &'a ExtractRequest,
    ) -> BoxFuture<'a, Result<Vec<ExtractItem>, ExtractFailure>> {
        let items = RuleBasedExtractor::extract(self, &request.restaurant, &request.review);
        Box::pin(async move { Ok(items) })
    }
}

/// Every root occurrence, extended by up to three following method/flavor
/// tokens, with glued-on sentiment words trimmed off the end.
fn rooted_phrases(review: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut phrases = Vec::new();

    for root in INGREDIENT_ROOTS {
        for (start, _) in review.match_indices(root) {
            let tail = &review[start + root.len()..];
            let extensions: Vec<&str> = tail
                .split_whitespace()
                .map(|t| t.trim_matches(TOKEN_TRIM))
                .filter(|t| !t.is_empty())
                .take_while(|t| starts_with_any(t, COOKING_METHODS) || starts_with_any(t, FLAVOR_PARTS))
                .take(MAX_EXTENSIONS)
                .collect();

            let mut phrase = format!("{}{}", root, extensions.concat());
            for word in POSITIVE_TOKENS.iter().chain(NEGATIVE_TOKENS) {
                if let Some(stripped) = phrase.strip_suffix(word) {
                    phrase = stripped.to_string();
                }
            }
            let phrase = phrase.trim();

            if !phrase.is_empty() && !is_forbidden_dish(phrase) && seen.insert(phrase.to_string()) {
                phrases.push(phrase.to_string());
            }
        }
    }
    phrases
}

/// Sentiment tokens found within the window after any occurrence of `dish`.
fn window_sentiment(review: &str, dish: &str) -> SentimentLists {
    let mut lists = SentimentLists::default();
    for (start, _) in review.match_indices(dish) {
        let after = &review[start + dish.len()..];
        let window: String = after.chars().take(SENTIMENT_WINDOW_CHARS).collect();
        for token in POSITIVE_TOKENS {
            if window.contains(token) && !lists.positive.iter().any(|t| t == token) {
                lists.positive.push(token.to_string());
            }
        }
        for token in NEGATIVE_TOKENS {
            if window.contains(token) && !lists.negative.iter().any(|t| t == token) {
                lists.negative.push(token.to_string());
            }
        }
    }
    lists
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dishes(items: &[ExtractItem]) -> Vec<&str> {
        items.iter().map(|i| i.dish.as_str()).collect()
    }

    #[test]
    fn test_root_extended_by_method_tokens() {
        let items = RuleBasedExtractor.extract("ร้านป้า", "สั่งปลาหมึกนึ่งมะนาว อร่อยมาก");
        assert_eq!(dishes(&items), vec!["ปลาหมึกนึ่งมะนาว"]);
        let item = &items[0];
        assert_eq!(item.restaurant, "ร้านป้า");
        assert_eq!(item.cuisine.as_deref(), Some("thai"));
        assert!(item.restriction.is_none());
        assert_eq!(item.sentiment.positive, vec!["อร่อย"]);
    }

    #[test]
    fn test_extension_stops_at_first_other_token() {
        let items = RuleBasedExtractor.extract("r", "ไก่ทอด กรอบ ทอด");
        assert_eq!(dishes(&items), vec!["ไก่ทอด"]);
        assert_eq!(items[0].sentiment.positive, vec!["กรอบ"]);
    }

    #[test]
    fn test_extension_capped_at_three() {
        let items = RuleBasedExtractor.extract("r", "ลาบ ทอด ผัด ย่าง อบ");
        assert!(dishes(&items).contains(&"ลาบทอดผัดย่าง"));
    }

    #[test]
    fn test_glued_sentiment_trimmed() {
        let items = RuleBasedExtractor.extract("r", "ส้มตำปลาร้าแซ่บ");
        assert_eq!(dishes(&items), vec!["ส้มตำปลาร้า"]);
        assert_eq!(items[0].sentiment.positive, vec!["แซ่บ"]);
    }

    #[test]
    fn test_spaced_phrase_gets_no_window() {
        // The joined phrase never occurs verbatim, so nothing follows it.
        let items = RuleBasedExtractor.extract("r", "ส้มตำ ปลาร้า แซ่บ");
        assert_eq!(dishes(&items), vec!["ส้มตำปลาร้า"]);
        assert!(items[0].sentiment.positive.is_empty());
    }

    #[test]
    fn test_overlapping_roots_and_negatives() {
        let items = RuleBasedExtractor.extract("r", "ผัดไทยเค็มไป ไม่อร่อย");
        let names = dishes(&items);
        assert_eq!(names, vec!["ผัด", "ผัดไทย"]);
        let pad_thai = &items[1];
        assert_eq!(pad_thai.sentiment.negative, vec!["เค็ม", "ไม่อร่อย"]);
        // "อร่อย" sits inside "ไม่อร่อย" and is picked up too.
        assert_eq!(pad_thai.sentiment.positive, vec!["อร่อย"]);
    }

    #[test]
    fn test_sentiment_window_is_bounded() {
        let filler = "ก".repeat(45);
        let review = format!("แกง{}อร่อย", filler);
        let items = RuleBasedExtractor.extract("r", &review);
        assert_eq!(dishes(&items), vec!["แกง"]);
        assert!(items[0].sentiment.positive.is_empty());
    }

    #[test]
    fn test_no_roots_no_items() {
        assert!(RuleBasedExtractor.extract("r", "บรรยากาศดี บริการดี").is_empty());
        assert!(RuleBasedExtractor.extract("r", "").is_empty());
    }
}
