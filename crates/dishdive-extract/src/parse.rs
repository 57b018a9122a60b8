//! Parsing and repair of untrusted model output.

use serde::Deserialize;

use crate::lexicon::{is_forbidden_dish, CUISINES, RESTRICTIONS};
use crate::types::ExtractItem;

#[derive(Deserialize)]
struct ItemsWrapper {
    #[serde(default)]
    items: Vec<ExtractItem>,
}

/// Parse raw model text into items. Tries, in order: the whole text as an
/// array, the span from the first `[` to the last `]`, then an object with
/// an `items` field. `None` when nothing parses.
pub fn parse_items(raw: &str) -> Option<Vec<ExtractItem>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(items) = serde_json::from_str::<Vec<ExtractItem>>(s) {
        return Some(items);
    }

    if let (Some(i), Some(j)) = (s.find('['), s.rfind(']')) {
        if j > i {
            if let Ok(items) = serde_json::from_str::<Vec<ExtractItem>>(&s[i..=j]) {
                return Some(items);
            }
        }
    }

    serde_json::from_str::<ItemsWrapper>(s).ok().map(|w| w.items)
}

/// True when the items carry no usable dish: the list is empty, or every
/// non-empty dish name is a generic placeholder.
pub fn needs_fallback(items: &[ExtractItem]) -> bool {
    items
        .iter()
        .map(|item| item.dish.trim())
        .filter(|dish| !dish.is_empty())
        .all(is_forbidden_dish)
}

/// Normalize parsed items in place: trim dish names, fill a missing
/// restaurant, and clamp cuisine/restriction to their fixed sets.
pub fn repair_items(items: &mut [ExtractItem], restaurant: &str) {
    for item in items.iter_mut() {
        item.dish = item.dish.trim().to_string();
        if item.restaurant.trim().is_empty() {
            item.restaurant = restaurant.to_string();
        }
        item.cuisine = item.cuisine.as_deref().and_then(repair_cuisine);
        item.restriction = item.restriction.as_deref().and_then(repair_restriction);
    }
}

fn repair_cuisine(raw: &str) -> Option<String> {
    let value = raw.trim().to_lowercase();
    if value.is_empty() {
        None
    } else if CUISINES.contains(&value.as_str()) {
        Some(value)
    } else {
        Some("others".to_string())
    }
}

fn repair_restriction(raw: &str) -> Option<String> {
    let value = raw.trim().to_lowercase();
    RESTRICTIONS.contains(&value.as_str()).then_some(value)
}
