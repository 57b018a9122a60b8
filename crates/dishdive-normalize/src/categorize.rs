//! Category/polarity lookup for canonical keyword text.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use dishdive_store::{Category, Sentiment};

use crate::canonical::fold_key;

const COST_POSITIVE: &[&str] = &[
    "ถูก",
    "ไม่แพง",
    "คุ้ม",
    "คุ้มค่า",
    "คุ้มราคา",
    "ราคาดี",
    "ราคาถูก",
    "ราคาคุ้มค่า",
    "คุ้มจริง",
    "คุ้มมาก",
    "ราคาสมเหตุสมผล",
    "สมราคา",
];

const COST_NEGATIVE: &[&str] = &[
    "แพง",
    "ราคาแพง",
    "ไม่คุ้ม",
    "ไม่คุ้มค่า",
    "เกินราคา",
    "ราคาแรง",
    "แพงไป",
    "แพงมาก",
];

const FLAVOR_POSITIVE: &[&str] = &[
    "อร่อย",
    "ดี",
    "ดีมาก",
    "เด็ด",
    "แซ่บ",
    "กรอบ",
    "นุ่ม",
    "หอม",
    "เข้มข้น",
    "สด",
    "หวาน",
    "กลมกล่อม",
    "เด้ง",
    "ฉ่ำ",
    "ละมุน",
    "หอมนุ่ม",
];

const FLAVOR_NEGATIVE: &[&str] = &[
    "เค็ม",
    "จืด",
    "คาว",
    "เหนียว",
    "หวานไป",
    "เผ็ดไป",
    "ไม่อร่อย",
    "มันไป",
    "เลี่ยน",
    "ไหม้",
    "ดิบ",
    "แฉะ",
];

/// Words that mark a token as price-related when no table entry matches.
const COST_HINTS: &[&str] = &["ราคา", "คุ้ม", "แพง", "ถูก"];

/// Folded table entry → (category, polarity). Tokens arrive already folded
/// by canonicalization, so the tables are folded the same way. The first
/// table listing a folded form wins.
static TABLE: Lazy<HashMap<String, (Category, Sentiment)>> = Lazy::new(|| {
    let mut table = HashMap::new();
    let groups = [
        (COST_POSITIVE, Category::Cost, Sentiment::Positive),
        (COST_NEGATIVE, Category::Cost, Sentiment::Negative),
        (FLAVOR_POSITIVE, Category::Flavor, Sentiment::Positive),
        (FLAVOR_NEGATIVE, Category::Flavor, Sentiment::Negative),
    ];
    for (words, category, sentiment) in groups {
        for word in words {
            table.entry(fold_key(word)).or_insert((category, sentiment));
        }
    }
    table
});

static FOLDED_COST_HINTS: Lazy<Vec<String>> =
    Lazy::new(|| COST_HINTS.iter().map(|h| fold_key(h)).collect());

/// Category and polarity for a keyword. Unknown price-like tokens are cost,
/// anything else is others; both take the caller's default polarity.
pub fn categorize_keyword(token: &str, default: Sentiment) -> (Category, Sentiment) {
    let key = fold_key(token);
    if key.is_empty() {
        return (Category::Others, default);
    }
    if let Some(hit) = TABLE.get(&key) {
        return *hit;
    }
    if FOLDED_COST_HINTS.iter().any(|hint| key.contains(hint.as_str())) {
        return (Category::Cost, default);
    }
    (Category::Others, default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_hits_with_and_without_marks() {
        assert_eq!(
            categorize_keyword("อร่อย", Sentiment::Negative),
            (Category::Flavor, Sentiment::Positive)
        );
        assert_eq!(
            categorize_keyword("อรอย", Sentiment::Negative),
            (Category::Flavor, Sentiment::Positive)
        );
        assert_eq!(
            categorize_keyword("ราคาแพง", Sentiment::Positive),
            (Category::Cost, Sentiment::Negative)
        );
        assert_eq!(
            categorize_keyword("คุ้มค่า", Sentiment::Negative),
            (Category::Cost, Sentiment::Positive)
        );
        assert_eq!(
            categorize_keyword("เลี่ยน", Sentiment::Positive),
            (Category::Flavor, Sentiment::Negative)
        );
    }

    #[test]
    fn test_cost_substring_takes_default() {
        assert_eq!(
            categorize_keyword("ราคาโอเค", Sentiment::Positive),
            (Category::Cost, Sentiment::Positive)
        );
        assert_eq!(
            categorize_keyword("แพงนิดหน่อย", Sentiment::Neutral),
            (Category::Cost, Sentiment::Neutral)
        );
    }

    #[test]
    fn test_others_fallback() {
        assert_eq!(
            categorize_keyword("บรรยากาศ", Sentiment::Negative),
            (Category::Others, Sentiment::Negative)
        );
        assert_eq!(
            categorize_keyword("", Sentiment::Positive),
            (Category::Others, Sentiment::Positive)
        );
    }
}
