//! Fixed Thai vocabularies used by rule-based extraction and payload repair.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Generic placeholders that are never accepted as a dish name.
static FORBIDDEN_DISHES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "เมนูรวม",
        "เมนูต่างๆ",
        "อาหารรวม",
        "อาหาร",
        "เมนู",
        "assorted",
        "menu",
        "dishes",
    ]
    .into_iter()
    .collect()
});

/// Ingredient/preparation roots a dish phrase is built from. Longer roots
/// that contain a shorter one (ผัดไทย / ผัด) are listed separately so both
/// get a chance to anchor a phrase.
pub const INGREDIENT_ROOTS: &[&str] = &[
    "ต้มยำ",
    "ลาบ",
    "ส้มตำ",
    "ก้อย",
    "ผัด",
    "แกง",
    "เกี๊ยวซ่า",
    "เกี๊ยว",
    "เต้าหู้",
    "ปลาหมึก",
    "ปลากระพง",
    "คอหมูย่าง",
    "หมูย่าง",
    "ไก่ทอด",
    "ปีกไก่",
    "กระดูกหมู",
    "ผัดไทย",
    "กะเพรา",
    "กะเพร",
    "ข้าวผัด",
    "ปลาเผา",
    "ยำ",
];

pub const COOKING_METHODS: &[&str] = &["ทอด", "ผัด", "ย่าง", "นึ่ง", "ต้ม", "แกง", "เผา", "อบ"];

pub const FLAVOR_PARTS: &[&str] = &["มะนาว", "กระเทียม", "พริก", "ปลาร้า", "สมุนไพร"];

pub const POSITIVE_TOKENS: &[&str] = &[
    "อร่อย",
    "แซ่บ",
    "เด็ด",
    "ดี",
    "หอม",
    "กรอบ",
    "เข้มข้น",
    "สด",
    "นุ่ม",
    "หวาน",
    "กลมกล่อม",
];

pub const NEGATIVE_TOKENS: &[&str] = &[
    "เค็ม",
    "จืด",
    "เหนียว",
    "มันไป",
    "หวานไป",
    "เผ็ดไป",
    "ไม่อร่อย",
    "คาว",
];

pub const CUISINES: &[&str] = &[
    "thai",
    "chinese",
    "japanese",
    "korean",
    "italian",
    "american",
    "vietnamese",
    "indian",
    "mexican",
    "fusion",
    "others",
];

pub const RESTRICTIONS: &[&str] = &["halal", "vegan", "buddhist vegan"];

static ROOT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let alternation = INGREDIENT_ROOTS
        .iter()
        .map(|r| regex::escape(r))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&alternation).unwrap()
});

pub fn is_forbidden_dish(name: &str) -> bool {
    FORBIDDEN_DISHES.contains(name.trim())
}

/// Whether the text mentions any ingredient root at all.
pub fn mentions_dish_root(text: &str) -> bool {
    ROOT_PATTERN.is_match(text)
}

pub fn starts_with_any(s: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|p| s.starts_with(p))
}
