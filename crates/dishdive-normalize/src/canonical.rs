//! Sentiment token canonicalization against the keyword alias table.

use std::collections::HashMap;

use dishdive_core::Result;
use dishdive_store::SqliteStore;

/// Thai vowel and tone marks dropped during canonicalization:
/// U+0E31, U+0E34..=U+0E39 and U+0E47..=U+0E4E.
fn is_stripped_mark(c: char) -> bool {
    matches!(c, '\u{0E31}' | '\u{0E34}'..='\u{0E39}' | '\u{0E47}'..='\u{0E4E}')
}

/// Trim, collapse internal whitespace and drop combining marks.
/// Casing is preserved.
pub fn fold(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .filter(|c| !is_stripped_mark(*c))
        .collect()
}

/// Lookup key: [`fold`] plus lower-casing.
pub fn fold_key(raw: &str) -> String {
    fold(raw).to_lowercase()
}

/// Immutable alias map, loaded once per service instance.
#[derive(Debug, Clone, Default)]
pub struct KeywordCanonicalizer {
    aliases: HashMap<String, String>,
}

impl KeywordCanonicalizer {
    /// Build from (alternative text, canonical text) pairs. Alternative
    /// texts are folded the same way incoming tokens are.
    pub fn from_pairs<I, A, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (A, C)>,
        A: AsRef<str>,
        C: Into<String>,
    {
        let aliases = pairs
            .into_iter()
            .map(|(alt, canonical)| (fold_key(alt.as_ref()), canonical.into()))
            .filter(|(alt, _)| !alt.is_empty())
            .collect();
        Self { aliases }
    }

    pub fn load(store: &SqliteStore) -> Result<Self> {
        Ok(Self::from_pairs(store.keyword_aliases()?))
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Canonical text for a raw token, or an empty string for blank input.
    pub fn canonicalize(&self, raw: &str) -> String {
        let folded = fold(raw);
        if folded.is_empty() {
            return folded;
        }
        match self.aliases.get(&folded.to_lowercase()) {
            Some(canonical) => canonical.clone(),
            None => folded,
        }
    }
}
