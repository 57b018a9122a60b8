//! English taste-group labels resolved to keyword ids.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use dishdive_core::Result;
use dishdive_normalize::canonical::fold_key;
use dishdive_store::{Category, Keyword, SqliteStore};

/// Fragments that flip meaning when preceded by a negation ("not expensive").
const NEGATABLE: &[&str] = &["แพง"];
const NEGATION: &str = "ไม่";

/// How many unmatched fragments to log per group.
const MISSING_SHOWN: usize = 3;

/// On-disk mapping file: `{"flavor": {label: [fragment]}, "cost": {...}}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeywordMapping {
    #[serde(default)]
    pub flavor: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub cost: HashMap<String, Vec<String>>,
}

/// label → keyword ids, for the flavor and cost groups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeywordGroups {
    pub flavor: BTreeMap<String, BTreeSet<i64>>,
    pub cost: BTreeMap<String, BTreeSet<i64>>,
}

impl KeywordGroups {
    /// Read the mapping file and resolve it against the keyword table.
    /// A missing or unreadable file gives empty groups.
    pub fn load(path: &Path, store: &SqliteStore) -> Result<Self> {
        let mapping = match std::fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<KeywordMapping>(&raw) {
                Ok(m) => m,
                Err(e) => {
                    warn!("Invalid keyword mapping {}: {}", path.display(), e);
                    return Ok(Self::default());
                }
            },
            Err(e) => {
                warn!("No keyword mapping at {}: {}", path.display(), e);
                return Ok(Self::default());
            }
        };
        let keywords = store.keywords_by_category(&[Category::Flavor, Category::Cost])?;
        Ok(Self::resolve(&mapping, &keywords))
    }

    /// Substring-match each label's fragments against keyword texts,
    /// longest fragment first. Both sides are folded the way
    /// canonicalization folds tokens.
    pub fn resolve(mapping: &KeywordMapping, keywords: &[Keyword]) -> Self {
        let folded = |category: Category| -> Vec<(i64, String)> {
            keywords
                .iter()
                .filter(|k| k.category == category)
                .map(|k| (k.id, fold_key(&k.text)))
                .collect()
        };
        let flavor_kw = folded(Category::Flavor);
        let cost_kw = folded(Category::Cost);

        let (flavor, missing_flavor) = resolve_groups(&mapping.flavor, &flavor_kw);
        let (cost, missing_cost) = resolve_groups(&mapping.cost, &cost_kw);

        info!(
            "Keyword groups loaded: flavor={}, cost={}",
            flavor.len(),
            cost.len()
        );
        for (kind, missing) in [("flavor", &missing_flavor), ("cost", &missing_cost)] {
            for (label, fragments) in missing {
                let shown: Vec<&str> = fragments.iter().take(MISSING_SHOWN).map(String::as_str).collect();
                info!("Missing {} fragments for {}: {:?}", kind, label, shown);
            }
        }

        Self { flavor, cost }
    }

    pub fn is_empty(&self) -> bool {
        self.flavor.is_empty() && self.cost.is_empty()
    }

    /// Every keyword id in any flavor group.
    pub fn flavor_ids(&self) -> BTreeSet<i64> {
        self.flavor.values().flatten().copied().collect()
    }

    /// Every keyword id in any cost group.
    pub fn cost_ids(&self) -> BTreeSet<i64> {
        self.cost.values().flatten().copied().collect()
    }
}

type Groups = BTreeMap<String, BTreeSet<i64>>;
type Missing = BTreeMap<String, Vec<String>>;

fn resolve_groups(labels: &HashMap<String, Vec<String>>, keywords: &[(i64, String)]) -> (Groups, Missing) {
    let negation = fold_key(NEGATION);
    let negatable: Vec<String> = NEGATABLE.iter().map(|n| fold_key(n)).collect();

    let mut groups = Groups::new();
    let mut missing = Missing::new();
    for (label, fragments) in labels {
        let ids = groups.entry(label.clone()).or_default();

        let mut ordered: Vec<&String> = fragments.iter().collect();
        ordered.sort_by_key(|f| std::cmp::Reverse(f.chars().count()));

        for fragment in ordered {
            let needle = fold_key(fragment);
            if needle.is_empty() {
                continue;
            }
            let guarded = negatable.iter().any(|n| needle.contains(n.as_str()));
            let negated = format!("{}{}", negation, needle);

            let mut matched = false;
            for (id, text) in keywords {
                if !text.contains(&needle) {
                    continue;
                }
                if guarded && text.contains(&negated) {
                    continue;
                }
                ids.insert(*id);
                matched = true;
            }
            if !matched {
                missing.entry(label.clone()).or_default().push(fragment.clone());
            }
        }
    }
    (groups, missing)
}
