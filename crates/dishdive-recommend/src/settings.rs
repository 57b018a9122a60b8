//! Per-user taste settings, exposed as keyword rows plus English groups.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use dishdive_core::{Error, Result};
use dishdive_store::{Category, PreferenceBlacklist, SqliteStore};

use crate::mapping::KeywordGroups;

pub const ALLOWED_FLAVOR_GROUPS: &[&str] = &["Sweet", "Salty", "Sour", "Spicy", "Oily"];
pub const ALLOWED_COST_GROUPS: &[&str] = &["Cheap", "Moderate", "Expensive"];

/// One keyword setting as shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordSettingView {
    pub keyword_id: i64,
    pub keyword: String,
    pub category: Category,
    pub preference: f64,
    pub blacklist: f64,
    pub is_preferred: bool,
    pub is_blacklisted: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub keywords: Vec<KeywordSettingView>,
    pub flavor_preferred: Vec<String>,
    pub cost_preferred: Vec<String>,
    pub flavor_blacklisted: Vec<String>,
    pub cost_blacklisted: Vec<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordValue {
    pub keyword_id: i64,
    #[serde(default)]
    pub preference: f64,
    #[serde(default)]
    pub blacklist: f64,
}

/// A bulk settings change. Group lists that are absent leave that aspect
/// alone; a present list (even empty) sets every group of that kind.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    #[serde(default)]
    pub settings: Vec<KeywordValue>,
    pub flavor_preferred: Option<Vec<String>>,
    pub flavor_blacklisted: Option<Vec<String>>,
    pub cost_preferred: Option<Vec<String>>,
    pub cost_blacklisted: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Aspect {
    Preference,
    Blacklist,
}

pub struct TasteSettings {
    store: Arc<SqliteStore>,
    groups: Arc<KeywordGroups>,
}

impl TasteSettings {
    pub fn new(store: Arc<SqliteStore>, groups: Arc<KeywordGroups>) -> Self {
        Self { store, groups }
    }

    /// Stored settings for system, cuisine and restriction keywords, and for
    /// flavor/cost keywords that belong to an allowed English group.
    pub fn get(&self, user_id: i64) -> Result<UserSettings> {
        let rows = self.store.user_settings(user_id)?;
        let flavor_of = reverse(&self.groups.flavor);
        let cost_of = reverse(&self.groups.cost);

        let mut out = UserSettings::default();
        let mut flavor_pref = BTreeSet::new();
        let mut flavor_black = BTreeSet::new();
        let mut cost_pref = BTreeSet::new();
        let mut cost_black = BTreeSet::new();

        for row in rows {
            let kw = &row.keyword;
            let labels = match kw.category {
                Category::System | Category::Cuisine | Category::Restriction => None,
                Category::Flavor => {
                    let labels = flavor_of.get(&kw.id);
                    if !any_allowed(labels, ALLOWED_FLAVOR_GROUPS) {
                        continue;
                    }
                    labels
                }
                Category::Cost => {
                    let labels = cost_of.get(&kw.id);
                    if !any_allowed(labels, ALLOWED_COST_GROUPS) {
                        continue;
                    }
                    labels
                }
                Category::Others => continue,
            };

            if let Some(labels) = labels {
                let (pref, black) = if kw.category == Category::Flavor {
                    (&mut flavor_pref, &mut flavor_black)
                } else {
                    (&mut cost_pref, &mut cost_black)
                };
                if row.preference > 0.0 {
                    pref.extend(labels.iter().cloned());
                }
                if row.blacklist > 0.0 {
                    black.extend(labels.iter().cloned());
                }
            }

            out.keywords.push(KeywordSettingView {
                keyword_id: kw.id,
                keyword: kw.text.clone(),
                category: kw.category,
                preference: row.preference,
                blacklist: row.blacklist,
                is_preferred: row.preference > 0.0,
                is_blacklisted: row.blacklist > 0.0,
            });
        }

        out.flavor_preferred = flavor_pref.into_iter().collect();
        out.flavor_blacklisted = flavor_black.into_iter().collect();
        out.cost_preferred = cost_pref.into_iter().collect();
        out.cost_blacklisted = cost_black.into_iter().collect();
        Ok(out)
    }

    /// Apply explicit keyword values, then English group expansions, and
    /// persist everything in one transaction. A group expansion sets only
    /// its own aspect; the other keeps its stored value. Returns rows written.
    pub fn update(&self, user_id: i64, update: &SettingsUpdate) -> Result<usize> {
        let stored: BTreeMap<i64, PreferenceBlacklist> = self
            .store
            .user_settings(user_id)?
            .into_iter()
            .map(|s| {
                let row = PreferenceBlacklist {
                    keyword_id: s.keyword.id,
                    preference: s.preference,
                    blacklist: s.blacklist,
                };
                (row.keyword_id, row)
            })
            .collect();
        let mut pending: BTreeMap<i64, PreferenceBlacklist> = BTreeMap::new();

        for v in &update.settings {
            for value in [v.preference, v.blacklist] {
                if !(0.0..=1.0).contains(&value) {
                    return Err(Error::InvalidInput(format!(
                        "keyword {} value {} is outside 0..1",
                        v.keyword_id, value
                    )));
                }
            }
            let row = entry(&mut pending, &stored, v.keyword_id);
            row.preference = v.preference;
            row.blacklist = v.blacklist;
        }

        let expansions = [
            (&self.groups.flavor, &update.flavor_preferred, Aspect::Preference),
            (&self.groups.flavor, &update.flavor_blacklisted, Aspect::Blacklist),
            (&self.groups.cost, &update.cost_preferred, Aspect::Preference),
            (&self.groups.cost, &update.cost_blacklisted, Aspect::Blacklist),
        ];
        for (groups, selected, aspect) in expansions {
            let Some(selected) = selected else {
                continue;
            };
            for (label, ids) in groups.iter() {
                let value = if selected.iter().any(|s| s == label) { 1.0 } else { 0.0 };
                for id in ids {
                    let row = entry(&mut pending, &stored, *id);
                    match aspect {
                        Aspect::Preference => row.preference = value,
                        Aspect::Blacklist => row.blacklist = value,
                    }
                }
            }
        }

        if pending.is_empty() {
            return Ok(0);
        }
        let rows: Vec<PreferenceBlacklist> = pending.into_values().collect();
        let written = self.store.upsert_user_settings(user_id, &rows)?;
        info!("Updated {} settings for user {}", written, user_id);
        Ok(written)
    }
}

/// Pending row for a keyword, seeded from its stored values.
fn entry<'a>(
    pending: &'a mut BTreeMap<i64, PreferenceBlacklist>,
    stored: &BTreeMap<i64, PreferenceBlacklist>,
    keyword_id: i64,
) -> &'a mut PreferenceBlacklist {
    pending.entry(keyword_id).or_insert_with(|| {
        stored.get(&keyword_id).copied().unwrap_or(PreferenceBlacklist {
            keyword_id,
            preference: 0.0,
            blacklist: 0.0,
        })
    })
}

fn reverse(groups: &BTreeMap<String, BTreeSet<i64>>) -> BTreeMap<i64, Vec<String>> {
    let mut out: BTreeMap<i64, Vec<String>> = BTreeMap::new();
    for (label, ids) in groups {
        for id in ids {
            out.entry(*id).or_default().push(label.clone());
        }
    }
    out
}

fn any_allowed(labels: Option<&Vec<String>>, allowed: &[&str]) -> bool {
    labels.is_some_and(|ls| ls.iter().any(|l| allowed.contains(&l.as_str())))
}
