//! Recommendation types.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use dishdive_store::{Category, Dish, KeywordSetting, Restaurant, RestaurantLocation};

/// Name of the system keyword whose values act as sentiment thresholds.
pub const SENTIMENT_KEYWORD: &str = "sentiment";

/// One dish as seen by the ranker.
#[derive(Debug, Clone)]
pub struct DishCandidate {
    pub dish: Dish,
    pub positive_reviews: i64,
    pub total_reviews: i64,
    /// Keyword ids linked to the dish.
    pub keyword_ids: Vec<i64>,
}

impl DishCandidate {
    /// Share of reviews with a positive keyword, in percent.
    pub fn sentiment_percent(&self) -> f64 {
        if self.total_reviews <= 0 {
            return 0.0;
        }
        self.positive_reviews as f64 / self.total_reviews as f64 * 100.0
    }
}

/// A user's settings, split into per-keyword sets and sentiment thresholds.
#[derive(Debug, Clone, Default)]
pub struct UserTaste {
    pub preferred: HashSet<i64>,
    pub blacklisted: HashSet<i64>,
    /// Preference value of the system "sentiment" keyword, 0 when unset.
    pub sentiment_preference: f64,
    /// Blacklist value of the system "sentiment" keyword, 0 when unset.
    pub sentiment_blacklist: f64,
}

impl UserTaste {
    pub fn from_settings(settings: &[KeywordSetting]) -> Self {
        let mut taste = Self::default();
        for s in settings {
            let is_threshold =
                s.keyword.category == Category::System && s.keyword.text == SENTIMENT_KEYWORD;
            if s.preference > 0.0 {
                if is_threshold {
                    taste.sentiment_preference = s.preference;
                } else {
                    taste.preferred.insert(s.keyword.id);
                }
            }
            if s.blacklist > 0.0 {
                if is_threshold {
                    taste.sentiment_blacklist = s.blacklist;
                } else {
                    taste.blacklisted.insert(s.keyword.id);
                }
            }
        }
        taste
    }
}

/// A ranked dish as returned to callers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedDish {
    pub dish_id: i64,
    pub restaurant_id: i64,
    pub dish_name: String,
    pub cuisine: Option<String>,
    pub sentiment_score: f64,
    pub positive_reviews: i64,
    pub total_reviews: i64,
    pub is_favorite: bool,
    pub recommend_score: f64,
}

/// A restaurant in a search result, with its branches and distances.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantCandidate {
    pub restaurant: Restaurant,
    pub locations: Vec<RestaurantLocation>,
    /// Nearest-branch distance; `None` without a user location or branches.
    pub distance_km: Option<f64>,
    /// Distance after the preference soft-boost.
    pub effective_km: Option<f64>,
    /// Keyword ids sampled from the restaurant's first dishes.
    #[serde(skip)]
    pub sampled_keywords: HashSet<i64>,
}

impl RestaurantCandidate {
    pub fn new(restaurant: Restaurant, locations: Vec<RestaurantLocation>) -> Self {
        Self {
            restaurant,
            locations,
            distance_km: None,
            effective_km: None,
            sampled_keywords: HashSet::new(),
        }
    }
}

/// Restaurant search parameters. Location is used only when both
/// coordinates are present.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RestaurantQuery {
    pub user_id: Option<i64>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub radius: Option<f64>,
}

impl RestaurantQuery {
    pub fn location(&self) -> Option<(f64, f64)> {
        self.lat.zip(self.lng)
    }
}
