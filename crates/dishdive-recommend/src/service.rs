//! Store-backed dish recommendation and restaurant search.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use dishdive_core::Result;
use dishdive_store::{Category, KeywordSetting, SqliteStore};

use crate::booster::{DistanceSoftBooster, PreferredGroups};
use crate::geo::nearest_km;
use crate::mapping::KeywordGroups;
use crate::ranker::RecommendationRanker;
use crate::types::{DishCandidate, RankedDish, RestaurantCandidate, RestaurantQuery, UserTaste};

/// Dishes per restaurant sampled for the distance soft-boost.
pub const SAMPLED_DISHES: usize = 5;

pub struct Recommender {
    store: Arc<SqliteStore>,
    groups: Arc<KeywordGroups>,
}

impl Recommender {
    pub fn new(store: Arc<SqliteStore>, groups: Arc<KeywordGroups>) -> Self {
        Self { store, groups }
    }

    /// Ranked dishes for a user: every dish, one restaurant's dishes, or
    /// dishes whose name contains `name_query`.
    pub fn recommend_dishes(
        &self,
        user_id: i64,
        res_id: Option<i64>,
        name_query: Option<&str>,
    ) -> Result<Vec<RankedDish>> {
        let dishes = self.store.list_dishes(res_id, name_query)?;
        let taste = UserTaste::from_settings(&self.store.user_settings(user_id)?);
        let favorites = self.store.favorites(user_id)?;

        let mut candidates = Vec::with_capacity(dishes.len());
        for dish in dishes {
            let (positive, _, total) = self.store.review_counts(dish.id)?;
            let keyword_ids = self.store.dish_keywords(dish.id)?;
            candidates.push(DishCandidate {
                dish,
                positive_reviews: positive,
                total_reviews: total,
                keyword_ids,
            });
        }

        let considered = candidates.len();
        let ranked = RecommendationRanker::rank(&taste, &favorites, candidates);
        debug!(
            "Ranked {} of {} dishes for user {}",
            ranked.len(),
            considered,
            user_id
        );
        Ok(ranked)
    }

    /// Restaurants minus blacklisted cuisines, ordered by preference-boosted
    /// distance when a location is given.
    pub fn search_restaurants(&self, query: &RestaurantQuery) -> Result<Vec<RestaurantCandidate>> {
        let settings = match query.user_id {
            Some(user) => self.store.user_settings(user)?,
            None => Vec::new(),
        };
        let banned: HashSet<String> = settings
            .iter()
            .filter(|s| s.blacklist > 0.0 && s.keyword.category == Category::Cuisine)
            .map(|s| s.keyword.text.to_lowercase())
            .collect();

        let mut results = Vec::new();
        for restaurant in self.store.list_restaurants()? {
            let is_banned = restaurant
                .cuisine
                .as_deref()
                .is_some_and(|c| banned.contains(&c.to_lowercase()));
            if is_banned {
                continue;
            }
            let locations = self.store.locations_for_restaurant(restaurant.id)?;
            let mut candidate = RestaurantCandidate::new(restaurant, locations);
            if let Some((lat, lng)) = query.location() {
                candidate.distance_km = nearest_km(lat, lng, &candidate.locations);
            }
            results.push(candidate);
        }

        if let (Some(radius), Some(_)) = (query.radius, query.location()) {
            if radius > 0.0 {
                let within: Vec<RestaurantCandidate> = results
                    .iter()
                    .filter(|r| r.distance_km.is_some_and(|d| d <= radius))
                    .cloned()
                    .collect();
                if within.is_empty() {
                    debug!("Radius {}km would drop every restaurant; ignoring it", radius);
                } else {
                    results = within;
                }
            }
        }

        if query.location().is_some() {
            let prefs = self.preferred_groups(&settings);
            if !prefs.is_empty() {
                for r in results.iter_mut() {
                    r.sampled_keywords = self.sample_keywords(r.restaurant.id)?;
                }
            }
            DistanceSoftBooster::apply(&prefs, &mut results);
        }
        Ok(results)
    }

    /// Preferred keyword ids split into the boosted groups. A keyword
    /// belongs to a group by category or by keyword-group membership.
    fn preferred_groups(&self, settings: &[KeywordSetting]) -> PreferredGroups {
        let flavor_ids = self.groups.flavor_ids();
        let cost_ids = self.groups.cost_ids();
        let mut prefs = PreferredGroups::default();
        for s in settings.iter().filter(|s| s.preference > 0.0) {
            let id = s.keyword.id;
            if s.keyword.category == Category::Flavor || flavor_ids.contains(&id) {
                prefs.flavor.insert(id);
            } else if s.keyword.category == Category::Cost || cost_ids.contains(&id) {
                prefs.cost.insert(id);
            }
        }
        prefs
    }

    fn sample_keywords(&self, res_id: i64) -> Result<HashSet<i64>> {
        let mut ids = HashSet::new();
        for dish in self.store.list_dishes(Some(res_id), None)?.into_iter().take(SAMPLED_DISHES) {
            ids.extend(self.store.dish_keywords(dish.id)?);
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dishdive_store::{PreferenceBlacklist, Sentiment, SourceType};
    use tempfile::TempDir;

    fn open() -> (Arc<SqliteStore>, Recommender, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(SqliteStore::open(dir.path()).unwrap());
        let recommender = Recommender::new(store.clone(), Arc::new(KeywordGroups::default()));
        (store, recommender, dir)
    }

    fn set(store: &SqliteStore, user: i64, keyword_id: i64, preference: f64, blacklist: f64) {
        store
            .upsert_user_settings(
                user,
                &[PreferenceBlacklist {
                    keyword_id,
                    preference,
                    blacklist,
                }],
            )
            .unwrap();
    }

    /// Link a keyword to a dish through one review and recompute.
    fn review(store: &SqliteStore, source: i64, dish: i64, res: i64, keyword: i64) {
        let (rd, _) = store
            .get_or_create_review_dish(source, SourceType::User, dish, res)
            .unwrap();
        store.link_and_bump(rd.id, dish, keyword).unwrap();
        store.recompute_aggregates().unwrap();
    }

    #[test]
    fn test_recommend_dishes_end_to_end() {
        let (store, recommender, _dir) = open();
        let res = store.add_restaurant("Jay Fai", Some("thai"), None).unwrap();
        let crab = store.add_dish(res, "ไข่เจียวปู", Some("thai"), None).unwrap();
        let tomyum = store.add_dish(res, "ต้มยำกุ้ง", Some("thai"), None).unwrap();
        let salad = store.add_dish(res, "ยำวุ้นเส้น", Some("thai"), None).unwrap();

        let (tasty, _) = store.get_or_create_keyword("อรอย", Category::Flavor, Sentiment::Positive).unwrap();
        let (oily, _) = store.get_or_create_keyword("มน", Category::Flavor, Sentiment::Negative).unwrap();
        review(&store, 1, crab, res, tasty.id);
        review(&store, 2, tomyum, res, tasty.id);
        review(&store, 3, salad, res, oily.id);

        set(&store, 9, oily.id, 0.0, 1.0);
        store.add_favorite(9, tomyum).unwrap();

        let ranked = recommender.recommend_dishes(9, Some(res), None).unwrap();
        let ids: Vec<i64> = ranked.iter().map(|d| d.dish_id).collect();
        assert_eq!(ids, vec![tomyum, crab]);
        assert_eq!(ranked[0].recommend_score, 300.0);
        assert_eq!(ranked[1].recommend_score, 100.0);

        let filtered = recommender.recommend_dishes(9, None, Some("ต้มยำ")).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].dish_id, tomyum);
    }

    #[test]
    fn test_search_drops_blacklisted_cuisine() {
        let (store, recommender, _dir) = open();
        store.add_restaurant("Som Tam", Some("thai"), None).unwrap();
        let ramen = store.add_restaurant("Ramen Bar", Some("Japanese"), None).unwrap();
        let (japanese, _) = store
            .get_or_create_keyword("japanese", Category::Cuisine, Sentiment::Neutral)
            .unwrap();
        set(&store, 5, japanese.id, 0.0, 1.0);

        let all = recommender.search_restaurants(&RestaurantQuery::default()).unwrap();
        assert_eq!(all.len(), 2);

        let query = RestaurantQuery {
            user_id: Some(5),
            ..RestaurantQuery::default()
        };
        let filtered = recommender.search_restaurants(&query).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_ne!(filtered[0].restaurant.id, ramen);
        assert!(filtered[0].distance_km.is_none());
    }

    #[test]
    fn test_search_distance_radius_and_boost() {
        let (store, recommender, _dir) = open();
        let near = store.add_restaurant("Near", None, None).unwrap();
        let mid = store.add_restaurant("Mid", None, None).unwrap();
        let far = store.add_restaurant("Far", None, None).unwrap();
        // Roughly 1.0km, 1.1km and 10km north of the user.
        store.add_location(near, "n", None, 13.009, 100.0).unwrap();
        store.add_location(mid, "m1", None, 13.0099, 100.0).unwrap();
        store.add_location(mid, "m2", None, 13.5, 100.0).unwrap();
        store.add_location(far, "f", None, 13.09, 100.0).unwrap();

        let dish = store.add_dish(mid, "ข้าวซอย", None, None).unwrap();
        let (sweet, _) = store.get_or_create_keyword("หวาน", Category::Flavor, Sentiment::Positive).unwrap();
        review(&store, 1, dish, mid, sweet.id);
        set(&store, 3, sweet.id, 1.0, 0.0);

        let query = RestaurantQuery {
            user_id: Some(3),
            lat: Some(13.0),
            lng: Some(100.0),
            radius: Some(5.0),
        };
        let results = recommender.search_restaurants(&query).unwrap();
        let ids: Vec<i64> = results.iter().map(|r| r.restaurant.id).collect();
        assert_eq!(ids, vec![mid, near]);
        let mid_result = &results[0];
        let raw = mid_result.distance_km.unwrap();
        assert!((raw - mid_result.effective_km.unwrap() - 0.20).abs() < 1e-9);

        // A radius that would empty the list is ignored.
        let tight = RestaurantQuery {
            radius: Some(0.01),
            ..query
        };
        assert_eq!(recommender.search_restaurants(&tight).unwrap().len(), 3);
    }
}
