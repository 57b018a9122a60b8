//! Per-user dish scoring, elimination and ordering.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::types::{DishCandidate, RankedDish, UserTaste};

/// Flat boost per linked keyword the user prefers.
pub const PREFERRED_KEYWORD_BOOST: f64 = 20.0;
/// Boost when the dish's sentiment clears the user's preference threshold.
pub const SENTIMENT_BOOST: f64 = 20.0;
/// Multiplier for dishes in the user's favorites.
pub const FAVORITE_MULTIPLIER: f64 = 3.0;

/// Scores dishes for one user. Stateless; safe to share.
pub struct RecommendationRanker;

impl RecommendationRanker {
    /// Score every candidate, drop eliminated dishes and sort by score,
    /// highest first. Equal scores keep their input order.
    pub fn rank(
        taste: &UserTaste,
        favorites: &HashSet<i64>,
        candidates: Vec<DishCandidate>,
    ) -> Vec<RankedDish> {
        let mut ranked: Vec<RankedDish> = candidates
            .into_iter()
            .filter_map(|c| Self::score(taste, favorites, c))
            .collect();
        ranked.sort_by(|a, b| {
            b.recommend_score
                .partial_cmp(&a.recommend_score)
                .unwrap_or(Ordering::Equal)
        });
        ranked
    }

    /// Score one dish, or `None` when the user's settings eliminate it.
    fn score(taste: &UserTaste, favorites: &HashSet<i64>, c: DishCandidate) -> Option<RankedDish> {
        let sentiment = c.sentiment_percent();

        if taste.sentiment_blacklist > 0.0 && sentiment < taste.sentiment_blacklist * 100.0 {
            return None;
        }
        if c.keyword_ids.iter().any(|k| taste.blacklisted.contains(k)) {
            return None;
        }

        let mut score = sentiment;
        let preferred = c
            .keyword_ids
            .iter()
            .filter(|k| taste.preferred.contains(k))
            .count();
        score += preferred as f64 * PREFERRED_KEYWORD_BOOST;

        if taste.sentiment_preference > 0.0 && sentiment > taste.sentiment_preference * 100.0 {
            score += SENTIMENT_BOOST;
        }

        let is_favorite = favorites.contains(&c.dish.id);
        if is_favorite {
            score *= FAVORITE_MULTIPLIER;
        }

        Some(RankedDish {
            dish_id: c.dish.id,
            restaurant_id: c.dish.restaurant_id,
            dish_name: c.dish.name,
            cuisine: c.dish.cuisine,
            sentiment_score: sentiment,
            positive_reviews: c.positive_reviews,
            total_reviews: c.total_reviews,
            is_favorite,
            recommend_score: score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dishdive_store::Dish;

    fn candidate(id: i64, positive: i64, total: i64, keywords: &[i64]) -> DishCandidate {
        DishCandidate {
            dish: Dish {
                id,
                restaurant_id: 1,
                name: format!("dish {}", id),
                cuisine: Some("thai".into()),
                restriction: None,
                positive_score: positive,
                negative_score: 0,
                total_score: total,
            },
            positive_reviews: positive,
            total_reviews: total,
            keyword_ids: keywords.to_vec(),
        }
    }

    #[test]
    fn test_favorite_triples_sentiment() {
        let favorites = HashSet::from([7]);
        let ranked = RecommendationRanker::rank(
            &UserTaste::default(),
            &favorites,
            vec![candidate(7, 1, 2, &[])],
        );
        assert_eq!(ranked.len(), 1);
        assert!(ranked[0].is_favorite);
        assert_eq!(ranked[0].sentiment_score, 50.0);
        assert_eq!(ranked[0].recommend_score, 150.0);
    }

    #[test]
    fn test_two_preferred_keywords() {
        // 40% does not clear a 50% threshold, so only the keyword boosts apply.
        let taste = UserTaste {
            preferred: HashSet::from([10, 11]),
            sentiment_preference: 0.5,
            ..UserTaste::default()
        };
        let ranked =
            RecommendationRanker::rank(&taste, &HashSet::new(), vec![candidate(1, 2, 5, &[10, 11, 12])]);
        assert_eq!(ranked[0].sentiment_score, 40.0);
        assert_eq!(ranked[0].recommend_score, 80.0);
    }

    #[test]
    fn test_sentiment_preference_boost() {
        let taste = UserTaste {
            sentiment_preference: 0.5,
            ..UserTaste::default()
        };
        let ranked = RecommendationRanker::rank(&taste, &HashSet::new(), vec![candidate(1, 3, 4, &[])]);
        assert_eq!(ranked[0].recommend_score, 95.0);
    }

    #[test]
    fn test_blacklisted_keyword_always_eliminates() {
        let taste = UserTaste {
            preferred: HashSet::from([1]),
            blacklisted: HashSet::from([2]),
            ..UserTaste::default()
        };
        let favorites = HashSet::from([5]);
        let ranked = RecommendationRanker::rank(
            &taste,
            &favorites,
            vec![candidate(5, 10, 10, &[1, 2]), candidate(6, 0, 3, &[])],
        );
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].dish_id, 6);
    }

    #[test]
    fn test_sentiment_blacklist_threshold() {
        let taste = UserTaste {
            sentiment_blacklist: 0.5,
            ..UserTaste::default()
        };
        let ranked = RecommendationRanker::rank(
            &taste,
            &HashSet::new(),
            vec![
                candidate(1, 1, 4, &[]),
                candidate(2, 1, 2, &[]),
                candidate(3, 0, 0, &[]),
            ],
        );
        // 25% and 0% fall below 50%; exactly 50% stays.
        let ids: Vec<i64> = ranked.iter().map(|d| d.dish_id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn test_sorted_descending_with_stable_ties() {
        let ranked = RecommendationRanker::rank(
            &UserTaste::default(),
            &HashSet::new(),
            vec![
                candidate(1, 1, 2, &[]),
                candidate(2, 3, 4, &[]),
                candidate(3, 1, 2, &[]),
                candidate(4, 0, 0, &[]),
            ],
        );
        let ids: Vec<i64> = ranked.iter().map(|d| d.dish_id).collect();
        assert_eq!(ids, vec![2, 1, 3, 4]);
    }
}
