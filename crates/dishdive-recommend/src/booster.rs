//! Preference-aware soft boost on restaurant distance.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::types::RestaurantCandidate;

pub const FLAVOR_BOOST_KM: f64 = 0.20;
pub const COST_BOOST_KM: f64 = 0.10;
pub const MAX_BOOST_KM: f64 = 0.60;

/// Preferred keyword ids in the two boosted groups.
#[derive(Debug, Clone, Default)]
pub struct PreferredGroups {
    pub flavor: HashSet<i64>,
    pub cost: HashSet<i64>,
}

impl PreferredGroups {
    pub fn is_empty(&self) -> bool {
        self.flavor.is_empty() && self.cost.is_empty()
    }
}

/// Pulls restaurants whose dishes match the user's taste slightly closer.
pub struct DistanceSoftBooster;

impl DistanceSoftBooster {
    /// Boost for one restaurant's sampled keywords. A keyword preferred in
    /// both groups counts as flavor.
    pub fn boost_km(prefs: &PreferredGroups, keywords: &HashSet<i64>) -> f64 {
        let mut flavor = 0usize;
        let mut cost = 0usize;
        for id in keywords {
            if prefs.flavor.contains(id) {
                flavor += 1;
            } else if prefs.cost.contains(id) {
                cost += 1;
            }
        }
        let boost = flavor as f64 * FLAVOR_BOOST_KM + cost as f64 * COST_BOOST_KM;
        boost.min(MAX_BOOST_KM)
    }

    /// Fill in effective distances and re-sort ascending. A restaurant
    /// with no branch has no distance; it is not read as 0 km and sorts
    /// after every restaurant that has one, even one at 0 km. When nobody
    /// has a distance the order is left untouched.
    pub fn apply(prefs: &PreferredGroups, restaurants: &mut [RestaurantCandidate]) {
        if restaurants.iter().all(|r| r.distance_km.is_none()) {
            return;
        }
        for r in restaurants.iter_mut() {
            r.effective_km = r.distance_km.map(|d| {
                if prefs.is_empty() || d <= 0.0 {
                    return d;
                }
                (d - Self::boost_km(prefs, &r.sampled_keywords)).max(0.0)
            });
        }
        restaurants.sort_by(|a, b| match (a.effective_km, b.effective_km) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dishdive_store::Restaurant;

    fn restaurant(id: i64, distance: Option<f64>, keywords: &[i64]) -> RestaurantCandidate {
        let mut r = RestaurantCandidate::new(
            Restaurant {
                id,
                name: format!("restaurant {}", id),
                cuisine: None,
                restriction: None,
                menu_size: 0,
            },
            vec![],
        );
        r.distance_km = distance;
        r.sampled_keywords = keywords.iter().copied().collect();
        r
    }

    fn prefs() -> PreferredGroups {
        PreferredGroups {
            flavor: HashSet::from([1, 2, 3, 4, 5]),
            cost: HashSet::from([10, 11]),
        }
    }

    #[test]
    fn test_one_flavor_one_cost_match() {
        let mut list = vec![restaurant(1, Some(2.0), &[1, 10, 99])];
        DistanceSoftBooster::apply(&prefs(), &mut list);
        let eff = list[0].effective_km.unwrap();
        assert!((eff - 1.70).abs() < 1e-9, "got {}", eff);
        assert_eq!(list[0].distance_km, Some(2.0));
    }

    #[test]
    fn test_boost_is_capped() {
        let keywords: HashSet<i64> = [1, 2, 3, 4, 5, 10, 11].into_iter().collect();
        let boost = DistanceSoftBooster::boost_km(&prefs(), &keywords);
        assert!((boost - MAX_BOOST_KM).abs() < 1e-9);

        let mut list = vec![restaurant(1, Some(0.4), &[1, 2, 3, 4])];
        DistanceSoftBooster::apply(&prefs(), &mut list);
        assert_eq!(list[0].effective_km, Some(0.0));
    }

    #[test]
    fn test_boost_reorders_close_restaurants() {
        let mut list = vec![
            restaurant(1, Some(1.0), &[]),
            restaurant(2, Some(1.2), &[1, 2]),
            restaurant(3, None, &[1]),
            restaurant(4, Some(0.5), &[]),
        ];
        DistanceSoftBooster::apply(&prefs(), &mut list);
        let ids: Vec<i64> = list.iter().map(|r| r.restaurant.id).collect();
        assert_eq!(ids, vec![4, 2, 1, 3]);
        assert!(list[3].effective_km.is_none());
    }

    #[test]
    fn test_no_preferences_or_zero_distance() {
        let mut list = vec![restaurant(1, Some(0.0), &[1]), restaurant(2, Some(3.0), &[1])];
        DistanceSoftBooster::apply(&PreferredGroups::default(), &mut list);
        assert_eq!(list[1].effective_km, Some(3.0));

        DistanceSoftBooster::apply(&prefs(), &mut list);
        assert_eq!(list[0].effective_km, Some(0.0));
    }

    #[test]
    fn test_branchless_restaurant_sorts_after_zero_distance() {
        let mut list = vec![
            restaurant(1, None, &[1, 2, 3]),
            restaurant(2, Some(4.0), &[]),
            restaurant(3, Some(0.0), &[]),
        ];
        DistanceSoftBooster::apply(&prefs(), &mut list);
        let ids: Vec<i64> = list.iter().map(|r| r.restaurant.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert!(list[2].distance_km.is_none());
    }

    #[test]
    fn test_without_distances_order_is_kept() {
        let mut list = vec![restaurant(3, None, &[1]), restaurant(1, None, &[]), restaurant(2, None, &[2])];
        DistanceSoftBooster::apply(&prefs(), &mut list);
        let ids: Vec<i64> = list.iter().map(|r| r.restaurant.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert!(list.iter().all(|r| r.effective_km.is_none()));
    }
}
