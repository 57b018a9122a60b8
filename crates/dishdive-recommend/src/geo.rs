//! Great-circle distance.

use dishdive_store::RestaurantLocation;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometres between two (lat, lng) points in degrees.
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Distance to the closest branch, or `None` when there are no branches.
pub fn nearest_km(lat: f64, lng: f64, locations: &[RestaurantLocation]) -> Option<f64> {
    locations
        .iter()
        .map(|l| haversine_km(lat, lng, l.latitude, l.longitude))
        .min_by(|a, b| a.total_cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branch(id: i64, lat: f64, lng: f64) -> RestaurantLocation {
        RestaurantLocation {
            id,
            restaurant_id: 1,
            name: format!("branch {}", id),
            address: None,
            latitude: lat,
            longitude: lng,
        }
    }

    #[test]
    fn test_same_point_is_zero() {
        assert!(haversine_km(13.7563, 100.5018, 13.7563, 100.5018).abs() < 1e-9);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        // 6371 * pi / 180
        let d = haversine_km(0.0, 100.0, 1.0, 100.0);
        assert!((d - 111.19).abs() < 0.01, "got {}", d);
    }

    #[test]
    fn test_nearest_branch() {
        let branches = [branch(1, 14.0, 100.5), branch(2, 13.76, 100.5), branch(3, 15.0, 100.5)];
        let d = nearest_km(13.75, 100.5, &branches).unwrap();
        assert!(d < 2.0);
        assert!(nearest_km(13.75, 100.5, &[]).is_none());
    }
}
