//! Great-circle distance between points on the Earth's surface.

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;
const EQUALITY_TOLERANCE: f64 = 1e-6;

/// A latitude/longitude pair, in degrees.
#[derive(Debug, Default, Clone, Copy)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl PartialEq for Coordinates {
    fn eq(&self, other: &Self) -> bool {
        (self.latitude - other.latitude).abs() < EQUALITY_TOLERANCE
            && (self.longitude - other.longitude).abs() < EQUALITY_TOLERANCE
    }
}

/// Great-circle distance between `a` and `b`, in meters.
///
/// Uses the haversine form rather than the original's `acos` variant; both
/// agree to well within float tolerance except near antipodal points, where
/// haversine stays numerically stable.
pub fn distance(a: Coordinates, b: Coordinates) -> f64 {
    if a == b {
        return 0.0;
    }

    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().asin();
    EARTH_RADIUS_METERS * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_point_is_zero() {
        let p = Coordinates::new(55.611_087, 37.208_290);
        assert_eq!(distance(p, p), 0.0);
    }

    #[test]
    fn symmetric() {
        let a = Coordinates::new(55.611_087, 37.208_290);
        let b = Coordinates::new(55.595_884, 37.209_755);
        assert!((distance(a, b) - distance(b, a)).abs() < 1e-9);
    }

    #[test]
    fn known_short_hop() {
        // Roughly 1km apart north-south.
        let a = Coordinates::new(55.0, 37.0);
        let b = Coordinates::new(55.009, 37.0);
        let d = distance(a, b);
        assert!((d - 1000.0).abs() < 20.0, "distance was {d}");
    }

    #[test]
    fn tolerance_equality() {
        let a = Coordinates::new(1.0, 2.0);
        let b = Coordinates::new(1.0 + 1e-8, 2.0 - 1e-8);
        assert_eq!(a, b);
    }
}
