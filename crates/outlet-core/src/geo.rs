//! Great-circle distance on a spherical Earth.

use crate::entity::Coordinate;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two coordinates, in kilometers.
///
/// NaN components propagate to a NaN result; callers filter invalid
/// coordinates beforehand.
#[must_use]
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    const KLCC: Coordinate = Coordinate::new(3.1579, 101.7116);
    const BUKIT_BINTANG: Coordinate = Coordinate::new(3.1466, 101.7108);
    const SHAH_ALAM: Coordinate = Coordinate::new(3.0733, 101.5185);

    #[test]
    fn identical_points_are_zero_apart() {
        for point in [KLCC, SHAH_ALAM, Coordinate::new(90.0, 0.0), Coordinate::new(-45.5, -179.9)] {
            assert!(distance_km(point, point).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let ab = distance_km(KLCC, SHAH_ALAM);
        let ba = distance_km(SHAH_ALAM, KLCC);
        assert!((ab - ba).abs() < 1e-9, "{ab} vs {ba}");
    }

    #[test]
    fn matches_known_city_distances() {
        let short = distance_km(KLCC, BUKIT_BINTANG);
        assert!((1.0..1.5).contains(&short), "KLCC to Bukit Bintang was {short}");

        let long = distance_km(KLCC, SHAH_ALAM);
        assert!((22.0..25.0).contains(&long), "KLCC to Shah Alam was {long}");
    }

    #[test]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = distance_km(Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0));
        assert!((d - 111.195).abs() < 0.01, "got {d}");
    }

    #[test]
    fn antipodal_points_are_half_the_circumference() {
        let d = distance_km(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 180.0));
        let half = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((d - half).abs() < 1e-6, "got {d}");
    }

    #[test]
    fn nan_input_propagates() {
        let d = distance_km(Coordinate::new(f64::NAN, 0.0), KLCC);
        assert!(d.is_nan());
    }
}
