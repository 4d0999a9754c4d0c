use crate::models::{Coordinate, ReportPin};

/// Mean Earth radius used for great-circle distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle (haversine) distance between two coordinates in kilometres.
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lng = (b.longitude - a.longitude).to_radians();
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lng / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1 for antipodal points.
    let c = 2.0 * h.clamp(0.0, 1.0).sqrt().asin();
    EARTH_RADIUS_KM * c
}

/// Every pin within `radius_km` of `origin`, in input order.
pub fn within(origin: Coordinate, pins: &[ReportPin], radius_km: f64) -> Vec<ReportPin> {
    pins.iter()
        .filter(|pin| distance_km(origin, pin.coordinate) <= radius_km)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Priority, Status};

    fn coord(latitude: f64, longitude: f64) -> Coordinate {
        Coordinate {
            latitude,
            longitude,
        }
    }

    fn pin(id: &str, latitude: f64, longitude: f64) -> ReportPin {
        ReportPin {
            id: id.to_string(),
            coordinate: coord(latitude, longitude),
            category: Category::Road,
            status: Status::Pending,
            priority: Priority::Medium,
        }
    }

    fn sample_coords() -> Vec<Coordinate> {
        vec![
            coord(-22.9068, -43.1729),
            coord(-22.9711, -43.1822),
            coord(-23.0, -43.36),
            coord(0.0, 0.0),
            coord(51.5074, -0.1278),
            coord(90.0, 180.0),
            coord(-90.0, -180.0),
            coord(35.6762, 139.6503),
        ]
    }

    #[test]
    fn test_distance_zero_for_same_point() {
        for c in sample_coords() {
            assert!(distance_km(c, c).abs() < 1e-9);
        }
    }

    #[test]
    fn test_distance_is_symmetric() {
        let coords = sample_coords();
        for &a in &coords {
            for &b in &coords {
                assert!((distance_km(a, b) - distance_km(b, a)).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_distance_finite_and_non_negative() {
        let coords = sample_coords();
        for &a in &coords {
            for &b in &coords {
                let d = distance_km(a, b);
                assert!(d.is_finite());
                assert!(d >= 0.0);
            }
        }
    }

    #[test]
    fn test_distance_one_degree_of_latitude() {
        // 2 * pi * 6371 / 360
        let d = distance_km(coord(0.0, 0.0), coord(1.0, 0.0));
        assert!((d - 111.19).abs() < 0.01);
    }

    #[test]
    fn test_distance_antipodal_is_half_circumference() {
        let d = distance_km(coord(0.0, 0.0), coord(0.0, 180.0));
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn test_distance_positive_for_distinct_points() {
        let d = distance_km(coord(-22.9068, -43.1729), coord(-22.9069, -43.1729));
        assert!(d > 0.0);
    }

    #[test]
    fn test_within_keeps_input_order() {
        let origin = coord(0.0, 0.0);
        let pins = vec![
            pin("c", 0.01, 0.0),
            pin("far", 5.0, 5.0),
            pin("a", 0.0, 0.02),
            pin("b", -0.01, -0.01),
        ];
        let ids: Vec<_> = within(origin, &pins, 5.0).into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_within_includes_boundary() {
        let origin = coord(0.0, 0.0);
        let p = pin("edge", 0.05, 0.0);
        let exact = distance_km(origin, p.coordinate);
        assert_eq!(within(origin, &[p], exact).len(), 1);
    }

    #[test]
    fn test_within_empty_input() {
        assert!(within(coord(0.0, 0.0), &[], 100.0).is_empty());
    }

    #[test]
    fn test_within_is_monotonic_in_radius() {
        let origin = coord(-22.9068, -43.1729);
        let pins: Vec<ReportPin> = (0..40)
            .map(|i| {
                let step = i as f64 * 0.01;
                pin(&format!("p{i}"), -22.9068 + step, -43.1729 - step / 2.0)
            })
            .collect();
        let radii = [0.0, 0.5, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0];
        for (i, &r1) in radii.iter().enumerate() {
            for &r2 in &radii[i..] {
                let small = within(origin, &pins, r1);
                let large = within(origin, &pins, r2);
                assert!(small.iter().all(|p| large.contains(p)));
            }
        }
    }

    #[test]
    fn test_within_does_not_mutate_input() {
        let pins = vec![pin("a", 0.0, 0.0), pin("b", 10.0, 10.0)];
        let before = pins.clone();
        let _ = within(coord(0.0, 0.0), &pins, 1.0);
        assert_eq!(pins, before);
    }
}
