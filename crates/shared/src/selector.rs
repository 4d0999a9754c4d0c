//! Picks the initial map region for a user by widening the search radius in
//! tiers until enough reports are nearby.
//!
//! Every tier searches the full report set, never the previous tier's result.

use serde::{Deserialize, Serialize};

use crate::calc::within;
use crate::error::GeoError;
use crate::models::{Coordinate, Region, ReportPin, Selection, Tier};
use crate::region::{self, RegionConfig};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SelectorConfig {
    pub nearby_radius_km: f64,
    pub nearby_min_pins: usize,
    pub expanded_radius_km: f64,
    pub expanded_min_pins: usize,
    pub metro_radius_km: f64,
    /// Span used when only a few reports exist within the metro radius.
    pub metro_delta: f64,
    pub region: RegionConfig,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        SelectorConfig {
            nearby_radius_km: 5.0,
            nearby_min_pins: 3,
            expanded_radius_km: 10.0,
            expanded_min_pins: 2,
            metro_radius_km: 50.0,
            metro_delta: 0.05,
            region: RegionConfig::default(),
        }
    }
}

impl SelectorConfig {
    pub fn validate(&self) -> Result<(), GeoError> {
        self.region.validate()?;
        if !self.nearby_radius_km.is_finite() || self.nearby_radius_km <= 0.0 {
            return Err(GeoError::InvalidConfig(format!(
                "nearbyRadiusKm must be positive, got {}",
                self.nearby_radius_km
            )));
        }
        if self.expanded_radius_km.is_nan() || self.expanded_radius_km < self.nearby_radius_km {
            return Err(GeoError::InvalidConfig(format!(
                "expandedRadiusKm {} is smaller than nearbyRadiusKm {}",
                self.expanded_radius_km, self.nearby_radius_km
            )));
        }
        if !self.metro_radius_km.is_finite() || self.metro_radius_km < self.expanded_radius_km {
            return Err(GeoError::InvalidConfig(format!(
                "metroRadiusKm {} is smaller than expandedRadiusKm {}",
                self.metro_radius_km, self.expanded_radius_km
            )));
        }
        if self.nearby_min_pins == 0 || self.expanded_min_pins == 0 {
            return Err(GeoError::InvalidConfig(
                "minimum pin counts must be at least 1".to_string(),
            ));
        }
        if !self.metro_delta.is_finite() || self.metro_delta <= 0.0 {
            return Err(GeoError::InvalidConfig(format!(
                "metroDelta must be positive, got {}",
                self.metro_delta
            )));
        }
        Ok(())
    }

    /// Medium-zoom region on the user used by the `Metro50km` tier, when some
    /// reports lie within the metro radius but too few for a fitted region.
    pub fn location_region(&self, user_location: Coordinate) -> Result<Region, GeoError> {
        region::around(user_location, self.metro_delta)
    }

    /// Tight region on the user, for "center on my location".
    pub fn recenter_region(&self, user_location: Coordinate) -> Result<Region, GeoError> {
        region::around(user_location, self.region.min_delta)
    }
}

fn fit_with_user(
    user_location: Coordinate,
    pins: &[ReportPin],
    config: &RegionConfig,
) -> Result<Region, GeoError> {
    let points: Vec<Coordinate> = std::iter::once(user_location)
        .chain(pins.iter().map(|p| p.coordinate))
        .collect();
    region::fit(&points, config)
}

fn validate_pins(pins: &[ReportPin]) -> Result<(), GeoError> {
    for pin in pins {
        pin.coordinate.validate().map_err(|e| GeoError::InvalidPin {
            id: pin.id.clone(),
            source: Box::new(e),
        })?;
    }
    Ok(())
}

/// Choose the initial region for `user_location`.
///
/// Falls back to `city_wide`, returned unchanged, when nothing lies within the
/// metro radius (including when `all_pins` is empty).
pub fn select(
    user_location: Coordinate,
    all_pins: &[ReportPin],
    city_wide: &Region,
    config: &SelectorConfig,
) -> Result<Selection, GeoError> {
    config.validate()?;
    user_location.validate()?;
    city_wide.validate()?;
    validate_pins(all_pins)?;

    tracing::debug!(
        latitude = user_location.latitude,
        longitude = user_location.longitude,
        pins = all_pins.len(),
        "Selecting initial region"
    );

    let near = within(user_location, all_pins, config.nearby_radius_km);
    tracing::debug!(radius_km = config.nearby_radius_km, found = near.len(), "Nearby search");
    if near.len() >= config.nearby_min_pins {
        return Ok(Selection {
            region: fit_with_user(user_location, &near, &config.region)?,
            tier: Tier::Nearby5km,
            context_count: near.len(),
        });
    }

    let wider = within(user_location, all_pins, config.expanded_radius_km);
    tracing::debug!(radius_km = config.expanded_radius_km, found = wider.len(), "Expanded search");
    if wider.len() >= config.expanded_min_pins {
        return Ok(Selection {
            region: fit_with_user(user_location, &wider, &config.region)?,
            tier: Tier::Nearby10km,
            context_count: wider.len(),
        });
    }

    let metro = within(user_location, all_pins, config.metro_radius_km);
    tracing::debug!(radius_km = config.metro_radius_km, found = metro.len(), "Metro search");
    if metro.is_empty() {
        tracing::debug!("No reports in the metro area, using city-wide region");
        return Ok(Selection {
            region: *city_wide,
            tier: Tier::CityWide,
            context_count: all_pins.len(),
        });
    }

    Ok(Selection {
        region: config.location_region(user_location)?,
        tier: Tier::Metro50km,
        context_count: metro.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calc::distance_km;
    use crate::models::{Category, Priority, Status};

    const RIO: Coordinate = Coordinate {
        latitude: -22.9068,
        longitude: -43.1729,
    };

    /// Roughly 111.19 km per degree of latitude.
    const KM_PER_DEG_LAT: f64 = 111.19;

    fn pin(id: &str, latitude: f64, longitude: f64) -> ReportPin {
        ReportPin {
            id: id.to_string(),
            coordinate: Coordinate {
                latitude,
                longitude,
            },
            category: Category::Lighting,
            status: Status::Pending,
            priority: Priority::Low,
        }
    }

    /// Pin due north of `RIO` at roughly `km` kilometres.
    fn pin_north_km(id: &str, km: f64) -> ReportPin {
        pin(id, RIO.latitude + km / KM_PER_DEG_LAT, RIO.longitude)
    }

    fn city_wide() -> Region {
        Region {
            center: RIO,
            latitude_delta: 0.3,
            longitude_delta: 0.3,
        }
    }

    fn run(pins: &[ReportPin]) -> Selection {
        select(RIO, pins, &city_wide(), &SelectorConfig::default()).unwrap()
    }

    #[test]
    fn test_four_pins_within_two_km_is_nearby() {
        let pins = vec![
            pin("a", -22.9000, -43.1700),
            pin("b", -22.9100, -43.1800),
            pin("c", -22.9150, -43.1650),
            pin("d", -22.8990, -43.1760),
        ];
        for p in &pins {
            assert!(distance_km(RIO, p.coordinate) < 2.0);
        }

        let sel = run(&pins);
        assert_eq!(sel.tier, Tier::Nearby5km);
        assert_eq!(sel.context_count, 4);
        assert!(sel.region.latitude_delta <= 0.1);
        assert!(sel.region.longitude_delta <= 0.1);
        // Bounding box of user + pins: lat [-22.915, -22.899], lng [-43.18, -43.165].
        assert!((sel.region.center.latitude - (-22.907)).abs() < 1e-9);
        assert!((sel.region.center.longitude - (-43.1725)).abs() < 1e-9);
    }

    #[test]
    fn test_no_metro_pins_returns_city_wide_exactly() {
        let pins = vec![pin("sp", -23.5505, -46.6333), pin("bh", -19.9167, -43.9345)];
        let sel = run(&pins);
        assert_eq!(sel.tier, Tier::CityWide);
        assert_eq!(sel.region, city_wide());
        assert_eq!(sel.context_count, 2);
    }

    #[test]
    fn test_single_pin_at_40km_is_metro() {
        let pins = vec![pin_north_km("far", 40.0)];
        let sel = run(&pins);
        assert_eq!(sel.tier, Tier::Metro50km);
        assert_eq!(sel.context_count, 1);
        assert_eq!(
            sel.region,
            Region {
                center: RIO,
                latitude_delta: 0.05,
                longitude_delta: 0.05,
            }
        );
    }

    #[test]
    fn test_empty_pins_is_city_wide() {
        let sel = run(&[]);
        assert_eq!(sel.tier, Tier::CityWide);
        assert_eq!(sel.region, city_wide());
        assert_eq!(sel.context_count, 0);

        let elsewhere = Coordinate {
            latitude: 48.8566,
            longitude: 2.3522,
        };
        let sel = select(elsewhere, &[], &city_wide(), &SelectorConfig::default()).unwrap();
        assert_eq!(sel.tier, Tier::CityWide);
    }

    #[test]
    fn test_two_pins_within_ten_km_is_expanded() {
        let pins = vec![pin_north_km("a", 7.0), pin_north_km("b", 8.0), pin_north_km("c", 30.0)];
        let sel = run(&pins);
        assert_eq!(sel.tier, Tier::Nearby10km);
        assert_eq!(sel.context_count, 2);
    }

    #[test]
    fn test_expanded_tier_counts_all_pins_not_previous_tier() {
        // Two pins inside 5 km are not enough for the nearby tier, but the
        // expanded tier must see them plus the one at 8 km.
        let pins = vec![pin_north_km("a", 1.0), pin_north_km("b", 2.0), pin_north_km("c", 8.0)];
        let sel = run(&pins);
        assert_eq!(sel.tier, Tier::Nearby10km);
        assert_eq!(sel.context_count, 3);
    }

    #[test]
    fn test_one_pin_within_ten_km_falls_to_metro() {
        let pins = vec![pin_north_km("a", 3.0)];
        let sel = run(&pins);
        assert_eq!(sel.tier, Tier::Metro50km);
        assert_eq!(sel.context_count, 1);
    }

    #[test]
    fn test_selection_is_deterministic() {
        let pins = vec![
            pin_north_km("a", 1.0),
            pin_north_km("b", 4.0),
            pin_north_km("c", 9.0),
            pin("x", -23.5505, -46.6333),
        ];
        let first = run(&pins);
        for _ in 0..10 {
            assert_eq!(run(&pins), first);
        }
    }

    #[test]
    fn test_thresholds_are_configurable() {
        let config = SelectorConfig {
            nearby_min_pins: 1,
            ..SelectorConfig::default()
        };
        let pins = vec![pin_north_km("a", 1.0)];
        let sel = select(RIO, &pins, &city_wide(), &config).unwrap();
        assert_eq!(sel.tier, Tier::Nearby5km);
        assert_eq!(sel.context_count, 1);
    }

    #[test]
    fn test_invalid_user_location_is_rejected() {
        let bad = Coordinate {
            latitude: -100.0,
            longitude: 0.0,
        };
        let err = select(bad, &[], &city_wide(), &SelectorConfig::default()).unwrap_err();
        assert_eq!(err, GeoError::InvalidLatitude(-100.0));
    }

    #[test]
    fn test_invalid_pin_is_rejected_with_id() {
        let pins = vec![pin_north_km("ok", 1.0), pin("broken", 0.0, 200.0)];
        let err = select(RIO, &pins, &city_wide(), &SelectorConfig::default()).unwrap_err();
        match err {
            GeoError::InvalidPin { id, source } => {
                assert_eq!(id, "broken");
                assert_eq!(*source, GeoError::InvalidLongitude(200.0));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_city_wide_region_is_rejected() {
        let region = Region {
            center: RIO,
            latitude_delta: 0.0,
            longitude_delta: 0.3,
        };
        assert!(select(RIO, &[], &region, &SelectorConfig::default()).is_err());
    }

    #[test]
    fn test_config_validation() {
        assert!(SelectorConfig::default().validate().is_ok());
        let inverted = SelectorConfig {
            expanded_radius_km: 2.0,
            ..SelectorConfig::default()
        };
        assert!(inverted.validate().is_err());
        let zero = SelectorConfig {
            expanded_min_pins: 0,
            ..SelectorConfig::default()
        };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_recenter_and_location_regions() {
        let config = SelectorConfig::default();
        let tight = config.recenter_region(RIO).unwrap();
        assert!((tight.latitude_delta - 0.02).abs() < 1e-12);
        let medium = config.location_region(RIO).unwrap();
        assert!((medium.longitude_delta - 0.05).abs() < 1e-12);
        assert_eq!(medium.center, RIO);
    }
}
