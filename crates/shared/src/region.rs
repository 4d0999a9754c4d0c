//! Fitting a map region around a set of points.
//!
//! Deltas are clamped to `[min_delta, max_delta]` per axis. Point sets wider
//! than `max_delta / margin_factor` are clipped by the cap: the region keeps a
//! readable zoom and some outliers may fall off-screen.

use serde::{Deserialize, Serialize};

use crate::error::GeoError;
use crate::models::{Coordinate, Region};

pub const DEFAULT_MIN_DELTA: f64 = 0.02;
pub const DEFAULT_MAX_DELTA: f64 = 0.1;
pub const DEFAULT_MARGIN_FACTOR: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegionConfig {
    pub min_delta: f64,
    pub max_delta: f64,
    pub margin_factor: f64,
}

impl Default for RegionConfig {
    fn default() -> Self {
        RegionConfig {
            min_delta: DEFAULT_MIN_DELTA,
            max_delta: DEFAULT_MAX_DELTA,
            margin_factor: DEFAULT_MARGIN_FACTOR,
        }
    }
}

impl RegionConfig {
    pub fn validate(&self) -> Result<(), GeoError> {
        if !self.min_delta.is_finite() || self.min_delta <= 0.0 {
            return Err(GeoError::InvalidConfig(format!(
                "minDelta must be positive, got {}",
                self.min_delta
            )));
        }
        if !self.max_delta.is_finite() || self.max_delta < self.min_delta {
            return Err(GeoError::InvalidConfig(format!(
                "maxDelta {} must be at least minDelta {}",
                self.max_delta, self.min_delta
            )));
        }
        if !self.margin_factor.is_finite() || self.margin_factor < 1.0 {
            return Err(GeoError::InvalidConfig(format!(
                "marginFactor must be at least 1, got {}",
                self.margin_factor
            )));
        }
        Ok(())
    }

    fn clamp_delta(&self, raw: f64) -> f64 {
        raw.max(self.min_delta).clamp(self.min_delta, self.max_delta)
    }
}

/// Fixed-span region centered on a single coordinate.
pub fn around(center: Coordinate, delta: f64) -> Result<Region, GeoError> {
    Region::new(center, delta, delta)
}

/// Smallest padded region containing `points`, clamped per axis.
///
/// `points` must be non-empty; callers always include the user's own location.
pub fn fit(points: &[Coordinate], config: &RegionConfig) -> Result<Region, GeoError> {
    config.validate()?;
    let (first, rest) = points.split_first().ok_or(GeoError::EmptyPointSet)?;
    first.validate()?;

    if rest.is_empty() {
        return around(*first, config.min_delta);
    }

    let mut min_lat = first.latitude;
    let mut max_lat = first.latitude;
    let mut min_lng = first.longitude;
    let mut max_lng = first.longitude;
    for p in rest {
        p.validate()?;
        min_lat = min_lat.min(p.latitude);
        max_lat = max_lat.max(p.latitude);
        min_lng = min_lng.min(p.longitude);
        max_lng = max_lng.max(p.longitude);
    }

    let center = Coordinate {
        latitude: (min_lat + max_lat) / 2.0,
        longitude: (min_lng + max_lng) / 2.0,
    };
    let latitude_delta = config.clamp_delta((max_lat - min_lat) * config.margin_factor);
    let longitude_delta = config.clamp_delta((max_lng - min_lng) * config.margin_factor);

    Region::new(center, latitude_delta, longitude_delta)
}
