use serde::{Deserialize, Serialize};

use crate::error::GeoError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting values outside the WGS84 ranges.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        let coord = Coordinate {
            latitude,
            longitude,
        };
        coord.validate()?;
        Ok(coord)
    }

    /// Re-check a coordinate that was built by struct literal or deserialized.
    pub fn validate(&self) -> Result<(), GeoError> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(GeoError::InvalidLatitude(self.latitude));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(GeoError::InvalidLongitude(self.longitude));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Road,
    Lighting,
    Cleaning,
    Others,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Road,
        Category::Lighting,
        Category::Cleaning,
        Category::Others,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Category::Road => "road",
            Category::Lighting => "lighting",
            Category::Cleaning => "cleaning",
            Category::Others => "others",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.id() == id)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Road => write!(f, "Road"),
            Category::Lighting => write!(f, "Lighting"),
            Category::Cleaning => write!(f, "Cleaning"),
            Category::Others => write!(f, "Others"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pending,
    InProgress,
    Resolved,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Pending, Status::InProgress, Status::Resolved];

    pub fn id(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::InProgress => "in_progress",
            Status::Resolved => "resolved",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.id() == id)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Pending => write!(f, "Pending"),
            Status::InProgress => write!(f, "In progress"),
            Status::Resolved => write!(f, "Resolved"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Read-only snapshot of a problem report as supplied by the report store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPin {
    pub id: String,
    pub coordinate: Coordinate,
    pub category: Category,
    pub status: Status,
    pub priority: Priority,
}

impl ReportPin {
    /// Generate a fresh report id.
    #[cfg(feature = "uuid-support")]
    pub fn new_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Geographic box implied by a region. All bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Bounds {
    pub fn contains(&self, coord: Coordinate) -> bool {
        coord.latitude >= self.south
            && coord.latitude <= self.north
            && coord.longitude >= self.west
            && coord.longitude <= self.east
    }
}

/// A map camera: center plus the visible latitude/longitude span in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub center: Coordinate,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl Region {
    pub fn new(
        center: Coordinate,
        latitude_delta: f64,
        longitude_delta: f64,
    ) -> Result<Self, GeoError> {
        let region = Region {
            center,
            latitude_delta,
            longitude_delta,
        };
        region.validate()?;
        Ok(region)
    }

    pub fn validate(&self) -> Result<(), GeoError> {
        self.center.validate()?;
        let deltas = [
            ("latitude", self.latitude_delta),
            ("longitude", self.longitude_delta),
        ];
        for (axis, delta) in deltas {
            if !delta.is_finite() || delta <= 0.0 {
                return Err(GeoError::InvalidRegion(format!(
                    "{axis} delta must be positive, got {delta}"
                )));
            }
        }
        Ok(())
    }

    pub fn bounds(&self) -> Bounds {
        let half_lat = self.latitude_delta / 2.0;
        let half_lng = self.longitude_delta / 2.0;
        Bounds {
            north: self.center.latitude + half_lat,
            south: self.center.latitude - half_lat,
            east: self.center.longitude + half_lng,
            west: self.center.longitude - half_lng,
        }
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        self.bounds().contains(coord)
    }
}

/// Search strategy level that produced an initial region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    Nearby5km,
    Nearby10km,
    Metro50km,
    CityWide,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Nearby5km => write!(f, "nearby (5 km)"),
            Tier::Nearby10km => write!(f, "nearby (10 km)"),
            Tier::Metro50km => write!(f, "metro (50 km)"),
            Tier::CityWide => write!(f, "city-wide"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub region: Region,
    pub tier: Tier,
    pub context_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityResult {
    pub visible_pins: Vec<ReportPin>,
    pub count: usize,
}
