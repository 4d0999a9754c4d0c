use std::str::FromStr;

use crate::error::GeoError;
use crate::models::{Category, ReportPin, Status};

/// Status or category predicate applied to the report set before visibility checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFilter {
    #[default]
    All,
    Status(Status),
    Category(Category),
}

impl ReportFilter {
    pub fn id(&self) -> &'static str {
        match self {
            ReportFilter::All => "all",
            ReportFilter::Status(s) => s.id(),
            ReportFilter::Category(c) => c.id(),
        }
    }

    pub fn label(&self) -> String {
        match self {
            ReportFilter::All => "All".to_string(),
            ReportFilter::Status(s) => s.to_string(),
            ReportFilter::Category(c) => c.to_string(),
        }
    }

    pub fn matches(&self, pin: &ReportPin) -> bool {
        match self {
            ReportFilter::All => true,
            ReportFilter::Status(s) => pin.status == *s,
            ReportFilter::Category(c) => pin.category == *c,
        }
    }

    pub fn apply(&self, pins: &[ReportPin]) -> Vec<ReportPin> {
        pins.iter().filter(|p| self.matches(p)).cloned().collect()
    }
}

impl FromStr for ReportFilter {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(ReportFilter::All);
        }
        // Status ids are checked first.
        if let Some(status) = Status::from_id(s) {
            return Ok(ReportFilter::Status(status));
        }
        Category::from_id(s)
            .map(ReportFilter::Category)
            .ok_or_else(|| GeoError::UnknownFilter(s.to_string()))
    }
}

impl std::fmt::Display for ReportFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}
