use crate::models::{Region, ReportPin, VisibilityResult};

/// Pins inside the region's bounding box, bounds inclusive, in input order.
///
/// Recomputed on every call; memoizing across pans is up to the caller.
pub fn visible_pins(region: &Region, pins: &[ReportPin]) -> VisibilityResult {
    let bounds = region.bounds();
    let visible_pins: Vec<ReportPin> = pins
        .iter()
        .filter(|pin| bounds.contains(pin.coordinate))
        .cloned()
        .collect();
    let count = visible_pins.len();
    VisibilityResult {
        visible_pins,
        count,
    }
}
