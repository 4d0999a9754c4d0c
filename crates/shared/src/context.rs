//! Header strings shown above the map, built from tagged engine results.

use crate::filter::ReportFilter;
use crate::models::{Selection, Tier};

fn problems(n: usize) -> String {
    if n == 1 {
        "1 problem".to_string()
    } else {
        format!("{n} problems")
    }
}

pub fn tier_label(tier: Tier, city_name: &str) -> String {
    match tier {
        Tier::Nearby5km => "Nearby area".to_string(),
        Tier::Nearby10km => "Surrounding region".to_string(),
        Tier::Metro50km => "Your region".to_string(),
        Tier::CityWide => city_name.to_string(),
    }
}

/// e.g. "Nearby area • 4 problems".
pub fn selection_label(selection: &Selection, city_name: &str) -> String {
    format!(
        "{} • {}",
        tier_label(selection.tier, city_name),
        problems(selection.context_count)
    )
}

/// Label for an active filter; `None` when every report is shown.
pub fn filtered_label(filter: &ReportFilter, filtered_total: usize) -> Option<String> {
    match filter {
        ReportFilter::All => None,
        f => Some(format!("{} • {}", f.label(), problems(filtered_total))),
    }
}

/// e.g. "3 visible • 12 total", or "12 problems on map" when nothing is in view.
pub fn visibility_label(visible: usize, total: usize) -> String {
    if visible > 0 {
        format!("{visible} visible • {total} total")
    } else {
        format!("{} on map", problems(total))
    }
}

pub fn recenter_label(visible: usize) -> String {
    format!("Your location • {}", problems(visible))
}
