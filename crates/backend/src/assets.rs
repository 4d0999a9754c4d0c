use civicmap_shared::models::{Region, ReportPin};
use civicmap_shared::selector::SelectorConfig;
use serde::Deserialize;
use std::path::Path;

/// City-level map defaults loaded from `city.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub name: String,
    /// Shown when the user location is unknown or nothing is nearby.
    pub region: Region,
    #[serde(default)]
    pub selector: SelectorConfig,
}

pub struct Assets {
    pub city: City,
    pub seed_reports: Vec<ReportPin>,
}

impl Assets {
    pub fn load(assets_dir: &Path) -> Result<Self, String> {
        let city_path = assets_dir.join("city.json");
        let city_data = std::fs::read_to_string(&city_path)
            .map_err(|e| format!("Failed to read {}: {}", city_path.display(), e))?;
        let city: City = serde_json::from_str(&city_data)
            .map_err(|e| format!("Failed to parse city.json: {}", e))?;
        city.region
            .validate()
            .map_err(|e| format!("Invalid region in city.json: {}", e))?;
        city.selector
            .validate()
            .map_err(|e| format!("Invalid selector in city.json: {}", e))?;

        let reports_path = assets_dir.join("reports.json");
        let seed_reports = if reports_path.exists() {
            let data = std::fs::read_to_string(&reports_path)
                .map_err(|e| format!("Failed to read {}: {}", reports_path.display(), e))?;
            let pins: Vec<ReportPin> = serde_json::from_str(&data)
                .map_err(|e| format!("Failed to parse reports.json: {}", e))?;
            let (valid, invalid): (Vec<_>, Vec<_>) =
                pins.into_iter().partition(|p| p.coordinate.validate().is_ok());
            for pin in &invalid {
                tracing::warn!(id = %pin.id, "Skipping seed report with invalid coordinate");
            }
            valid
        } else {
            Vec::new()
        };

        tracing::info!(
            city = %city.name,
            seed_reports = seed_reports.len(),
            "Loaded city assets"
        );

        Ok(Assets { city, seed_reports })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CITY_JSON: &str = r#"{
        "name": "Rio de Janeiro",
        "region": {
            "center": {"latitude": -22.9068, "longitude": -43.1729},
            "latitudeDelta": 0.3,
            "longitudeDelta": 0.3
        }
    }"#;

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_load_city_with_default_selector() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "city.json", CITY_JSON);

        let assets = Assets::load(dir.path()).unwrap();
        assert_eq!(assets.city.name, "Rio de Janeiro");
        assert_eq!(assets.city.selector, SelectorConfig::default());
        assert!(assets.seed_reports.is_empty());
    }

    #[test]
    fn test_load_selector_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let json = CITY_JSON.replacen(
            "\"name\"",
            "\"selector\": {\"nearbyMinPins\": 5, \"region\": {\"maxDelta\": 0.2}}, \"name\"",
            1,
        );
        write(dir.path(), "city.json", &json);

        let assets = Assets::load(dir.path()).unwrap();
        assert_eq!(assets.city.selector.nearby_min_pins, 5);
        assert_eq!(assets.city.selector.expanded_min_pins, 2);
        assert!((assets.city.selector.region.max_delta - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_city_region_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "city.json", &CITY_JSON.replace("0.3,", "0.0,"));
        let err = Assets::load(dir.path()).err().unwrap();
        assert!(err.contains("Invalid region"));
    }

    #[test]
    fn test_missing_city_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Assets::load(dir.path()).is_err());
    }

    #[test]
    fn test_seed_reports_skip_invalid_coordinates() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "city.json", CITY_JSON);
        write(
            dir.path(),
            "reports.json",
            r#"[
                {"id": "ok", "coordinate": {"latitude": -22.9, "longitude": -43.1},
                 "category": "road", "status": "pending", "priority": "low"},
                {"id": "bad", "coordinate": {"latitude": 120.0, "longitude": -43.1},
                 "category": "road", "status": "pending", "priority": "low"}
            ]"#,
        );

        let assets = Assets::load(dir.path()).unwrap();
        assert_eq!(assets.seed_reports.len(), 1);
        assert_eq!(assets.seed_reports[0].id, "ok");
    }
}
