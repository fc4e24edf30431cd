//! Tests for colour maps and style files.

use renderer::style::{hex_to_rgba, ColorMap, StyleConfig};
use renderer::{Color, StyleError};

const STYLE_JSON: &str = r##"{
    "version": "1.0",
    "styles": {
        "heat": {
            "name": "Heat",
            "description": "Black body ramp",
            "units": "K",
            "stops": [
                {"value": 300, "color": "#000000"},
                {"value": 1150, "color": "#ff8000", "label": "1150 K"},
                {"value": 2000, "color": "#ffff00"}
            ]
        },
        "flat": {
            "name": "Flat",
            "stops": [
                {"value": 0, "color": "#000000"},
                {"value": 0, "color": "#ffffff"}
            ]
        }
    }
}"##;

// ============================================================================
// Style file parsing
// ============================================================================

#[test]
fn test_style_config_from_json() {
    let config = StyleConfig::from_json(STYLE_JSON).unwrap();
    let heat = &config.styles["heat"];
    assert_eq!(heat.name, "Heat");
    assert_eq!(heat.units.as_deref(), Some("K"));
    assert_eq!(heat.stops.len(), 3);
    assert_eq!(heat.stops[1].label.as_deref(), Some("1150 K"));
    assert!(!config.styles.contains_key("missing"));
}

#[test]
fn test_style_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("styles.json");
    std::fs::write(&path, STYLE_JSON).unwrap();

    let config = StyleConfig::from_file(&path).unwrap();
    assert_eq!(config.styles.len(), 2);

    let missing = StyleConfig::from_file(dir.path().join("nope.json"));
    assert!(matches!(missing, Err(StyleError::Io { .. })));
}

#[test]
fn test_malformed_json_is_a_parse_error() {
    assert!(matches!(
        StyleConfig::from_json("{ not json"),
        Err(StyleError::Parse(_))
    ));
}

#[test]
fn test_colormaps_reject_collapsed_stops() {
    let config = StyleConfig::from_json(STYLE_JSON).unwrap();
    assert!(matches!(config.colormaps(), Err(StyleError::TooFewStops(name)) if name == "flat"));
}

#[test]
fn test_custom_map_follows_stop_positions() {
    let config = StyleConfig::from_json(STYLE_JSON).unwrap();
    let heat = ColorMap::from_stops("heat", &config.styles["heat"].stops).unwrap();

    assert_eq!(heat.sample(0.0), Color::BLACK);
    assert_eq!(heat.sample(0.5), Color::rgb(255, 128, 0));
    assert_eq!(heat.sample(1.0), Color::rgb(255, 255, 0));
}

// ============================================================================
// Built-in maps
// ============================================================================

#[test]
fn test_coolwarm_runs_blue_to_red() {
    let map = ColorMap::from_name("coolwarm").unwrap();
    let low = map.sample(0.0);
    let high = map.sample(1.0);
    assert!(low.b > low.r);
    assert!(high.r > high.b);
}

#[test]
fn test_plasma_endpoints() {
    let map = ColorMap::from_name("Plasma").unwrap();
    assert_eq!(map.sample(0.0), Color::rgb(13, 8, 135));
    assert_eq!(map.sample(1.0), Color::rgb(240, 249, 33));
}

#[test]
fn test_unknown_colormap() {
    assert!(matches!(
        ColorMap::from_name("rainbow"),
        Err(StyleError::UnknownColormap(name)) if name == "rainbow"
    ));
}

#[test]
fn test_hex_parsing() {
    assert_eq!(hex_to_rgba("#1f77b4"), Some(Color::rgb(31, 119, 180)));
    assert_eq!(hex_to_rgba(" #FFFFFF "), Some(Color::WHITE));
    assert_eq!(hex_to_rgba("#12345"), None);
}
