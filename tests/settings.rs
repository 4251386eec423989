use raster_tools::config::ToolSettings;
use raster_tools::error::ConfigError;
use raster_tools::flood_fill::Connectivity;
use raster_tools::tools::FillMode;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_save_and_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");

    let settings = ToolSettings {
        tolerance: 32,
        connectivity: Connectivity::Eight,
        fill_mode: FillMode::Blend,
        angle_increment: 45.0,
        fill_color: Some([10, 20, 30, 255]),
        ..Default::default()
    };
    settings.save(&path).unwrap();

    let loaded = ToolSettings::load(&path).unwrap();
    assert_eq!(loaded, settings);
    assert_eq!(loaded.flood_fill_options().connectivity, Connectivity::Eight);
}

#[test]
fn test_load_rejects_malformed_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ tolerance: ").unwrap();

    assert!(matches!(ToolSettings::load(&path), Err(ConfigError::Parse(_))));
    assert_eq!(ToolSettings::load_or_default(&path), ToolSettings::default());
}

#[test]
fn test_load_rejects_invalid_values() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("invalid.json");
    fs::write(&path, r#"{ "canvas_width": 0 }"#).unwrap();

    assert!(matches!(ToolSettings::load(&path), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_oversized_stroke_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wide.json");
    fs::write(&path, r#"{ "stroke_width": 3000 }"#).unwrap();

    assert!(matches!(ToolSettings::load(&path), Err(ConfigError::Invalid(_))));
    assert_eq!(ToolSettings::load_or_default(&path).stroke_width, 2);
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.json");

    assert!(matches!(ToolSettings::load(&path), Err(ConfigError::Io(_))));
    assert_eq!(ToolSettings::load_or_default(&path), ToolSettings::default());
}
