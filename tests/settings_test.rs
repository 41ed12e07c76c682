use speedlines_sim::physic_engine::config::EmitterSettingsBuilder;
use speedlines_sim::physic_engine::{Color, EmitterSettings, EmitterType};
use std::io::Write;

#[test]
fn test_save_then_load_keeps_settings() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("speedlines.toml");

    let settings = EmitterSettingsBuilder::default()
        .emitter_type(EmitterType::Radial)
        .count(64)
        .speed(12.5)
        .color(Color::rgba(1.0, 0.0, 0.0, 0.5))
        .emitter_x(25.0)
        .build()?;
    settings.save_to_file(&path)?;

    let text = std::fs::read_to_string(&path)?;
    assert!(text.contains("type = \"radial\""), "{}", text);
    assert!(text.contains("color = \"#ff000080\""), "{}", text);

    let loaded = EmitterSettings::from_file(&path)?;
    assert_eq!(loaded.emitter_type, EmitterType::Radial);
    assert_eq!(loaded.count, 64);
    assert_eq!(loaded.speed, 12.5);
    assert_eq!(loaded.emitter_x, 25.0);
    assert_eq!(loaded.color.to_string(), "#ff000080");
    Ok(())
}

#[test]
fn test_partial_file_falls_back_to_defaults() -> anyhow::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "count = 5\nemitterRadius = 90.0")?;

    let loaded = EmitterSettings::from_file(file.path())?;
    assert_eq!(loaded.count, 5);
    assert_eq!(loaded.emitter_radius, 90.0);
    assert_eq!(loaded.speed, EmitterSettings::default().speed);
    Ok(())
}

#[test]
fn test_missing_file_reports_path() {
    let err = EmitterSettings::from_file("does/not/exist.toml").unwrap_err();
    assert!(format!("{:#}", err).contains("does/not/exist.toml"));
}

#[test]
fn test_invalid_values_are_rejected() -> anyhow::Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "type = \"spiral\"")?;
    assert!(EmitterSettings::from_file(file.path()).is_err());

    let mut file = tempfile::NamedTempFile::new()?;
    writeln!(file, "color = \"not-a-color\"")?;
    assert!(EmitterSettings::from_file(file.path()).is_err());
    Ok(())
}

#[test]
fn test_shipped_settings_file_matches_defaults() -> anyhow::Result<()> {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/config/speedlines.toml");
    assert_eq!(EmitterSettings::from_file(path)?, EmitterSettings::default());
    Ok(())
}
