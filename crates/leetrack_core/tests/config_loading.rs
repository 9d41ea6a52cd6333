use leetrack_core::{ConfigError, DayBoundary, TrackerConfig};
use std::fs;

#[test]
fn loads_toml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leetrack.toml");
    fs::write(
        &path,
        r#"
[review]
first_interval_days = 3
second_interval_days = 7
day_boundary = { mode = "rolling" }

[logging]
level = "warn"
dir = "/var/log/leetrack"
"#,
    )
    .unwrap();

    let config = TrackerConfig::from_file(&path).unwrap();
    assert_eq!(config.review.first_interval_days, 3);
    assert_eq!(config.review.second_interval_days, 7);
    assert_eq!(config.review.day_boundary, DayBoundary::Rolling);
    assert_eq!(config.logging.level.as_deref(), Some("warn"));
    assert_eq!(
        config.logging.dir.as_deref(),
        Some(std::path::Path::new("/var/log/leetrack"))
    );

    let intervals = config.review.intervals();
    assert_eq!(intervals.first, chrono::Duration::days(3));
    assert_eq!(intervals.second, chrono::Duration::days(7));
}

#[test]
fn loads_json_file_with_partial_sections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leetrack.json");
    fs::write(
        &path,
        r#"{"review": {"day_boundary": {"mode": "fixed", "utc_offset_minutes": 330}}}"#,
    )
    .unwrap();

    let config = TrackerConfig::from_file(&path).unwrap();
    assert_eq!(config.review.first_interval_days, 7);
    assert_eq!(config.review.second_interval_days, 20);
    assert_eq!(
        config.review.day_boundary,
        DayBoundary::Fixed {
            utc_offset_minutes: 330
        }
    );
    assert_eq!(config.logging.level, None);
}

#[test]
fn rejects_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leetrack.yaml");
    fs::write(&path, "review: {}").unwrap();

    let err = TrackerConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
}

#[test]
fn reports_missing_file_as_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = TrackerConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn parse_errors_carry_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();

    let err = TrackerConfig::from_file(&path).unwrap_err();
    match err {
        ConfigError::Parse {
            path: Some(reported),
            ..
        } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn invalid_values_fail_validation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("zero.toml");
    fs::write(&path, "[review]\nsecond_interval_days = 0\n").unwrap();

    let err = TrackerConfig::from_file(&path).unwrap_err();
    assert!(err.to_string().contains("second_interval_days"));
}
