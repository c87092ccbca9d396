use super::*;

use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn defaults_match_named_constants() {
    let settings = Settings::default().tracker_settings();
    assert_eq!(settings, TrackerSettings::default());
    assert_eq!(settings.step_interval, Duration::from_millis(1000));
    assert_eq!(settings.rider_offset_m, 5000.0);
}

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    settings
        .apply_file(
            r#"
api_key = "from-file"
map_center_lat = 23.75
map_zoom = 14.0
step_interval_ms = 250
path_ordering = "latitude_descending"
"#,
        )
        .expect("apply");

    assert_eq!(settings.api_key, "from-file");
    assert_eq!(settings.map_center.latitude, 23.75);
    assert_eq!(settings.map_center.longitude, DEFAULT_MAP_CENTER.longitude);
    assert_eq!(settings.map_zoom, 14.0);
    assert_eq!(settings.step_interval_ms, 250);
    assert_eq!(settings.path_ordering, PathOrdering::LatitudeDescending);
}

#[test]
fn unknown_file_keys_are_rejected() {
    let mut settings = Settings::default();
    assert!(settings.apply_file("api_kee = \"typo\"").is_err());
}

#[test]
fn env_overrides_and_prefixed_key_wins() {
    let mut settings = Settings::default();
    settings.apply_env(env_from(&[
        ("BARIKOI_API", "plain"),
        ("APP__BARIKOI_API_KEY", "prefixed"),
        ("APP__STEP_INTERVAL_MS", "500"),
        ("APP__PATH_ORDERING", "Latitude"),
        ("APP__REQUEST_TIMEOUT_SECS", "0"),
    ]));

    assert_eq!(settings.api_key, "prefixed");
    assert_eq!(settings.step_interval_ms, 500);
    assert_eq!(settings.path_ordering, PathOrdering::LatitudeDescending);
    assert_eq!(settings.request_timeout_secs, None);
    assert!(settings.geocode_config().timeout.is_none());
}

#[test]
fn unparsable_env_values_are_ignored() {
    let mut settings = Settings::default();
    settings.apply_env(env_from(&[
        ("APP__TRACK_DISTANCE", "far"),
        ("APP__STEP_DIVISOR", ""),
        ("APP__PATH_ORDERING", "sideways"),
    ]));
    assert_eq!(settings, Settings::default());
}

#[test]
fn validation_requires_api_key_and_positive_steps() {
    let mut settings = Settings::default();
    assert!(settings.validate().is_err());

    settings.api_key = "key".into();
    assert!(settings.validate().is_ok());

    settings.step_divisor = 0.0;
    assert!(settings.validate().is_err());
    settings.step_divisor = f64::NAN;
    assert!(settings.validate().is_err());
}

#[test]
fn validation_rejects_unbounded_track_settings() {
    let valid = Settings {
        api_key: "key".into(),
        ..Settings::default()
    };
    assert!(valid.validate().is_ok());

    let cases: [(&str, fn(&mut Settings)); 8] = [
        ("infinite distance", |s| s.track_distance = f64::INFINITY),
        ("nan distance", |s| s.track_distance = f64::NAN),
        ("negative distance", |s| s.track_distance = -1.0),
        ("huge distance", |s| s.track_distance = 1e12),
        ("tiny divisor", |s| s.step_divisor = 1e-300),
        ("infinite divisor", |s| s.step_divisor = f64::INFINITY),
        ("nan offset", |s| s.rider_offset_m = f64::NAN),
        ("nan bearing", |s| s.rider_bearing_deg = f64::NAN),
    ];
    for (name, mutate) in cases {
        let mut settings = valid.clone();
        mutate(&mut settings);
        assert!(settings.validate().is_err(), "{name} should be rejected");
    }
}

#[test]
fn env_infinity_is_caught_by_validation() {
    let mut settings = Settings {
        api_key: "key".into(),
        ..Settings::default()
    };
    settings.apply_env(env_from(&[
        ("APP__TRACK_DISTANCE", "inf"),
        ("APP__RIDER_OFFSET_M", "NaN"),
    ]));
    assert!(settings.track_distance.is_infinite());
    assert!(settings.validate().is_err());
}

#[test]
fn explicit_missing_file_is_an_error() {
    let missing = env::temp_dir().join("rider_view_does_not_exist.toml");
    assert!(load_settings(Some(&missing)).is_err());
}

#[test]
fn explicit_file_is_loaded() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("rider_view_settings_{suffix}.toml"));
    fs::write(&path, "track_distance = 200.0\nstep_divisor = 20.0\n").expect("write");

    let settings = load_settings(Some(&path)).expect("load");
    assert_eq!(settings.track_distance, 200.0);
    assert_eq!(settings.step_divisor, 20.0);

    fs::remove_file(path).expect("cleanup");
}
