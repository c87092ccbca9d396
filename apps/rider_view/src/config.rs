use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context};
use geo_math::{raw_step_count, MAX_PATH_STEPS};
use geocode_client::{GeocodeConfig, DEFAULT_GEOCODE_ENDPOINT};
use map_display::MapOptions;
use serde::Deserialize;
use shared::domain::{Coordinate, PathOrdering};
use tracker_core::settings::{
    TrackerSettings, DEFAULT_MAP_CENTER, DEFAULT_MAP_CONTAINER, DEFAULT_MAP_ZOOM,
    DEFAULT_RIDER_BEARING_DEG, DEFAULT_RIDER_OFFSET_M, DEFAULT_STEP_DIVISOR,
    DEFAULT_STEP_INTERVAL, DEFAULT_TRACK_DISTANCE,
};

pub const DEFAULT_CONFIG_FILE: &str = "rider_view.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_key: String,
    pub geocode_url: String,
    pub request_timeout_secs: Option<u64>,
    pub map_container: String,
    pub map_center: Coordinate,
    pub map_zoom: f64,
    pub rider_offset_m: f64,
    pub rider_bearing_deg: f64,
    pub track_distance: f64,
    pub step_divisor: f64,
    pub step_interval_ms: u64,
    pub path_ordering: PathOrdering,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            geocode_url: DEFAULT_GEOCODE_ENDPOINT.into(),
            request_timeout_secs: Some(30),
            map_container: DEFAULT_MAP_CONTAINER.into(),
            map_center: DEFAULT_MAP_CENTER,
            map_zoom: DEFAULT_MAP_ZOOM,
            rider_offset_m: DEFAULT_RIDER_OFFSET_M,
            rider_bearing_deg: DEFAULT_RIDER_BEARING_DEG,
            track_distance: DEFAULT_TRACK_DISTANCE,
            step_divisor: DEFAULT_STEP_DIVISOR,
            step_interval_ms: DEFAULT_STEP_INTERVAL.as_millis() as u64,
            path_ordering: PathOrdering::default(),
        }
    }
}

/// Optional keys accepted in the TOML settings file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    api_key: Option<String>,
    geocode_url: Option<String>,
    request_timeout_secs: Option<u64>,
    map_container: Option<String>,
    map_center_lat: Option<f64>,
    map_center_lon: Option<f64>,
    map_zoom: Option<f64>,
    rider_offset_m: Option<f64>,
    rider_bearing_deg: Option<f64>,
    track_distance: Option<f64>,
    step_divisor: Option<f64>,
    step_interval_ms: Option<u64>,
    path_ordering: Option<PathOrdering>,
}

/// Defaults, then the settings file, then environment overrides.
///
/// An explicitly requested file must exist; the default file is optional.
pub fn load_settings(explicit_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let path = explicit_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    match fs::read_to_string(&path) {
        Ok(raw) => settings
            .apply_file(&raw)
            .with_context(|| format!("invalid settings file '{}'", path.display()))?,
        Err(err) if explicit_path.is_some() => {
            return Err(err).with_context(|| format!("failed to read '{}'", path.display()));
        }
        Err(_) => {}
    }

    settings.apply_env(|key| std::env::var(key).ok());
    Ok(settings)
}

impl Settings {
    fn apply_file(&mut self, raw: &str) -> anyhow::Result<()> {
        let file: FileSettings = toml::from_str(raw)?;
        if let Some(v) = file.api_key {
            self.api_key = v;
        }
        if let Some(v) = file.geocode_url {
            self.geocode_url = v;
        }
        if let Some(v) = file.request_timeout_secs {
            self.request_timeout_secs = Some(v);
        }
        if let Some(v) = file.map_container {
            self.map_container = v;
        }
        if let Some(v) = file.map_center_lat {
            self.map_center.latitude = v;
        }
        if let Some(v) = file.map_center_lon {
            self.map_center.longitude = v;
        }
        if let Some(v) = file.map_zoom {
            self.map_zoom = v;
        }
        if let Some(v) = file.rider_offset_m {
            self.rider_offset_m = v;
        }
        if let Some(v) = file.rider_bearing_deg {
            self.rider_bearing_deg = v;
        }
        if let Some(v) = file.track_distance {
            self.track_distance = v;
        }
        if let Some(v) = file.step_divisor {
            self.step_divisor = v;
        }
        if let Some(v) = file.step_interval_ms {
            self.step_interval_ms = v;
        }
        if let Some(v) = file.path_ordering {
            self.path_ordering = v;
        }
        Ok(())
    }

    /// Unparsable values are ignored and the previous value kept.
    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("BARIKOI_API") {
            self.api_key = v;
        }
        if let Some(v) = var("APP__BARIKOI_API_KEY") {
            self.api_key = v;
        }
        if let Some(v) = var("APP__GEOCODE_URL") {
            self.geocode_url = v;
        }
        if let Some(v) = var("APP__REQUEST_TIMEOUT_SECS") {
            if let Ok(parsed) = v.parse::<u64>() {
                self.request_timeout_secs = (parsed > 0).then_some(parsed);
            }
        }
        if let Some(v) = var("APP__RIDER_OFFSET_M") {
            if let Ok(parsed) = v.parse::<f64>() {
                self.rider_offset_m = parsed;
            }
        }
        if let Some(v) = var("APP__TRACK_DISTANCE") {
            if let Ok(parsed) = v.parse::<f64>() {
                self.track_distance = parsed;
            }
        }
        if let Some(v) = var("APP__STEP_DIVISOR") {
            if let Ok(parsed) = v.parse::<f64>() {
                self.step_divisor = parsed;
            }
        }
        if let Some(v) = var("APP__STEP_INTERVAL_MS") {
            if let Ok(parsed) = v.parse::<u64>() {
                self.step_interval_ms = parsed;
            }
        }
        if let Some(v) = var("APP__PATH_ORDERING") {
            if let Some(parsed) = parse_path_ordering(&v) {
                self.path_ordering = parsed;
            }
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_key.trim().is_empty() {
            bail!("no Barikoi API key configured; set BARIKOI_API or api_key in {DEFAULT_CONFIG_FILE}");
        }
        if self.step_divisor.is_nan() || self.step_divisor <= 0.0 {
            bail!("step_divisor must be positive, got {}", self.step_divisor);
        }
        if !self.step_divisor.is_finite() {
            bail!("step_divisor must be finite, got {}", self.step_divisor);
        }
        if !self.track_distance.is_finite() || self.track_distance < 0.0 {
            bail!(
                "track_distance must be finite and non-negative, got {}",
                self.track_distance
            );
        }
        match raw_step_count(self.track_distance, self.step_divisor) {
            Some(steps) if steps <= MAX_PATH_STEPS as f64 => {}
            _ => bail!(
                "track_distance / step_divisor must be at most {MAX_PATH_STEPS} steps, got {} / {}",
                self.track_distance,
                self.step_divisor
            ),
        }
        if !self.rider_offset_m.is_finite() {
            bail!("rider_offset_m must be finite, got {}", self.rider_offset_m);
        }
        if !self.rider_bearing_deg.is_finite() {
            bail!(
                "rider_bearing_deg must be finite, got {}",
                self.rider_bearing_deg
            );
        }
        if self.step_interval_ms == 0 {
            bail!("step_interval_ms must be positive");
        }
        Ok(())
    }

    pub fn geocode_config(&self) -> GeocodeConfig {
        GeocodeConfig {
            endpoint: self.geocode_url.clone(),
            api_key: self.api_key.clone(),
            timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn tracker_settings(&self) -> TrackerSettings {
        TrackerSettings {
            map: MapOptions {
                container: self.map_container.clone(),
                center: self.map_center,
                zoom: self.map_zoom,
            },
            rider_offset_m: self.rider_offset_m,
            rider_bearing_deg: self.rider_bearing_deg,
            track_distance: self.track_distance,
            step_divisor: self.step_divisor,
            step_interval: Duration::from_millis(self.step_interval_ms),
            path_ordering: self.path_ordering,
        }
    }
}

fn parse_path_ordering(raw: &str) -> Option<PathOrdering> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "traversal" => Some(PathOrdering::Traversal),
        "latitude_descending" | "latitude" => Some(PathOrdering::LatitudeDescending),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
