use std::time::Duration;

use map_display::MapOptions;
use shared::domain::{Coordinate, PathOrdering};

/// How far from the geocoded address the rider starts, in metres.
pub const DEFAULT_RIDER_OFFSET_M: f64 = 5000.0;
/// Direction from the address to the rider start, degrees clockwise from north.
pub const DEFAULT_RIDER_BEARING_DEG: f64 = 0.0;
/// Resolution knob for the tracked path; divided by the step divisor to get
/// the segment count (1000 / 10 = 100 segments).
pub const DEFAULT_TRACK_DISTANCE: f64 = 1000.0;
pub const DEFAULT_STEP_DIVISOR: f64 = 10.0;
/// Delay between two rider marker moves.
pub const DEFAULT_STEP_INTERVAL: Duration = Duration::from_millis(1000);
pub const DEFAULT_MAP_CONTAINER: &str = "map";
pub const DEFAULT_MAP_CENTER: Coordinate = Coordinate {
    latitude: 23.821600277500405,
    longitude: 90.3938010872331,
};
pub const DEFAULT_MAP_ZOOM: f64 = 12.0;

#[derive(Debug, Clone, PartialEq)]
pub struct TrackerSettings {
    pub map: MapOptions,
    pub rider_offset_m: f64,
    pub rider_bearing_deg: f64,
    pub track_distance: f64,
    pub step_divisor: f64,
    pub step_interval: Duration,
    pub path_ordering: PathOrdering,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            map: MapOptions {
                container: DEFAULT_MAP_CONTAINER.into(),
                center: DEFAULT_MAP_CENTER,
                zoom: DEFAULT_MAP_ZOOM,
            },
            rider_offset_m: DEFAULT_RIDER_OFFSET_M,
            rider_bearing_deg: DEFAULT_RIDER_BEARING_DEG,
            track_distance: DEFAULT_TRACK_DISTANCE,
            step_divisor: DEFAULT_STEP_DIVISOR,
            step_interval: DEFAULT_STEP_INTERVAL,
            path_ordering: PathOrdering::default(),
        }
    }
}
