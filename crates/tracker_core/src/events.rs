//! Notifications the view controller publishes to whatever renders it.

use map_display::MapId;
use shared::{
    domain::{Coordinate, GeocodeResult},
    error::ErrorReport,
};

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    MapReady {
        map: MapId,
    },
    Geocoded(GeocodeResult),
    RiderPlaced(Coordinate),
    PathComputed {
        points: usize,
        start: Option<Coordinate>,
        end: Option<Coordinate>,
    },
    AnimationStarted {
        map: MapId,
        steps: usize,
    },
    Error(ErrorReport),
}
