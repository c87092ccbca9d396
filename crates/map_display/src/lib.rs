//! Seam between the view and whatever actually draws the map.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::domain::Coordinate;

mod recording;

pub use recording::{MapOp, RecordingMapDisplay, DEFAULT_HISTORY_LIMIT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkerId(pub u64);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapOptions {
    pub container: String,
    pub center: Coordinate,
    pub zoom: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MarkerOptions {
    pub draggable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    Created { map: MapId, options: MapOptions },
    Loaded { map: MapId },
    MarkerAdded {
        map: MapId,
        marker: MarkerId,
        position: Coordinate,
    },
    MarkerRemoved { map: MapId, marker: MarkerId },
    Destroyed { map: MapId },
}

/// Factory for map instances. Credentials are bound when the display is
/// constructed, not read from ambient state.
pub trait MapDisplay: Send + Sync {
    fn create_map(&self, options: MapOptions) -> anyhow::Result<Arc<dyn MapSurface>>;
}

#[async_trait]
pub trait MapSurface: Send + Sync {
    fn id(&self) -> MapId;
    /// Resolves once the map has fired its load event.
    async fn loaded(&self) -> anyhow::Result<()>;
    fn add_marker(&self, options: MarkerOptions, position: Coordinate)
        -> anyhow::Result<MarkerId>;
    fn remove_marker(&self, marker: MarkerId) -> anyhow::Result<()>;
    fn destroy(&self) -> anyhow::Result<()>;
}

/// A marker attached to a map surface.
pub struct Marker {
    id: MarkerId,
    options: MarkerOptions,
    position: Coordinate,
    surface: Arc<dyn MapSurface>,
}

impl Marker {
    pub fn place(
        surface: Arc<dyn MapSurface>,
        options: MarkerOptions,
        position: Coordinate,
    ) -> anyhow::Result<Self> {
        let id = surface.add_marker(options, position)?;
        Ok(Self {
            id,
            options,
            position,
            surface,
        })
    }

    pub fn id(&self) -> MarkerId {
        self.id
    }

    pub fn position(&self) -> Coordinate {
        self.position
    }

    pub fn remove(self) -> anyhow::Result<()> {
        self.surface.remove_marker(self.id)
    }

    /// Removes this marker and places a fresh one with the same options at
    /// `position`.
    pub fn replace(self, position: Coordinate) -> anyhow::Result<Self> {
        let surface = Arc::clone(&self.surface);
        let options = self.options;
        self.remove()?;
        Self::place(surface, options, position)
    }
}

impl std::fmt::Debug for Marker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Marker")
            .field("id", &self.id)
            .field("map", &self.surface.id())
            .field("position", &self.position)
            .finish()
    }
}
