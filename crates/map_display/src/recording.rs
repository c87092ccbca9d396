use std::{
    collections::{HashMap, VecDeque},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
};

use anyhow::{anyhow, bail};
use async_trait::async_trait;
use shared::domain::Coordinate;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::{MapDisplay, MapEvent, MapId, MapOptions, MapSurface, MarkerId, MarkerOptions};

const EVENT_CAPACITY: usize = 1024;
/// Default number of operations kept by [`RecordingMapDisplay::ops`].
pub const DEFAULT_HISTORY_LIMIT: usize = 4096;

/// Every mutation applied to a [`RecordingMapDisplay`], in order.
#[derive(Debug, Clone, PartialEq)]
pub enum MapOp {
    CreateMap { map: MapId, options: MapOptions },
    AddMarker {
        map: MapId,
        marker: MarkerId,
        position: Coordinate,
    },
    RemoveMarker { map: MapId, marker: MarkerId },
    DestroyMap { map: MapId },
}

struct Shared {
    ops: VecDeque<MapOp>,
    history_limit: usize,
    marker_additions: usize,
    live_markers: HashMap<MarkerId, (MapId, Coordinate)>,
    live_maps: Vec<MapId>,
}

impl Shared {
    fn record(&mut self, op: MapOp) {
        if matches!(op, MapOp::AddMarker { .. }) {
            self.marker_additions += 1;
        }
        if self.history_limit == 0 {
            return;
        }
        if self.ops.len() == self.history_limit {
            self.ops.pop_front();
        }
        self.ops.push_back(op);
    }
}

/// In-process map display that logs and records what it is asked to draw.
#[derive(Clone)]
pub struct RecordingMapDisplay {
    access_token: String,
    shared: Arc<Mutex<Shared>>,
    next_id: Arc<AtomicU64>,
    events: broadcast::Sender<MapEvent>,
}

impl RecordingMapDisplay {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_history_limit(access_token, DEFAULT_HISTORY_LIMIT)
    }

    /// Keeps only the newest `history_limit` operations; zero keeps none.
    pub fn with_history_limit(access_token: impl Into<String>, history_limit: usize) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            access_token: access_token.into(),
            shared: Arc::new(Mutex::new(Shared {
                ops: VecDeque::new(),
                history_limit,
                marker_additions: 0,
                live_markers: HashMap::new(),
                live_maps: Vec::new(),
            })),
            next_id: Arc::new(AtomicU64::new(1)),
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<MapEvent> {
        self.events.subscribe()
    }

    /// The most recent operations, oldest first.
    pub fn ops(&self) -> Vec<MapOp> {
        lock(&self.shared).ops.iter().cloned().collect()
    }

    /// Markers currently on live maps, ordered by id.
    pub fn live_markers(&self) -> Vec<(MarkerId, MapId, Coordinate)> {
        let guard = lock(&self.shared);
        let mut markers: Vec<_> = guard
            .live_markers
            .iter()
            .map(|(id, (map, pos))| (*id, *map, *pos))
            .collect();
        markers.sort_by_key(|(id, _, _)| id.0);
        markers
    }

    pub fn live_maps(&self) -> Vec<MapId> {
        lock(&self.shared).live_maps.clone()
    }

    /// Markers added since the display was created, including ones no
    /// longer in the history.
    pub fn marker_additions(&self) -> usize {
        lock(&self.shared).marker_additions
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

impl MapDisplay for RecordingMapDisplay {
    fn create_map(&self, options: MapOptions) -> anyhow::Result<Arc<dyn MapSurface>> {
        if self.access_token.trim().is_empty() {
            bail!("map display has no access token");
        }
        let map = MapId(self.next_id());
        {
            let mut guard = lock(&self.shared);
            guard.record(MapOp::CreateMap {
                map,
                options: options.clone(),
            });
            guard.live_maps.push(map);
        }
        info!(
            map = map.0,
            container = %options.container,
            center = %options.center,
            zoom = options.zoom,
            "map: created"
        );
        let _ = self.events.send(MapEvent::Created { map, options });
        Ok(Arc::new(RecordingSurface {
            id: map,
            display: self.clone(),
        }))
    }
}

struct RecordingSurface {
    id: MapId,
    display: RecordingMapDisplay,
}

impl RecordingSurface {
    fn ensure_live(&self, guard: &MutexGuard<'_, Shared>) -> anyhow::Result<()> {
        if guard.live_maps.contains(&self.id) {
            Ok(())
        } else {
            Err(anyhow!("map {} has been destroyed", self.id.0))
        }
    }
}

#[async_trait]
impl MapSurface for RecordingSurface {
    fn id(&self) -> MapId {
        self.id
    }

    async fn loaded(&self) -> anyhow::Result<()> {
        self.ensure_live(&lock(&self.display.shared))?;
        debug!(map = self.id.0, "map: loaded");
        let _ = self.display.events.send(MapEvent::Loaded { map: self.id });
        Ok(())
    }

    fn add_marker(
        &self,
        options: MarkerOptions,
        position: Coordinate,
    ) -> anyhow::Result<MarkerId> {
        let marker = MarkerId(self.display.next_id());
        {
            let mut guard = lock(&self.display.shared);
            self.ensure_live(&guard)?;
            guard.record(MapOp::AddMarker {
                map: self.id,
                marker,
                position,
            });
            guard.live_markers.insert(marker, (self.id, position));
        }
        debug!(
            map = self.id.0,
            marker = marker.0,
            draggable = options.draggable,
            %position,
            "map: marker added"
        );
        let _ = self.display.events.send(MapEvent::MarkerAdded {
            map: self.id,
            marker,
            position,
        });
        Ok(marker)
    }

    fn remove_marker(&self, marker: MarkerId) -> anyhow::Result<()> {
        {
            let mut guard = lock(&self.display.shared);
            match guard.live_markers.get(&marker) {
                Some((map, _)) if *map == self.id => {}
                _ => bail!("marker {} is not on map {}", marker.0, self.id.0),
            }
            guard.live_markers.remove(&marker);
            guard.record(MapOp::RemoveMarker {
                map: self.id,
                marker,
            });
        }
        debug!(map = self.id.0, marker = marker.0, "map: marker removed");
        let _ = self.display.events.send(MapEvent::MarkerRemoved {
            map: self.id,
            marker,
        });
        Ok(())
    }

    fn destroy(&self) -> anyhow::Result<()> {
        {
            let mut guard = lock(&self.display.shared);
            self.ensure_live(&guard)?;
            guard.live_maps.retain(|m| *m != self.id);
            guard.live_markers.retain(|_, (map, _)| *map != self.id);
            guard.record(MapOp::DestroyMap { map: self.id });
        }
        info!(map = self.id.0, "map: destroyed");
        let _ = self.display.events.send(MapEvent::Destroyed { map: self.id });
        Ok(())
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[path = "tests/recording_tests.rs"]
mod tests;
