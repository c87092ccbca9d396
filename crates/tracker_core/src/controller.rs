//! View controller: owns the address, geocode result, rider position and
//! tracked path, and rebuilds the map whenever one of them changes.

use std::sync::Arc;

use geo_math::{destination_point, interpolate_path};
use geocode_client::Geocoder;
use map_display::{MapDisplay, MapSurface, Marker, MarkerOptions};
use shared::domain::{Coordinate, GeocodeResult, Path};
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::{
    animation::{animate_marker, AnimationHandle, AnimationState},
    error::ViewError,
    events::ViewEvent,
    settings::TrackerSettings,
};

const EVENT_CAPACITY: usize = 256;
const MARKER_OPTIONS: MarkerOptions = MarkerOptions { draggable: false };

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub address: String,
    pub geocode: Option<GeocodeResult>,
    pub rider: Option<Coordinate>,
    pub path: Option<Path>,
}

/// Everything drawn for one version of the view state.
struct Scene {
    map: Arc<dyn MapSurface>,
    // Held so the markers stay addressable; the rider marker moves into the
    // animation when one runs.
    _user_marker: Option<Marker>,
    _rider_marker: Option<Marker>,
    animation: Option<AnimationHandle>,
}

pub struct ViewController {
    geocoder: Arc<dyn Geocoder>,
    display: Arc<dyn MapDisplay>,
    settings: TrackerSettings,
    state: ViewState,
    scene: Option<Scene>,
    events: broadcast::Sender<ViewEvent>,
}

impl ViewController {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        display: Arc<dyn MapDisplay>,
        settings: TrackerSettings,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            geocoder,
            display,
            settings,
            state: ViewState::default(),
            scene: None,
            events,
        }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ViewEvent> {
        self.events.subscribe()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn set_address(&mut self, address: impl Into<String>) {
        self.state.address = address.into();
    }

    /// Draws the initial, marker-less map.
    pub async fn initialize(&mut self) -> Result<(), ViewError> {
        self.render().await
    }

    /// Geocodes the current address text. On failure the error is logged and
    /// returned and the view state is left as it was.
    pub async fn submit_address(&mut self) -> Result<(), ViewError> {
        let address = self.state.address.clone();
        let result = match self.geocoder.geocode(&address).await {
            Ok(result) => result,
            Err(err) => {
                let err = ViewError::from(err);
                warn!(
                    %address,
                    transient = err.kind().is_transient(),
                    "submit address failed: {err}"
                );
                self.emit(ViewEvent::Error(err.report()));
                return Err(err);
            }
        };

        let rider = destination_point(
            result.origin,
            self.settings.rider_bearing_deg,
            self.settings.rider_offset_m,
        );
        info!(origin = %result.origin, %rider, "address geocoded, rider placed");

        self.state.geocode = Some(result.clone());
        self.state.rider = Some(rider);
        self.state.path = None;
        self.emit(ViewEvent::Geocoded(result));
        self.emit(ViewEvent::RiderPlaced(rider));

        self.render().await
    }

    /// Computes the straight-line path from the rider to the geocoded
    /// address and starts animating the rider along it.
    pub async fn track_rider(&mut self) -> Result<(), ViewError> {
        let (origin, rider) = match (&self.state.geocode, self.state.rider) {
            (Some(geocode), Some(rider)) => (geocode.origin, rider),
            _ => {
                let err = ViewError::NotGeocoded;
                warn!("track rider ignored: {err}");
                self.emit(ViewEvent::Error(err.report()));
                return Err(err);
            }
        };

        let path = interpolate_path(
            rider,
            origin,
            self.settings.track_distance,
            self.settings.step_divisor,
            self.settings.path_ordering,
        );
        info!(
            points = path.len(),
            ordering = ?self.settings.path_ordering,
            "rider path computed"
        );
        self.emit(ViewEvent::PathComputed {
            points: path.len(),
            start: path.first(),
            end: path.last(),
        });
        self.state.path = Some(path);

        self.render().await
    }

    pub fn animation_state(&self) -> Option<AnimationState> {
        self.scene
            .as_ref()
            .and_then(|scene| scene.animation.as_ref())
            .map(AnimationHandle::state)
    }

    /// Waits for the current animation, if any, to reach a terminal state.
    pub async fn wait_for_animation(&mut self) -> Option<AnimationState> {
        let animation = self.scene.as_mut()?.animation.as_mut()?;
        Some(animation.finished().await)
    }

    /// Cancels any animation and removes the map.
    pub fn shutdown(&mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        let Some(mut scene) = self.scene.take() else {
            return;
        };
        if let Some(animation) = scene.animation.as_mut() {
            animation.cancel();
        }
        if let Err(err) = scene.map.destroy() {
            warn!(map = scene.map.id().0, "map teardown failed: {err:#}");
        }
    }

    /// Rebuilds the map, both markers and the animation from scratch.
    async fn render(&mut self) -> Result<(), ViewError> {
        self.teardown();
        match self.build_scene().await {
            Ok(scene) => {
                self.scene = Some(scene);
                Ok(())
            }
            Err(err) => {
                let err = ViewError::Display(err);
                warn!("map render failed: {err}");
                self.emit(ViewEvent::Error(err.report()));
                Err(err)
            }
        }
    }

    async fn build_scene(&self) -> anyhow::Result<Scene> {
        let map = self.display.create_map(self.settings.map.clone())?;
        match self.populate(&map).await {
            Ok(scene) => Ok(scene),
            Err(err) => {
                if let Err(destroy_err) = map.destroy() {
                    warn!(map = map.id().0, "map teardown failed: {destroy_err:#}");
                }
                Err(err)
            }
        }
    }

    async fn populate(&self, map: &Arc<dyn MapSurface>) -> anyhow::Result<Scene> {
        map.loaded().await?;
        self.emit(ViewEvent::MapReady { map: map.id() });

        let user_marker = self
            .state
            .geocode
            .as_ref()
            .map(|geocode| Marker::place(Arc::clone(map), MARKER_OPTIONS, geocode.origin))
            .transpose()?;
        let mut rider_marker = self
            .state
            .rider
            .map(|rider| Marker::place(Arc::clone(map), MARKER_OPTIONS, rider))
            .transpose()?;

        let mut animation = None;
        if let Some(path) = self.state.path.as_ref().filter(|p| p.len() > 1) {
            if let Some(marker) = rider_marker.take() {
                let steps = path.len();
                animation = Some(animate_marker(
                    marker,
                    path.clone(),
                    self.settings.step_interval,
                )?);
                self.emit(ViewEvent::AnimationStarted {
                    map: map.id(),
                    steps,
                });
            }
        }

        Ok(Scene {
            map: Arc::clone(map),
            _user_marker: user_marker,
            _rider_marker: rider_marker,
            animation,
        })
    }

    fn emit(&self, event: ViewEvent) {
        let _ = self.events.send(event);
    }
}

impl Drop for ViewController {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
