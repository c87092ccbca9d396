use std::sync::Arc;

use super::*;
use map_display::{MapDisplay, MapOptions, MapSurface, MarkerOptions, RecordingMapDisplay};
use shared::domain::Coordinate;
use tokio::time::sleep;

fn setup() -> (RecordingMapDisplay, Arc<dyn MapSurface>, Marker) {
    let display = RecordingMapDisplay::new("token");
    let map = display
        .create_map(MapOptions {
            container: "map".into(),
            center: Coordinate::new(23.8216, 90.3938),
            zoom: 12.0,
        })
        .expect("map");
    let marker = Marker::place(
        Arc::clone(&map),
        MarkerOptions::default(),
        Coordinate::new(23.845, 90.40),
    )
    .expect("marker");
    (display, map, marker)
}

fn three_points() -> Path {
    Path::new(vec![
        Coordinate::new(23.84, 90.40),
        Coordinate::new(23.82, 90.40),
        Coordinate::new(23.80, 90.40),
    ])
}

#[tokio::test(start_paused = true)]
async fn moves_marker_once_per_period_then_stops() {
    let (display, _map, marker) = setup();
    let started = Instant::now();
    let mut handle = animate_marker(marker, three_points(), Duration::from_secs(1)).expect("start");

    sleep(Duration::from_millis(500)).await;
    assert_eq!(display.marker_additions(), 1, "no move before the first period");

    sleep(Duration::from_millis(1000)).await;
    assert_eq!(display.marker_additions(), 2);
    assert_eq!(handle.state(), AnimationState::Running { completed: 1 });

    assert_eq!(handle.finished().await, AnimationState::Stopped);
    assert_eq!(started.elapsed(), Duration::from_secs(3));
    assert_eq!(display.marker_additions(), 4);

    sleep(Duration::from_secs(10)).await;
    assert_eq!(display.marker_additions(), 4, "no moves after the path ends");

    let live = display.live_markers();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].2, Coordinate::new(23.80, 90.40));
}

#[tokio::test(start_paused = true)]
async fn cancel_stops_further_moves() {
    let (display, _map, marker) = setup();
    let mut handle = animate_marker(marker, three_points(), Duration::from_secs(1)).expect("start");

    sleep(Duration::from_millis(1500)).await;
    handle.cancel();

    assert_eq!(handle.finished().await, AnimationState::Cancelled);
    sleep(Duration::from_secs(10)).await;
    assert_eq!(display.marker_additions(), 2);
}

#[tokio::test(start_paused = true)]
async fn dropping_handle_stops_timer() {
    let (display, _map, marker) = setup();
    let handle = animate_marker(marker, three_points(), Duration::from_secs(1)).expect("start");
    let state = handle.subscribe();

    drop(handle);
    sleep(Duration::from_secs(10)).await;

    assert_eq!(display.marker_additions(), 1);
    assert!(state.has_changed().is_err(), "timer task should be gone");
}

#[tokio::test]
async fn refuses_paths_shorter_than_two() {
    let (_display, _map, marker) = setup();
    let err = animate_marker(
        marker,
        Path::new(vec![Coordinate::new(23.8, 90.4)]),
        Duration::from_secs(1),
    )
    .err()
    .expect("must fail");
    assert!(matches!(err, AnimationError::PathTooShort(1)));
}

#[tokio::test]
async fn refuses_zero_period() {
    let (_display, _map, marker) = setup();
    let err = animate_marker(marker, three_points(), Duration::ZERO)
        .err()
        .expect("must fail");
    assert!(matches!(err, AnimationError::ZeroPeriod));
}

#[tokio::test(start_paused = true)]
async fn display_failure_ends_animation() {
    let (display, map, marker) = setup();
    let mut handle = animate_marker(marker, three_points(), Duration::from_secs(1)).expect("start");

    map.destroy().expect("destroy");

    assert_eq!(handle.finished().await, AnimationState::Stopped);
    assert_eq!(display.marker_additions(), 1);
}
