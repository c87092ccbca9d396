use super::*;

fn approx(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() <= tolerance
}

#[test]
fn zero_distance_keeps_origin() {
    let origin = Coordinate::new(23.8, 90.4);
    let dest = project_north(origin, 0.0);
    assert!(approx(dest.latitude, origin.latitude, 1e-12));
    assert!(approx(dest.longitude, origin.longitude, 1e-12));
}

#[test]
fn five_km_north_moves_about_0_045_degrees() {
    let origin = Coordinate::new(23.8, 90.4);
    let dest = project_north(origin, 5000.0);

    // 5000 m / 6371 km in degrees.
    let expected = 5000.0 / EARTH_RADIUS_M * 180.0 / std::f64::consts::PI;
    assert!(approx(dest.latitude - origin.latitude, expected, 1e-9));
    assert!(approx(dest.latitude - origin.latitude, 0.045, 0.001));
    assert!(approx(dest.longitude, origin.longitude, 1e-12));
}

#[test]
fn northward_projection_never_decreases_latitude() {
    for &(lat, lon) in &[(-60.0, -120.0), (-1.5, 0.0), (0.0, 179.9), (23.8, 90.4), (60.0, 10.0)] {
        let origin = Coordinate::new(lat, lon);
        for &d in &[0.0, 1.0, 500.0, 5000.0, 100_000.0] {
            let dest = project_north(origin, d);
            assert!(
                dest.latitude >= origin.latitude - 1e-12,
                "lat {lat} lon {lon} d {d} -> {dest}"
            );
        }
    }
}

#[test]
fn eastward_bearing_moves_longitude() {
    // https://xkcd.com/2170 worked example via the movable-type formulas.
    let dest = destination_point(Coordinate::new(53.320556, -1.729722), 96.021666667, 124_800.0);
    assert!(approx(dest.latitude, 53.188333, 0.0005));
    assert!(approx(dest.longitude, 0.133333, 0.0005));
}

#[test]
fn nan_origin_propagates() {
    let dest = project_north(Coordinate::new(f64::NAN, f64::NAN), 5000.0);
    assert!(dest.latitude.is_nan());
    assert!(dest.longitude.is_nan());
}

#[test]
fn path_length_is_steps_plus_one() {
    let a = Coordinate::new(23.80, 90.40);
    let b = Coordinate::new(23.81, 90.40);
    for &(distance, expected) in &[(1000.0, 101), (15.0, 3), (10.0, 2), (1.0, 2)] {
        let path = interpolate_path(a, b, distance, 10.0, PathOrdering::LatitudeDescending);
        assert_eq!(path.len(), expected, "distance {distance}");
    }
}

#[test]
fn latitude_ordered_path_is_sorted_and_keeps_endpoints() {
    let a = Coordinate::new(23.80, 90.40);
    let b = Coordinate::new(23.81, 90.40);
    let path = interpolate_path(a, b, 1000.0, 10.0, PathOrdering::LatitudeDescending);

    assert_eq!(path.len(), 101);
    assert!(path
        .points()
        .windows(2)
        .all(|w| w[0].latitude >= w[1].latitude));
    assert!(path.points().contains(&a));
    assert!(path.points().contains(&b));
    assert_eq!(path.first(), Some(b));
    assert_eq!(path.last(), Some(a));
}

#[test]
fn traversal_path_runs_start_to_end() {
    let a = Coordinate::new(23.80, 90.40);
    let b = Coordinate::new(23.79, 90.45);
    let path = interpolate_path(a, b, 50.0, 10.0, PathOrdering::Traversal);

    assert_eq!(path.len(), 6);
    assert_eq!(path.first(), Some(a));
    assert_eq!(path.last(), Some(b));
    assert!(path
        .points()
        .windows(2)
        .all(|w| w[1].longitude > w[0].longitude));
}

#[test]
fn identical_endpoints_give_constant_path() {
    let p = Coordinate::new(23.8, 90.4);
    for ordering in [PathOrdering::Traversal, PathOrdering::LatitudeDescending] {
        let path = interpolate_path(p, p, 30.0, 10.0, ordering);
        assert_eq!(path.len(), 4);
        assert!(path.points().iter().all(|c| *c == p));
    }
}

#[test]
fn zero_steps_yield_start_only() {
    let a = Coordinate::new(23.80, 90.40);
    let b = Coordinate::new(23.81, 90.40);
    assert_eq!(step_count(0.0, 10.0), 0);
    assert_eq!(step_count(-5.0, 10.0), 0);
    assert_eq!(step_count(f64::NAN, 10.0), 0);

    let path = interpolate_path(a, b, 0.0, 10.0, PathOrdering::Traversal);
    assert_eq!(path.points(), &[a]);
}

#[test]
fn unbounded_step_counts_do_not_blow_up() {
    assert_eq!(step_count(f64::INFINITY, 10.0), 0);
    assert_eq!(step_count(1000.0, 0.0), 0);
    assert_eq!(step_count(1e12, 10.0), MAX_PATH_STEPS);
    assert_eq!(step_count(1000.0, 1e-300), MAX_PATH_STEPS);
    assert_eq!(raw_step_count(f64::INFINITY, 10.0), None);
    assert_eq!(raw_step_count(1000.0, 10.0), Some(100.0));

    let a = Coordinate::new(23.80, 90.40);
    let b = Coordinate::new(23.81, 90.40);
    let path = interpolate_path(a, b, f64::INFINITY, 10.0, PathOrdering::Traversal);
    assert_eq!(path.points(), &[a]);

    let capped = interpolate_path(a, b, 1e12, 10.0, PathOrdering::Traversal);
    assert_eq!(capped.len(), MAX_PATH_STEPS + 1);
    assert_eq!(capped.last(), Some(b));
}
