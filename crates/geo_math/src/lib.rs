//! Spherical projection and straight-line path helpers.

use shared::domain::{Coordinate, Path, PathOrdering};

/// Mean Earth radius in metres; the planet is modelled as a sphere.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Moves `distance_m` metres from `origin` along the great circle leaving at
/// `bearing_deg` (degrees clockwise from due north).
///
/// Inputs are not validated: a NaN origin yields a NaN destination, and no
/// wraparound is applied at the antimeridian or the poles.
pub fn destination_point(origin: Coordinate, bearing_deg: f64, distance_m: f64) -> Coordinate {
    let delta = distance_m / EARTH_RADIUS_M;
    let bearing = bearing_deg.to_radians();
    let lat1 = origin.latitude.to_radians();
    let lon1 = origin.longitude.to_radians();

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * bearing.cos()).asin();
    let lon2 = lon1
        + (bearing.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    Coordinate::new(lat2.to_degrees(), lon2.to_degrees())
}

/// [`destination_point`] with the bearing fixed at due north.
pub fn project_north(origin: Coordinate, distance_m: f64) -> Coordinate {
    destination_point(origin, 0.0, distance_m)
}

/// Upper bound on the segments of one interpolated path.
pub const MAX_PATH_STEPS: usize = 100_000;

/// Number of segments `interpolate_path` splits a line into, before capping.
///
/// `distance` is a resolution knob, not a measured separation between the
/// endpoints. Returns `None` for NaN and infinite ratios.
pub fn raw_step_count(distance: f64, step_divisor: f64) -> Option<f64> {
    let steps = (distance / step_divisor).ceil();
    if steps.is_finite() {
        Some(steps.max(0.0))
    } else {
        None
    }
}

/// Segment count used by `interpolate_path`: zero for non-positive, NaN or
/// infinite ratios, at most [`MAX_PATH_STEPS`] otherwise.
pub fn step_count(distance: f64, step_divisor: f64) -> usize {
    match raw_step_count(distance, step_divisor) {
        Some(steps) if steps >= MAX_PATH_STEPS as f64 => MAX_PATH_STEPS,
        Some(steps) => steps as usize,
        None => 0,
    }
}

/// Linearly interpolates each axis between `start` and `end`, producing
/// `step_count(distance, step_divisor) + 1` points including both ends.
///
/// This is a straight line in lat/lon space, not a geodesic. With zero steps
/// the result is the single `start` point.
pub fn interpolate_path(
    start: Coordinate,
    end: Coordinate,
    distance: f64,
    step_divisor: f64,
    ordering: PathOrdering,
) -> Path {
    let steps = step_count(distance, step_divisor);
    if steps == 0 {
        return Path::new(vec![start]);
    }

    let d_lat = end.latitude - start.latitude;
    let d_lon = end.longitude - start.longitude;
    let points = (0..=steps)
        .map(|i| {
            let f = i as f64 / steps as f64;
            Coordinate::new(start.latitude + f * d_lat, start.longitude + f * d_lon)
        })
        .collect();

    let mut path = Path::new(points);
    if ordering == PathOrdering::LatitudeDescending {
        path.sort_by_latitude_desc();
    }
    path
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
