use serde::{Deserialize, Serialize};

use crate::models::Coordinate;

pub const EARTH_RADIUS_KM: f64 = 6_371.0;
/// Flat meters-per-degree approximation used for boxes and route deviation.
pub const METERS_PER_DEGREE: f64 = 111_000.0;
const KM_PER_DEGREE: f64 = METERS_PER_DEGREE / 1_000.0;
/// Share of the squared route length a point may stray behind an endpoint.
const BACKWARD_TOLERANCE: f64 = 0.04;

/// `n` points evenly spaced at `i / (n + 1)` along the straight segment.
pub fn interpolate_points(start: Coordinate, end: Coordinate, n: usize) -> Vec<Coordinate> {
    let steps = (n + 1) as f64;
    (1..=n)
        .map(|i| start.interpolate(end, i as f64 / steps))
        .collect()
}

pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlon = (dlon / 2.0).sin();

    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Search radius tier for a route of the given length.
pub fn search_radius_m(distance_km: f64) -> u32 {
    if distance_km <= 1.0 {
        1_500
    } else if distance_km <= 3.0 {
        2_000
    } else if distance_km <= 10.0 {
        3_000
    } else if distance_km <= 20.0 {
        5_000
    } else {
        7_000
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    pub fn around(center: Coordinate, radius_m: f64) -> Self {
        let dlat = radius_m / METERS_PER_DEGREE;
        let dlon = radius_m / (METERS_PER_DEGREE * center.lat.to_radians().cos());
        Self {
            south: center.lat - dlat,
            west: center.lon - dlon,
            north: center.lat + dlat,
            east: center.lon + dlon,
        }
    }

    pub fn contains(&self, coord: Coordinate) -> bool {
        (self.south..=self.north).contains(&coord.lat) && (self.west..=self.east).contains(&coord.lon)
    }
}

/// Perpendicular distance from `point` to the infinite line through the
/// route, measured in degrees and scaled to kilometers.
pub fn point_to_line_km(point: Coordinate, start: Coordinate, end: Coordinate) -> f64 {
    let (vx, vy) = (end.lon - start.lon, end.lat - start.lat);
    let (px, py) = (point.lon - start.lon, point.lat - start.lat);
    let len = (vx * vx + vy * vy).sqrt();
    let degrees = if len > 0.0 {
        (vx * py - vy * px).abs() / len
    } else {
        (px * px + py * py).sqrt()
    };
    degrees * KM_PER_DEGREE
}

/// Lenient test for points lying behind the start or past the end of the
/// route. Within 4% of the squared route length counts as on-route.
pub fn is_behind_route(point: Coordinate, start: Coordinate, end: Coordinate) -> bool {
    let (vx, vy) = (end.lon - start.lon, end.lat - start.lat);
    let threshold = BACKWARD_TOLERANCE * (vx * vx + vy * vy);
    if threshold == 0.0 {
        return false;
    }
    let from_start = (point.lon - start.lon) * vx + (point.lat - start.lat) * vy;
    let from_end = (point.lon - end.lon) * vx + (point.lat - end.lat) * vy;
    from_start < -threshold || from_end > threshold
}
