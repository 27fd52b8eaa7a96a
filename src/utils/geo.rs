use serde::{Deserialize, Serialize};

const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both parts present, or nothing.
    pub fn from_parts(lat: Option<f64>, lng: Option<f64>) -> Option<Self> {
        Some(Self::new(lat?, lng?))
    }
}

/// Great-circle distance in kilometers (haversine).
pub fn distance_between(from: Coordinates, to: Coordinates) -> f64 {
    let phi1 = from.lat.to_radians();
    let phi2 = to.lat.to_radians();
    let delta_phi = (to.lat - from.lat).to_radians();
    let delta_lambda = (to.lng - from.lng).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    // rounding can push `a` just past 1 near antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Distance to a target whose coordinates may be unknown.
///
/// An unknown target is infinitely far away, so it sorts after every
/// located one and never passes a radius check.
pub fn distance_km(from: Coordinates, to: Option<Coordinates>) -> f64 {
    match to {
        Some(to) => distance_between(from, to),
        None => f64::INFINITY,
    }
}

/// Stable ascending sort by distance from `origin`; unknown positions last.
pub fn sort_by_distance<T, F>(items: &mut [T], origin: Coordinates, position: F)
where
    F: Fn(&T) -> Option<Coordinates>,
{
    items.sort_by(|a, b| {
        distance_km(origin, position(a)).total_cmp(&distance_km(origin, position(b)))
    });
}
