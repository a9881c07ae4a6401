// Great-circle distance and the distance-to-score curve.

use super::errors::GuessError;

pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const MAX_SCORE_PER_ROUND: u32 = 5000;

/// A validated latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Result<Self, GuessError> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(GuessError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(GuessError::LongitudeOutOfRange(lon));
        }
        Ok(Self { lat, lon })
    }

    /// Builds a coordinate from literals already known to be in range. Not validated.
    pub const fn new_unchecked(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

/// Haversine distance in kilometres between two points given in degrees.
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Exponential decay from `max_score`, flat inside `perfect_radius_km`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreCurve {
    pub max_score: u32,
    pub perfect_radius_km: f64,
    pub decay_km: f64,
}

impl Default for ScoreCurve {
    fn default() -> Self {
        Self {
            max_score: MAX_SCORE_PER_ROUND,
            perfect_radius_km: 50.0,
            decay_km: 2000.0,
        }
    }
}

impl ScoreCurve {
    pub fn score(&self, distance_km: f64) -> u32 {
        if distance_km < self.perfect_radius_km {
            return self.max_score;
        }

        let raw = (self.max_score as f64 * (-distance_km / self.decay_km).exp()).round();
        raw.max(0.0) as u32
    }
}

/// Score using the default curve.
pub fn score(distance_km: f64) -> u32 {
    ScoreCurve::default().score(distance_km)
}

/// Rectangle enclosing a set of points, used to fit the map view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

impl Bounds {
    pub fn enclosing(a: Coordinate, b: Coordinate) -> Self {
        Self {
            south_west: Coordinate {
                lat: a.lat.min(b.lat),
                lon: a.lon.min(b.lon),
            },
            north_east: Coordinate {
                lat: a.lat.max(b.lat),
                lon: a.lon.max(b.lon),
            },
        }
    }
}
