// Domain layer: core game types and rules.

pub mod address;
pub mod country;
pub mod errors;
pub mod geo;
pub mod ports;
pub mod session;

pub use country::{CountryCode, CountryRecord, CountryTable, LocatedTarget};
pub use geo::{Bounds, Coordinate, ScoreCurve, distance_km, score};
pub use session::{GameSession, RoundResult};
