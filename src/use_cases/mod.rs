// Use cases layer: application workflows for the guessing game.

pub mod directory;
pub mod game;
pub mod locator;
pub mod round;
#[cfg(test)]
pub(crate) mod test_support;

pub use directory::CountryDirectory;
pub use game::{GameOutcome, run_game};
pub use locator::GeoLocator;
pub use round::{RoundService, RoundSettings};
