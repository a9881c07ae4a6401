use async_trait::async_trait;
use std::net::Ipv4Addr;

use crate::domain::country::{CountryCode, CountryTable};
use crate::domain::errors::{DirectoryLoadError, LookupFailure};
use crate::domain::geo::{Bounds, Coordinate};

// Port for the external IP -> country code service.
// Ok(None) means the service answered but had no code for the address.
#[async_trait]
pub trait CountryLookup: Send + Sync {
    async fn resolve_country_code(
        &self,
        address: Ipv4Addr,
    ) -> Result<Option<CountryCode>, LookupFailure>;
}

// Port for retrieving and decoding the static country dataset.
#[async_trait]
pub trait CountryDataSource: Send + Sync {
    async fn fetch(&self) -> Result<CountryTable, DirectoryLoadError>;

    // Human-readable origin used in logs.
    fn describe(&self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Guess,
    Actual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSlot {
    Address,
    Round,
    TotalScore,
    Result,
    Final,
}

// The map/UI collaborator the game loop feeds core outputs into.
pub trait MapView: Send {
    fn clear(&mut self);
    fn render_marker(&mut self, kind: MarkerKind, at: Coordinate);
    fn render_line(&mut self, from: Coordinate, to: Coordinate);
    fn fit_bounds(&mut self, bounds: Bounds);
    fn display_text(&mut self, slot: TextSlot, text: &str);
}

// Source of player decisions (guess placement, play-again).
#[async_trait]
pub trait PlayerPrompt: Send {
    // None means the player left; the game ends without finishing the round.
    async fn next_guess(&mut self) -> Option<Coordinate>;
    async fn confirm(&mut self, question: &str) -> bool;
}
