// Round API consumed by the game loop: locate a target, score a guess.

use std::time::Duration;
use tracing::{error, warn};

use crate::domain::address::AddressSource;
use crate::domain::errors::{LocateError, RoundError};
use crate::domain::ports::{MapView, TextSlot};
use crate::domain::{Coordinate, LocatedTarget, RoundResult, ScoreCurve, distance_km};
use crate::use_cases::locator::GeoLocator;

/// Retry policy for locating round targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundSettings {
    /// Addresses tried per locate call.
    pub max_attempts: u32,
    /// Pause before re-running locate after every attempt missed.
    pub retry_delay: Duration,
    /// Cap on outer locate retries; `None` retries forever.
    pub max_locate_rounds: Option<u32>,
}

impl Default for RoundSettings {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            retry_delay: Duration::from_secs(1),
            max_locate_rounds: None,
        }
    }
}

pub struct RoundService<A> {
    locator: GeoLocator<A>,
    curve: ScoreCurve,
    settings: RoundSettings,
}

impl<A: AddressSource> RoundService<A> {
    pub fn new(locator: GeoLocator<A>, curve: ScoreCurve, settings: RoundSettings) -> Self {
        Self {
            locator,
            curve,
            settings,
        }
    }

    pub async fn start_round(
        &mut self,
        max_attempts: u32,
    ) -> Result<Option<LocatedTarget>, LocateError> {
        self.locator.locate(max_attempts).await
    }

    pub fn evaluate_guess(&self, guess: Coordinate, target: &LocatedTarget) -> RoundResult {
        let distance_km = distance_km(guess, target.country.centroid);
        RoundResult {
            distance_km,
            points: self.curve.score(distance_km),
        }
    }

    /// Re-runs [`start_round`](Self::start_round) after `retry_delay` until a target is found
    /// or the configured retry cap is spent.
    pub async fn start_round_with_retry(
        &mut self,
        view: &mut dyn MapView,
    ) -> Result<LocatedTarget, RoundError> {
        let mut retries: u32 = 0;
        loop {
            if let Some(target) = self.start_round(self.settings.max_attempts).await? {
                return Ok(target);
            }

            view.display_text(TextSlot::Address, "Error loading IP...");

            if let Some(cap) = self.settings.max_locate_rounds {
                if retries >= cap {
                    error!(retries, "giving up on locating a round target");
                    return Err(RoundError::TargetUnavailable { retries });
                }
            }

            retries += 1;
            warn!(
                retries,
                delay_ms = self.settings.retry_delay.as_millis(),
                "no target located, retrying"
            );
            tokio::time::sleep(self.settings.retry_delay).await;
        }
    }
}
