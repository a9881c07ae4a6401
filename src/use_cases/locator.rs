use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::domain::LocatedTarget;
use crate::domain::address::AddressSource;
use crate::domain::errors::LocateError;
use crate::domain::ports::CountryLookup;
use crate::use_cases::directory::CountryDirectory;

// Outcome of a single generate -> resolve -> directory pass.
enum Attempt {
    Found(LocatedTarget),
    Miss,
}

/// Turns random public addresses into a located round target.
///
/// Lookup misses and transient lookup failures are absorbed; only generator exhaustion and
/// directory load failure escape as errors.
pub struct GeoLocator<A> {
    addresses: A,
    lookup: Arc<dyn CountryLookup>,
    directory: Arc<CountryDirectory>,
}

impl<A: AddressSource> GeoLocator<A> {
    pub fn new(
        addresses: A,
        lookup: Arc<dyn CountryLookup>,
        directory: Arc<CountryDirectory>,
    ) -> Self {
        Self {
            addresses,
            lookup,
            directory,
        }
    }

    /// Tries up to `max_attempts` fresh addresses, returning the first one that maps to a
    /// known country. `Ok(None)` means every attempt missed.
    pub async fn locate(
        &mut self,
        max_attempts: u32,
    ) -> Result<Option<LocatedTarget>, LocateError> {
        for attempt in 1..=max_attempts {
            let address = self.addresses.next_address().inspect_err(|e| {
                error!(attempt, error = %e, "address generation exhausted");
            })?;

            if let Attempt::Found(target) = self.resolve(attempt, address).await? {
                info!(
                    attempt,
                    address = %target.source_address,
                    country = %target.country.code,
                    "target located"
                );
                return Ok(Some(target));
            }
        }

        warn!(max_attempts, "all locate attempts missed");
        Ok(None)
    }

    async fn resolve(&self, attempt: u32, address: Ipv4Addr) -> Result<Attempt, LocateError> {
        let code = match self.lookup.resolve_country_code(address).await {
            Ok(Some(code)) => code,
            Ok(None) => {
                debug!(attempt, %address, "no country for address");
                return Ok(Attempt::Miss);
            }
            Err(e) => {
                debug!(attempt, %address, error = %e, "lookup failed, treating as no result");
                return Ok(Attempt::Miss);
            }
        };

        let countries = self.directory.load().await?;
        match countries.get(&code) {
            Some(country) => Ok(Attempt::Found(LocatedTarget {
                source_address: address,
                country: country.clone(),
            })),
            None => {
                // Satellite/anycast ranges report codes with no centroid.
                debug!(attempt, %address, %code, "country code not in directory");
                Ok(Attempt::Miss)
            }
        }
    }
}
