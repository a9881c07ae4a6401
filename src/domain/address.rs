// Random public IPv4 generation with reserved-range filtering.

use super::errors::AddressExhausted;
use rand::Rng;
use std::net::Ipv4Addr;
use std::ops::RangeInclusive;

/// Draw cap guarding against a pathological randomness source.
pub const DEFAULT_MAX_DRAWS: u32 = 1000;

const FIRST_OCTET: RangeInclusive<u8> = 1..=223;
const MIDDLE_OCTET: RangeInclusive<u8> = 0..=255;
// 0 and 255 denote network/broadcast addresses.
const LAST_OCTET: RangeInclusive<u8> = 1..=254;

/// Source of uniformly distributed octets.
pub trait OctetSource {
    fn octet(&mut self, range: RangeInclusive<u8>) -> u8;
}

impl<R: Rng + ?Sized> OctetSource for R {
    fn octet(&mut self, range: RangeInclusive<u8>) -> u8 {
        self.random_range(range)
    }
}

/// Returns true for the private, loopback and link-local blocks that cannot be geolocated.
pub fn is_reserved(address: Ipv4Addr) -> bool {
    let [a, b, _, _] = address.octets();
    a == 10
        || a == 127
        || (a == 169 && b == 254)
        || (a == 172 && (16..=31).contains(&b))
        || (a == 192 && b == 168)
}

/// Anything that can hand out candidate round addresses.
pub trait AddressSource {
    fn next_address(&mut self) -> Result<Ipv4Addr, AddressExhausted>;
}

pub struct AddressGenerator<S> {
    source: S,
    max_draws: u32,
}

impl<S: OctetSource> AddressGenerator<S> {
    pub fn new(source: S) -> Self {
        Self::with_max_draws(source, DEFAULT_MAX_DRAWS)
    }

    pub fn with_max_draws(source: S, max_draws: u32) -> Self {
        Self { source, max_draws }
    }

    /// Draws candidates until one falls outside the reserved ranges.
    pub fn generate(&mut self) -> Result<Ipv4Addr, AddressExhausted> {
        for _ in 0..self.max_draws {
            let candidate = Ipv4Addr::new(
                self.source.octet(FIRST_OCTET),
                self.source.octet(MIDDLE_OCTET),
                self.source.octet(MIDDLE_OCTET),
                self.source.octet(LAST_OCTET),
            );
            if !is_reserved(candidate) {
                return Ok(candidate);
            }
        }

        Err(AddressExhausted {
            draws: self.max_draws,
        })
    }
}

impl<S: OctetSource> AddressSource for AddressGenerator<S> {
    fn next_address(&mut self) -> Result<Ipv4Addr, AddressExhausted> {
        self.generate()
    }
}
