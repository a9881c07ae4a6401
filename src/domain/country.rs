// Country identity and centroid records.

use super::geo::Coordinate;
use std::collections::HashMap;
use std::fmt;
use std::net::Ipv4Addr;

/// Two-letter uppercase ISO 3166-1 alpha-2 code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CountryCode([u8; 2]);

impl CountryCode {
    /// Parses a two-letter ASCII code, normalising to uppercase.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().as_bytes() {
            [a, b] if a.is_ascii_alphabetic() && b.is_ascii_alphabetic() => {
                Some(Self([a.to_ascii_uppercase(), b.to_ascii_uppercase()]))
            }
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        // Both bytes are ASCII letters by construction.
        std::str::from_utf8(&self.0).unwrap_or("??")
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountryRecord {
    pub code: CountryCode,
    pub name: String,
    pub centroid: Coordinate,
}

/// Read-only code -> record mapping produced by a directory load.
pub type CountryTable = HashMap<CountryCode, CountryRecord>;

/// The resolved country location assigned to the current round.
#[derive(Debug, Clone, PartialEq)]
pub struct LocatedTarget {
    pub source_address: Ipv4Addr,
    pub country: CountryRecord,
}
