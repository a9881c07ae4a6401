// Domain-level errors for the guessing game workflows.

use std::fmt;

/// The address generator hit its draw cap without finding a public address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressExhausted {
    pub draws: u32,
}

impl fmt::Display for AddressExhausted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no public address found after {} draws", self.draws)
    }
}

impl std::error::Error for AddressExhausted {}

/// The country dataset could not be retrieved or parsed. Fatal for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryLoadError {
    Fetch(String),
    Parse(String),
}

impl fmt::Display for DirectoryLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectoryLoadError::Fetch(msg) => write!(f, "country dataset unavailable: {msg}"),
            DirectoryLoadError::Parse(msg) => write!(f, "country dataset invalid: {msg}"),
        }
    }
}

impl std::error::Error for DirectoryLoadError {}

/// Transient IP-to-country lookup failure. Absorbed by the locator, never surfaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupFailure {
    Transport(String),
    Upstream { status: u16 },
    Decode(String),
}

impl fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupFailure::Transport(msg) => write!(f, "lookup transport error: {msg}"),
            LookupFailure::Upstream { status } => write!(f, "lookup upstream error {status}"),
            LookupFailure::Decode(msg) => write!(f, "lookup response decode error: {msg}"),
        }
    }
}

impl std::error::Error for LookupFailure {}

/// Fatal errors that abort a locate call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocateError {
    Address(AddressExhausted),
    Directory(DirectoryLoadError),
}

impl fmt::Display for LocateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocateError::Address(err) => write!(f, "{err}"),
            LocateError::Directory(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for LocateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LocateError::Address(err) => Some(err),
            LocateError::Directory(err) => Some(err),
        }
    }
}

impl From<AddressExhausted> for LocateError {
    fn from(value: AddressExhausted) -> Self {
        LocateError::Address(value)
    }
}

impl From<DirectoryLoadError> for LocateError {
    fn from(value: DirectoryLoadError) -> Self {
        LocateError::Directory(value)
    }
}

/// Errors returned when a round cannot be started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundError {
    Locate(LocateError),
    // Outer retry cap exhausted under sustained lookup failure.
    TargetUnavailable { retries: u32 },
}

impl fmt::Display for RoundError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundError::Locate(err) => write!(f, "{err}"),
            RoundError::TargetUnavailable { retries } => {
                write!(f, "no locatable address after {retries} retries")
            }
        }
    }
}

impl std::error::Error for RoundError {}

impl From<LocateError> for RoundError {
    fn from(value: LocateError) -> Self {
        RoundError::Locate(value)
    }
}

/// Invalid coordinates supplied by the player.
#[derive(Debug, Clone, PartialEq)]
pub enum GuessError {
    Malformed(String),
    LatitudeOutOfRange(f64),
    LongitudeOutOfRange(f64),
}

impl fmt::Display for GuessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuessError::Malformed(input) => {
                write!(f, "expected 'lat, lon' but got '{input}'")
            }
            GuessError::LatitudeOutOfRange(lat) => {
                write!(f, "latitude {lat} is outside [-90, 90]")
            }
            GuessError::LongitudeOutOfRange(lon) => {
                write!(f, "longitude {lon} is outside [-180, 180]")
            }
        }
    }
}

impl std::error::Error for GuessError {}
