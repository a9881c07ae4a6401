use serde::Deserialize;
use std::collections::HashMap;

use crate::domain::errors::DirectoryLoadError;
use crate::domain::{CountryCode, CountryRecord, CountryTable, Coordinate};

// Response payload from the country.is lookup service.
#[derive(Debug, Deserialize)]
pub struct CountryIsResponse {
    #[serde(default)]
    pub country: Option<String>,
}

// One entry of the static country dataset, keyed by code in the outer object.
#[derive(Debug, Deserialize)]
pub struct CountryEntryDto {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Decodes the `{"US": {"name": .., "lat": .., "lon": ..}, ..}` dataset into domain records.
pub fn parse_country_dataset(text: &str) -> Result<CountryTable, DirectoryLoadError> {
    let raw: HashMap<String, CountryEntryDto> =
        serde_json::from_str(text).map_err(|e| DirectoryLoadError::Parse(e.to_string()))?;

    let mut table = CountryTable::with_capacity(raw.len());
    for (key, entry) in raw {
        let code = CountryCode::parse(&key)
            .ok_or_else(|| DirectoryLoadError::Parse(format!("invalid country code '{key}'")))?;
        let centroid = Coordinate::new(entry.lat, entry.lon)
            .map_err(|e| DirectoryLoadError::Parse(format!("{code}: {e}")))?;

        table.insert(
            code,
            CountryRecord {
                code,
                name: entry.name,
                centroid,
            },
        );
    }

    if table.is_empty() {
        return Err(DirectoryLoadError::Parse("dataset has no countries".to_string()));
    }
    Ok(table)
}
