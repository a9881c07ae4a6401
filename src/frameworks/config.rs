use serde::Deserialize;
use std::{env, fmt, fs, path::PathBuf, time::Duration};
use url::Url;

use crate::use_cases::RoundSettings;

// Runtime configuration: defaults, then the optional TOML file, then environment variables.

pub const CONFIG_PATH_VAR: &str = "IP_GEOGUESSER_CONFIG";

pub const DEFAULT_LOOKUP_BASE_URL: &str = "https://api.country.is";
pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_millis(3000);
// Whole-body download of a remote dataset, not a single lookup.
pub const DEFAULT_DATASET_TIMEOUT: Duration = Duration::from_millis(10_000);
pub const DEFAULT_TOTAL_ROUNDS: u32 = 5;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Read { path: PathBuf, message: String },
    Parse { path: PathBuf, message: String },
    InvalidValue { key: &'static str, value: String },
    InvalidUrl { key: &'static str, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, message } => {
                write!(f, "failed to read {}: {message}", path.display())
            }
            ConfigError::Parse { path, message } => {
                write!(f, "failed to parse {}: {message}", path.display())
            }
            ConfigError::InvalidValue { key, value } => write!(f, "invalid {key}: '{value}'"),
            ConfigError::InvalidUrl { key, message } => write!(f, "invalid {key}: {message}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Where the country centroid table comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetConfig {
    Embedded,
    File(PathBuf),
    Url(String),
}

impl DatasetConfig {
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("embedded") {
            return Ok(DatasetConfig::Embedded);
        }
        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return validate_http_url("COUNTRY_DATASET", raw).map(DatasetConfig::Url);
        }
        Ok(DatasetConfig::File(PathBuf::from(raw)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub lookup_base_url: String,
    pub lookup_timeout: Duration,
    pub dataset: DatasetConfig,
    pub dataset_timeout: Duration,
    pub total_rounds: u32,
    pub max_attempts: u32,
    pub retry_delay: Duration,
    // None keeps retrying until a target is found.
    pub max_locate_rounds: Option<u32>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            lookup_base_url: DEFAULT_LOOKUP_BASE_URL.to_string(),
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
            dataset: DatasetConfig::Embedded,
            dataset_timeout: DEFAULT_DATASET_TIMEOUT,
            total_rounds: DEFAULT_TOTAL_ROUNDS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
            max_locate_rounds: None,
        }
    }
}

// Mirrors the environment keys in snake_case.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    lookup_base_url: Option<String>,
    lookup_timeout_ms: Option<u64>,
    country_dataset: Option<String>,
    dataset_timeout_ms: Option<u64>,
    total_rounds: Option<u32>,
    max_attempts: Option<u32>,
    retry_delay_ms: Option<u64>,
    max_locate_rounds: Option<u32>,
}

impl GameConfig {
    /// Reads `IP_GEOGUESSER_CONFIG` (if set) and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let file = match env::var(CONFIG_PATH_VAR) {
            Ok(path) if !path.trim().is_empty() => {
                let path = PathBuf::from(path.trim());
                let text = fs::read_to_string(&path).map_err(|e| ConfigError::Read {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
                tracing::debug!(path = %path.display(), "loaded config file");
                Some((path, text))
            }
            _ => None,
        };

        Self::from_sources(
            file.as_ref().map(|(path, text)| (path.clone(), text.as_str())),
            |key| env::var(key).ok(),
        )
    }

    /// Layers `file` (path, TOML text) and then `lookup_env` over the defaults.
    pub fn from_sources(
        file: Option<(PathBuf, &str)>,
        lookup_env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = GameConfig::default();

        if let Some((path, text)) = file {
            let parsed = toml::from_str::<FileConfig>(text).map_err(|e| ConfigError::Parse {
                path,
                message: e.to_string(),
            })?;
            config.apply_file(parsed)?;
        }

        config.apply_env(&lookup_env)?;
        config.validate()?;
        Ok(config)
    }

    pub fn round_settings(&self) -> RoundSettings {
        RoundSettings {
            max_attempts: self.max_attempts,
            retry_delay: self.retry_delay,
            max_locate_rounds: self.max_locate_rounds,
        }
    }

    fn apply_file(&mut self, file: FileConfig) -> Result<(), ConfigError> {
        if let Some(url) = file.lookup_base_url {
            self.lookup_base_url = url;
        }
        if let Some(ms) = file.lookup_timeout_ms {
            self.lookup_timeout = Duration::from_millis(ms);
        }
        if let Some(dataset) = file.country_dataset {
            self.dataset = DatasetConfig::parse(&dataset)?;
        }
        if let Some(ms) = file.dataset_timeout_ms {
            self.dataset_timeout = Duration::from_millis(ms);
        }
        if let Some(rounds) = file.total_rounds {
            self.total_rounds = rounds;
        }
        if let Some(attempts) = file.max_attempts {
            self.max_attempts = attempts;
        }
        if let Some(ms) = file.retry_delay_ms {
            self.retry_delay = Duration::from_millis(ms);
        }
        if file.max_locate_rounds.is_some() {
            self.max_locate_rounds = file.max_locate_rounds;
        }
        Ok(())
    }

    fn apply_env(&mut self, lookup_env: &impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(url) = lookup_env("LOOKUP_BASE_URL") {
            self.lookup_base_url = url;
        }
        if let Some(ms) = parse_env::<u64>(lookup_env, "LOOKUP_TIMEOUT_MS")? {
            self.lookup_timeout = Duration::from_millis(ms);
        }
        if let Some(dataset) = lookup_env("COUNTRY_DATASET") {
            self.dataset = DatasetConfig::parse(&dataset)?;
        }
        if let Some(ms) = parse_env::<u64>(lookup_env, "DATASET_TIMEOUT_MS")? {
            self.dataset_timeout = Duration::from_millis(ms);
        }
        if let Some(rounds) = parse_env::<u32>(lookup_env, "TOTAL_ROUNDS")? {
            self.total_rounds = rounds;
        }
        if let Some(attempts) = parse_env::<u32>(lookup_env, "MAX_ATTEMPTS")? {
            self.max_attempts = attempts;
        }
        if let Some(ms) = parse_env::<u64>(lookup_env, "RETRY_DELAY_MS")? {
            self.retry_delay = Duration::from_millis(ms);
        }
        if let Some(raw) = lookup_env("MAX_LOCATE_ROUNDS") {
            let raw = raw.trim();
            self.max_locate_rounds = if raw.is_empty() || raw.eq_ignore_ascii_case("unbounded") {
                None
            } else {
                Some(raw.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "MAX_LOCATE_ROUNDS",
                    value: raw.to_string(),
                })?)
            };
        }
        Ok(())
    }

    fn validate(&mut self) -> Result<(), ConfigError> {
        self.lookup_base_url = validate_http_url("LOOKUP_BASE_URL", &self.lookup_base_url)?;
        if self.total_rounds == 0 {
            return Err(ConfigError::InvalidValue {
                key: "TOTAL_ROUNDS",
                value: "0".to_string(),
            });
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                key: "MAX_ATTEMPTS",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(
    lookup_env: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup_env(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value: raw }),
    }
}

fn validate_http_url(key: &'static str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|e| ConfigError::InvalidUrl {
        key,
        message: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl {
            key,
            message: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    Ok(trimmed.to_string())
}
