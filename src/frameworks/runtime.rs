// Framework bootstrap: logging, configuration and wiring of the game loop.

use crate::domain::address::AddressGenerator;
use crate::domain::geo::MAX_SCORE_PER_ROUND;
use crate::domain::ports::{CountryDataSource, MapView, PlayerPrompt};
use crate::domain::{GameSession, ScoreCurve};
use crate::frameworks::config::{DatasetConfig, GameConfig};
use crate::interface_adapters::clients::CountryIsClient;
use crate::interface_adapters::datasets::{EmbeddedDataset, FileDataset, HttpDataset};
use crate::interface_adapters::terminal::{LinePrompt, TerminalView};
use crate::use_cases::{CountryDirectory, GameOutcome, GeoLocator, RoundService, run_game};

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::{io::Result, sync::Arc};
use tokio::io::BufReader;

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // stdout belongs to the game board.
    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let config = GameConfig::load().map_err(|e| {
        tracing::error!(error = %e, "invalid configuration");
        std::io::Error::other(e.to_string())
    })?;

    let mut view = TerminalView::new(std::io::stdout());
    let mut prompt = LinePrompt::new(BufReader::new(tokio::io::stdin()), std::io::stdout());
    run(&config, &mut view, &mut prompt).await.map(|_| ())
}

/// Plays sessions against `view`/`prompt` until the player stops.
pub async fn run<V, P>(config: &GameConfig, view: &mut V, prompt: &mut P) -> Result<GameOutcome>
where
    V: MapView,
    P: PlayerPrompt,
{
    let mut rounds = build_rounds(config)?;
    let mut session = GameSession::new(config.total_rounds, MAX_SCORE_PER_ROUND);

    tracing::info!(
        total_rounds = config.total_rounds,
        lookup_base_url = %config.lookup_base_url,
        "starting game"
    );

    let outcome = run_game(&mut rounds, &mut session, view, prompt)
        .await
        .inspect_err(|e| {
            tracing::error!(error = %e, "game aborted");
        })
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    tracing::info!(?outcome, total_score = session.total_score(), "game finished");
    Ok(outcome)
}

fn build_rounds(config: &GameConfig) -> Result<RoundService<AddressGenerator<StdRng>>> {
    let lookup = CountryIsClient::new(config.lookup_base_url.clone(), config.lookup_timeout)
        .map_err(|e| std::io::Error::other(format!("failed to initialize lookup client: {e}")))?;
    tracing::debug!(
        lookup_base_url = %lookup.base_url,
        lookup_timeout_ms = config.lookup_timeout.as_millis(),
        "lookup client configured"
    );

    let source = build_dataset(config)?;
    tracing::debug!(dataset = %source.describe(), "country dataset configured");
    // Loaded lazily on the first resolved code, then shared read-only.
    let directory = Arc::new(CountryDirectory::new(source));

    let addresses = AddressGenerator::new(StdRng::from_os_rng());
    let locator = GeoLocator::new(addresses, Arc::new(lookup), directory);

    Ok(RoundService::new(
        locator,
        ScoreCurve::default(),
        config.round_settings(),
    ))
}

fn build_dataset(config: &GameConfig) -> Result<Box<dyn CountryDataSource>> {
    Ok(match &config.dataset {
        DatasetConfig::Embedded => Box::new(EmbeddedDataset),
        DatasetConfig::File(path) => Box::new(FileDataset { path: path.clone() }),
        DatasetConfig::Url(url) => Box::new(
            HttpDataset::new(url.clone(), config.dataset_timeout).map_err(|e| {
                std::io::Error::other(format!("failed to initialize dataset client: {e}"))
            })?,
        ),
    })
}
