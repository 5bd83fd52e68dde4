//! Magic Ball - unified CLI
//!
//! Serves the JSON/HTTP game API or runs batch simulations.

#![warn(missing_docs)]

use anyhow::Result;
use clap::Parser;
use magic_ball::OpponentKind;
use magic_ball_server::cli::{Cli, Command};
use magic_ball_server::simulate::DEFAULT_MAX_PLIES;
use magic_ball_server::{ServerConfig, SessionManager, SimulationOptions, router, run_simulation};
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,magic_ball=debug,magic_ball_server=debug")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { config, host, port } => run_server(config, host, port).await,
        Command::Simulate {
            games,
            white,
            black,
            seed,
            cards_per_hand,
            config,
        } => run_simulate(config, games, white, black, seed, cards_per_hand),
    }
}

/// Applies `MAGIC_BALL_HOST` / `MAGIC_BALL_PORT`, then CLI flags, over the file config.
fn layered_config(path: &Path, host: Option<String>, port: Option<u16>) -> Result<ServerConfig> {
    let mut config = ServerConfig::load_or_default(path)?;

    if let Ok(env_host) = std::env::var("MAGIC_BALL_HOST") {
        config = config.with_host(env_host);
    }
    if let Ok(env_port) = std::env::var("MAGIC_BALL_PORT") {
        match env_port.parse::<u16>() {
            Ok(env_port) => config = config.with_port(env_port),
            Err(e) => warn!(value = %env_port, error = %e, "Ignoring invalid MAGIC_BALL_PORT"),
        }
    }
    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }
    Ok(config)
}

/// Run the HTTP game server
#[instrument(skip_all, fields(config_path = %config_path.display()))]
async fn run_server(config_path: PathBuf, host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = layered_config(&config_path, host, port)?;
    let address = config.bind_address();

    info!(
        opponent = %config.opponent(),
        cards_per_hand = config.cards_per_hand(),
        conceal = config.conceal_opponent_cards(),
        "Starting Magic Ball server"
    );

    let app = router(SessionManager::new(config));
    let listener = tokio::net::TcpListener::bind(address.as_str()).await?;
    info!(%address, "Server ready at http://{}/api/game", address);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Run a batch of automated games
#[instrument(skip_all, fields(config_path = %config_path.display()))]
fn run_simulate(
    config_path: PathBuf,
    games: usize,
    white: OpponentKind,
    black: OpponentKind,
    seed: Option<u64>,
    cards_per_hand: Option<usize>,
) -> Result<()> {
    let config = ServerConfig::load_or_default(&config_path)?;
    let options = SimulationOptions {
        games,
        white,
        black,
        seed: seed.or(*config.seed()).unwrap_or(0),
        cards_per_hand: cards_per_hand.unwrap_or(*config.cards_per_hand()),
        card_pool: config.resolved_card_pool(),
        score_weights: *config.score_weights(),
        max_plies: DEFAULT_MAX_PLIES,
    };

    info!(%white, %black, seed = options.seed, "Running simulation");
    let summary = run_simulation(&options)?;
    println!("{white} (white) vs {black} (black)");
    println!("{summary}");
    Ok(())
}
