//! Server configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use magic_ball::{CardKind, OpponentKind, ScoreWeights};
use serde::{Deserialize, Serialize};
use std::path::Path;
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument, warn};

/// Settings for the HTTP server and new games.
///
/// Every field has a default, so a partial TOML file is valid.
#[derive(Debug, Clone, PartialEq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    host: String,

    /// Port to bind.
    port: u16,

    /// Policy driving the automated side.
    opponent: OpponentKind,

    /// Seed for dealing and opponent randomness. Entropy when absent.
    seed: Option<u64>,

    /// Cards dealt to each side when no explicit hand is given.
    cards_per_hand: usize,

    /// Cards available for dealing. The whole catalog when absent.
    card_pool: Option<Vec<CardKind>>,

    /// Hide the automated side's unused cards from clients.
    conceal_opponent_cards: bool,

    /// Weights for the heuristic opponent.
    score_weights: ScoreWeights,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            opponent: OpponentKind::default(),
            seed: None,
            cards_per_hand: 3,
            card_pool: None,
            conceal_opponent_cards: true,
            score_weights: ScoreWeights::default(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(
            host = %config.host,
            port = config.port,
            opponent = %config.opponent,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            warn!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// The configured pool, or every card in the catalog.
    pub fn resolved_card_pool(&self) -> Vec<CardKind> {
        self.card_pool
            .clone()
            .unwrap_or_else(|| CardKind::iter().collect())
    }

    /// `host:port` for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
