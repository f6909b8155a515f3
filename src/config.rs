//! Configuration management for the engine and HTTP server.
//!
//! Provides sensible defaults, TOML file loading, and environment variable
//! overrides. House-edge constants are configuration, not hard-coded facts:
//! operators tune them here and the engine reads them at derivation time.

use crate::games::GameType;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub engine: EngineConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            allowed_origins: vec!["*".to_string()],
            request_timeout_secs: 30,
        }
    }
}

/// Outcome engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Smallest accepted stake, in base currency units
    pub min_stake: u64,
    /// Largest accepted stake, in base currency units
    pub max_stake: u64,
    /// Opening balance handed to new users by the in-memory ledger
    pub starting_balance: u64,
    /// Per-game house edge percentages
    pub edges: HouseEdges,
    /// Largest multiplier limbo will report
    pub limbo_max: f64,
    /// Largest crash point the curve is clamped to
    pub crash_max: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_stake: 1,
            max_stake: 1_000_000_000,
            starting_balance: 100_000_000,
            edges: HouseEdges::default(),
            limbo_max: 1_000_000.0,
            crash_max: 10_000.0,
        }
    }
}

/// House edge per game, in percent of the fair payout.
///
/// Roulette, plinko, keno, bingo and blackjack carry their edge inside
/// their payout tables/rules, so they have no entry here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseEdges {
    pub coin_flip: f64,
    pub rps: f64,
    pub dice: f64,
    pub limbo: f64,
    pub crash: f64,
    pub mines: f64,
    pub hilo: f64,
}

impl Default for HouseEdges {
    fn default() -> Self {
        Self {
            coin_flip: 2.0,
            rps: 2.0,
            dice: 2.0,
            limbo: 1.0,
            crash: 1.0,
            mines: 1.0,
            hilo: 1.0,
        }
    }
}

impl HouseEdges {
    /// Edge percentage applied by the derivation for a game type.
    /// Games whose edge is baked into a payout table return 0.
    pub fn for_game(&self, game: GameType) -> f64 {
        match game {
            GameType::CoinFlip => self.coin_flip,
            GameType::Rps => self.rps,
            GameType::Dice => self.dice,
            GameType::Limbo => self.limbo,
            GameType::Crash => self.crash,
            GameType::Mines => self.mines,
            GameType::HiLo => self.hilo,
            GameType::Roulette
            | GameType::Plinko
            | GameType::Keno
            | GameType::Bingo
            | GameType::Blackjack => 0.0,
        }
    }
}

/// Configuration loading and validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl AppConfig {
    /// Load configuration from an optional TOML file, then apply
    /// FAIRLINE_* environment variable overrides and validate.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => toml::from_str(&std::fs::read_to_string(p)?)?,
            None => AppConfig::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("FAIRLINE_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("FAIRLINE_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(max) = std::env::var("FAIRLINE_MAX_STAKE") {
            if let Ok(max) = max.parse() {
                self.engine.max_stake = max;
            }
        }
        if let Ok(balance) = std::env::var("FAIRLINE_STARTING_BALANCE") {
            if let Ok(balance) = balance.parse() {
                self.engine.starting_balance = balance;
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.min_stake == 0 {
            return Err(ConfigError::Invalid("min_stake must be positive".into()));
        }
        if self.engine.max_stake < self.engine.min_stake {
            return Err(ConfigError::Invalid(
                "max_stake must be >= min_stake".into(),
            ));
        }
        let edges = &self.engine.edges;
        for (name, edge) in [
            ("coin_flip", edges.coin_flip),
            ("rps", edges.rps),
            ("dice", edges.dice),
            ("limbo", edges.limbo),
            ("crash", edges.crash),
            ("mines", edges.mines),
            ("hilo", edges.hilo),
        ] {
            if !(0.0..=10.0).contains(&edge) {
                return Err(ConfigError::Invalid(format!(
                    "house edge for {} must be within 0-10 percent, got {}",
                    name, edge
                )));
            }
        }
        if self.engine.crash_max < 1.0 || self.engine.limbo_max < 1.0 {
            return Err(ConfigError::Invalid(
                "multiplier caps must be at least 1.0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.engine.edges.dice, 2.0);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            port = 9000

            [engine.edges]
            dice = 1.5
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.engine.edges.dice, 1.5);
        // Untouched fields keep their defaults
        assert_eq!(config.engine.edges.limbo, 1.0);
    }

    #[test]
    fn test_invalid_edge_rejected() {
        let mut config = AppConfig::default();
        config.engine.edges.dice = 50.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_table_games_have_no_config_edge() {
        let edges = HouseEdges::default();
        assert_eq!(edges.for_game(GameType::Roulette), 0.0);
        assert_eq!(edges.for_game(GameType::Plinko), 0.0);
    }
}
