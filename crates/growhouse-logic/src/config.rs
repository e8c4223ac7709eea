//! Farm configuration.
//!
//! Everything the controller needs to start a farm: grid size, money,
//! base climate, progression, clock granularity, and the power tariff.
//! The defaults reproduce the standard starting farm.
//!
//! ```
//! use growhouse_logic::config::{validate_config, FarmConfig};
//!
//! let mut config = FarmConfig::default();
//! assert!(validate_config(&config).is_empty());
//! config.width = 0;
//! assert_eq!(validate_config(&config).len(), 1);
//! ```

use serde::{Deserialize, Serialize};

use crate::environment::EnvironmentReading;
use crate::power::PowerTariff;
use crate::variety;

/// Settings for a new farm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmConfig {
    /// Grid width in slots.
    pub width: u32,
    /// Grid height in slots.
    pub height: u32,
    pub starting_cash: f64,
    /// Ambient conditions before any equipment.
    pub base_environment: EnvironmentReading,
    pub player_level: u32,
    /// Seed varieties available from the start.
    pub unlocked_varieties: Vec<String>,
    /// Simulation ticks per in-game day (1 = one tick per day).
    pub ticks_per_day: u32,
    pub tariff: PowerTariff,
    /// Fixed RNG seed (None = seeded from entropy).
    pub seed: Option<u64>,
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self {
            width: 8,
            height: 6,
            starting_cash: 10_000.0,
            base_environment: EnvironmentReading::default(),
            player_level: 1,
            unlocked_varieties: vec!["basic".to_string()],
            ticks_per_day: 1,
            tariff: PowerTariff::default(),
            seed: None,
        }
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Width or height is zero.
    EmptyFarm { width: u32, height: u32 },
    NegativeCash(f64),
    ZeroTicksPerDay,
    /// Player level must be at least 1.
    InvalidPlayerLevel(u32),
    UnknownVariety(String),
    /// Tariff tiers are empty, unsorted, or open before the last tier.
    MalformedTariff,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::EmptyFarm { width, height } => {
                write!(f, "farm must have at least one slot (got {}x{})", width, height)
            }
            ConfigError::NegativeCash(c) => write!(f, "starting cash is negative: {}", c),
            ConfigError::ZeroTicksPerDay => write!(f, "ticks_per_day must be at least 1"),
            ConfigError::InvalidPlayerLevel(l) => write!(f, "invalid player level: {}", l),
            ConfigError::UnknownVariety(v) => write!(f, "unknown seed variety: {}", v),
            ConfigError::MalformedTariff => write!(f, "power tariff tiers are malformed"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Validate a farm configuration, returning all errors found.
pub fn validate_config(config: &FarmConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if config.width == 0 || config.height == 0 {
        errors.push(ConfigError::EmptyFarm {
            width: config.width,
            height: config.height,
        });
    }
    if config.starting_cash < 0.0 {
        errors.push(ConfigError::NegativeCash(config.starting_cash));
    }
    if config.ticks_per_day == 0 {
        errors.push(ConfigError::ZeroTicksPerDay);
    }
    if config.player_level == 0 {
        errors.push(ConfigError::InvalidPlayerLevel(config.player_level));
    }
    for v in &config.unlocked_varieties {
        if !variety::is_known(v) {
            errors.push(ConfigError::UnknownVariety(v.clone()));
        }
    }
    if !config.tariff.is_well_formed() {
        errors.push(ConfigError::MalformedTariff);
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(validate_config(&FarmConfig::default()).is_empty());
    }

    #[test]
    fn test_collects_every_error() {
        let config = FarmConfig {
            width: 0,
            starting_cash: -1.0,
            ticks_per_day: 0,
            player_level: 0,
            unlocked_varieties: vec!["basic".into(), "moonflower".into()],
            ..FarmConfig::default()
        };
        let errors = validate_config(&config);
        assert_eq!(errors.len(), 5);
        assert!(errors.contains(&ConfigError::UnknownVariety("moonflower".into())));
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: FarmConfig =
            serde_json::from_str(r#"{ "width": 12, "seed": 7 }"#).unwrap();
        assert_eq!(config.width, 12);
        assert_eq!(config.height, 6);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.tariff, PowerTariff::default());
    }
}
