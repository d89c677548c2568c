//! Engine configuration with documented constants
//!
//! The sentinel bounds used by open-ended range conditions live here, so a
//! host can widen or narrow them without touching the condition library.

use std::path::Path;
use std::sync::OnceLock;

use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::core::error::{EngineError, Result};
use crate::core::types::Turn;

/// Configuration for condition evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === TURN RANGES ===
    /// Low bound used by turn-range conditions when none is given
    ///
    /// Also the floor applied to explicit low bounds, so scripts cannot ask
    /// for turns earlier than the game can represent.
    pub before_first_turn: Turn,

    /// High bound used by turn-range conditions when none is given
    pub impossibly_large_turn: Turn,

    // === METER RANGES ===
    /// Magnitude of the default bounds for meter and value ranges
    ///
    /// A missing low bound becomes `-large_meter_value` and a missing high
    /// bound becomes `+large_meter_value`.
    pub large_meter_value: f64,

    // === STARLANES ===
    /// Jump count assigned to object pairs with no starlane path
    pub many_jumps: u32,

    // === RANDOMNESS ===
    /// Seed for generators created with `seeded_rng`
    pub rng_seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            before_first_turn: -65535,
            impossibly_large_turn: 65536,
            large_meter_value: 65536.0,
            many_jumps: 999_999,
            rng_seed: 0,
        }
    }
}

impl EngineConfig {
    /// Validate that configuration values are internally consistent
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.before_first_turn >= self.impossibly_large_turn {
            return Err(format!(
                "before_first_turn ({}) must be < impossibly_large_turn ({})",
                self.before_first_turn, self.impossibly_large_turn
            ));
        }

        if self.large_meter_value.is_nan() || self.large_meter_value <= 0.0 {
            return Err(format!(
                "large_meter_value ({}) must be positive",
                self.large_meter_value
            ));
        }

        if self.many_jumps == 0 {
            return Err("many_jumps must be non-zero".to_string());
        }

        Ok(())
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(contents)?;
        config.validate().map_err(EngineError::InvalidConfig)?;
        Ok(config)
    }

    /// Default low bound for turn ranges
    pub fn turn_low(&self, low: Option<Turn>) -> Turn {
        low.map_or(self.before_first_turn, |l| l.max(self.before_first_turn))
    }

    /// Default high bound for turn ranges
    pub fn turn_high(&self, high: Option<Turn>) -> Turn {
        high.map_or(self.impossibly_large_turn, |h| h.min(self.impossibly_large_turn))
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: impl AsRef<Path>) -> Result<EngineConfig> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    let config = EngineConfig::from_toml_str(&contents)?;
    tracing::info!(path = %path.as_ref().display(), "Loaded engine config");
    Ok(config)
}

static CONFIG: OnceLock<EngineConfig> = OnceLock::new();

/// Get the global engine config (initializes with defaults if not set)
pub fn config() -> &'static EngineConfig {
    CONFIG.get_or_init(EngineConfig::default)
}

/// Set the global engine config (can only be called once)
///
/// Returns Err if config was already set.
pub fn set_config(config: EngineConfig) -> std::result::Result<(), EngineConfig> {
    CONFIG.set(config)
}

/// Generator threaded through evaluation for `Chance` and random sampling
pub type EvalRng = rand_chacha::ChaCha8Rng;

/// Build a generator from the configured seed
pub fn seeded_rng() -> EvalRng {
    EvalRng::seed_from_u64(config().rng_seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_turn_bounds_detected() {
        let config = EngineConfig {
            before_first_turn: 10,
            impossibly_large_turn: 5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_many_jumps_detected() {
        let config = EngineConfig {
            many_jumps: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = EngineConfig::from_toml_str("rng_seed = 99\nmany_jumps = 50\n").unwrap();
        assert_eq!(config.rng_seed, 99);
        assert_eq!(config.many_jumps, 50);
        assert_eq!(config.before_first_turn, EngineConfig::default().before_first_turn);
    }

    #[test]
    fn test_invalid_toml_values_rejected() {
        let err = EngineConfig::from_toml_str("large_meter_value = -1.0\n").unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfig(_)));

        let err = EngineConfig::from_toml_str("rng_seed = \"abc\"\n").unwrap_err();
        assert!(matches!(err, EngineError::ConfigParse(_)));
    }

    #[test]
    fn test_turn_bounds_clamped() {
        let config = EngineConfig::default();
        assert_eq!(config.turn_low(None), config.before_first_turn);
        assert_eq!(config.turn_low(Some(-1_000_000)), config.before_first_turn);
        assert_eq!(config.turn_low(Some(3)), 3);
        assert_eq!(config.turn_high(Some(1_000_000)), config.impossibly_large_turn);
        assert_eq!(config.turn_high(Some(8)), 8);
    }

    #[test]
    fn test_seeded_rng_reproducible() {
        let mut a = seeded_rng();
        let mut b = seeded_rng();
        let xs: Vec<u32> = (0..4).map(|_| a.gen()).collect();
        let ys: Vec<u32> = (0..4).map(|_| b.gen()).collect();
        assert_eq!(xs, ys);
    }
}
