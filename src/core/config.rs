//! Engine configuration.
//!
//! The table rules that vary between formats (hand limit, number of life
//! cards, reserve capacity, ...) are gathered in `EngineConfig`. Defaults
//! match the standard format; hosts may override individual values with the
//! builder methods or load a full config from JSON.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::player::{Side, SideMap};

/// Who drives a side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Controller {
    /// Actions arrive from the presentation layer.
    Human,
    /// Actions are chosen by a strategy through the turn scheduler.
    Ai,
}

/// Errors raised while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    #[error("invalid engine config: {0}")]
    Json(#[from] serde_json::Error),

    /// A value is outside its allowed range.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Table rules for one game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum hand size at the `recheck` → `end` boundary.
    pub hand_limit: usize,

    /// Number of reserve avatar slots per side.
    pub reserve_capacity: usize,

    /// Life cards dealt face-down to each side at game start.
    pub life_cards: usize,

    /// Starting health; one point is lost per defeated active avatar.
    pub starting_health: u32,

    /// Cards drawn into each hand at game start.
    pub starting_hand_size: usize,

    /// Avatars a side may move to its energy pile per turn.
    pub avatars_to_energy_per_turn: u32,

    /// Side that takes the first turn.
    pub first_player: Side,

    /// Human or AI control per side.
    pub controllers: SideMap<Controller>,

    /// Seed for deck shuffles and AI noise.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hand_limit: 8,
            reserve_capacity: 2,
            life_cards: 4,
            starting_health: 4,
            starting_hand_size: 5,
            avatars_to_energy_per_turn: 1,
            first_player: Side::Player,
            controllers: SideMap::new(|side| match side {
                Side::Player => Controller::Human,
                Side::Opponent => Controller::Ai,
            }),
            seed: 42,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a config from JSON.
    ///
    /// Missing fields fall back to their defaults.
    ///
    /// ```
    /// use avatar_ccg::core::EngineConfig;
    ///
    /// let config = EngineConfig::from_json(r#"{ "hand_limit": 7 }"#).unwrap();
    /// assert_eq!(config.hand_limit, 7);
    /// assert_eq!(config.life_cards, 4);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hand_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "hand_limit",
                reason: "must be at least 1".into(),
            });
        }
        if self.starting_health == 0 {
            return Err(ConfigError::Invalid {
                field: "starting_health",
                reason: "must be at least 1".into(),
            });
        }
        if self.starting_hand_size > self.hand_limit {
            return Err(ConfigError::Invalid {
                field: "starting_hand_size",
                reason: format!("exceeds hand_limit ({})", self.hand_limit),
            });
        }
        Ok(())
    }

    /// Set the hand limit.
    #[must_use]
    pub fn with_hand_limit(mut self, limit: usize) -> Self {
        self.hand_limit = limit;
        self
    }

    /// Set the number of life cards.
    #[must_use]
    pub fn with_life_cards(mut self, count: usize) -> Self {
        self.life_cards = count;
        self
    }

    /// Set the starting health.
    #[must_use]
    pub fn with_starting_health(mut self, health: u32) -> Self {
        self.starting_health = health;
        self
    }

    /// Set the starting hand size.
    #[must_use]
    pub fn with_starting_hand_size(mut self, size: usize) -> Self {
        self.starting_hand_size = size;
        self
    }

    /// Set who controls a side.
    #[must_use]
    pub fn with_controller(mut self, side: Side, controller: Controller) -> Self {
        self.controllers[side] = controller;
        self
    }

    /// Set the first player.
    #[must_use]
    pub fn with_first_player(mut self, side: Side) -> Self {
        self.first_player = side;
        self
    }

    /// Set the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Whether a side is driven by an AI strategy.
    #[must_use]
    pub fn is_ai(&self, side: Side) -> bool {
        self.controllers[side] == Controller::Ai
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.hand_limit, 8);
        assert_eq!(config.reserve_capacity, 2);
        assert_eq!(config.life_cards, 4);
        assert!(config.is_ai(Side::Opponent));
        assert!(!config.is_ai(Side::Player));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = EngineConfig::default()
            .with_hand_limit(6)
            .with_seed(7)
            .with_controller(Side::Player, Controller::Ai);

        assert_eq!(config.hand_limit, 6);
        assert_eq!(config.seed, 7);
        assert!(config.is_ai(Side::Player));
    }

    #[test]
    fn test_from_json_partial() {
        let config = EngineConfig::from_json(r#"{"life_cards": 2, "seed": 9}"#).unwrap();
        assert_eq!(config.life_cards, 2);
        assert_eq!(config.seed, 9);
        assert_eq!(config.hand_limit, 8);
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        let err = EngineConfig::from_json(r#"{"hand_limit": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "hand_limit", .. }));

        let err = EngineConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_serialization_roundtrip() {
        let config = EngineConfig::default().with_first_player(Side::Opponent);
        let json = serde_json::to_string(&config).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
