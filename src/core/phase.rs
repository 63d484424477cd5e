//! Turn phases.
//!
//! `setup` is entered once at game start. After that the phases cycle
//! `refresh → draw → main1 → battle → main2 → recheck → end`, and `end`
//! hands the turn to the other side's `refresh`.

use serde::{Deserialize, Serialize};

/// A phase of the turn structure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    Setup,
    Refresh,
    Draw,
    Main1,
    Battle,
    Main2,
    Recheck,
    End,
}

impl GamePhase {
    /// The phase that follows this one.
    ///
    /// `End` wraps to `Refresh`; the side rotation happens in the engine.
    ///
    /// ```
    /// use avatar_ccg::core::GamePhase;
    ///
    /// assert_eq!(GamePhase::Setup.next(), GamePhase::Refresh);
    /// assert_eq!(GamePhase::End.next(), GamePhase::Refresh);
    /// ```
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            GamePhase::Setup => GamePhase::Refresh,
            GamePhase::Refresh => GamePhase::Draw,
            GamePhase::Draw => GamePhase::Main1,
            GamePhase::Main1 => GamePhase::Battle,
            GamePhase::Battle => GamePhase::Main2,
            GamePhase::Main2 => GamePhase::Recheck,
            GamePhase::Recheck => GamePhase::End,
            GamePhase::End => GamePhase::Refresh,
        }
    }

    /// Main phases, where cards are played from hand.
    #[must_use]
    pub const fn is_main(self) -> bool {
        matches!(self, GamePhase::Main1 | GamePhase::Main2)
    }

    /// Display text for the presentation layer.
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            GamePhase::Setup => "Setup",
            GamePhase::Refresh => "Refresh Phase",
            GamePhase::Draw => "Draw Phase",
            GamePhase::Main1 => "Main Phase 1",
            GamePhase::Battle => "Battle Phase",
            GamePhase::Main2 => "Main Phase 2",
            GamePhase::Recheck => "Recheck Phase",
            GamePhase::End => "End Phase",
        }
    }
}

impl std::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_has_seven_steps() {
        let mut phase = GamePhase::Refresh;
        for _ in 0..7 {
            phase = phase.next();
        }
        assert_eq!(phase, GamePhase::Refresh);
    }

    #[test]
    fn test_setup_never_reentered() {
        let mut phase = GamePhase::Setup;
        for _ in 0..32 {
            phase = phase.next();
            assert_ne!(phase, GamePhase::Setup);
        }
    }

    #[test]
    fn test_main_phases() {
        assert!(GamePhase::Main1.is_main());
        assert!(GamePhase::Main2.is_main());
        assert!(!GamePhase::Battle.is_main());
    }
}
