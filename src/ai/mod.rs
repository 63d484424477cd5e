//! AI opponents.
//!
//! Both AIs implement `Strategy`: a decision from a read-only state
//! snapshot to one `Action`. They never mutate the state themselves; the
//! `TurnScheduler` feeds their decisions through the same command surface a
//! human uses.
//!
//! - `ScriptedAi`: a phase-indexed priority list
//! - `PersonalityAi`: scores every legal action with tier weights
//!
//! ```
//! use avatar_ccg::ai::StrategyKind;
//!
//! let kind: StrategyKind = "advanced".parse().unwrap();
//! let strategy = kind.build(7);
//! assert_eq!(strategy.name(), "advanced");
//! ```

pub mod personality;
pub mod scheduler;
pub mod scripted;

pub use personality::{card_value, Personality, PersonalityAi, PlayStyle, Tier};
pub use scheduler::{CancelHandle, RunOutcome, StepOutcome, TurnScheduler};
pub use scripted::{ScriptedAi, ScriptedConfig};

use std::str::FromStr;

use thiserror::Error;

use crate::core::{Action, EngineConfig, GameState, Side};

/// Chooses the next action for one side.
pub trait Strategy {
    /// Pick an action for `side`.
    ///
    /// The answer should be legal, but the scheduler copes with a rejected
    /// one.
    fn decide(&mut self, state: &GameState, config: &EngineConfig, side: Side) -> Action;

    /// Short name for logs.
    fn name(&self) -> &str;
}

impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn decide(&mut self, state: &GameState, config: &EngineConfig, side: Side) -> Action {
        (**self).decide(state, config, side)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// The selectable AIs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Scripted,
    Personality(Tier),
}

#[derive(Debug, Error)]
#[error("unknown strategy `{0}` (expected scripted, newbie, regular or advanced)")]
pub struct UnknownStrategy(pub String);

impl FromStr for StrategyKind {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "scripted" | "fsm" => Ok(StrategyKind::Scripted),
            "newbie" | "easy" => Ok(StrategyKind::Personality(Tier::Newbie)),
            "regular" | "normal" => Ok(StrategyKind::Personality(Tier::Regular)),
            "advanced" | "hard" => Ok(StrategyKind::Personality(Tier::Advanced)),
            _ => Err(UnknownStrategy(s.to_owned())),
        }
    }
}

impl StrategyKind {
    /// Build the strategy. `seed` drives the personality AI's noise.
    #[must_use]
    pub fn build(self, seed: u64) -> Box<dyn Strategy> {
        match self {
            StrategyKind::Scripted => Box::new(ScriptedAi::default()),
            StrategyKind::Personality(tier) => Box::new(PersonalityAi::new(tier.personality(), seed)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strategy_kind() {
        assert_eq!("scripted".parse::<StrategyKind>().unwrap(), StrategyKind::Scripted);
        assert_eq!(
            " Regular ".parse::<StrategyKind>().unwrap(),
            StrategyKind::Personality(Tier::Regular)
        );
        let err = "grandmaster".parse::<StrategyKind>().unwrap_err();
        assert!(err.to_string().contains("grandmaster"));
    }

    #[test]
    fn test_build_names() {
        assert_eq!(StrategyKind::Scripted.build(1).name(), "scripted");
        assert_eq!(StrategyKind::Personality(Tier::Newbie).build(1).name(), "newbie");
    }
}
