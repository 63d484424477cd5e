//! Command rejection taxonomy.
//!
//! Every rejection is local and recoverable: the command returns one of
//! these errors and the game state is left untouched. The reason enums keep
//! enough detail for a UI to explain *why* an action was refused.

use thiserror::Error;

use super::phase::GamePhase;
use super::player::Side;

/// A rejected command.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    /// Action attempted outside its allowed phase or turn.
    #[error("illegal phase: {0}")]
    IllegalPhase(PhaseViolation),

    /// The energy pile cannot cover the cost.
    #[error("not enough energy: need {required}, have {available}")]
    InsufficientEnergy { required: usize, available: usize },

    /// Missing or out-of-range target.
    #[error("invalid target: {0}")]
    InvalidTarget(TargetError),

    /// The action would break a game invariant.
    #[error("invariant violation: {0}")]
    InvariantViolation(InvariantError),

    /// A winner is already set.
    #[error("the game is over ({winner} won)")]
    TerminalState { winner: Side },
}

/// Why an action is not allowed right now.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PhaseViolation {
    #[error("{action} is not allowed during {phase}")]
    WrongPhase { action: &'static str, phase: GamePhase },

    #[error("it is not the {side}'s turn")]
    NotYourTurn { side: Side },

    #[error("the {side} must place an active avatar before the game can start")]
    SetupIncomplete { side: Side },

    #[error("hand has {hand_size} cards, discard down to {limit} first")]
    HandLimitExceeded { hand_size: usize, limit: usize },

    #[error("the {side} must choose a reserve avatar to promote")]
    PendingReserveSelection { side: Side },

    #[error("the {side} must confirm or cancel the pending discard")]
    PendingDiscard { side: Side },

    #[error("there is nothing to resolve")]
    NothingPending,

    #[error("this avatar has already acted this battle phase")]
    AvatarAlreadyActed,

    #[error("an item has already been played this turn")]
    ItemAlreadyPlayed,

    #[error("an avatar has already been moved to energy this turn")]
    EnergyLimitReached,

    #[error("the hand is not over the limit")]
    NoDiscardRequired,
}

/// What is wrong with the chosen target.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TargetError {
    #[error("the {side} needs an active avatar")]
    NoActiveAvatar { side: Side },

    #[error("no card at hand index {index} (hand has {len})")]
    HandIndex { index: usize, len: usize },

    #[error("no reserve avatar at index {index} ({len} in reserve)")]
    ReserveIndex { index: usize, len: usize },

    #[error("the {side} already has an active avatar")]
    ActiveOccupied { side: Side },

    #[error("reserve slots are full ({capacity})")]
    ReserveFull { capacity: usize },

    #[error("the active avatar has no skill {index}")]
    NoSuchSkill { index: usize },

    #[error("only avatar cards can be used this way")]
    NotAnAvatar,

    #[error("this target is not valid for the card")]
    Unsupported,
}

/// Which invariant an action would break.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvariantError {
    #[error("only a level 2 avatar can evolve a level 1 avatar")]
    EvolveLevelMismatch,

    #[error("subtype mismatch: target is {target}, evolution is {evolution}")]
    SubtypeMismatch { target: String, evolution: String },

    #[error("the target was played this turn and cannot evolve yet")]
    EvolvedTooSoon,

    #[error("level 2 avatars enter play by evolving a level 1 avatar")]
    LevelTwoNeedsEvolution,
}

impl From<PhaseViolation> for GameError {
    fn from(v: PhaseViolation) -> Self {
        GameError::IllegalPhase(v)
    }
}

impl From<TargetError> for GameError {
    fn from(e: TargetError) -> Self {
        GameError::InvalidTarget(e)
    }
}

impl From<InvariantError> for GameError {
    fn from(e: InvariantError) -> Self {
        GameError::InvariantViolation(e)
    }
}
