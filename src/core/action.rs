//! Commands as data.
//!
//! Every mutation a human or an AI can request is an `Action`. The engine's
//! command methods and `Engine::apply` are two views of the same surface:
//! strategies return an `Action`, the presentation layer usually calls the
//! named methods directly.

use serde::{Deserialize, Serialize};

use super::player::Side;

/// Avatar slot kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Active,
    Reserve,
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::Active => f.write_str("active"),
            Slot::Reserve => f.write_str("reserve"),
        }
    }
}

/// Which in-play avatar an evolution replaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvolveTarget {
    Active,
    Reserve(usize),
}

/// A game action.
///
/// ## Example
///
/// ```
/// use avatar_ccg::core::{Action, Slot};
///
/// let play = Action::PlayCard { hand_index: 0, target: Some(Slot::Active) };
/// assert_eq!(play.name(), "play card");
/// assert!(!play.is_phase_control());
/// assert!(Action::NextPhase.is_phase_control());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Play a card from hand. `target` selects the slot for avatars and is
    /// ignored for action cards; `None` means "active if empty, else reserve".
    PlayCard { hand_index: usize, target: Option<Slot> },
    /// Use a skill of the active avatar against the opposing active avatar.
    UseSkill { skill_index: usize },
    /// Move an avatar from hand to the energy pile.
    MoveToEnergy { hand_index: usize },
    /// Evolve an in-play level 1 avatar with a level 2 card from hand.
    Evolve { hand_index: usize, target: EvolveTarget },
    /// Advance one phase.
    NextPhase,
    /// Advance until the turn passes to the other side.
    EndTurn,
    /// Voluntarily discard a card from hand.
    Discard { hand_index: usize },
    /// Discard while over the hand limit.
    DiscardForHandLimit { hand_index: usize },
    /// Accept a pending "may discard" prompt by discarding this card.
    ConfirmDiscard { hand_index: usize },
    /// Decline a pending "may discard" prompt.
    CancelDiscard,
    /// Promote a reserve avatar after the active one was defeated.
    SelectReserve { index: usize },
}

/// Coarse action categories, used by AI scoring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionCategory {
    PlayCard,
    UseSkill,
    AddToEnergy,
    Evolve,
    Discard,
    Select,
    Pass,
}

impl Action {
    /// Short name for messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Action::PlayCard { .. } => "play card",
            Action::UseSkill { .. } => "use skill",
            Action::MoveToEnergy { .. } => "move to energy",
            Action::Evolve { .. } => "evolve",
            Action::NextPhase => "next phase",
            Action::EndTurn => "end turn",
            Action::Discard { .. } => "discard",
            Action::DiscardForHandLimit { .. } => "discard for hand limit",
            Action::ConfirmDiscard { .. } => "confirm discard",
            Action::CancelDiscard => "cancel discard",
            Action::SelectReserve { .. } => "select reserve",
        }
    }

    #[must_use]
    pub const fn category(&self) -> ActionCategory {
        match self {
            Action::PlayCard { .. } => ActionCategory::PlayCard,
            Action::UseSkill { .. } => ActionCategory::UseSkill,
            Action::MoveToEnergy { .. } => ActionCategory::AddToEnergy,
            Action::Evolve { .. } => ActionCategory::Evolve,
            Action::Discard { .. }
            | Action::DiscardForHandLimit { .. }
            | Action::ConfirmDiscard { .. }
            | Action::CancelDiscard => ActionCategory::Discard,
            Action::SelectReserve { .. } => ActionCategory::Select,
            Action::NextPhase | Action::EndTurn => ActionCategory::Pass,
        }
    }

    /// Phase advancement rather than a play.
    #[must_use]
    pub const fn is_phase_control(&self) -> bool {
        matches!(self, Action::NextPhase | Action::EndTurn)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::PlayCard { hand_index, target: Some(slot) } => {
                write!(f, "play card {hand_index} as {slot}")
            }
            Action::PlayCard { hand_index, target: None } => write!(f, "play card {hand_index}"),
            Action::UseSkill { skill_index } => write!(f, "use skill {}", skill_index + 1),
            Action::MoveToEnergy { hand_index } => write!(f, "move card {hand_index} to energy"),
            Action::Evolve { hand_index, target: EvolveTarget::Active } => {
                write!(f, "evolve active with card {hand_index}")
            }
            Action::Evolve { hand_index, target: EvolveTarget::Reserve(i) } => {
                write!(f, "evolve reserve {i} with card {hand_index}")
            }
            Action::Discard { hand_index }
            | Action::DiscardForHandLimit { hand_index }
            | Action::ConfirmDiscard { hand_index } => write!(f, "{} {hand_index}", self.name()),
            Action::SelectReserve { index } => write!(f, "select reserve {index}"),
            Action::NextPhase | Action::EndTurn | Action::CancelDiscard => f.write_str(self.name()),
        }
    }
}

/// A committed action, for history and replay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The side that took the action.
    pub side: Side,

    /// The action taken.
    pub action: Action,

    /// Turn number when the action was taken.
    pub turn: u32,

    /// Position in the game's action history.
    pub sequence: u32,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(side: Side, action: Action, turn: u32, sequence: u32) -> Self {
        Self {
            side,
            action,
            turn,
            sequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(Action::UseSkill { skill_index: 0 }.category(), ActionCategory::UseSkill);
        assert_eq!(Action::MoveToEnergy { hand_index: 1 }.category(), ActionCategory::AddToEnergy);
        assert_eq!(Action::EndTurn.category(), ActionCategory::Pass);
        assert_eq!(Action::CancelDiscard.category(), ActionCategory::Discard);
    }

    #[test]
    fn test_display() {
        assert_eq!(Action::UseSkill { skill_index: 1 }.to_string(), "use skill 2");
        assert_eq!(
            Action::Evolve { hand_index: 3, target: EvolveTarget::Reserve(0) }.to_string(),
            "evolve reserve 0 with card 3"
        );
        assert_eq!(Action::DiscardForHandLimit { hand_index: 2 }.to_string(), "discard for hand limit 2");
    }

    #[test]
    fn test_serialization() {
        let action = Action::PlayCard { hand_index: 2, target: Some(Slot::Reserve) };
        let json = serde_json::to_string(&action).unwrap();
        let back: Action = serde_json::from_str(&json).unwrap();
        assert_eq!(action, back);
    }

    #[test]
    fn test_action_record() {
        let record = ActionRecord::new(Side::Opponent, Action::NextPhase, 3, 17);
        assert_eq!(record.side, Side::Opponent);
        assert_eq!(record.turn, 3);
        assert_eq!(record.sequence, 17);
    }
}
