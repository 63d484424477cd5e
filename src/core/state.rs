//! Game state.
//!
//! ## PlayerState
//!
//! One side of the table: health, every card pile, the avatar slots and
//! the per-turn flags.
//!
//! ## GameState
//!
//! Both sides plus turn progression. Card piles are `im` persistent
//! vectors, so cloning a state is O(1) and every committed command leaves
//! the previous snapshot intact and inspectable.
//!
//! The state is read-only outside the engine: drivers receive `&GameState`
//! and route every change through the engine's command surface.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::action::ActionRecord;
use super::entity::IdAllocator;
use super::phase::GamePhase;
use super::player::Side;
use crate::cards::{ActionCard, AvatarCard, Card};

/// A skill use waiting on the caster's "may discard" decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingDiscard {
    /// Skill of the active avatar that opened the prompt.
    pub skill_index: usize,
}

/// One side's state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    // === Health and loss conditions ===
    pub health: u32,
    pub life_cards: Vector<Card>,

    // === Piles ===
    pub deck: Vector<Card>,
    pub hand: Vector<Card>,
    pub graveyard: Vector<Card>,

    /// Unspent energy. Only avatars can become energy.
    pub energy_pile: Vector<AvatarCard>,
    /// Spent energy; returns to `energy_pile` on refresh.
    pub used_energy_pile: Vector<AvatarCard>,

    // === Board ===
    pub active_avatar: Option<AvatarCard>,
    pub reserve_avatars: Vector<AvatarCard>,
    pub field_cards: Vector<ActionCard>,

    // === Turn flags ===
    pub avatar_to_energy_count: u32,
    pub has_played_item_this_turn: bool,
    pub needs_to_discard_cards: bool,
    pub needs_to_select_reserve_avatar: bool,
    pub pending_discard: Option<PendingDiscard>,
}

impl PlayerState {
    /// Create an empty side with the given health.
    #[must_use]
    pub fn new(health: u32) -> Self {
        Self {
            health,
            ..Self::default()
        }
    }

    /// Unspent plus spent energy.
    #[must_use]
    pub fn energy_total(&self) -> usize {
        self.energy_pile.len() + self.used_energy_pile.len()
    }

    /// Active avatar followed by reserves.
    pub fn avatars(&self) -> impl Iterator<Item = &AvatarCard> {
        self.active_avatar.iter().chain(self.reserve_avatars.iter())
    }

    /// Whether the side is waiting on a prompt of its own.
    #[must_use]
    pub fn has_pending_choice(&self) -> bool {
        self.needs_to_select_reserve_avatar || self.pending_discard.is_some()
    }

    /// Clear per-turn counters and flags.
    pub fn reset_turn_flags(&mut self) {
        self.avatar_to_energy_count = 0;
        self.has_played_item_this_turn = false;
    }
}

/// Complete game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    // === Progression ===
    pub current_player: Side,
    pub phase: GamePhase,
    /// Turn number (starts at 1). Increments when play returns to the first player.
    pub turn: u32,
    pub winner: Option<Side>,
    pub first_player: Side,

    // === Sides ===
    pub player: PlayerState,
    pub opponent: PlayerState,

    // === Bookkeeping ===
    pub ids: IdAllocator,
    pub action_history: Vector<ActionRecord>,
}

impl GameState {
    /// Create a state in `setup` on turn 1 with empty sides.
    #[must_use]
    pub fn new(first_player: Side, starting_health: u32) -> Self {
        Self {
            current_player: first_player,
            phase: GamePhase::Setup,
            turn: 1,
            winner: None,
            first_player,
            player: PlayerState::new(starting_health),
            opponent: PlayerState::new(starting_health),
            ids: IdAllocator::new(),
            action_history: Vector::new(),
        }
    }

    /// One side's state.
    #[must_use]
    pub fn side(&self, side: Side) -> &PlayerState {
        match side {
            Side::Player => &self.player,
            Side::Opponent => &self.opponent,
        }
    }

    /// One side's state, mutably.
    pub fn side_mut(&mut self, side: Side) -> &mut PlayerState {
        match side {
            Side::Player => &mut self.player,
            Side::Opponent => &mut self.opponent,
        }
    }

    /// The side whose turn it is.
    #[must_use]
    pub fn current(&self) -> &PlayerState {
        self.side(self.current_player)
    }

    /// Whether a winner has been set.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Canonical binary encoding, for snapshots and equality checks.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Decode a state produced by `to_bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardId, Element, Skill};

    fn avatar() -> AvatarCard {
        AvatarCard::new(
            CardId::new(1),
            "Ember Fox",
            Element::Fire,
            1,
            "beast",
            8,
            Skill::new("Scratch", &[Element::Fire], 2, ""),
        )
    }

    #[test]
    fn test_new_state() {
        let state = GameState::new(Side::Opponent, 4);
        assert_eq!(state.phase, GamePhase::Setup);
        assert_eq!(state.turn, 1);
        assert_eq!(state.current_player, Side::Opponent);
        assert_eq!(state.player.health, 4);
        assert!(!state.is_over());
    }

    #[test]
    fn test_clone_is_independent() {
        let mut state = GameState::new(Side::Player, 4);
        state.player.energy_pile.push_back(avatar());

        let snapshot = state.clone();
        state.player.energy_pile.pop_back();

        assert_eq!(snapshot.player.energy_pile.len(), 1);
        assert_eq!(state.player.energy_pile.len(), 0);
    }

    #[test]
    fn test_bytes_roundtrip() {
        let mut state = GameState::new(Side::Player, 4);
        state.opponent.active_avatar = Some(avatar());
        state.opponent.hand.push_back(Card::Avatar(avatar()));

        let bytes = state.to_bytes().unwrap();
        let back = GameState::from_bytes(&bytes).unwrap();
        assert_eq!(state, back);
    }

    #[test]
    fn test_avatars_and_flags() {
        let mut side = PlayerState::new(4);
        side.active_avatar = Some(avatar());
        side.reserve_avatars.push_back(avatar());
        assert_eq!(side.avatars().count(), 2);

        side.avatar_to_energy_count = 1;
        side.has_played_item_this_turn = true;
        side.reset_turn_flags();
        assert_eq!(side.avatar_to_energy_count, 0);
        assert!(!side.has_played_item_this_turn);
    }
}
