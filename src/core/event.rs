//! Game events.
//!
//! Each committed command returns the events it produced, in order. The
//! engine also forwards their `Display` text to the log sink, so the text
//! is written for players, not for debugging.

use serde::{Deserialize, Serialize};

use super::action::Slot;
use super::phase::GamePhase;
use super::player::Side;
use crate::cards::{ActionKind, CounterKind};

/// Something that happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    GameStarted { first: Side },
    PhaseChanged { side: Side, phase: GamePhase, turn: u32 },
    TurnPassed { side: Side, turn: u32 },
    CardDrawn { side: Side, card: String },
    DeckEmpty { side: Side },
    AvatarPlayed { side: Side, avatar: String, slot: Slot },
    AvatarEvolved { side: Side, from: String, to: String },
    EnergyAdded { side: Side, card: String },
    EnergyPaid { side: Side, amount: usize },
    EnergyRefreshed { side: Side, amount: usize },
    AvatarsUntapped,
    ActionCardPlayed { side: Side, card: String, kind: ActionKind },
    EquipmentAttached { side: Side, avatar: String, equipment: String },
    FieldReplaced { side: Side, old: String, new: String },
    SkillUsed { side: Side, avatar: String, skill: String },
    TriggerFired { side: Side, message: String },
    DamageDealt { side: Side, avatar: String, amount: u32, absorbed: u32 },
    CountersApplied { side: Side, avatar: String, kind: CounterKind, amount: u32 },
    Healed { side: Side, avatar: String, amount: u32 },
    BleedTicked { side: Side, avatar: String, amount: u32 },
    DiscardOffered { side: Side, skill: String },
    DiscardDeclined { side: Side },
    CardDiscarded { side: Side, card: String },
    AvatarDefeated { side: Side, avatar: String },
    HealthLost { side: Side, remaining: u32 },
    LifeCardTaken { side: Side, remaining: usize },
    ReserveSelectionRequired { side: Side },
    ReservePromoted { side: Side, avatar: String },
    GameOver { winner: Side },
}

impl std::fmt::Display for GameEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameEvent::GameStarted { first } => write!(f, "The game begins. The {first} goes first."),
            GameEvent::PhaseChanged { side, phase, turn } => {
                write!(f, "Turn {turn}: {phase} ({side})")
            }
            GameEvent::TurnPassed { side, turn } => write!(f, "Turn {turn}: the {side} takes the turn."),
            GameEvent::CardDrawn { side, card } => write!(f, "The {side} draws {card}."),
            GameEvent::DeckEmpty { side } => write!(f, "The {side}'s deck is empty."),
            GameEvent::AvatarPlayed { side, avatar, slot } => {
                write!(f, "The {side} plays {avatar} as {slot} avatar.")
            }
            GameEvent::AvatarEvolved { side, from, to } => {
                write!(f, "The {side}'s {from} evolves into {to}!")
            }
            GameEvent::EnergyAdded { side, card } => write!(f, "The {side} adds {card} to energy."),
            GameEvent::EnergyPaid { side, amount } => write!(f, "The {side} spends {amount} energy."),
            GameEvent::EnergyRefreshed { side, amount } => {
                write!(f, "{amount} energy returns to the {side}'s pool.")
            }
            GameEvent::AvatarsUntapped => f.write_str("All avatars are untapped."),
            GameEvent::ActionCardPlayed { side, card, kind } => {
                write!(f, "The {side} plays {card} ({kind:?}).")
            }
            GameEvent::EquipmentAttached { side, avatar, equipment } => {
                write!(f, "The {side} attaches {equipment} to {avatar}.")
            }
            GameEvent::FieldReplaced { side, old, new } => {
                write!(f, "The {side}'s {new} replaces {old}.")
            }
            GameEvent::SkillUsed { side, avatar, skill } => {
                write!(f, "The {side}'s {avatar} uses {skill}.")
            }
            GameEvent::TriggerFired { side, message } => write!(f, "The {side}'s skill triggers: {message}."),
            GameEvent::DamageDealt { side, avatar, amount, absorbed: 0 } => {
                write!(f, "The {side}'s {avatar} takes {amount} damage.")
            }
            GameEvent::DamageDealt { side, avatar, amount, absorbed } => {
                write!(f, "The {side}'s {avatar} takes {amount} damage ({absorbed} absorbed by shield).")
            }
            GameEvent::CountersApplied { side, avatar, kind, amount } => {
                write!(f, "The {side}'s {avatar} gets {amount} {kind} counter(s).")
            }
            GameEvent::Healed { side, avatar, amount } => {
                write!(f, "The {side}'s {avatar} heals {amount} damage.")
            }
            GameEvent::BleedTicked { side, avatar, amount } => {
                write!(f, "The {side}'s {avatar} bleeds for {amount}.")
            }
            GameEvent::DiscardOffered { side, skill } => {
                write!(f, "The {side} may discard a card to empower {skill}.")
            }
            GameEvent::DiscardDeclined { side } => write!(f, "The {side} declines to discard."),
            GameEvent::CardDiscarded { side, card } => write!(f, "The {side} discards {card}."),
            GameEvent::AvatarDefeated { side, avatar } => write!(f, "The {side}'s {avatar} is defeated!"),
            GameEvent::HealthLost { side, remaining } => {
                write!(f, "The {side} loses 1 health ({remaining} left).")
            }
            GameEvent::LifeCardTaken { side, remaining } => {
                write!(f, "The {side} takes a life card into hand ({remaining} left).")
            }
            GameEvent::ReserveSelectionRequired { side } => {
                write!(f, "The {side} must choose a reserve avatar.")
            }
            GameEvent::ReservePromoted { side, avatar } => {
                write!(f, "The {side} promotes {avatar} to active.")
            }
            GameEvent::GameOver { winner } => write!(f, "Game over: the {winner} wins!"),
        }
    }
}
