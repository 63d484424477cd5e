//! Zone and lifecycle management.
//!
//! ## Zones
//!
//! Each side owns a deck, a hand, an energy pile and a used-energy pile,
//! one active avatar slot, the reserve slots, field cards, life cards and
//! a graveyard. Zones are plain fields of `PlayerState`; this module holds
//! the legal moves between them.
//!
//! - `lifecycle`: play, evolve, energy, discard, draw, attach, field, promote
//! - `defeat`: the avatar defeat cascade and win/loss detection

pub mod defeat;
pub mod lifecycle;

pub use defeat::{best_reserve, check_defeats, declare_winner, reserve_score};
pub use lifecycle::{
    attach_to_active, bury_avatar, default_slot, discard, draw, evolve, hand_avatar, hand_card,
    move_to_energy, play_as_active, play_as_reserve, play_field, promote_reserve,
};
