//! Passive damage bonuses.
//!
//! Passive text ("if your active avatar has type Y, attack damage gets +N")
//! is scanned across every card a side currently holds in hand, on the
//! field, and in the active slot (equipment included). Matching bonuses are
//! summed into one flat bonus, independent of conditional rules.

use serde::{Deserialize, Serialize};

use crate::cards::{AvatarCard, Card};
use crate::core::PlayerState;

use super::patterns::{number, word, ACTIVE_TYPE_PASSIVE};

/// One compiled passive clause.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassiveEffectRule {
    /// Subtype or element the owner's active avatar must have (lowercase).
    pub required_type: String,
    /// Flat bonus to attack damage.
    pub bonus: u32,
}

impl PassiveEffectRule {
    /// Whether this passive applies given the owner's active avatar.
    #[must_use]
    pub fn applies_to(&self, active: &AvatarCard) -> bool {
        active.has_type(&self.required_type)
    }
}

/// Compile every passive clause in `text`.
#[must_use]
pub fn compile_passives(text: &str) -> Vec<PassiveEffectRule> {
    ACTIVE_TYPE_PASSIVE
        .captures_iter(text)
        .filter_map(|caps| {
            Some(PassiveEffectRule {
                required_type: word(&caps, 1)?,
                bonus: number(&caps, 2)?,
            })
        })
        .collect()
}

fn card_rules(card: &Card) -> Box<dyn Iterator<Item = &PassiveEffectRule> + '_> {
    match card {
        Card::Avatar(avatar) => Box::new(avatar.passives()),
        Card::Action(action) => Box::new(action.passives.iter()),
    }
}

/// Sum the passive bonus available to `player`'s active avatar.
///
/// Returns 0 when there is no active avatar.
#[must_use]
pub fn passive_bonus(player: &PlayerState) -> u32 {
    let Some(active) = player.active_avatar.as_ref() else {
        return 0;
    };

    let from_hand = player.hand.iter().flat_map(card_rules);
    let from_field = player.field_cards.iter().flat_map(|c| c.passives.iter());
    let from_active = active
        .passives()
        .chain(active.equipment.iter().flat_map(|c| c.passives.iter()));

    from_hand
        .chain(from_field)
        .chain(from_active)
        .filter(|rule| rule.applies_to(active))
        .fold(0u32, |acc, rule| acc.saturating_add(rule.bonus))
}
