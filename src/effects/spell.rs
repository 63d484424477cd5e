//! Action-card effects.
//!
//! An action card's description compiles into a list of `SpellEffect`s,
//! kept in the order they appear in the text. Resolution lives in the
//! engine, which routes damage through combat and draws through zones.

use serde::{Deserialize, Serialize};

use crate::cards::CounterKind;

use super::patterns::{number, word, SPELL_COUNTER, SPELL_DAMAGE, SPELL_DRAW, SPELL_HEAL, SPELL_SHIELD};

/// One compiled spell effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpellEffect {
    /// Deal N damage to the opposing active avatar (shield applies).
    Damage(u32),
    /// Remove up to N damage from the caster's active avatar.
    Heal(u32),
    /// The caster draws N cards.
    Draw(u32),
    /// Put N counters of a status kind on the opposing active avatar.
    ApplyCounter(CounterKind, u32),
    /// The caster's active avatar gains N shield.
    GainShield(u32),
}

impl SpellEffect {
    /// Whether the effect needs an opposing active avatar to do anything.
    #[must_use]
    pub const fn targets_opponent(&self) -> bool {
        matches!(self, SpellEffect::Damage(_) | SpellEffect::ApplyCounter(..))
    }

    /// Damage this effect declares, used to rank spells.
    #[must_use]
    pub const fn declared_damage(&self) -> u32 {
        match self {
            SpellEffect::Damage(n) => *n,
            _ => 0,
        }
    }
}

/// Compile an action card's description.
///
/// ```
/// use avatar_ccg::effects::{compile_spell, SpellEffect};
///
/// let effects = compile_spell("Deal 3 damage to the opponent's active avatar. Draw 1 card.");
/// assert_eq!(effects, vec![SpellEffect::Damage(3), SpellEffect::Draw(1)]);
/// ```
#[must_use]
pub fn compile_spell(text: &str) -> Vec<SpellEffect> {
    let mut found: Vec<(usize, SpellEffect)> = Vec::new();

    for caps in SPELL_DAMAGE.captures_iter(text) {
        if let (Some(m), Some(n)) = (caps.get(0), number(&caps, 1)) {
            found.push((m.start(), SpellEffect::Damage(n)));
        }
    }
    for caps in SPELL_HEAL.captures_iter(text) {
        if let (Some(m), Some(n)) = (caps.get(0), number(&caps, 1)) {
            found.push((m.start(), SpellEffect::Heal(n)));
        }
    }
    for caps in SPELL_DRAW.captures_iter(text) {
        if let (Some(m), Some(n)) = (caps.get(0), number(&caps, 1)) {
            found.push((m.start(), SpellEffect::Draw(n)));
        }
    }
    for caps in SPELL_COUNTER.captures_iter(text) {
        let kind = word(&caps, 2).and_then(|w| w.parse::<CounterKind>().ok());
        if let (Some(m), Some(n), Some(kind)) = (caps.get(0), number(&caps, 1), kind) {
            found.push((m.start(), SpellEffect::ApplyCounter(kind, n)));
        }
    }
    for caps in SPELL_SHIELD.captures_iter(text) {
        if let (Some(m), Some(n)) = (caps.get(0), number(&caps, 1)) {
            found.push((m.start(), SpellEffect::GainShield(n)));
        }
    }

    found.sort_by_key(|(pos, _)| *pos);
    found.into_iter().map(|(_, effect)| effect).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_order_is_kept() {
        let effects = compile_spell(
            "Your active avatar gains 2 shield. Put 1 burn counter on the opponent's active avatar.",
        );
        assert_eq!(
            effects,
            vec![SpellEffect::GainShield(2), SpellEffect::ApplyCounter(CounterKind::Burn, 1)]
        );
    }

    #[test]
    fn test_heal() {
        assert_eq!(compile_spell("Heal 4 damage from your active avatar."), vec![SpellEffect::Heal(4)]);
    }

    #[test]
    fn test_flavor_text() {
        assert!(compile_spell("The winds whisper.").is_empty());
    }

    #[test]
    fn test_targets_opponent() {
        assert!(SpellEffect::Damage(1).targets_opponent());
        assert!(!SpellEffect::Draw(1).targets_opponent());
        assert_eq!(SpellEffect::Damage(4).declared_damage(), 4);
    }
}
