//! Skill triggers and on-defeat hooks.
//!
//! Triggers are the skill effects that are not plain damage substitution:
//! hand-size overrides, element matchups, and counters applied after the hit.
//! The trigger checker runs before conditional rules; when it returns a
//! modified damage, that value becomes the base the conditional rules see.

use serde::{Deserialize, Serialize};

use crate::cards::Element;

use super::conditional::RuleContext;
use super::patterns::{
    number, word, APPLY_BLEED, DEFEAT_DAMAGE, DEFEAT_DRAW, ELEMENT_BONUS, HAND_SIZE_OVERRIDE,
    SELF_SHIELD,
};

/// A compiled skill trigger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillTrigger {
    /// With at least `min_cards` in hand, damage becomes `damage`.
    HandSize { min_cards: usize, damage: u32 },
    /// Against a target of `element`, damage gets `+bonus`.
    ElementMatchup { element: Element, bonus: u32 },
    /// Apply bleed counters to the target after damage.
    ApplyBleed(u32),
    /// The attacker gains shield after damage.
    ApplyShield(u32),
}

/// Result of checking a skill's triggers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TriggerOutcome {
    pub should_trigger: bool,
    pub modified_damage: Option<u32>,
    pub apply_bleed: Option<u32>,
    pub apply_shield: Option<u32>,
    pub message: String,
}

/// Compile every trigger clause in `text`.
#[must_use]
pub fn compile_triggers(text: &str) -> Vec<SkillTrigger> {
    let mut triggers = Vec::new();

    for caps in HAND_SIZE_OVERRIDE.captures_iter(text) {
        if let (Some(min), Some(damage)) = (number(&caps, 1), number(&caps, 2)) {
            triggers.push(SkillTrigger::HandSize { min_cards: min as usize, damage });
        }
    }
    for caps in ELEMENT_BONUS.captures_iter(text) {
        let element = word(&caps, 2).and_then(|w| w.parse::<Element>().ok());
        if let (Some(bonus), Some(element)) = (number(&caps, 1), element) {
            triggers.push(SkillTrigger::ElementMatchup { element, bonus });
        }
    }
    for caps in APPLY_BLEED.captures_iter(text) {
        if let Some(n) = number(&caps, 1) {
            triggers.push(SkillTrigger::ApplyBleed(n));
        }
    }
    for caps in SELF_SHIELD.captures_iter(text) {
        if let Some(n) = number(&caps, 1) {
            triggers.push(SkillTrigger::ApplyShield(n));
        }
    }

    triggers
}

/// Evaluate triggers for one skill use.
///
/// Damage-changing triggers apply in compile order; each sees the result of
/// the previous one.
#[must_use]
pub fn check_triggers(triggers: &[SkillTrigger], base_damage: u32, ctx: &RuleContext<'_>) -> TriggerOutcome {
    let mut outcome = TriggerOutcome::default();
    let mut damage = base_damage;
    let mut messages: Vec<String> = Vec::new();

    for trigger in triggers {
        match trigger {
            SkillTrigger::HandSize { min_cards, damage: n } => {
                if ctx.hand_size >= *min_cards {
                    damage = *n;
                    outcome.modified_damage = Some(damage);
                    messages.push(format!("{} cards in hand: damage becomes {n}", ctx.hand_size));
                }
            }
            SkillTrigger::ElementMatchup { element, bonus } => {
                if ctx.target.is_some_and(|t| t.info.element == *element) {
                    damage = damage.saturating_add(*bonus);
                    outcome.modified_damage = Some(damage);
                    messages.push(format!("+{bonus} damage against {element}"));
                }
            }
            SkillTrigger::ApplyBleed(n) => {
                if ctx.target.is_some() {
                    *outcome.apply_bleed.get_or_insert(0) += n;
                    messages.push(format!("applies {n} bleed"));
                }
            }
            SkillTrigger::ApplyShield(n) => {
                *outcome.apply_shield.get_or_insert(0) += n;
                messages.push(format!("gains {n} shield"));
            }
        }
    }

    outcome.should_trigger = !messages.is_empty();
    outcome.message = messages.join(", ");
    outcome
}

/// A compiled "when this avatar is defeated" hook.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefeatHook {
    /// The owner draws N cards.
    Draw(u32),
    /// Deal N damage to the opposing active avatar.
    DamageOpponent(u32),
}

/// Compile every on-defeat clause in `text`.
#[must_use]
pub fn compile_defeat_hooks(text: &str) -> Vec<DefeatHook> {
    let draws = DEFEAT_DRAW
        .captures_iter(text)
        .filter_map(|caps| number(&caps, 1).map(DefeatHook::Draw));
    let hits = DEFEAT_DAMAGE
        .captures_iter(text)
        .filter_map(|caps| number(&caps, 1).map(DefeatHook::DamageOpponent));
    draws.chain(hits).collect()
}
