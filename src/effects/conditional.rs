//! Conditional damage rules.
//!
//! A skill's effect text may contain clauses that replace or increase its
//! damage when the live game state satisfies a condition. The clauses are
//! compiled into `ConditionalDamageRule` records once; at cast time they are
//! only evaluated, never re-parsed.
//!
//! ## Evaluation order
//!
//! All matching `SetTo` rules are applied in text order (the last one wins),
//! then every matching `AddBonus` is summed on top.

use serde::{Deserialize, Serialize};

use crate::cards::{AvatarCard, CounterKind};

use super::patterns::{
    number, word, DISCARD_OVERRIDE, EQUIPMENT_OVERRIDE, OPPONENT_COUNTER_OVERRIDE,
    OPPONENT_TYPE_OVERRIDE, SELF_COUNTER_BONUS,
};

/// The state a rule is checked against.
#[derive(Clone, Copy, Debug)]
pub struct RuleContext<'a> {
    /// The avatar using the skill.
    pub attacker: &'a AvatarCard,
    /// The opponent's active avatar, if any.
    pub target: Option<&'a AvatarCard>,
    /// Cards in the attacker's hand at cast time.
    pub hand_size: usize,
    /// Whether the caster discarded a card for this skill use.
    pub discarded: bool,
}

impl<'a> RuleContext<'a> {
    /// Context for an attacker with no target and an empty hand.
    #[must_use]
    pub fn new(attacker: &'a AvatarCard) -> Self {
        Self {
            attacker,
            target: None,
            hand_size: 0,
            discarded: false,
        }
    }

    /// Set the target.
    #[must_use]
    pub fn with_target(mut self, target: Option<&'a AvatarCard>) -> Self {
        self.target = target;
        self
    }

    /// Set the caster's hand size.
    #[must_use]
    pub fn with_hand_size(mut self, hand_size: usize) -> Self {
        self.hand_size = hand_size;
        self
    }

    /// Mark the skill use as paid with a discard.
    #[must_use]
    pub fn with_discard(mut self, discarded: bool) -> Self {
        self.discarded = discarded;
        self
    }
}

/// What must hold for a rule to fire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageCondition {
    /// The caster discarded a card for this skill use.
    PlayerDiscards,
    /// The opponent's active avatar carries a status counter.
    OpponentHasCounter(CounterKind),
    /// The opponent's active avatar has this subtype or element (lowercase).
    OpponentHasType(String),
    /// The attacker has at least one equipment card attached.
    HasEquipment,
    /// The attacker carries a counter.
    SelfHasCounter(CounterKind),
}

impl DamageCondition {
    /// Check the condition against live state.
    #[must_use]
    pub fn holds(&self, ctx: &RuleContext<'_>) -> bool {
        match self {
            DamageCondition::PlayerDiscards => ctx.discarded,
            DamageCondition::OpponentHasCounter(kind) => {
                ctx.target.is_some_and(|t| t.counters.has(*kind))
            }
            DamageCondition::OpponentHasType(ty) => ctx.target.is_some_and(|t| t.has_type(ty)),
            DamageCondition::HasEquipment => !ctx.attacker.equipment.is_empty(),
            DamageCondition::SelfHasCounter(kind) => ctx.attacker.counters.has(*kind),
        }
    }
}

/// How a rule changes damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageEffect {
    /// Damage becomes exactly N.
    SetTo(u32),
    /// Damage gets +N.
    AddBonus(u32),
}

/// One compiled conditional clause.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalDamageRule {
    pub condition: DamageCondition,
    pub effect: DamageEffect,
}

impl ConditionalDamageRule {
    #[must_use]
    pub fn new(condition: DamageCondition, effect: DamageEffect) -> Self {
        Self { condition, effect }
    }
}

/// Compile every conditional clause found in `text`.
///
/// ```
/// use avatar_ccg::effects::{compile_conditional, DamageCondition, DamageEffect};
/// use avatar_ccg::cards::CounterKind;
///
/// let rules = compile_conditional(
///     "If the opponent active avatar has a bleed counter, this attack damage becomes 10",
/// );
/// assert_eq!(rules.len(), 1);
/// assert_eq!(rules[0].condition, DamageCondition::OpponentHasCounter(CounterKind::Bleed));
/// assert_eq!(rules[0].effect, DamageEffect::SetTo(10));
/// ```
#[must_use]
pub fn compile_conditional(text: &str) -> Vec<ConditionalDamageRule> {
    // (position in text, rule) so that "last wins" follows reading order.
    let mut found: Vec<(usize, ConditionalDamageRule)> = Vec::new();

    for caps in DISCARD_OVERRIDE.captures_iter(text) {
        if let (Some(m), Some(n)) = (caps.get(0), number(&caps, 1)) {
            found.push((
                m.start(),
                ConditionalDamageRule::new(DamageCondition::PlayerDiscards, DamageEffect::SetTo(n)),
            ));
        }
    }

    for caps in OPPONENT_COUNTER_OVERRIDE.captures_iter(text) {
        let kind = word(&caps, 1).and_then(|w| w.parse::<CounterKind>().ok());
        if let (Some(m), Some(kind), Some(n)) = (caps.get(0), kind, number(&caps, 2)) {
            found.push((
                m.start(),
                ConditionalDamageRule::new(
                    DamageCondition::OpponentHasCounter(kind),
                    DamageEffect::SetTo(n),
                ),
            ));
        }
    }

    for caps in OPPONENT_TYPE_OVERRIDE.captures_iter(text) {
        if let (Some(m), Some(ty), Some(n)) = (caps.get(0), word(&caps, 1), number(&caps, 2)) {
            found.push((
                m.start(),
                ConditionalDamageRule::new(DamageCondition::OpponentHasType(ty), DamageEffect::SetTo(n)),
            ));
        }
    }

    for caps in EQUIPMENT_OVERRIDE.captures_iter(text) {
        if let (Some(m), Some(n)) = (caps.get(0), number(&caps, 1)) {
            found.push((
                m.start(),
                ConditionalDamageRule::new(DamageCondition::HasEquipment, DamageEffect::SetTo(n)),
            ));
        }
    }

    for caps in SELF_COUNTER_BONUS.captures_iter(text) {
        let kind = word(&caps, 1).and_then(|w| w.parse::<CounterKind>().ok());
        if let (Some(m), Some(kind), Some(n)) = (caps.get(0), kind, number(&caps, 2)) {
            found.push((
                m.start(),
                ConditionalDamageRule::new(
                    DamageCondition::SelfHasCounter(kind),
                    DamageEffect::AddBonus(n),
                ),
            ));
        }
    }

    found.sort_by_key(|(pos, _)| *pos);
    found.into_iter().map(|(_, rule)| rule).collect()
}

/// Apply compiled rules to a damage value.
#[must_use]
pub fn apply_conditional_rules(rules: &[ConditionalDamageRule], damage: i64, ctx: &RuleContext<'_>) -> i64 {
    let active: Vec<&ConditionalDamageRule> = rules.iter().filter(|r| r.condition.holds(ctx)).collect();

    let mut result = damage;
    for rule in &active {
        if let DamageEffect::SetTo(n) = rule.effect {
            result = i64::from(n);
        }
    }
    for rule in &active {
        if let DamageEffect::AddBonus(n) = rule.effect {
            result += i64::from(n);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{AvatarCard, CardId, Element, Skill};

    fn avatar(sub_type: &str) -> AvatarCard {
        AvatarCard::new(
            CardId::new(1),
            "Test",
            Element::Fire,
            1,
            sub_type,
            10,
            Skill::new("Hit", &[Element::Fire], 3, ""),
        )
    }

    #[test]
    fn test_bleed_override_replaces_base() {
        let rules = compile_conditional(
            "If the opponent active avatar has a bleed counter, this attack damage becomes 10",
        );
        let attacker = avatar("beast");
        let mut target = avatar("beast");
        target.counters.bleed = 1;

        let ctx = RuleContext::new(&attacker).with_target(Some(&target));
        assert_eq!(apply_conditional_rules(&rules, 3, &ctx), 10);

        target.counters.bleed = 0;
        let ctx = RuleContext::new(&attacker).with_target(Some(&target));
        assert_eq!(apply_conditional_rules(&rules, 3, &ctx), 3);
    }

    #[test]
    fn test_type_override_matches_subtype_and_element() {
        let rules = compile_conditional("If the opponent avatar has type dragon, damage becomes 8.");
        assert_eq!(rules[0].condition, DamageCondition::OpponentHasType("dragon".into()));

        let attacker = avatar("beast");
        let target = avatar("Dragon");
        let ctx = RuleContext::new(&attacker).with_target(Some(&target));
        assert_eq!(apply_conditional_rules(&rules, 2, &ctx), 8);

        let rules = compile_conditional("If the opponent's active avatar has element fire, damage becomes 5");
        assert_eq!(apply_conditional_rules(&rules, 2, &ctx), 5);
    }

    #[test]
    fn test_equipment_and_self_counter() {
        let rules = compile_conditional(
            "If this card has equipment attached, damage becomes 6. If this card has a shield counter, damage gets +2.",
        );
        assert_eq!(rules.len(), 2);

        let mut attacker = avatar("knight");
        let ctx = RuleContext::new(&attacker);
        assert_eq!(apply_conditional_rules(&rules, 3, &ctx), 3);

        attacker.counters.shield = 1;
        let ctx = RuleContext::new(&attacker);
        assert_eq!(apply_conditional_rules(&rules, 3, &ctx), 5);
    }

    #[test]
    fn test_set_then_bonus_regardless_of_text_order() {
        let rules = vec![
            ConditionalDamageRule::new(DamageCondition::PlayerDiscards, DamageEffect::AddBonus(1)),
            ConditionalDamageRule::new(DamageCondition::PlayerDiscards, DamageEffect::SetTo(4)),
            ConditionalDamageRule::new(DamageCondition::PlayerDiscards, DamageEffect::SetTo(7)),
        ];
        let attacker = avatar("beast");
        let ctx = RuleContext::new(&attacker).with_discard(true);
        assert_eq!(apply_conditional_rules(&rules, 3, &ctx), 8);
    }

    #[test]
    fn test_discard_rule() {
        let rules = compile_conditional("You may discard a card. If you discard a card, damage becomes 9.");
        assert_eq!(rules, vec![ConditionalDamageRule::new(
            DamageCondition::PlayerDiscards,
            DamageEffect::SetTo(9)
        )]);
    }

    #[test]
    fn test_rules_stay_inside_their_sentence() {
        let rules =
            compile_conditional("If you discard a card, draw 1 card. If this card has equipment attached, damage becomes 6.");
        assert_eq!(rules, vec![ConditionalDamageRule::new(
            DamageCondition::HasEquipment,
            DamageEffect::SetTo(6)
        )]);
    }

    #[test]
    fn test_plural_counter_wording() {
        let rules = compile_conditional("If the opponent avatar has bleed counters, damage becomes 9.");
        assert_eq!(rules, vec![ConditionalDamageRule::new(
            DamageCondition::OpponentHasCounter(CounterKind::Bleed),
            DamageEffect::SetTo(9)
        )]);

        let rules = compile_conditional("If this avatar has burn counters, damage gets +3.");
        assert_eq!(rules, vec![ConditionalDamageRule::new(
            DamageCondition::SelfHasCounter(CounterKind::Burn),
            DamageEffect::AddBonus(3)
        )]);
    }

    #[test]
    fn test_unrelated_text_compiles_to_nothing() {
        assert!(compile_conditional("A mighty roar.").is_empty());
    }
}
