//! Damage calculation and application.
//!
//! ## Pipeline
//!
//! 1. Base damage is the skill's declared damage.
//! 2. The trigger checker may replace it (hand-size override, element matchup).
//! 3. Conditional rules apply: `SetTo` (last wins), then `AddBonus` summed.
//! 4. The owner's passive bonus is added.
//! 5. The result floors at 0.
//! 6. On the target, shield absorbs up to the full amount and is consumed;
//!    the rest is added to the damage counter.

use crate::cards::{AvatarCard, CounterKind, Skill};
use crate::core::{GameEvent, GameState, Side};
use crate::effects::{
    apply_conditional_rules, check_triggers, passive_bonus, RuleContext, TriggerOutcome,
};

/// Every intermediate value of one damage calculation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DamageBreakdown {
    pub base: u32,
    pub after_triggers: u32,
    pub after_conditional: i64,
    pub passive: u32,
    /// Final pre-shield damage.
    pub total: u32,
}

/// Compute a skill's pre-shield damage.
#[must_use]
pub fn compute_damage(skill: &Skill, ctx: &RuleContext<'_>, passive: u32) -> (DamageBreakdown, TriggerOutcome) {
    let outcome = check_triggers(&skill.rules.triggers, skill.damage, ctx);
    let after_triggers = outcome.modified_damage.unwrap_or(skill.damage);
    let after_conditional = apply_conditional_rules(&skill.rules.conditional, i64::from(after_triggers), ctx);
    let total = (after_conditional + i64::from(passive)).clamp(0, i64::from(u32::MAX)) as u32;

    let breakdown = DamageBreakdown {
        base: skill.damage,
        after_triggers,
        after_conditional,
        passive,
        total,
    };
    (breakdown, outcome)
}

/// Compute what `side`'s active avatar would deal with a skill right now.
///
/// Returns `None` if there is no active avatar or no such skill.
#[must_use]
pub fn skill_damage(
    state: &GameState,
    side: Side,
    skill_index: usize,
    discarded: bool,
) -> Option<(DamageBreakdown, TriggerOutcome)> {
    let owner = state.side(side);
    let attacker = owner.active_avatar.as_ref()?;
    let skill = attacker.skill(skill_index)?;
    let target = state.side(side.other()).active_avatar.as_ref();

    let ctx = RuleContext::new(attacker)
        .with_target(target)
        .with_hand_size(owner.hand.len())
        .with_discard(discarded);
    Some(compute_damage(skill, &ctx, passive_bonus(owner)))
}

/// Damage actually taken after shield.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hit {
    pub dealt: u32,
    pub absorbed: u32,
}

/// Apply damage to one avatar through its shield.
///
/// ```
/// use avatar_ccg::cards::{AvatarCard, CardId, Element, Skill};
/// use avatar_ccg::combat::absorb;
///
/// let mut target = AvatarCard::new(
///     CardId::new(1), "Reef Guardian", Element::Water, 1, "guardian", 12,
///     Skill::new("Shell Bash", &[Element::Water], 1, ""),
/// );
/// target.counters.shield = 2;
///
/// let hit = absorb(&mut target, 5);
/// assert_eq!((hit.dealt, hit.absorbed), (3, 2));
/// assert_eq!(target.counters.damage, 3);
/// assert_eq!(target.counters.shield, 0);
/// ```
pub fn absorb(avatar: &mut AvatarCard, amount: u32) -> Hit {
    let absorbed = avatar.counters.remove(CounterKind::Shield, amount);
    let dealt = amount - absorbed;
    avatar.counters.add(CounterKind::Damage, dealt);
    Hit { dealt, absorbed }
}

/// Hit `side`'s active avatar. Does not check for defeat.
pub fn strike_active(state: &mut GameState, side: Side, amount: u32) -> Vec<GameEvent> {
    let Some(target) = state.side_mut(side).active_avatar.as_mut() else {
        return Vec::new();
    };
    let hit = absorb(target, amount);
    vec![GameEvent::DamageDealt {
        side,
        avatar: target.info.name.clone(),
        amount: hit.dealt,
        absorbed: hit.absorbed,
    }]
}

/// Add counters to `side`'s active avatar.
pub fn apply_counter(state: &mut GameState, side: Side, kind: CounterKind, amount: u32) -> Option<GameEvent> {
    let target = state.side_mut(side).active_avatar.as_mut()?;
    target.counters.add(kind, amount);
    Some(GameEvent::CountersApplied {
        side,
        avatar: target.info.name.clone(),
        kind,
        amount,
    })
}

/// Remove up to `amount` damage from `side`'s active avatar.
pub fn heal_active(state: &mut GameState, side: Side, amount: u32) -> Option<GameEvent> {
    let target = state.side_mut(side).active_avatar.as_mut()?;
    let healed = target.counters.remove(CounterKind::Damage, amount);
    Some(GameEvent::Healed {
        side,
        avatar: target.info.name.clone(),
        amount: healed,
    })
}

/// Refresh-phase bleed tick for one side's avatars.
///
/// Each bleeding avatar takes its bleed as damage, then bleed drops by one.
/// Shield does not stop bleed.
pub fn tick_bleed(state: &mut GameState, side: Side) -> Vec<GameEvent> {
    let owner = state.side_mut(side);
    let mut events = Vec::new();

    let active = owner.active_avatar.iter_mut();
    let reserves = owner.reserve_avatars.iter_mut();
    for avatar in active.chain(reserves) {
        let bleed = avatar.counters.bleed;
        if bleed == 0 {
            continue;
        }
        avatar.counters.add(CounterKind::Damage, bleed);
        avatar.counters.bleed -= 1;
        events.push(GameEvent::BleedTicked {
            side,
            avatar: avatar.info.name.clone(),
            amount: bleed,
        });
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{ActionCard, ActionKind, CardId, Element};

    fn avatar(name: &str, effect: &str, damage: u32) -> AvatarCard {
        AvatarCard::new(
            CardId::new(1),
            name,
            Element::Fire,
            1,
            "beast",
            10,
            Skill::new("Bite", &[Element::Fire], damage, effect),
        )
    }

    fn duel(attacker: AvatarCard, target: AvatarCard) -> GameState {
        let mut state = GameState::new(Side::Player, 4);
        state.player.active_avatar = Some(attacker);
        state.opponent.active_avatar = Some(target);
        state
    }

    #[test]
    fn test_plain_damage() {
        let state = duel(avatar("A", "", 3), avatar("B", "", 1));
        let (breakdown, _) = skill_damage(&state, Side::Player, 0, false).unwrap();
        assert_eq!(breakdown.total, 3);
    }

    #[test]
    fn test_conditional_override_is_not_additive() {
        let text = "If the opponent active avatar has a bleed counter, this attack damage becomes 10";
        let mut target = avatar("B", "", 1);
        target.counters.bleed = 1;
        let state = duel(avatar("A", text, 3), target);

        let (breakdown, _) = skill_damage(&state, Side::Player, 0, false).unwrap();
        assert_eq!(breakdown.total, 10);
    }

    #[test]
    fn test_trigger_then_conditional_then_passive() {
        let text = "If you have 2 or more cards in hand, this attack damage becomes 5. \
                    If this card has a burn counter, damage gets +1.";
        let mut attacker = avatar("A", text, 3);
        attacker.counters.burn = 1;
        let mut state = duel(attacker, avatar("B", "", 1));
        let banner = ActionCard::new(
            CardId::new(7),
            "Banner",
            Element::Neutral,
            ActionKind::Field,
            &[],
            "If your active avatar has type beast, attack damage gets +2",
        );
        state.player.field_cards.push_back(banner.clone());
        state.player.hand.push_back(banner.clone().into());
        state.player.hand.push_back(banner.into());

        let (breakdown, outcome) = skill_damage(&state, Side::Player, 0, false).unwrap();
        assert_eq!(outcome.modified_damage, Some(5));
        assert_eq!(breakdown.after_triggers, 5);
        assert_eq!(breakdown.after_conditional, 6);
        assert_eq!(breakdown.passive, 6);
        assert_eq!(breakdown.total, 12);
    }

    #[test]
    fn test_shield_absorbs() {
        let mut target = avatar("B", "", 1);
        target.counters.shield = 2;
        let mut state = duel(avatar("A", "", 3), target);

        let events = strike_active(&mut state, Side::Opponent, 5);
        let hit = state.opponent.active_avatar.as_ref().unwrap();
        assert_eq!(hit.counters.damage, 3);
        assert_eq!(hit.counters.shield, 0);
        assert_eq!(
            events,
            vec![GameEvent::DamageDealt {
                side: Side::Opponent,
                avatar: "B".into(),
                amount: 3,
                absorbed: 2
            }]
        );
    }

    #[test]
    fn test_shield_larger_than_damage() {
        let mut target = avatar("B", "", 1);
        target.counters.shield = 7;
        let hit = absorb(&mut target, 4);
        assert_eq!(hit, Hit { dealt: 0, absorbed: 4 });
        assert_eq!(target.counters.shield, 3);
    }

    #[test]
    fn test_bleed_tick() {
        let mut bleeding = avatar("A", "", 1);
        bleeding.counters.bleed = 2;
        let mut state = duel(bleeding, avatar("B", "", 1));

        tick_bleed(&mut state, Side::Player);
        let a = state.player.active_avatar.as_ref().unwrap();
        assert_eq!(a.counters.damage, 2);
        assert_eq!(a.counters.bleed, 1);

        tick_bleed(&mut state, Side::Player);
        tick_bleed(&mut state, Side::Player);
        let a = state.player.active_avatar.as_ref().unwrap();
        assert_eq!(a.counters.damage, 3);
        assert_eq!(a.counters.bleed, 0);
    }

    #[test]
    fn test_heal_floors_at_zero() {
        let mut hurt = avatar("A", "", 1);
        hurt.counters.damage = 2;
        let mut state = duel(hurt, avatar("B", "", 1));
        let event = heal_active(&mut state, Side::Player, 5);
        assert!(matches!(event, Some(GameEvent::Healed { amount: 2, .. })));
    }
}
