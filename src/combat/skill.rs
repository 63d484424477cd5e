//! Skill use.
//!
//! A skill use has two halves. `begin_skill` validates the attacker, pays
//! the cost and taps the avatar. `resolve_skill` computes and deals the
//! damage, applies trigger counters and runs the defeat cascade. Skills
//! with an optional discard open a prompt between the two halves.

use crate::cards::CounterKind;
use crate::core::{EngineConfig, GameError, GameEvent, GameState, PhaseViolation, Side, TargetError};
use crate::energy;
use crate::zones::check_defeats;

use super::damage::{apply_counter, skill_damage, strike_active};

/// Validate a skill use, pay its cost and tap the attacker.
pub fn begin_skill(state: &mut GameState, side: Side, skill_index: usize) -> Result<Vec<GameEvent>, GameError> {
    let target_side = side.other();
    if state.side(target_side).active_avatar.is_none() {
        return Err(TargetError::NoActiveAvatar { side: target_side }.into());
    }

    let owner = state.side_mut(side);
    let attacker = owner
        .active_avatar
        .as_ref()
        .ok_or(GameError::InvalidTarget(TargetError::NoActiveAvatar { side }))?;
    let skill = attacker
        .skill(skill_index)
        .ok_or(GameError::InvalidTarget(TargetError::NoSuchSkill { index: skill_index }))?;
    if attacker.is_tapped {
        return Err(PhaseViolation::AvatarAlreadyActed.into());
    }
    let cost = skill.energy_cost.clone();

    let paid = energy::pay(owner, &cost)?;
    if let Some(attacker) = owner.active_avatar.as_mut() {
        attacker.is_tapped = true;
    }

    let mut events = Vec::new();
    if paid > 0 {
        events.push(GameEvent::EnergyPaid { side, amount: paid });
    }
    Ok(events)
}

/// Deal a begun skill's damage and resolve its consequences.
pub fn resolve_skill(
    state: &mut GameState,
    config: &EngineConfig,
    side: Side,
    skill_index: usize,
    discarded: bool,
) -> Vec<GameEvent> {
    let Some((breakdown, outcome)) = skill_damage(state, side, skill_index, discarded) else {
        return Vec::new();
    };
    let (avatar, skill) = match state.side(side).active_avatar.as_ref() {
        Some(a) => (
            a.info.name.clone(),
            a.skill(skill_index).map(|s| s.name.clone()).unwrap_or_default(),
        ),
        None => return Vec::new(),
    };
    let target_side = side.other();

    tracing::debug!(
        %side,
        %avatar,
        %skill,
        base = breakdown.base,
        after_triggers = breakdown.after_triggers,
        after_conditional = breakdown.after_conditional,
        passive = breakdown.passive,
        total = breakdown.total,
        "skill damage"
    );

    let mut events = vec![GameEvent::SkillUsed { side, avatar, skill }];
    if outcome.should_trigger {
        events.push(GameEvent::TriggerFired {
            side,
            message: outcome.message.clone(),
        });
    }

    events.extend(strike_active(state, target_side, breakdown.total));

    if let Some(bleed) = outcome.apply_bleed {
        events.extend(apply_counter(state, target_side, CounterKind::Bleed, bleed));
    }
    if let Some(shield) = outcome.apply_shield {
        events.extend(apply_counter(state, side, CounterKind::Shield, shield));
    }

    events.extend(check_defeats(state, config));
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{AvatarCard, CardId, Element, Skill};

    fn avatar(name: &str, health: u32, skill: Skill) -> AvatarCard {
        AvatarCard::new(CardId::new(1), name, Element::Fire, 1, "beast", health, skill)
    }

    fn battle(attacker_skill: Skill) -> GameState {
        let mut state = GameState::new(Side::Player, 4);
        state.player.active_avatar = Some(avatar("Fox", 8, attacker_skill));
        state.opponent.active_avatar = Some(avatar("Sprite", 7, Skill::new("Splash", &[], 1, "")));
        for _ in 0..3 {
            state
                .player
                .energy_pile
                .push_back(avatar("E", 1, Skill::new("-", &[], 0, "")));
        }
        state
    }

    #[test]
    fn test_begin_pays_and_taps() {
        let mut state = battle(Skill::new("Flare", &[Element::Fire, Element::Neutral], 3, ""));
        let events = begin_skill(&mut state, Side::Player, 0).unwrap();

        assert_eq!(events, vec![GameEvent::EnergyPaid { side: Side::Player, amount: 2 }]);
        assert_eq!(state.player.energy_pile.len(), 1);
        assert_eq!(state.player.used_energy_pile.len(), 2);
        assert!(state.player.active_avatar.as_ref().unwrap().is_tapped);

        let err = begin_skill(&mut state, Side::Player, 0).unwrap_err();
        assert_eq!(err, GameError::IllegalPhase(PhaseViolation::AvatarAlreadyActed));
    }

    #[test]
    fn test_begin_rejections() {
        let mut state = battle(Skill::new("Big", &[Element::Fire; 4], 9, ""));
        assert!(matches!(
            begin_skill(&mut state, Side::Player, 0),
            Err(GameError::InsufficientEnergy { required: 4, available: 3 })
        ));
        assert!(matches!(
            begin_skill(&mut state, Side::Player, 1),
            Err(GameError::InvalidTarget(TargetError::NoSuchSkill { index: 1 }))
        ));

        state.opponent.active_avatar = None;
        assert!(matches!(
            begin_skill(&mut state, Side::Player, 0),
            Err(GameError::InvalidTarget(TargetError::NoActiveAvatar { side: Side::Opponent }))
        ));
    }

    #[test]
    fn test_resolve_applies_trigger_counters() {
        let mut state = battle(Skill::new(
            "Rend",
            &[],
            2,
            "Apply 2 bleed counters to the opponent. This avatar gains 1 shield.",
        ));
        begin_skill(&mut state, Side::Player, 0).unwrap();
        let events = resolve_skill(&mut state, &EngineConfig::default(), Side::Player, 0, false);

        let target = state.opponent.active_avatar.as_ref().unwrap();
        assert_eq!(target.counters.damage, 2);
        assert_eq!(target.counters.bleed, 2);
        assert_eq!(state.player.active_avatar.as_ref().unwrap().counters.shield, 1);
        assert!(events.iter().any(|e| matches!(e, GameEvent::TriggerFired { .. })));
    }

    #[test]
    fn test_resolve_runs_defeat_cascade() {
        let mut state = battle(Skill::new("Crush", &[], 9, ""));
        state.opponent.health = 1;
        begin_skill(&mut state, Side::Player, 0).unwrap();
        let events = resolve_skill(&mut state, &EngineConfig::default(), Side::Player, 0, false);

        assert_eq!(state.winner, Some(Side::Player));
        assert_eq!(events.last(), Some(&GameEvent::GameOver { winner: Side::Player }));
    }
}
