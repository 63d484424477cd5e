//! Command dispatch.
//!
//! `apply_action` is the single entry point for every mutation. It checks
//! the global gates first (game over, pending prompts), then the
//! per-command phase and turn rules, then delegates to the zone, energy
//! and combat modules. It mutates the state it is given as it goes; the
//! engine always hands it a draft and discards the draft on error.

use crate::cards::{ActionCard, ActionKind, Card, CounterKind, Element};
use crate::combat::{apply_counter, begin_skill, heal_active, resolve_skill, strike_active};
use crate::core::{
    Action, EngineConfig, EvolveTarget, GameError, GameEvent, GamePhase, GameState, PendingDiscard,
    PhaseViolation, Side, Slot, TargetError,
};
use crate::effects::SpellEffect;
use crate::energy;
use crate::zones::{self, check_defeats};

use super::phase::{advance_phase, end_turn};

/// Apply one action for `side`.
pub fn apply_action(
    state: &mut GameState,
    config: &EngineConfig,
    side: Side,
    action: Action,
) -> Result<Vec<GameEvent>, GameError> {
    if let Some(winner) = state.winner {
        return Err(GameError::TerminalState { winner });
    }
    check_pending(state, side, &action)?;

    match action {
        Action::PlayCard { hand_index, target } => play_card(state, config, side, hand_index, target),
        Action::UseSkill { skill_index } => use_skill(state, config, side, skill_index),
        Action::MoveToEnergy { hand_index } => {
            ensure_main_phase(state, side, &action)?;
            let event = zones::move_to_energy(state.side_mut(side), side, hand_index, config.avatars_to_energy_per_turn)?;
            Ok(vec![event])
        }
        Action::Evolve { hand_index, target } => evolve(state, side, hand_index, target),
        Action::NextPhase => advance_phase(state, config, side),
        Action::EndTurn => end_turn(state, config, side),
        Action::Discard { hand_index } => {
            ensure_turn(state, side)?;
            if !(state.phase.is_main() || state.phase == GamePhase::Recheck) {
                return Err(wrong_phase(state, &action));
            }
            discard(state, config, side, hand_index)
        }
        Action::DiscardForHandLimit { hand_index } => {
            let hand_size = state.side(side).hand.len();
            if hand_size <= config.hand_limit {
                return Err(PhaseViolation::NoDiscardRequired.into());
            }
            ensure_turn(state, side)?;
            if state.phase != GamePhase::Recheck {
                return Err(wrong_phase(state, &action));
            }
            discard(state, config, side, hand_index)
        }
        Action::ConfirmDiscard { hand_index } => confirm_discard(state, config, side, hand_index),
        Action::CancelDiscard => cancel_discard(state, config, side),
        Action::SelectReserve { index } => {
            if !state.side(side).needs_to_select_reserve_avatar {
                return Err(PhaseViolation::NothingPending.into());
            }
            let event = zones::promote_reserve(state.side_mut(side), side, index)?;
            Ok(vec![event])
        }
    }
}

// === Gates ===

/// Reject everything except the answer to an open prompt.
fn check_pending(state: &GameState, side: Side, action: &Action) -> Result<(), GameError> {
    for s in Side::ALL {
        let p = state.side(s);
        if p.needs_to_select_reserve_avatar {
            let answers = s == side && matches!(action, Action::SelectReserve { .. });
            if !answers {
                return Err(PhaseViolation::PendingReserveSelection { side: s }.into());
            }
        }
        if p.pending_discard.is_some() {
            let answers = s == side && matches!(action, Action::ConfirmDiscard { .. } | Action::CancelDiscard);
            if !answers {
                return Err(PhaseViolation::PendingDiscard { side: s }.into());
            }
        }
    }
    Ok(())
}

fn wrong_phase(state: &GameState, action: &Action) -> GameError {
    PhaseViolation::WrongPhase {
        action: action.name(),
        phase: state.phase,
    }
    .into()
}

fn ensure_turn(state: &GameState, side: Side) -> Result<(), GameError> {
    if state.current_player != side {
        return Err(PhaseViolation::NotYourTurn { side }.into());
    }
    Ok(())
}

fn ensure_main_phase(state: &GameState, side: Side, action: &Action) -> Result<(), GameError> {
    ensure_turn(state, side)?;
    if !state.phase.is_main() {
        return Err(wrong_phase(state, action));
    }
    Ok(())
}

// === Play card ===

fn play_card(
    state: &mut GameState,
    config: &EngineConfig,
    side: Side,
    hand_index: usize,
    target: Option<Slot>,
) -> Result<Vec<GameEvent>, GameError> {
    let action = Action::PlayCard { hand_index, target };
    let action_card = match zones::hand_card(state.side(side), hand_index)? {
        Card::Avatar(_) => None,
        Card::Action(card) => Some((card.kind, card.energy_cost.clone())),
    };

    if let Some((kind, cost)) = action_card {
        return play_action_card(state, config, side, hand_index, kind, &cost, &action);
    }

    if state.phase != GamePhase::Setup {
        ensure_main_phase(state, side, &action)?;
    }
    let turn = state.turn;
    let owner = state.side_mut(side);
    let slot = target.unwrap_or_else(|| zones::default_slot(owner));
    let event = match slot {
        Slot::Active => zones::play_as_active(owner, side, hand_index, turn)?,
        Slot::Reserve => zones::play_as_reserve(owner, side, hand_index, turn, config.reserve_capacity)?,
    };
    Ok(vec![event])
}

fn play_action_card(
    state: &mut GameState,
    config: &EngineConfig,
    side: Side,
    hand_index: usize,
    kind: ActionKind,
    cost: &[Element],
    action: &Action,
) -> Result<Vec<GameEvent>, GameError> {
    if kind != ActionKind::QuickSpell {
        ensure_main_phase(state, side, action)?;
    }
    if kind == ActionKind::Item && state.side(side).has_played_item_this_turn {
        return Err(PhaseViolation::ItemAlreadyPlayed.into());
    }
    if state.side(side).active_avatar.is_none() {
        return Err(TargetError::NoActiveAvatar { side }.into());
    }

    let mut events = Vec::new();
    let owner = state.side_mut(side);
    let paid = energy::pay(owner, cost)?;
    if paid > 0 {
        events.push(GameEvent::EnergyPaid { side, amount: paid });
    }

    let Card::Action(card) = owner.hand.remove(hand_index) else {
        return Err(TargetError::Unsupported.into());
    };
    if kind == ActionKind::Item {
        owner.has_played_item_this_turn = true;
    }
    tracing::debug!(%side, card = %card.info.name, ?kind, "action card played");
    events.push(GameEvent::ActionCardPlayed {
        side,
        card: card.info.name.clone(),
        kind,
    });

    events.extend(resolve_effects(state, side, &card));

    let owner = state.side_mut(side);
    match kind {
        ActionKind::Equipment | ActionKind::RitualArmor => {
            events.push(zones::attach_to_active(owner, side, card)?);
        }
        ActionKind::Field => events.extend(zones::play_field(owner, side, card)),
        ActionKind::Spell | ActionKind::QuickSpell | ActionKind::Item => {
            owner.graveyard.push_back(Card::Action(card));
        }
    }

    events.extend(check_defeats(state, config));
    Ok(events)
}

/// Resolve an action card's compiled effects in text order.
fn resolve_effects(state: &mut GameState, side: Side, card: &ActionCard) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for effect in &card.effects {
        match *effect {
            SpellEffect::Damage(n) => events.extend(strike_active(state, side.other(), n)),
            SpellEffect::Heal(n) => events.extend(heal_active(state, side, n)),
            SpellEffect::Draw(n) => events.extend(zones::draw(state.side_mut(side), side, n)),
            SpellEffect::ApplyCounter(kind, n) => events.extend(apply_counter(state, side.other(), kind, n)),
            SpellEffect::GainShield(n) => events.extend(apply_counter(state, side, CounterKind::Shield, n)),
        }
    }
    events
}

// === Skills ===

fn use_skill(
    state: &mut GameState,
    config: &EngineConfig,
    side: Side,
    skill_index: usize,
) -> Result<Vec<GameEvent>, GameError> {
    ensure_turn(state, side)?;
    if state.phase != GamePhase::Battle {
        return Err(wrong_phase(state, &Action::UseSkill { skill_index }));
    }

    let mut events = begin_skill(state, side, skill_index)?;

    let owner = state.side(side);
    let offers_discard = owner
        .active_avatar
        .as_ref()
        .and_then(|a| a.skill(skill_index))
        .is_some_and(|s| s.rules.offers_discard());

    if offers_discard && !owner.hand.is_empty() {
        let skill = owner
            .active_avatar
            .as_ref()
            .and_then(|a| a.skill(skill_index))
            .map(|s| s.name.clone())
            .unwrap_or_default();
        state.side_mut(side).pending_discard = Some(PendingDiscard { skill_index });
        events.push(GameEvent::DiscardOffered { side, skill });
        return Ok(events);
    }

    events.extend(resolve_skill(state, config, side, skill_index, false));
    Ok(events)
}

fn confirm_discard(
    state: &mut GameState,
    config: &EngineConfig,
    side: Side,
    hand_index: usize,
) -> Result<Vec<GameEvent>, GameError> {
    let pending = state
        .side(side)
        .pending_discard
        .ok_or(GameError::IllegalPhase(PhaseViolation::NothingPending))?;

    let owner = state.side_mut(side);
    let mut events = vec![zones::discard(owner, side, hand_index)?];
    owner.pending_discard = None;

    events.extend(resolve_skill(state, config, side, pending.skill_index, true));
    Ok(events)
}

fn cancel_discard(state: &mut GameState, config: &EngineConfig, side: Side) -> Result<Vec<GameEvent>, GameError> {
    let owner = state.side_mut(side);
    let pending = owner
        .pending_discard
        .take()
        .ok_or(GameError::IllegalPhase(PhaseViolation::NothingPending))?;

    let mut events = vec![GameEvent::DiscardDeclined { side }];
    events.extend(resolve_skill(state, config, side, pending.skill_index, false));
    Ok(events)
}

// === Other commands ===

fn evolve(state: &mut GameState, side: Side, hand_index: usize, target: EvolveTarget) -> Result<Vec<GameEvent>, GameError> {
    ensure_main_phase(state, side, &Action::Evolve { hand_index, target })?;
    let turn = state.turn;
    let event = zones::evolve(state.side_mut(side), side, hand_index, target, turn)?;
    Ok(vec![event])
}

fn discard(state: &mut GameState, config: &EngineConfig, side: Side, hand_index: usize) -> Result<Vec<GameEvent>, GameError> {
    let owner = state.side_mut(side);
    let event = zones::discard(owner, side, hand_index)?;
    if owner.hand.len() <= config.hand_limit {
        owner.needs_to_discard_cards = false;
    }
    Ok(vec![event])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{AvatarCard, CardId, Skill};

    fn avatar(name: &str, level: u8) -> AvatarCard {
        AvatarCard::new(
            CardId::new(1),
            name,
            Element::Water,
            level,
            "spirit",
            8,
            Skill::new("Splash", &[Element::Water], 2, ""),
        )
    }

    fn spell(kind: ActionKind, cost: &[Element], text: &str) -> Card {
        Card::Action(ActionCard::new(CardId::new(9), "Spell", Element::Water, kind, cost, text))
    }

    fn main_state() -> GameState {
        let mut state = GameState::new(Side::Player, 4);
        state.phase = GamePhase::Main1;
        state.player.active_avatar = Some(avatar("P", 1));
        state.opponent.active_avatar = Some(avatar("O", 1));
        for _ in 0..2 {
            state.player.energy_pile.push_back(avatar("E", 1));
            state.opponent.energy_pile.push_back(avatar("E", 1));
        }
        state
    }

    #[test]
    fn test_terminal_state_rejects() {
        let mut state = main_state();
        state.winner = Some(Side::Opponent);
        let err = apply_action(&mut state, &EngineConfig::default(), Side::Player, Action::NextPhase).unwrap_err();
        assert_eq!(err, GameError::TerminalState { winner: Side::Opponent });
    }

    #[test]
    fn test_spell_resolves_then_graveyard() {
        let mut state = main_state();
        state.player.hand.push_back(spell(
            ActionKind::Spell,
            &[Element::Water],
            "Deal 3 damage to the opponent's active avatar.",
        ));

        apply_action(&mut state, &EngineConfig::default(), Side::Player, Action::PlayCard { hand_index: 0, target: None })
            .unwrap();
        assert_eq!(state.opponent.active_avatar.as_ref().unwrap().counters.damage, 3);
        assert_eq!(state.player.graveyard.len(), 1);
        assert_eq!(state.player.used_energy_pile.len(), 1);
    }

    #[test]
    fn test_spell_outside_main_phase() {
        let mut state = main_state();
        state.phase = GamePhase::Battle;
        state.player.hand.push_back(spell(ActionKind::Spell, &[], "Draw 1 card."));
        let err = apply_action(
            &mut state,
            &EngineConfig::default(),
            Side::Player,
            Action::PlayCard { hand_index: 0, target: None },
        )
        .unwrap_err();
        assert!(matches!(err, GameError::IllegalPhase(PhaseViolation::WrongPhase { .. })));
    }

    #[test]
    fn test_quick_spell_on_opponent_turn() {
        let mut state = main_state();
        state.phase = GamePhase::Battle;
        state.opponent.hand.push_back(spell(
            ActionKind::QuickSpell,
            &[Element::Neutral],
            "Put 2 burn counters on the opponent's active avatar.",
        ));

        apply_action(
            &mut state,
            &EngineConfig::default(),
            Side::Opponent,
            Action::PlayCard { hand_index: 0, target: None },
        )
        .unwrap();
        assert_eq!(state.player.active_avatar.as_ref().unwrap().counters.burn, 2);
    }

    #[test]
    fn test_item_once_per_turn() {
        let mut state = main_state();
        state.player.hand.push_back(spell(ActionKind::Item, &[], ""));
        state.player.hand.push_back(spell(ActionKind::Item, &[], ""));
        let config = EngineConfig::default();
        let play = Action::PlayCard { hand_index: 0, target: None };

        apply_action(&mut state, &config, Side::Player, play).unwrap();
        let err = apply_action(&mut state, &config, Side::Player, play).unwrap_err();
        assert_eq!(err, GameError::IllegalPhase(PhaseViolation::ItemAlreadyPlayed));
    }

    #[test]
    fn test_equipment_attaches() {
        let mut state = main_state();
        state.player.hand.push_back(spell(ActionKind::Equipment, &[], ""));
        apply_action(
            &mut state,
            &EngineConfig::default(),
            Side::Player,
            Action::PlayCard { hand_index: 0, target: None },
        )
        .unwrap();
        assert_eq!(state.player.active_avatar.as_ref().unwrap().equipment.len(), 1);
        assert!(state.player.graveyard.is_empty());
    }

    #[test]
    fn test_pending_discard_blocks_everything_else() {
        let mut state = main_state();
        state.phase = GamePhase::Battle;
        state.player.active_avatar = Some(
            AvatarCard::new(
                CardId::new(3),
                "Dancer",
                Element::Water,
                1,
                "spirit",
                6,
                Skill::new("Veil", &[], 2, "If you discard a card, damage becomes 6."),
            ),
        );
        state.player.hand.push_back(Card::Avatar(avatar("fodder", 1)));
        let config = EngineConfig::default();

        let events = apply_action(&mut state, &config, Side::Player, Action::UseSkill { skill_index: 0 }).unwrap();
        assert!(matches!(events.last(), Some(GameEvent::DiscardOffered { .. })));

        let err = apply_action(&mut state, &config, Side::Player, Action::NextPhase).unwrap_err();
        assert_eq!(err, GameError::IllegalPhase(PhaseViolation::PendingDiscard { side: Side::Player }));

        apply_action(&mut state, &config, Side::Player, Action::ConfirmDiscard { hand_index: 0 }).unwrap();
        assert_eq!(state.opponent.active_avatar.as_ref().unwrap().counters.damage, 6);
        assert!(state.player.pending_discard.is_none());
    }

    #[test]
    fn test_cancel_discard_uses_base_damage() {
        let mut state = main_state();
        state.phase = GamePhase::Battle;
        state.player.active_avatar = Some(AvatarCard::new(
            CardId::new(3),
            "Dancer",
            Element::Water,
            1,
            "spirit",
            6,
            Skill::new("Veil", &[], 2, "If you discard a card, damage becomes 6."),
        ));
        state.player.hand.push_back(Card::Avatar(avatar("fodder", 1)));
        let config = EngineConfig::default();

        apply_action(&mut state, &config, Side::Player, Action::UseSkill { skill_index: 0 }).unwrap();
        apply_action(&mut state, &config, Side::Player, Action::CancelDiscard).unwrap();
        assert_eq!(state.opponent.active_avatar.as_ref().unwrap().counters.damage, 2);
        assert_eq!(state.player.hand.len(), 1);
    }

    #[test]
    fn test_select_reserve_without_prompt() {
        let mut state = main_state();
        let err = apply_action(
            &mut state,
            &EngineConfig::default(),
            Side::Player,
            Action::SelectReserve { index: 0 },
        )
        .unwrap_err();
        assert_eq!(err, GameError::IllegalPhase(PhaseViolation::NothingPending));
    }

    #[test]
    fn test_hand_limit_discard() {
        let mut state = main_state();
        state.phase = GamePhase::Recheck;
        let config = EngineConfig::default().with_hand_limit(1).with_starting_hand_size(1);
        state.player.hand.push_back(Card::Avatar(avatar("a", 1)));
        let err = apply_action(&mut state, &config, Side::Player, Action::DiscardForHandLimit { hand_index: 0 })
            .unwrap_err();
        assert_eq!(err, GameError::IllegalPhase(PhaseViolation::NoDiscardRequired));

        state.player.hand.push_back(Card::Avatar(avatar("b", 1)));
        state.player.needs_to_discard_cards = true;
        apply_action(&mut state, &config, Side::Player, Action::DiscardForHandLimit { hand_index: 1 }).unwrap();
        assert!(!state.player.needs_to_discard_cards);
        assert_eq!(state.player.hand.len(), 1);
    }

    #[test]
    fn test_hand_limit_discard_only_at_own_recheck() {
        let mut state = main_state();
        for _ in 0..9 {
            state.opponent.hand.push_back(Card::Avatar(avatar("h", 1)));
            state.player.hand.push_back(Card::Avatar(avatar("h", 1)));
        }
        let config = EngineConfig::default();
        let before = state.clone();

        let err = apply_action(&mut state, &config, Side::Opponent, Action::DiscardForHandLimit { hand_index: 0 })
            .unwrap_err();
        assert_eq!(err, GameError::IllegalPhase(PhaseViolation::NotYourTurn { side: Side::Opponent }));

        let err = apply_action(&mut state, &config, Side::Player, Action::DiscardForHandLimit { hand_index: 0 })
            .unwrap_err();
        assert_eq!(
            err,
            GameError::IllegalPhase(PhaseViolation::WrongPhase {
                action: Action::DiscardForHandLimit { hand_index: 0 }.name(),
                phase: GamePhase::Main1,
            })
        );
        assert_eq!(state, before);

        state.phase = GamePhase::Recheck;
        apply_action(&mut state, &config, Side::Player, Action::DiscardForHandLimit { hand_index: 0 }).unwrap();
        assert_eq!(state.player.hand.len(), 8);
    }
}
