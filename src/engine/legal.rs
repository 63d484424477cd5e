//! Legal action enumeration.
//!
//! Candidates are generated from the visible state and each one is
//! dry-run on a clone. Whatever the command layer accepts is legal, so the
//! enumeration can never drift from the rules it mirrors.

use crate::core::{Action, EngineConfig, EvolveTarget, GamePhase, GameState, Side, Slot};

use super::commands::apply_action;

/// Every action `side` could take right now.
///
/// Voluntary discards and `EndTurn` are left out: `NextPhase` already
/// covers passing, and discarding a card for nothing is never useful to a
/// strategy. Both remain available through the command surface.
#[must_use]
pub fn legal_actions(state: &GameState, config: &EngineConfig, side: Side) -> Vec<Action> {
    if state.winner.is_some() {
        return Vec::new();
    }
    candidates(state, config, side)
        .into_iter()
        .filter(|action| is_legal(state, config, side, *action))
        .collect()
}

/// Whether `action` would be accepted.
#[must_use]
pub fn is_legal(state: &GameState, config: &EngineConfig, side: Side, action: Action) -> bool {
    let mut draft = state.clone();
    apply_action(&mut draft, config, side, action).is_ok()
}

fn candidates(state: &GameState, config: &EngineConfig, side: Side) -> Vec<Action> {
    let me = state.side(side);
    let mut out = Vec::new();

    if me.needs_to_select_reserve_avatar {
        out.extend((0..me.reserve_avatars.len()).map(|index| Action::SelectReserve { index }));
        return out;
    }
    if me.pending_discard.is_some() {
        out.extend((0..me.hand.len()).map(|hand_index| Action::ConfirmDiscard { hand_index }));
        out.push(Action::CancelDiscard);
        return out;
    }

    let hand = me.hand.len();
    let at_recheck = state.current_player == side && state.phase == GamePhase::Recheck;
    if at_recheck && hand > config.hand_limit {
        out.extend((0..hand).map(|hand_index| Action::DiscardForHandLimit { hand_index }));
    }

    for (hand_index, card) in me.hand.iter().enumerate() {
        if !card.is_avatar() {
            out.push(Action::PlayCard { hand_index, target: None });
            continue;
        }
        out.push(Action::PlayCard { hand_index, target: Some(Slot::Active) });
        out.push(Action::PlayCard { hand_index, target: Some(Slot::Reserve) });
        out.push(Action::MoveToEnergy { hand_index });
        out.push(Action::Evolve { hand_index, target: EvolveTarget::Active });
        for i in 0..me.reserve_avatars.len() {
            out.push(Action::Evolve { hand_index, target: EvolveTarget::Reserve(i) });
        }
    }

    if let Some(active) = me.active_avatar.as_ref() {
        out.extend((0..active.skills().count()).map(|skill_index| Action::UseSkill { skill_index }));
    }

    out.push(Action::NextPhase);
    out
}
