//! Phase state machine.
//!
//! `advance_phase` moves the game one step along
//! `setup → refresh → draw → main1 → battle → main2 → recheck → end`, runs
//! the entry effects of the phase it lands on, and on `end → refresh` hands
//! the turn to the other side.
//!
//! ## Entry effects
//!
//! - `refresh`: the current side's used energy returns, its per-turn flags
//!   reset, every avatar on both sides untaps, then the current side's
//!   bleed ticks and defeats are checked.
//! - `draw`: the current side draws one card.
//! - `recheck`: an AI side over the hand limit discards from the tail of
//!   its hand; a human side is flagged and must discard before `end`.

use crate::combat::tick_bleed;
use crate::core::{EngineConfig, GameError, GameEvent, GamePhase, GameState, PhaseViolation, Side};
use crate::energy;
use crate::zones::{check_defeats, discard, draw};

/// Advance one phase on behalf of `side`.
pub fn advance_phase(state: &mut GameState, config: &EngineConfig, side: Side) -> Result<Vec<GameEvent>, GameError> {
    let phase = state.phase;

    if phase == GamePhase::Setup {
        if let Some(missing) = Side::ALL.into_iter().find(|&s| state.side(s).active_avatar.is_none()) {
            return Err(PhaseViolation::SetupIncomplete { side: missing }.into());
        }
    } else if side != state.current_player {
        return Err(PhaseViolation::NotYourTurn { side }.into());
    }

    if phase == GamePhase::Recheck {
        let hand_size = state.current().hand.len();
        if hand_size > config.hand_limit {
            return Err(PhaseViolation::HandLimitExceeded {
                hand_size,
                limit: config.hand_limit,
            }
            .into());
        }
    }

    let mut events = Vec::new();

    // Leaving a phase.
    if phase == GamePhase::Recheck {
        state.side_mut(state.current_player).needs_to_discard_cards = false;
    }
    if phase == GamePhase::End {
        state.current_player = state.current_player.other();
        if state.current_player == state.first_player {
            state.turn += 1;
        }
        events.push(GameEvent::TurnPassed {
            side: state.current_player,
            turn: state.turn,
        });
    }

    state.phase = phase.next();
    tracing::info!(side = %state.current_player, phase = %state.phase, turn = state.turn, "phase changed");
    events.push(GameEvent::PhaseChanged {
        side: state.current_player,
        phase: state.phase,
        turn: state.turn,
    });

    events.extend(enter_phase(state, config));
    Ok(events)
}

fn enter_phase(state: &mut GameState, config: &EngineConfig) -> Vec<GameEvent> {
    let side = state.current_player;
    match state.phase {
        GamePhase::Refresh => enter_refresh(state, config, side),
        GamePhase::Draw => draw(state.side_mut(side), side, 1),
        GamePhase::Recheck => enter_recheck(state, config, side),
        _ => Vec::new(),
    }
}

fn enter_refresh(state: &mut GameState, config: &EngineConfig, side: Side) -> Vec<GameEvent> {
    let mut events = Vec::new();

    let owner = state.side_mut(side);
    let returned = energy::refresh(owner);
    owner.reset_turn_flags();
    if returned > 0 {
        events.push(GameEvent::EnergyRefreshed { side, amount: returned });
    }

    for s in Side::ALL {
        let p = state.side_mut(s);
        if let Some(active) = p.active_avatar.as_mut() {
            active.is_tapped = false;
        }
        for reserve in p.reserve_avatars.iter_mut() {
            reserve.is_tapped = false;
        }
    }
    events.push(GameEvent::AvatarsUntapped);

    events.extend(tick_bleed(state, side));
    events.extend(check_defeats(state, config));
    events
}

fn enter_recheck(state: &mut GameState, config: &EngineConfig, side: Side) -> Vec<GameEvent> {
    let limit = config.hand_limit;
    let mut events = Vec::new();

    if state.side(side).hand.len() <= limit {
        return events;
    }

    if config.is_ai(side) {
        while state.side(side).hand.len() > limit {
            let last = state.side(side).hand.len() - 1;
            match discard(state.side_mut(side), side, last) {
                Ok(event) => events.push(event),
                Err(_) => break,
            }
        }
        tracing::debug!(%side, "auto-discarded down to hand limit");
    } else {
        state.side_mut(side).needs_to_discard_cards = true;
        tracing::debug!(%side, hand = state.side(side).hand.len(), limit, "hand over limit");
    }
    events
}

/// Advance phases until the turn passes to the other side.
///
/// Either every step succeeds or the call fails as a whole; callers run it
/// on a draft state. Stops early when the game ends or a side must choose
/// a reserve avatar.
pub fn end_turn(state: &mut GameState, config: &EngineConfig, side: Side) -> Result<Vec<GameEvent>, GameError> {
    if state.phase != GamePhase::Setup && side != state.current_player {
        return Err(PhaseViolation::NotYourTurn { side }.into());
    }

    let start = state.current_player;
    let mut events = Vec::new();
    // One full cycle plus setup is the most a turn can take.
    for _ in 0..9 {
        let current = state.current_player;
        events.extend(advance_phase(state, config, current)?);
        if state.winner.is_some() || state.current_player != start {
            break;
        }
        if Side::ALL.into_iter().any(|s| state.side(s).needs_to_select_reserve_avatar) {
            break;
        }
    }
    Ok(events)
}
