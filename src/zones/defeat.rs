//! Avatar defeat cascade.
//!
//! An active avatar whose damage counter has reached its health is
//! defeated. The cascade, in order:
//!
//! 1. Its "when this avatar is defeated" hooks run.
//! 2. It goes to the graveyard with its equipment.
//! 3. Its owner loses 1 health; at 0 health the owner loses.
//! 4. The owner takes a life card into hand; with none left the owner loses.
//! 5. A reserve avatar is promoted: an AI side picks one by score, a human
//!    side is asked to choose. With no reserves the owner loses.
//!
//! Hooks can defeat the other side's avatar, so the check repeats until no
//! defeated avatar remains or a winner is set.

use im::Vector;

use crate::cards::AvatarCard;
use crate::combat::strike_active;
use crate::core::{EngineConfig, GameEvent, GameState, Side};
use crate::effects::DefeatHook;

use super::lifecycle::{bury_avatar, draw, promote_reserve};

/// Score used to auto-pick a reserve: level first, then health left, then
/// cheaper skills.
#[must_use]
pub fn reserve_score(avatar: &AvatarCard) -> i64 {
    i64::from(avatar.level) * 100 + i64::from(avatar.remaining_health()) * 4 - avatar.min_skill_cost() as i64 * 3
}

/// Best reserve by `reserve_score`; ties go to the earlier slot.
#[must_use]
pub fn best_reserve(reserves: &Vector<AvatarCard>) -> Option<usize> {
    reserves
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, i64)>, (i, avatar)| {
            let score = reserve_score(avatar);
            match best {
                Some((_, top)) if top >= score => best,
                _ => Some((i, score)),
            }
        })
        .map(|(i, _)| i)
}

fn defeated_side(state: &GameState) -> Option<Side> {
    let order = [state.current_player.other(), state.current_player];
    order.into_iter().find(|&side| {
        state
            .side(side)
            .active_avatar
            .as_ref()
            .is_some_and(AvatarCard::is_defeated)
    })
}

/// Resolve every pending defeat.
///
/// On a state with no defeated active avatar this changes nothing.
pub fn check_defeats(state: &mut GameState, config: &EngineConfig) -> Vec<GameEvent> {
    let mut events = Vec::new();
    while state.winner.is_none() {
        let Some(side) = defeated_side(state) else {
            break;
        };
        events.extend(defeat_active(state, config, side));
    }
    events
}

/// Set the winner.
pub fn declare_winner(state: &mut GameState, winner: Side) -> GameEvent {
    tracing::info!(%winner, turn = state.turn, "game over");
    state.winner = Some(winner);
    GameEvent::GameOver { winner }
}

fn defeat_active(state: &mut GameState, config: &EngineConfig, side: Side) -> Vec<GameEvent> {
    let Some(avatar) = state.side_mut(side).active_avatar.take() else {
        return Vec::new();
    };
    tracing::info!(%side, avatar = %avatar.info.name, "avatar defeated");

    let mut events = vec![GameEvent::AvatarDefeated {
        side,
        avatar: avatar.info.name.clone(),
    }];

    let hooks: Vec<DefeatHook> = avatar
        .skills()
        .flat_map(|s| s.rules.on_defeat.iter().copied())
        .collect();
    for hook in hooks {
        match hook {
            DefeatHook::Draw(n) => events.extend(draw(state.side_mut(side), side, n)),
            DefeatHook::DamageOpponent(n) => events.extend(strike_active(state, side.other(), n)),
        }
    }

    let owner = state.side_mut(side);
    bury_avatar(owner, avatar);

    owner.health = owner.health.saturating_sub(1);
    events.push(GameEvent::HealthLost {
        side,
        remaining: owner.health,
    });
    if owner.health == 0 {
        events.push(declare_winner(state, side.other()));
        return events;
    }

    match owner.life_cards.pop_front() {
        Some(card) => {
            owner.hand.push_back(card);
            events.push(GameEvent::LifeCardTaken {
                side,
                remaining: owner.life_cards.len(),
            });
        }
        None => {
            events.push(declare_winner(state, side.other()));
            return events;
        }
    }

    if owner.reserve_avatars.is_empty() {
        events.push(declare_winner(state, side.other()));
        return events;
    }

    if config.is_ai(side) {
        if let Some(event) = best_reserve(&owner.reserve_avatars).and_then(|i| promote_reserve(owner, side, i).ok()) {
            events.push(event);
        }
    } else {
        owner.needs_to_select_reserve_avatar = true;
        events.push(GameEvent::ReserveSelectionRequired { side });
    }
    events
}
