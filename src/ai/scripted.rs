//! Scripted AI.
//!
//! A fixed priority list per phase. Prompts come first (reserve selection,
//! discard decisions, hand limit). Then, in a main phase:
//!
//! 1. place an active avatar if there is none
//! 2. place a reserve avatar if a slot is free
//! 3. play the best affordable action card (most declared damage, then
//!    cheapest)
//! 4. move an avatar to energy while the pool is under the threshold
//! 5. advance the phase
//!
//! In `battle` the untapped active avatar uses its costlier skill if
//! affordable, else the cheaper one, else the AI passes.

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::core::{Action, EngineConfig, GamePhase, GameState, Side, Slot};
use crate::engine::is_legal;
use crate::zones::{best_reserve, reserve_score};

use super::personality::card_value;
use super::Strategy;

/// Tuning for the scripted AI.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptedConfig {
    /// Keep converting avatars to energy until the pool holds this many.
    pub energy_threshold: usize,
}

impl Default for ScriptedConfig {
    fn default() -> Self {
        Self { energy_threshold: 5 }
    }
}

/// Priority-list AI.
#[derive(Clone, Debug, Default)]
pub struct ScriptedAi {
    config: ScriptedConfig,
}

impl ScriptedAi {
    #[must_use]
    pub fn new(config: ScriptedConfig) -> Self {
        Self { config }
    }

    fn prompt(&self, state: &GameState, config: &EngineConfig, side: Side) -> Option<Action> {
        let me = state.side(side);
        if me.needs_to_select_reserve_avatar {
            let index = best_reserve(&me.reserve_avatars).unwrap_or(0);
            return Some(Action::SelectReserve { index });
        }
        if me.pending_discard.is_some() {
            return Some(match least_valuable(state, side) {
                Some(hand_index) => Action::ConfirmDiscard { hand_index },
                None => Action::CancelDiscard,
            });
        }
        if state.current_player == side && me.hand.len() > config.hand_limit && state.phase == GamePhase::Recheck {
            let hand_index = me.hand.len() - 1;
            return Some(Action::DiscardForHandLimit { hand_index });
        }
        None
    }

    fn main_phase(&self, state: &GameState, config: &EngineConfig, side: Side) -> Action {
        let me = state.side(side);
        let legal = |action: Action| is_legal(state, config, side, action);

        let avatars: Vec<usize> = me
            .hand
            .iter()
            .enumerate()
            .filter(|(_, card)| card.as_avatar().is_some_and(|a| a.level == 1))
            .map(|(i, _)| i)
            .collect();

        let slot = if me.active_avatar.is_none() {
            Some(Slot::Active)
        } else if me.reserve_avatars.len() < config.reserve_capacity {
            Some(Slot::Reserve)
        } else {
            None
        };
        if let Some(slot) = slot {
            let best = avatars
                .iter()
                .map(|&hand_index| Action::PlayCard { hand_index, target: Some(slot) })
                .filter(|a| legal(*a))
                .max_by_key(|a| match a {
                    Action::PlayCard { hand_index, .. } => hand_score(state, side, *hand_index),
                    _ => 0,
                });
            if let Some(action) = best {
                return action;
            }
        }

        if state.phase != GamePhase::Setup {
            if let Some(action) = self.best_spell(state, config, side) {
                return action;
            }

            if me.energy_total() < self.config.energy_threshold && me.avatar_to_energy_count == 0 {
                // Fuel with the weakest avatar.
                let fuel = avatars
                    .iter()
                    .map(|&hand_index| Action::MoveToEnergy { hand_index })
                    .filter(|a| legal(*a))
                    .min_by_key(|a| match a {
                        Action::MoveToEnergy { hand_index } => hand_score(state, side, *hand_index),
                        _ => 0,
                    });
                if let Some(action) = fuel {
                    return action;
                }
            }
        }

        Action::NextPhase
    }

    fn best_spell(&self, state: &GameState, config: &EngineConfig, side: Side) -> Option<Action> {
        let me = state.side(side);
        let mut spells: Vec<(usize, u32, usize)> = me
            .hand
            .iter()
            .enumerate()
            .filter_map(|(i, card)| card.as_action().map(|a| (i, a.declared_damage(), a.energy_cost.len())))
            .collect();
        // Most damage first, cheaper first on ties.
        spells.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        spells
            .into_iter()
            .map(|(hand_index, _, _)| Action::PlayCard { hand_index, target: None })
            .find(|a| is_legal(state, config, side, *a))
    }

    fn battle(&self, state: &GameState, config: &EngineConfig, side: Side) -> Action {
        let Some(active) = state.side(side).active_avatar.as_ref() else {
            return Action::NextPhase;
        };
        if active.is_tapped {
            return Action::NextPhase;
        }

        let mut skills: Vec<(usize, usize)> =
            active.skills().enumerate().map(|(i, s)| (i, s.energy_cost.len())).collect();
        skills.sort_by(|a, b| b.1.cmp(&a.1));

        skills
            .into_iter()
            .map(|(skill_index, _)| Action::UseSkill { skill_index })
            .find(|a| is_legal(state, config, side, *a))
            .unwrap_or(Action::NextPhase)
    }
}

impl Strategy for ScriptedAi {
    fn decide(&mut self, state: &GameState, config: &EngineConfig, side: Side) -> Action {
        let action = if let Some(action) = self.prompt(state, config, side) {
            action
        } else {
            match state.phase {
                GamePhase::Setup | GamePhase::Main1 | GamePhase::Main2 => self.main_phase(state, config, side),
                GamePhase::Battle => self.battle(state, config, side),
                _ => Action::NextPhase,
            }
        };
        tracing::debug!(%side, phase = %state.phase, %action, "scripted decision");
        action
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

fn hand_score(state: &GameState, side: Side, hand_index: usize) -> i64 {
    state
        .side(side)
        .hand
        .get(hand_index)
        .and_then(Card::as_avatar)
        .map_or(0, reserve_score)
}

/// Hand index of the card worth least to keep.
fn least_valuable(state: &GameState, side: Side) -> Option<usize> {
    let hand = &state.side(side).hand;
    hand.iter()
        .enumerate()
        .map(|(i, card)| (i, card_value(card, 100)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}
