//! Personality-weighted AI.
//!
//! Every legal action gets a score:
//!
//! ```text
//! score = card_value × personality_modifier + situational_bonus + noise
//! ```
//!
//! then the play style multiplies the categories it favors and the top
//! score wins. Ties go to the earliest candidate.
//!
//! `card_value` of an avatar is `health×5 + level×10 + best_skill_damage×3`,
//! scaled by `card_evaluation / 100`.

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Element};
use crate::combat::skill_damage;
use crate::core::{Action, ActionCategory, EngineConfig, GameRng, GameState, Side, Slot};
use crate::engine::legal_actions;
use crate::zones::reserve_score;

use super::Strategy;

/// Difficulty tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Newbie,
    Regular,
    Advanced,
}

impl Tier {
    /// The tier's weights.
    #[must_use]
    pub fn personality(self) -> Personality {
        match self {
            Tier::Newbie => Personality {
                tier: self,
                aggression: 70,
                caution: 20,
                efficiency: 30,
                strategy: 20,
                risk_tolerance: 80,
                card_evaluation: 60,
                mistake_chance: 0.25,
                favorite_elements: Vec::new(),
                play_style: PlayStyle::Aggressive,
            },
            Tier::Regular => Personality {
                tier: self,
                aggression: 55,
                caution: 45,
                efficiency: 55,
                strategy: 50,
                risk_tolerance: 50,
                card_evaluation: 85,
                mistake_chance: 0.1,
                favorite_elements: Vec::new(),
                play_style: PlayStyle::Balanced,
            },
            Tier::Advanced => Personality {
                tier: self,
                aggression: 60,
                caution: 60,
                efficiency: 80,
                strategy: 85,
                risk_tolerance: 40,
                card_evaluation: 100,
                mistake_chance: 0.02,
                favorite_elements: Vec::new(),
                play_style: PlayStyle::Balanced,
            },
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Tier::Newbie => "newbie",
            Tier::Regular => "regular",
            Tier::Advanced => "advanced",
        }
    }
}

/// Which categories get the tiebreak multiplier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayStyle {
    /// Favors playing cards and using skills.
    Aggressive,
    /// Favors building energy.
    Defensive,
    Balanced,
}

impl PlayStyle {
    #[must_use]
    pub fn multiplier(self, category: ActionCategory) -> f64 {
        match (self, category) {
            (PlayStyle::Aggressive, ActionCategory::PlayCard | ActionCategory::UseSkill) => 1.2,
            (PlayStyle::Defensive, ActionCategory::AddToEnergy) => 1.2,
            _ => 1.0,
        }
    }
}

/// Weights of one personality. The integer weights are on a 0 to 100 scale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Personality {
    pub tier: Tier,
    pub aggression: u32,
    pub caution: u32,
    pub efficiency: u32,
    pub strategy: u32,
    pub risk_tolerance: u32,
    pub card_evaluation: u32,
    /// Probability that an action's score is perturbed.
    pub mistake_chance: f64,
    pub favorite_elements: Vec<Element>,
    pub play_style: PlayStyle,
}

impl Default for Personality {
    fn default() -> Self {
        Tier::Regular.personality()
    }
}

impl Personality {
    #[must_use]
    pub fn with_favorite_elements(mut self, elements: &[Element]) -> Self {
        self.favorite_elements = elements.to_vec();
        self
    }

    #[must_use]
    pub fn with_play_style(mut self, style: PlayStyle) -> Self {
        self.play_style = style;
        self
    }

    #[must_use]
    pub fn with_mistake_chance(mut self, chance: f64) -> Self {
        self.mistake_chance = chance.clamp(0.0, 1.0);
        self
    }

    /// Multiplier applied to an action's card value.
    #[must_use]
    pub fn modifier(&self, category: ActionCategory) -> f64 {
        let w = |v: u32| f64::from(v) / 100.0;
        match category {
            ActionCategory::UseSkill => 1.0 + w(self.aggression),
            ActionCategory::PlayCard => 1.0 + (w(self.aggression) + w(self.strategy)) / 2.0,
            ActionCategory::AddToEnergy => 1.0 + w(self.efficiency),
            ActionCategory::Evolve => 1.0 + w(self.strategy),
            ActionCategory::Discard | ActionCategory::Select => 1.0 + w(self.caution),
            ActionCategory::Pass => 1.0,
        }
    }
}

/// Value of holding or playing `card`, scaled by `card_evaluation / 100`.
#[must_use]
pub fn card_value(card: &Card, card_evaluation: u32) -> f64 {
    let raw = match card {
        Card::Avatar(a) => f64::from(a.health) * 5.0 + f64::from(a.level) * 10.0 + f64::from(a.max_skill_damage()) * 3.0,
        Card::Action(a) => 15.0 + f64::from(a.declared_damage()) * 8.0 + a.effects.len() as f64 * 5.0,
    };
    raw * f64::from(card_evaluation) / 100.0
}

/// Scores legal actions with a personality.
#[derive(Clone, Debug)]
pub struct PersonalityAi {
    personality: Personality,
    rng: GameRng,
}

impl PersonalityAi {
    #[must_use]
    pub fn new(personality: Personality, seed: u64) -> Self {
        Self {
            personality,
            rng: GameRng::new(seed).for_context("personality-ai"),
        }
    }

    #[must_use]
    pub fn personality(&self) -> &Personality {
        &self.personality
    }

    /// Every legal action with its final score, best first.
    pub fn ranked(&mut self, state: &GameState, config: &EngineConfig, side: Side) -> Vec<(Action, f64)> {
        let mut scored: Vec<(Action, f64)> = legal_actions(state, config, side)
            .into_iter()
            .map(|action| {
                let category = action.category();
                let base = self.card_value_of(state, side, &action) * self.personality.modifier(category)
                    + self.situational_bonus(state, config, side, &action)
                    + self.noise();
                (action, base * self.personality.play_style.multiplier(category))
            })
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored
    }

    fn noise(&mut self) -> f64 {
        let chance = self.personality.mistake_chance;
        if chance > 0.0 && self.rng.gen_bool(chance) {
            self.rng.gen_f64(-40.0, 40.0)
        } else {
            0.0
        }
    }

    fn card_value_of(&self, state: &GameState, side: Side, action: &Action) -> f64 {
        let me = state.side(side);
        let eval = self.personality.card_evaluation;
        let hand_value = |i: usize| me.hand.get(i).map_or(0.0, |c| card_value(c, eval));

        match *action {
            Action::PlayCard { hand_index, .. } => hand_value(hand_index),
            Action::Evolve { hand_index, .. } => hand_value(hand_index) + 20.0,
            // Cheap avatars make the best fuel.
            Action::MoveToEnergy { hand_index } => (60.0 - hand_value(hand_index) / 2.0).max(5.0),
            Action::UseSkill { skill_index } => skill_damage(state, side, skill_index, false)
                .map_or(0.0, |(breakdown, _)| f64::from(breakdown.total) * 12.0 + 10.0),
            Action::SelectReserve { index } => me
                .reserve_avatars
                .get(index)
                .map_or(0.0, |a| reserve_score(a) as f64),
            Action::DiscardForHandLimit { hand_index }
            | Action::ConfirmDiscard { hand_index }
            | Action::Discard { hand_index } => 100.0 - hand_value(hand_index),
            Action::CancelDiscard => 20.0,
            Action::NextPhase | Action::EndTurn => 1.0,
        }
    }

    fn situational_bonus(&self, state: &GameState, config: &EngineConfig, side: Side, action: &Action) -> f64 {
        let p = &self.personality;
        let me = state.side(side);
        let mut bonus = 0.0;

        let card = match *action {
            Action::PlayCard { hand_index, .. }
            | Action::Evolve { hand_index, .. }
            | Action::MoveToEnergy { hand_index } => me.hand.get(hand_index),
            _ => None,
        };
        if let Some(card) = card {
            if p.favorite_elements.contains(&card.element()) {
                bonus += 10.0;
            }
        }

        match *action {
            Action::PlayCard { target: Some(Slot::Active), .. } if me.active_avatar.is_none() => bonus += 100.0,
            Action::PlayCard { target: Some(Slot::Reserve), .. } => {
                let hurt = me.active_avatar.as_ref().is_some_and(|a| a.remaining_health() <= 3);
                if hurt {
                    bonus += f64::from(p.caution) / 5.0;
                }
            }
            Action::UseSkill { skill_index } => {
                let lethal = match (
                    skill_damage(state, side, skill_index, false),
                    state.side(side.other()).active_avatar.as_ref(),
                ) {
                    (Some((breakdown, _)), Some(target)) => {
                        breakdown.total.saturating_sub(target.counters.shield) >= target.remaining_health()
                    }
                    _ => false,
                };
                if lethal {
                    bonus += 50.0 * (f64::from(p.risk_tolerance) / 100.0 + 0.5);
                }
            }
            Action::MoveToEnergy { .. } if me.energy_total() < 3 => {
                bonus += 20.0 * f64::from(p.efficiency) / 100.0;
            }
            Action::DiscardForHandLimit { .. } if me.hand.len() > config.hand_limit => bonus += 50.0,
            _ => {}
        }
        bonus
    }
}

impl Strategy for PersonalityAi {
    fn decide(&mut self, state: &GameState, config: &EngineConfig, side: Side) -> Action {
        let ranked = self.ranked(state, config, side);
        let action = ranked.first().map_or(Action::NextPhase, |(a, _)| *a);
        tracing::debug!(
            %side,
            tier = self.personality.tier.name(),
            %action,
            candidates = ranked.len(),
            "personality decision"
        );
        action
    }

    fn name(&self) -> &str {
        self.personality.tier.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{ActionCard, ActionKind, AvatarCard, CardId, Skill};
    use crate::core::GamePhase;

    fn avatar(name: &str, health: u32, damage: u32) -> AvatarCard {
        AvatarCard::new(
            CardId::new(1),
            name,
            Element::Ground,
            1,
            "golem",
            health,
            Skill::new("Rock", &[Element::Ground], damage, ""),
        )
    }

    fn calm(tier: Tier) -> PersonalityAi {
        PersonalityAi::new(tier.personality().with_mistake_chance(0.0), 1)
    }

    #[test]
    fn test_avatar_card_value() {
        let card = Card::Avatar(avatar("Golem", 10, 4));
        // 10×5 + 1×10 + 4×3
        assert_eq!(card_value(&card, 100), 72.0);
        assert_eq!(card_value(&card, 50), 36.0);
    }

    #[test]
    fn test_play_style_multiplier() {
        assert_eq!(PlayStyle::Aggressive.multiplier(ActionCategory::UseSkill), 1.2);
        assert_eq!(PlayStyle::Defensive.multiplier(ActionCategory::UseSkill), 1.0);
        assert_eq!(PlayStyle::Defensive.multiplier(ActionCategory::AddToEnergy), 1.2);
    }

    #[test]
    fn test_places_active_avatar() {
        let mut state = GameState::new(Side::Opponent, 4);
        state.phase = GamePhase::Main1;
        state.player.active_avatar = Some(avatar("Target", 8, 2));
        state.opponent.hand.push_back(Card::Avatar(avatar("Mine", 8, 2)));

        for tier in [Tier::Newbie, Tier::Regular, Tier::Advanced] {
            let action = calm(tier).decide(&state, &EngineConfig::default(), Side::Opponent);
            assert_eq!(action, Action::PlayCard { hand_index: 0, target: Some(Slot::Active) });
        }
    }

    #[test]
    fn test_attacks_in_battle() {
        let mut state = GameState::new(Side::Opponent, 4);
        state.phase = GamePhase::Battle;
        state.player.active_avatar = Some(avatar("Target", 8, 2));
        state.opponent.active_avatar = Some(avatar("Mine", 8, 3));
        state.opponent.energy_pile.push_back(avatar("e", 1, 0));

        let action = calm(Tier::Advanced).decide(&state, &EngineConfig::default(), Side::Opponent);
        assert_eq!(action, Action::UseSkill { skill_index: 0 });
    }

    #[test]
    fn test_prefers_damage_spell_over_draw() {
        let mut state = GameState::new(Side::Opponent, 4);
        state.phase = GamePhase::Main1;
        state.player.active_avatar = Some(avatar("Target", 8, 2));
        state.opponent.active_avatar = Some(avatar("Mine", 8, 3));
        state.opponent.avatar_to_energy_count = 1;
        state.opponent.hand.push_back(Card::Action(ActionCard::new(
            CardId::new(901),
            "Study",
            Element::Neutral,
            ActionKind::Spell,
            &[],
            "Draw 1 card.",
        )));
        state.opponent.hand.push_back(Card::Action(ActionCard::new(
            CardId::new(902),
            "Quake",
            Element::Ground,
            ActionKind::Spell,
            &[],
            "Deal 4 damage to the opponent's active avatar.",
        )));

        let ranked = calm(Tier::Regular).ranked(&state, &EngineConfig::default(), Side::Opponent);
        assert_eq!(ranked[0].0, Action::PlayCard { hand_index: 1, target: None });
    }

    #[test]
    fn test_decisions_are_deterministic() {
        let mut state = GameState::new(Side::Opponent, 4);
        state.phase = GamePhase::Main1;
        state.player.active_avatar = Some(avatar("Target", 8, 2));
        for i in 0..4 {
            state.opponent.hand.push_back(Card::Avatar(avatar(&format!("a{i}"), 6 + i, 2)));
        }

        let config = EngineConfig::default();
        let mut a = PersonalityAi::new(Tier::Newbie.personality(), 9);
        let mut b = PersonalityAi::new(Tier::Newbie.personality(), 9);
        for _ in 0..5 {
            assert_eq!(a.decide(&state, &config, Side::Opponent), b.decide(&state, &config, Side::Opponent));
        }
    }
}
