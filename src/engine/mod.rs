//! The engine facade.
//!
//! `Engine` owns the one authoritative `GameState`. Every command runs on a
//! draft clone of the state (O(1) with `im`) and is committed only if it
//! succeeds, so a rejected command leaves the state exactly as it was.
//! Committed events are returned to the caller and their text is sent to
//! the log sink.
//!
//! ## Example
//!
//! ```
//! use avatar_ccg::cards::{starter_deck, CardCatalog, Element};
//! use avatar_ccg::core::{EngineConfig, GamePhase, IdAllocator, Side, SideMap};
//! use avatar_ccg::engine::Engine;
//!
//! let catalog = CardCatalog::starter();
//! let mut ids = IdAllocator::new();
//! let fire = catalog.build_deck(&starter_deck(Element::Fire), &mut ids).unwrap();
//! let water = catalog.build_deck(&starter_deck(Element::Water), &mut ids).unwrap();
//!
//! let engine = Engine::new_game(EngineConfig::default(), SideMap::from([fire, water])).unwrap();
//! assert_eq!(engine.state().phase, GamePhase::Setup);
//! assert_eq!(engine.state().side(Side::Player).hand.len(), 5);
//! assert_eq!(engine.get_phase_text(), "Setup");
//! ```

pub mod commands;
pub mod legal;
pub mod phase;

pub use commands::apply_action;
pub use legal::{is_legal, legal_actions};
pub use phase::{advance_phase, end_turn};

use im::Vector;

use crate::cards::{Card, Element};
use crate::core::{
    Action, ActionRecord, ConfigError, EngineConfig, EvolveTarget, GameError, GameEvent, GamePhase, GameRng,
    GameState, LogSink, NullLog, Side, SideMap, Slot,
};
use crate::energy;

/// The rules engine.
pub struct Engine {
    state: GameState,
    config: EngineConfig,
    log: Box<dyn LogSink>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("state", &self.state)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Engine {
    // === Construction ===

    /// Start a new game.
    ///
    /// Both decks are shuffled with the config seed and every card gets a
    /// fresh entity id. Each side is dealt its life cards, then its starting
    /// hand. A hand with no level 1 avatar swaps its last card for the first
    /// one left in the deck. The game waits in `setup` on turn 1.
    pub fn new_game(config: EngineConfig, decks: SideMap<Vec<Card>>) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = GameRng::new(config.seed);
        let mut state = GameState::new(config.first_player, config.starting_health);

        for (side, mut cards) in decks {
            rng.for_context(&format!("deck:{side}")).shuffle(&mut cards);

            let mut pile: Vector<Card> = cards
                .into_iter()
                .map(|card| {
                    let id = state.ids.alloc();
                    card.with_id(id)
                })
                .collect();

            let life_count = config.life_cards.min(pile.len());
            let life_cards = pile.slice(..life_count);
            let hand_count = config.starting_hand_size.min(pile.len());
            let mut hand = pile.slice(..hand_count);
            ensure_opener(&mut hand, &mut pile);

            let owner = state.side_mut(side);
            owner.life_cards = life_cards;
            owner.hand = hand;
            owner.deck = pile;
        }

        tracing::info!(first = %config.first_player, seed = config.seed, "new game");
        let mut engine = Self {
            state,
            config,
            log: Box::new(NullLog),
        };
        engine.emit(&[GameEvent::GameStarted {
            first: engine.config.first_player,
        }]);
        Ok(engine)
    }

    /// Resume from an existing state.
    #[must_use]
    pub fn from_state(state: GameState, config: EngineConfig) -> Self {
        Self {
            state,
            config,
            log: Box::new(NullLog),
        }
    }

    /// Send player-facing log lines to `log`.
    #[must_use]
    pub fn with_log(mut self, log: impl LogSink + 'static) -> Self {
        self.log = Box::new(log);
        self
    }

    // === Queries ===

    /// Read-only view of the current state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Consume the engine and return the state.
    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }

    /// Display text of the current phase.
    #[must_use]
    pub fn get_phase_text(&self) -> &'static str {
        self.state.phase.text()
    }

    /// Whether `side` can pay `cost` from its energy pile.
    #[must_use]
    pub fn has_enough_energy(&self, cost: &[Element], side: Side) -> bool {
        energy::has_enough_energy(self.state.side(side), cost)
    }

    /// Every action `side` could take right now.
    #[must_use]
    pub fn legal_actions(&self, side: Side) -> Vec<Action> {
        legal_actions(&self.state, &self.config, side)
    }

    /// Whether the game is waiting on a human decision.
    #[must_use]
    pub fn awaiting_human(&self) -> bool {
        !self.state.is_over() && !self.config.is_ai(self.actor())
    }

    /// The side expected to act next.
    ///
    /// Open prompts take precedence over the turn order. During `setup`
    /// the first side still missing an active avatar acts.
    #[must_use]
    pub fn actor(&self) -> Side {
        let state = &self.state;
        if let Some(side) = Side::ALL.into_iter().find(|&s| state.side(s).has_pending_choice()) {
            return side;
        }
        if state.phase == GamePhase::Setup {
            let order = [state.first_player, state.first_player.other()];
            if let Some(side) = order.into_iter().find(|&s| state.side(s).active_avatar.is_none()) {
                return side;
            }
        }
        state.current_player
    }

    // === Commands ===

    /// Apply an action for `side`, committing it only on success.
    pub fn apply(&mut self, side: Side, action: Action) -> Result<Vec<GameEvent>, GameError> {
        let mut draft = self.state.clone();
        match apply_action(&mut draft, &self.config, side, action) {
            Ok(events) => {
                let sequence = draft.action_history.len() as u32;
                draft
                    .action_history
                    .push_back(ActionRecord::new(side, action, self.state.turn, sequence));
                self.state = draft;
                self.emit(&events);
                Ok(events)
            }
            Err(err) => {
                tracing::debug!(%side, %action, error = %err, "command rejected");
                Err(err)
            }
        }
    }

    /// Run an action on a copy of the state without committing it.
    pub fn preview(&self, side: Side, action: &Action) -> Result<(GameState, Vec<GameEvent>), GameError> {
        let mut draft = self.state.clone();
        let events = apply_action(&mut draft, &self.config, side, *action)?;
        Ok((draft, events))
    }

    /// Play a card from hand. For avatars `target` picks the slot.
    pub fn play_card(&mut self, side: Side, hand_index: usize, target: Option<Slot>) -> Result<Vec<GameEvent>, GameError> {
        self.apply(side, Action::PlayCard { hand_index, target })
    }

    /// Use a skill of the active avatar against the opposing active avatar.
    pub fn use_avatar_skill(&mut self, side: Side, skill_index: usize) -> Result<Vec<GameEvent>, GameError> {
        self.apply(side, Action::UseSkill { skill_index })
    }

    pub fn move_card_to_energy(&mut self, side: Side, hand_index: usize) -> Result<Vec<GameEvent>, GameError> {
        self.apply(side, Action::MoveToEnergy { hand_index })
    }

    pub fn evolve_avatar(&mut self, side: Side, hand_index: usize, target: EvolveTarget) -> Result<Vec<GameEvent>, GameError> {
        self.apply(side, Action::Evolve { hand_index, target })
    }

    pub fn next_phase(&mut self, side: Side) -> Result<Vec<GameEvent>, GameError> {
        self.apply(side, Action::NextPhase)
    }

    /// Advance until the turn passes. Nothing is committed if any step fails.
    pub fn end_turn(&mut self, side: Side) -> Result<Vec<GameEvent>, GameError> {
        self.apply(side, Action::EndTurn)
    }

    pub fn discard_card(&mut self, side: Side, hand_index: usize) -> Result<Vec<GameEvent>, GameError> {
        self.apply(side, Action::Discard { hand_index })
    }

    pub fn discard_card_for_hand_limit(&mut self, side: Side, hand_index: usize) -> Result<Vec<GameEvent>, GameError> {
        self.apply(side, Action::DiscardForHandLimit { hand_index })
    }

    /// Accept the open discard prompt by discarding `hand_index`.
    pub fn confirm_discard(&mut self, side: Side, hand_index: usize) -> Result<Vec<GameEvent>, GameError> {
        self.apply(side, Action::ConfirmDiscard { hand_index })
    }

    pub fn cancel_discard(&mut self, side: Side) -> Result<Vec<GameEvent>, GameError> {
        self.apply(side, Action::CancelDiscard)
    }

    /// Promote reserve `index` after the active avatar was defeated.
    pub fn select_reserve_avatar(&mut self, side: Side, index: usize) -> Result<Vec<GameEvent>, GameError> {
        self.apply(side, Action::SelectReserve { index })
    }

    fn emit(&mut self, events: &[GameEvent]) {
        for event in events {
            if let GameEvent::GameOver { winner } = event {
                tracing::info!(%winner, turn = self.state.turn, "game over");
            }
            self.log.add_log(&event.to_string());
        }
    }
}

/// Make sure `hand` holds a level 1 avatar when the deck has one.
fn ensure_opener(hand: &mut Vector<Card>, deck: &mut Vector<Card>) {
    let is_opener = |card: &Card| card.as_avatar().is_some_and(|a| a.level == 1);
    if hand.is_empty() || hand.iter().any(is_opener) {
        return;
    }
    let Some(i) = deck.iter().position(is_opener) else {
        return;
    };

    let last = hand.len() - 1;
    let opener = deck[i].clone();
    let displaced = hand.set(last, opener);
    deck.set(i, displaced);
    tracing::debug!(deck_index = i, "swapped a level 1 avatar into the opening hand");
}
