//! Cooperative turn scheduler.
//!
//! The scheduler drives AI sides one action at a time on the caller's
//! thread. Nothing sleeps: `pace()` only reports how long an interactive
//! host should wait between steps, and tests call `step()` back to back.
//!
//! A `CancelHandle` can be cloned out and triggered from elsewhere (a UI
//! "stop" button, a timeout); the next `step()` then returns `Cancelled`
//! without touching the game.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::core::{Action, GameError, GameEvent, Side, SideMap};
use crate::engine::Engine;

use super::Strategy;

/// Shared cancellation flag.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clear the flag so the scheduler can run again.
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Result of one `step`.
#[derive(Debug, PartialEq)]
pub enum StepOutcome {
    /// An AI action was committed.
    Acted { side: Side, action: Action, events: Vec<GameEvent> },
    /// The side to act has no strategy.
    AwaitingHuman(Side),
    GameOver(Side),
    Cancelled,
    /// The strategy and every fallback were rejected.
    Stalled { side: Side, error: GameError },
}

/// Result of `run_until_human`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    AwaitingHuman(Side),
    GameOver(Side),
    Cancelled,
    Stalled(Side),
    /// The step budget ran out.
    StepLimit,
}

/// Drives AI-controlled sides.
pub struct TurnScheduler {
    strategies: SideMap<Option<Box<dyn Strategy>>>,
    cancel: CancelHandle,
    pace: Duration,
    max_steps: usize,
}

impl Default for TurnScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TurnScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = self.strategies.iter().map(|(side, s)| (side, s.as_ref().map(|s| s.name().to_owned())));
        f.debug_struct("TurnScheduler")
            .field("strategies", &names.collect::<Vec<_>>())
            .field("pace", &self.pace)
            .field("max_steps", &self.max_steps)
            .finish_non_exhaustive()
    }
}

impl TurnScheduler {
    /// A scheduler with no AI sides.
    #[must_use]
    pub fn new() -> Self {
        Self {
            strategies: SideMap::new(|_| None),
            cancel: CancelHandle::default(),
            pace: Duration::from_millis(800),
            max_steps: 500,
        }
    }

    /// Let `strategy` play `side`.
    #[must_use]
    pub fn with_strategy(mut self, side: Side, strategy: Box<dyn Strategy>) -> Self {
        self.strategies[side] = Some(strategy);
        self
    }

    /// Suggested delay between AI steps for interactive play.
    #[must_use]
    pub fn with_pace(mut self, pace: Duration) -> Self {
        self.pace = pace;
        self
    }

    /// Cap on steps per `run_until_human` call.
    #[must_use]
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    #[must_use]
    pub fn pace(&self) -> Duration {
        self.pace
    }

    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    #[must_use]
    pub fn controls(&self, side: Side) -> bool {
        self.strategies[side].is_some()
    }

    /// Run exactly one AI action, if an AI side is to act.
    ///
    /// A rejected decision falls back to the first legal action, so a
    /// confused strategy cannot stall the game.
    pub fn step(&mut self, engine: &mut Engine) -> StepOutcome {
        if self.cancel.is_cancelled() {
            return StepOutcome::Cancelled;
        }
        if let Some(winner) = engine.state().winner {
            return StepOutcome::GameOver(winner);
        }

        let side = engine.actor();
        let Some(strategy) = self.strategies[side].as_mut() else {
            return StepOutcome::AwaitingHuman(side);
        };

        let action = strategy.decide(engine.state(), engine.config(), side);
        let error = match engine.apply(side, action) {
            Ok(events) => return StepOutcome::Acted { side, action, events },
            Err(err) => err,
        };
        tracing::warn!(%side, strategy = strategy.name(), %action, error = %error, "strategy chose an illegal action");

        match engine.legal_actions(side).first().copied() {
            Some(fallback) => match engine.apply(side, fallback) {
                Ok(events) => StepOutcome::Acted {
                    side,
                    action: fallback,
                    events,
                },
                Err(error) => StepOutcome::Stalled { side, error },
            },
            None => StepOutcome::Stalled { side, error },
        }
    }

    /// Step until a human must act, the game ends, or the run is cancelled.
    pub fn run_until_human(&mut self, engine: &mut Engine) -> RunOutcome {
        for _ in 0..self.max_steps {
            match self.step(engine) {
                StepOutcome::Acted { .. } => continue,
                StepOutcome::AwaitingHuman(side) => return RunOutcome::AwaitingHuman(side),
                StepOutcome::GameOver(winner) => return RunOutcome::GameOver(winner),
                StepOutcome::Cancelled => return RunOutcome::Cancelled,
                StepOutcome::Stalled { side, .. } => return RunOutcome::Stalled(side),
            }
        }
        RunOutcome::StepLimit
    }
}
