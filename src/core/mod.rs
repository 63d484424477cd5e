//! Core engine types: ids, sides, RNG, configuration, phases, actions,
//! events, errors and state.

pub mod action;
pub mod config;
pub mod entity;
pub mod error;
pub mod event;
pub mod log;
pub mod phase;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{Action, ActionCategory, ActionRecord, EvolveTarget, Slot};
pub use config::{ConfigError, Controller, EngineConfig};
pub use entity::{EntityId, IdAllocator};
pub use error::{GameError, InvariantError, PhaseViolation, TargetError};
pub use event::GameEvent;
pub use log::{LogSink, MemoryLog, NullLog, TracingLog};
pub use phase::GamePhase;
pub use player::{Side, SideMap};
pub use rng::GameRng;
pub use state::{GameState, PendingDiscard, PlayerState};
