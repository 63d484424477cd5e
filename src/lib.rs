//! # avatar-ccg
//!
//! Rules engine for a two-player elemental avatar card battle game.
//!
//! ## Design Principles
//!
//! 1. **One authoritative state**: `Engine` owns the `GameState`. Drivers
//!    (a UI, an AI) read snapshots and route every change through the
//!    command surface.
//!
//! 2. **Transactional commands**: every command runs on a draft clone and
//!    commits only on success. A rejected command leaves the state
//!    byte-for-byte unchanged and says why it was rejected.
//!
//! 3. **Compiled card text**: skill and spell text is compiled into rule
//!    records once, when the card is built, never per attack.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: card piles are `im` vectors, so a
//!   state clone is O(1) and each committed command leaves the previous
//!   snapshot intact.
//!
//! - **Deterministic**: deck shuffles and AI noise come from seeded ChaCha8
//!   streams. Same seed, same game.
//!
//! ## Modules
//!
//! - `core`: sides, ids, RNG, configuration, phases, actions, events, errors, state
//! - `cards`: elements, counters, card data and the catalog
//! - `effects`: effect-text compilation (conditional, passive, trigger, spell rules)
//! - `energy`: the energy pool and cost matching
//! - `zones`: card movement between zones and the defeat cascade
//! - `combat`: damage calculation and skill use
//! - `engine`: phase state machine, command dispatch and the `Engine` facade
//! - `ai`: the `Strategy` trait, both AIs and the turn scheduler

pub mod core;
pub mod cards;
pub mod effects;
pub mod energy;
pub mod zones;
pub mod combat;
pub mod engine;
pub mod ai;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionCategory, ActionRecord, EvolveTarget, Slot,
    ConfigError, Controller, EngineConfig,
    EntityId, GameRng, Side, SideMap,
    GameError, InvariantError, PhaseViolation, TargetError,
    GameEvent, LogSink, MemoryLog, NullLog, TracingLog,
    GamePhase, GameState, PlayerState,
};

pub use crate::cards::{
    starter_deck, ActionCard, ActionKind, AvatarCard, Card, CardCatalog, CardId, CounterKind, Counters, Element,
    Skill,
};

pub use crate::effects::{ConditionalDamageRule, DamageCondition, DamageEffect, PassiveEffectRule, SkillRules};

pub use crate::engine::{legal_actions, Engine};

pub use crate::ai::{
    CancelHandle, Personality, PersonalityAi, PlayStyle, RunOutcome, ScriptedAi, ScriptedConfig, StepOutcome,
    Strategy, StrategyKind, Tier, TurnScheduler,
};
