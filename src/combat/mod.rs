//! Combat resolution: damage calculation, shield, counters and skill use.

pub mod damage;
pub mod skill;

pub use damage::{
    absorb, apply_counter, compute_damage, heal_active, skill_damage, strike_active, tick_bleed,
    DamageBreakdown, Hit,
};
pub use skill::{begin_skill, resolve_skill};
