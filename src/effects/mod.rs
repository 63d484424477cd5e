//! Rule index: card text compiled into structured rules.
//!
//! - `ConditionalDamageRule`: damage overrides and bonuses gated on live state
//! - `PassiveEffectRule`: flat bonuses scanned across hand, field and active slot
//! - `SkillTrigger`: hand-size and element-matchup overrides, bleed/shield application
//! - `DefeatHook`: "when this avatar is defeated" effects
//! - `SpellEffect`: action-card effects
//!
//! Text is compiled once, when a card is built. Combat resolution only
//! evaluates the compiled records.

mod patterns;

pub mod conditional;
pub mod passive;
pub mod rules;
pub mod spell;
pub mod trigger;

pub use conditional::{
    apply_conditional_rules, compile_conditional, ConditionalDamageRule, DamageCondition,
    DamageEffect, RuleContext,
};
pub use passive::{compile_passives, passive_bonus, PassiveEffectRule};
pub use rules::SkillRules;
pub use spell::{compile_spell, SpellEffect};
pub use trigger::{
    check_triggers, compile_defeat_hooks, compile_triggers, DefeatHook, SkillTrigger,
    TriggerOutcome,
};
