//! Compiled rule set for one skill.

use serde::{Deserialize, Serialize};

use super::conditional::{compile_conditional, ConditionalDamageRule, DamageCondition};
use super::passive::{compile_passives, PassiveEffectRule};
use super::trigger::{compile_defeat_hooks, compile_triggers, DefeatHook, SkillTrigger};

/// Everything a skill's effect text compiles into.
///
/// Built once by `Skill::new`; combat only evaluates these records.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRules {
    pub conditional: Vec<ConditionalDamageRule>,
    pub triggers: Vec<SkillTrigger>,
    pub passives: Vec<PassiveEffectRule>,
    pub on_defeat: Vec<DefeatHook>,
}

impl SkillRules {
    /// Compile effect text.
    ///
    /// ```
    /// use avatar_ccg::effects::SkillRules;
    ///
    /// let rules = SkillRules::compile(
    ///     "Apply 1 bleed counter to the opponent. When this avatar is defeated, draw 1 card.",
    /// );
    /// assert_eq!(rules.triggers.len(), 1);
    /// assert_eq!(rules.on_defeat.len(), 1);
    /// assert!(rules.conditional.is_empty());
    /// ```
    #[must_use]
    pub fn compile(text: &str) -> Self {
        Self {
            conditional: compile_conditional(text),
            triggers: compile_triggers(text),
            passives: compile_passives(text),
            on_defeat: compile_defeat_hooks(text),
        }
    }

    /// Whether the skill offers an optional discard for a damage override.
    #[must_use]
    pub fn offers_discard(&self) -> bool {
        self.conditional
            .iter()
            .any(|r| r.condition == DamageCondition::PlayerDiscards)
    }

    /// True if the text compiled to nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditional.is_empty()
            && self.triggers.is_empty()
            && self.passives.is_empty()
            && self.on_defeat.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discard_offer() {
        let rules = SkillRules::compile("If you discard a card, damage becomes 8.");
        assert!(rules.offers_discard());
        assert!(!SkillRules::compile("Draw power from the earth.").offers_discard());
        let unrelated = "If you discard a card, draw 1 card. If this card has equipment attached, damage becomes 6.";
        assert!(!SkillRules::compile(unrelated).offers_discard());
    }

    #[test]
    fn test_empty() {
        assert!(SkillRules::compile("").is_empty());
    }
}
