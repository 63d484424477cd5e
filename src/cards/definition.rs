//! Card data.
//!
//! A `Card` is either an `AvatarCard` (a creature with health, level and
//! up to two skills) or an `ActionCard` (spell, quick spell, item, ritual
//! armor, field, or equipment). Both carry a `CardInfo` with the fields
//! every card shares.
//!
//! Effect text is compiled into rule records when a card is constructed
//! (`Skill::new`, `ActionCard::new`), never at combat time.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::EntityId;
use crate::effects::{compile_passives, compile_spell, PassiveEffectRule, SkillRules, SpellEffect};

use super::counters::Counters;
use super::element::{Element, EnergyCost};

/// Catalog identifier for a card definition.
///
/// Identifies the printed card ("Ember Fox"), not a copy in a deck. Copies
/// in play are told apart by their `EntityId`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Printed rarity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

/// Fields shared by every card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInfo {
    /// Per-copy id. Zero for catalog prototypes.
    pub id: EntityId,
    pub card_id: CardId,
    pub name: String,
    pub element: Element,
    pub rarity: Rarity,
    /// Art reference, opaque to the engine.
    pub art: String,
}

impl CardInfo {
    fn new(card_id: CardId, name: impl Into<String>, element: Element) -> Self {
        Self {
            id: EntityId(0),
            card_id,
            name: name.into(),
            element,
            rarity: Rarity::Common,
            art: String::new(),
        }
    }
}

// === Skills ===

/// An avatar skill.
///
/// `effect` is the source of truth; `rules` is its compiled form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub energy_cost: EnergyCost,
    pub damage: u32,
    pub effect: String,
    pub rules: SkillRules,
}

impl Skill {
    /// Create a skill and compile its effect text.
    ///
    /// ```
    /// use avatar_ccg::cards::{Element, Skill};
    ///
    /// let bite = Skill::new(
    ///     "Bite",
    ///     &[Element::Fire, Element::Neutral],
    ///     3,
    ///     "If the opponent active avatar has a bleed counter, this attack damage becomes 10",
    /// );
    /// assert_eq!(bite.rules.conditional.len(), 1);
    /// ```
    #[must_use]
    pub fn new(name: impl Into<String>, energy_cost: &[Element], damage: u32, effect: impl Into<String>) -> Self {
        let effect = effect.into();
        let rules = SkillRules::compile(&effect);
        Self {
            name: name.into(),
            energy_cost: SmallVec::from_slice(energy_cost),
            damage,
            effect,
            rules,
        }
    }
}

// === Avatars ===

/// An avatar card, in hand or in play.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarCard {
    pub info: CardInfo,
    /// 1 or 2. Level 2 avatars enter play only by evolving a level 1.
    pub level: u8,
    pub sub_type: String,
    pub health: u32,
    pub skill1: Skill,
    pub skill2: Option<Skill>,
    pub counters: Counters,
    /// Set when the avatar acts; cleared on refresh.
    pub is_tapped: bool,
    /// Turn the avatar entered an avatar slot.
    pub turn_played: Option<u32>,
    /// Equipment and ritual armor attached to this avatar.
    pub equipment: Vec<ActionCard>,
}

impl AvatarCard {
    /// Create an avatar. `level` is clamped to 1..=2.
    #[must_use]
    pub fn new(
        card_id: CardId,
        name: impl Into<String>,
        element: Element,
        level: u8,
        sub_type: impl Into<String>,
        health: u32,
        skill1: Skill,
    ) -> Self {
        Self {
            info: CardInfo::new(card_id, name, element),
            level: level.clamp(1, 2),
            sub_type: sub_type.into(),
            health,
            skill1,
            skill2: None,
            counters: Counters::default(),
            is_tapped: false,
            turn_played: None,
            equipment: Vec::new(),
        }
    }

    /// Add a second skill (builder pattern).
    #[must_use]
    pub fn with_skill2(mut self, skill: Skill) -> Self {
        self.skill2 = Some(skill);
        self
    }

    /// Set rarity (builder pattern).
    #[must_use]
    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.info.rarity = rarity;
        self
    }

    /// Set the art reference (builder pattern).
    #[must_use]
    pub fn with_art(mut self, art: impl Into<String>) -> Self {
        self.info.art = art.into();
        self
    }

    /// Skill by index: 0 is `skill1`, 1 is `skill2`.
    #[must_use]
    pub fn skill(&self, index: usize) -> Option<&Skill> {
        match index {
            0 => Some(&self.skill1),
            1 => self.skill2.as_ref(),
            _ => None,
        }
    }

    /// Iterate over the avatar's skills.
    pub fn skills(&self) -> impl Iterator<Item = &Skill> {
        std::iter::once(&self.skill1).chain(self.skill2.iter())
    }

    /// Passive rules printed on this avatar's skills.
    pub fn passives(&self) -> impl Iterator<Item = &PassiveEffectRule> {
        self.skills().flat_map(|s| s.rules.passives.iter())
    }

    /// Case-insensitive match against subtype or element name.
    #[must_use]
    pub fn has_type(&self, ty: &str) -> bool {
        self.sub_type.eq_ignore_ascii_case(ty) || self.info.element.name().eq_ignore_ascii_case(ty)
    }

    /// Accumulated damage has reached health.
    #[must_use]
    pub fn is_defeated(&self) -> bool {
        self.counters.damage >= self.health
    }

    /// Health left before defeat.
    #[must_use]
    pub fn remaining_health(&self) -> u32 {
        self.health.saturating_sub(self.counters.damage)
    }

    /// Highest declared damage among the skills.
    #[must_use]
    pub fn max_skill_damage(&self) -> u32 {
        self.skills().map(|s| s.damage).max().unwrap_or(0)
    }

    /// Cheapest skill cost, used when ranking reserves.
    #[must_use]
    pub fn min_skill_cost(&self) -> usize {
        self.skills().map(|s| s.energy_cost.len()).min().unwrap_or(0)
    }
}

// === Action cards ===

/// Action card kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    Spell,
    QuickSpell,
    Item,
    RitualArmor,
    Field,
    Equipment,
}

impl ActionKind {
    /// Kinds that attach to the caster's active avatar.
    #[must_use]
    pub const fn attaches(self) -> bool {
        matches!(self, ActionKind::Equipment | ActionKind::RitualArmor)
    }
}

/// A non-avatar card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionCard {
    pub info: CardInfo,
    pub kind: ActionKind,
    pub energy_cost: EnergyCost,
    pub description: String,
    /// Compiled from `description`.
    pub effects: Vec<SpellEffect>,
    /// Compiled from `description`.
    pub passives: Vec<PassiveEffectRule>,
}

impl ActionCard {
    /// Create an action card and compile its description.
    #[must_use]
    pub fn new(
        card_id: CardId,
        name: impl Into<String>,
        element: Element,
        kind: ActionKind,
        energy_cost: &[Element],
        description: impl Into<String>,
    ) -> Self {
        let description = description.into();
        Self {
            info: CardInfo::new(card_id, name, element),
            kind,
            energy_cost: SmallVec::from_slice(energy_cost),
            effects: compile_spell(&description),
            passives: compile_passives(&description),
            description,
        }
    }

    /// Set rarity (builder pattern).
    #[must_use]
    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.info.rarity = rarity;
        self
    }

    /// Total damage the description declares.
    #[must_use]
    pub fn declared_damage(&self) -> u32 {
        self.effects.iter().map(SpellEffect::declared_damage).sum()
    }
}

// === Card ===

/// Any card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Card {
    Avatar(AvatarCard),
    Action(ActionCard),
}

impl Card {
    /// Shared card fields.
    #[must_use]
    pub fn info(&self) -> &CardInfo {
        match self {
            Card::Avatar(a) => &a.info,
            Card::Action(a) => &a.info,
        }
    }

    fn info_mut(&mut self) -> &mut CardInfo {
        match self {
            Card::Avatar(a) => &mut a.info,
            Card::Action(a) => &mut a.info,
        }
    }

    /// Per-copy id.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.info().id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.info().name
    }

    #[must_use]
    pub fn element(&self) -> Element {
        self.info().element
    }

    #[must_use]
    pub fn as_avatar(&self) -> Option<&AvatarCard> {
        match self {
            Card::Avatar(a) => Some(a),
            Card::Action(_) => None,
        }
    }

    #[must_use]
    pub fn as_action(&self) -> Option<&ActionCard> {
        match self {
            Card::Action(a) => Some(a),
            Card::Avatar(_) => None,
        }
    }

    #[must_use]
    pub fn is_avatar(&self) -> bool {
        matches!(self, Card::Avatar(_))
    }

    /// Energy needed to play the card from hand. Avatars are free.
    #[must_use]
    pub fn play_cost(&self) -> &[Element] {
        match self {
            Card::Avatar(_) => &[],
            Card::Action(a) => &a.energy_cost,
        }
    }

    /// A copy of this card with a fresh per-copy id.
    #[must_use]
    pub fn with_id(mut self, id: EntityId) -> Self {
        self.info_mut().id = id;
        self
    }
}

impl From<AvatarCard> for Card {
    fn from(a: AvatarCard) -> Self {
        Card::Avatar(a)
    }
}

impl From<ActionCard> for Card {
    fn from(a: ActionCard) -> Self {
        Card::Action(a)
    }
}
