//! Card catalog and deck instantiation.
//!
//! The `CardCatalog` stores the printed cards of a set. Decks are built by
//! copying catalog entries with fresh `EntityId`s, so two copies of the same
//! card never share an id.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::core::IdAllocator;

use super::definition::{ActionCard, ActionKind, AvatarCard, Card, CardId, Rarity, Skill};
use super::element::Element;

/// Catalog errors.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("card {0} is already registered")]
    Duplicate(CardId),

    #[error("card {0} is not in the catalog")]
    Unknown(CardId),
}

/// Registry of printed cards.
///
/// ## Example
///
/// ```
/// use avatar_ccg::cards::{CardCatalog, CardId};
/// use avatar_ccg::core::IdAllocator;
///
/// let catalog = CardCatalog::starter();
/// let mut ids = IdAllocator::new();
///
/// let a = catalog.instantiate(CardId::new(101), &mut ids).unwrap();
/// let b = catalog.instantiate(CardId::new(101), &mut ids).unwrap();
/// assert_eq!(a.name(), b.name());
/// assert_ne!(a.id(), b.id());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    cards: FxHashMap<CardId, Card>,
}

impl CardCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card under its `card_id`.
    pub fn register(&mut self, card: impl Into<Card>) -> Result<(), CatalogError> {
        let card = card.into();
        let id = card.info().card_id;
        if self.cards.contains_key(&id) {
            return Err(CatalogError::Duplicate(id));
        }
        self.cards.insert(id, card);
        Ok(())
    }

    /// Look up a printed card.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.get(&id)
    }

    /// Number of printed cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// All card ids, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<CardId> {
        let mut ids: Vec<CardId> = self.cards.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Copy one card out of the catalog with a fresh id.
    pub fn instantiate(&self, id: CardId, ids: &mut IdAllocator) -> Result<Card, CatalogError> {
        self.get(id)
            .cloned()
            .map(|card| card.with_id(ids.alloc()))
            .ok_or(CatalogError::Unknown(id))
    }

    /// Copy a deck list out of the catalog.
    pub fn build_deck(&self, list: &[CardId], ids: &mut IdAllocator) -> Result<Vec<Card>, CatalogError> {
        list.iter().map(|&id| self.instantiate(id, ids)).collect()
    }

    /// The built-in starter set.
    #[must_use]
    pub fn starter() -> Self {
        let mut catalog = Self::new();
        for card in starter_cards() {
            let registered = catalog.register(card);
            debug_assert!(registered.is_ok(), "starter set: {registered:?}");
        }
        catalog
    }
}

fn skill(name: &str, cost: &[Element], damage: u32, effect: &str) -> Skill {
    Skill::new(name, cost, damage, effect)
}

fn avatar(id: u32, name: &str, element: Element, level: u8, sub_type: &str, health: u32, skill1: Skill) -> AvatarCard {
    AvatarCard::new(CardId::new(id), name, element, level, sub_type, health, skill1)
}

fn action(id: u32, name: &str, element: Element, kind: ActionKind, cost: &[Element], text: &str) -> ActionCard {
    ActionCard::new(CardId::new(id), name, element, kind, cost, text)
}

fn starter_cards() -> Vec<Card> {
    use Element::{Air, Fire, Ground, Neutral, Water};

    vec![
        // Fire
        avatar(101, "Ember Fox", Fire, 1, "beast", 8, skill("Scratch", &[Fire], 2, ""))
            .with_skill2(skill(
                "Flame Bite",
                &[Fire, Fire, Neutral],
                5,
                "If the opponent active avatar has a bleed counter, this attack damage becomes 10.",
            ))
            .into(),
        avatar(102, "Blaze Wolf", Fire, 2, "beast", 12, skill("Maul", &[Fire, Neutral], 4, "Apply 1 bleed counter to the opponent."))
            .with_skill2(skill("Inferno Fang", &[Fire, Fire, Neutral], 7, "Deals +2 damage against air avatars."))
            .with_rarity(Rarity::Rare)
            .into(),
        avatar(103, "Cinder Knight", Fire, 1, "knight", 10, skill("Guard Slash", &[Fire], 2, "This avatar gains 1 shield."))
            .with_skill2(skill(
                "Burning Blade",
                &[Fire, Neutral],
                3,
                "If this card has equipment attached, damage becomes 6.",
            ))
            .into(),
        avatar(104, "Pyre Hound", Fire, 1, "beast", 7, skill(
            "Pack Howl",
            &[Neutral],
            1,
            "If your active avatar has type beast, attack damage gets +1.",
        ))
        .with_skill2(skill(
            "Last Ember",
            &[Fire, Fire],
            4,
            "When this avatar is defeated, deal 2 damage to the opponent's active avatar.",
        ))
        .with_rarity(Rarity::Uncommon)
        .into(),
        // Water
        avatar(201, "Tide Sprite", Water, 1, "spirit", 7, skill("Splash", &[Water], 2, ""))
            .with_skill2(skill(
                "Undertow",
                &[Water, Water],
                4,
                "If you have 5 or more cards in hand, this attack damage becomes 6.",
            ))
            .into(),
        avatar(202, "Tide Oracle", Water, 2, "spirit", 11, skill(
            "Riptide",
            &[Water, Neutral],
            4,
            "If the opponent's active avatar has type knight, damage becomes 7.",
        ))
        .with_skill2(skill("Maelstrom", &[Water, Water, Neutral], 6, "When this avatar is defeated, draw 2 cards."))
        .with_rarity(Rarity::Rare)
        .into(),
        avatar(203, "Reef Guardian", Water, 1, "guardian", 12, skill("Shell Bash", &[Water], 1, "This avatar gains 2 shield."))
            .with_skill2(skill(
                "Crushing Wave",
                &[Water, Water, Neutral],
                5,
                "If this card has a shield counter, damage gets +2.",
            ))
            .into(),
        avatar(204, "Mist Dancer", Water, 1, "spirit", 6, skill(
            "Veil Strike",
            &[Neutral],
            2,
            "You may discard a card. If you discard a card, damage becomes 6.",
        ))
        .with_rarity(Rarity::Uncommon)
        .into(),
        // Ground
        avatar(301, "Stone Golem", Ground, 1, "golem", 12, skill("Slam", &[Ground], 2, ""))
            .with_skill2(skill("Rockfall", &[Ground, Ground, Neutral], 5, "This avatar gains 1 shield."))
            .into(),
        avatar(302, "Mountain Titan", Ground, 2, "golem", 16, skill("Quake", &[Ground, Neutral], 4, ""))
            .with_skill2(skill(
                "Avalanche",
                &[Ground, Ground, Neutral, Neutral],
                8,
                "Deals +2 damage against water avatars.",
            ))
            .with_rarity(Rarity::Epic)
            .into(),
        avatar(303, "Burrow Mole", Ground, 1, "beast", 8, skill("Dig", &[Neutral], 1, "Apply 1 bleed counter to the opponent."))
            .with_skill2(skill("Tunnel Strike", &[Ground, Ground], 4, ""))
            .into(),
        // Air
        avatar(401, "Gale Hawk", Air, 1, "bird", 6, skill("Peck", &[Air], 2, ""))
            .with_skill2(skill("Dive", &[Air, Neutral], 4, "Deals +2 damage against ground avatars."))
            .into(),
        avatar(402, "Storm Roc", Air, 2, "bird", 10, skill("Gust", &[Air, Neutral], 4, ""))
            .with_skill2(skill(
                "Thunderclap",
                &[Air, Air, Neutral],
                7,
                "If the opponent active avatar has a stun counter, this attack damage becomes 11.",
            ))
            .with_rarity(Rarity::Epic)
            .into(),
        avatar(403, "Wind Wisp", Air, 1, "spirit", 6, skill("Breeze", &[Neutral], 1, ""))
            .with_skill2(skill("Cyclone", &[Air, Air], 4, "If you have 4 or more cards in hand, this attack damage becomes 6."))
            .into(),
        // Actions
        action(901, "Fire Bolt", Fire, ActionKind::Spell, &[Fire], "Deal 3 damage to the opponent's active avatar.").into(),
        action(902, "Healing Rain", Water, ActionKind::Spell, &[Water], "Heal 3 damage from your active avatar.").into(),
        action(903, "Quick Study", Neutral, ActionKind::QuickSpell, &[Neutral], "Draw 1 card.").into(),
        action(
            904,
            "Knight's Blade",
            Neutral,
            ActionKind::Equipment,
            &[Neutral],
            "If your active avatar has type knight, attack damage gets +1.",
        )
        .into(),
        action(905, "Stone Skin", Ground, ActionKind::RitualArmor, &[Ground], "Your active avatar gains 2 shield.").into(),
        action(
            906,
            "War Banner",
            Neutral,
            ActionKind::Field,
            &[Neutral],
            "If your active avatar has type beast, attack damage gets +1.",
        )
        .into(),
        action(907, "Supply Cache", Neutral, ActionKind::Item, &[], "Draw 2 cards.").into(),
        action(
            908,
            "Venom Dart",
            Air,
            ActionKind::QuickSpell,
            &[Air],
            "Put 2 poison counters on the opponent's active avatar.",
        )
        .into(),
        action(
            909,
            "Static Charge",
            Air,
            ActionKind::Spell,
            &[Air, Neutral],
            "Put 1 stun counter on the opponent's active avatar. Deal 1 damage to the opponent's active avatar.",
        )
        .into(),
    ]
}

/// A 20-card starter deck list built around one element.
///
/// `Neutral` yields the fire list.
#[must_use]
pub fn starter_deck(element: Element) -> Vec<CardId> {
    let counts: &[(u32, usize)] = match element {
        Element::Fire | Element::Neutral => &[
            (101, 4), (102, 2), (103, 3), (104, 2), (303, 1),
            (901, 3), (903, 1), (904, 1), (906, 1), (907, 2),
        ],
        Element::Water => &[
            (201, 4), (202, 2), (203, 3), (204, 2), (403, 1),
            (902, 2), (903, 2), (905, 1), (906, 1), (907, 2),
        ],
        Element::Ground => &[
            (301, 4), (302, 2), (303, 3), (103, 2), (101, 1),
            (901, 2), (905, 2), (904, 1), (903, 1), (907, 2),
        ],
        Element::Air => &[
            (401, 4), (402, 2), (403, 3), (201, 2), (204, 1),
            (908, 2), (909, 2), (903, 1), (906, 1), (907, 2),
        ],
    };

    counts
        .iter()
        .flat_map(|&(id, n)| std::iter::repeat(CardId::new(id)).take(n))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_rejects_duplicates() {
        let mut catalog = CardCatalog::new();
        let bolt = action(1, "Bolt", Element::Fire, ActionKind::Spell, &[], "");
        assert!(catalog.register(bolt.clone()).is_ok());
        assert_eq!(catalog.register(bolt), Err(CatalogError::Duplicate(CardId::new(1))));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_unknown_card() {
        let catalog = CardCatalog::new();
        let mut ids = IdAllocator::new();
        assert_eq!(
            catalog.instantiate(CardId::new(5), &mut ids),
            Err(CatalogError::Unknown(CardId::new(5)))
        );
    }

    #[test]
    fn test_starter_ids_are_unique() {
        let printed = starter_cards();
        let mut catalog = CardCatalog::new();
        for card in printed.iter().cloned() {
            assert_eq!(catalog.register(card), Ok(()));
        }
        assert_eq!(CardCatalog::starter().len(), printed.len());
    }

    #[test]
    fn test_starter_decks_are_complete() {
        let catalog = CardCatalog::starter();
        let mut ids = IdAllocator::new();

        for element in Element::CONCRETE {
            let list = starter_deck(element);
            assert_eq!(list.len(), 20, "{element} deck");

            let deck = catalog.build_deck(&list, &mut ids).unwrap();
            let mut seen: Vec<_> = deck.iter().map(Card::id).collect();
            seen.sort_unstable();
            seen.dedup();
            assert_eq!(seen.len(), 20);

            let level_one = deck
                .iter()
                .filter_map(Card::as_avatar)
                .filter(|a| a.level == 1)
                .count();
            assert!(level_one >= 6, "{element} deck needs playable avatars");
        }
    }

    #[test]
    fn test_starter_rules_compiled() {
        let catalog = CardCatalog::starter();
        let fox = catalog.get(CardId::new(101)).and_then(Card::as_avatar).unwrap();
        let bite = fox.skill(1).unwrap();
        assert_eq!(bite.rules.conditional.len(), 1);

        let dancer = catalog.get(CardId::new(204)).and_then(Card::as_avatar).unwrap();
        assert!(dancer.skill1.rules.offers_discard());
    }
}
