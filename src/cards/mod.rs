//! Card catalog: elements, counters, card data and deck instantiation.
//!
//! ## Key Types
//!
//! - `Element` / `EnergyCost`: card elements and cost vectors
//! - `Counters`: status counters on an avatar
//! - `Card`: `Avatar(AvatarCard)` or `Action(ActionCard)`
//! - `Skill`: avatar skill with its effect text compiled into `SkillRules`
//! - `CardCatalog`: printed cards; decks are copies with fresh ids

pub mod catalog;
pub mod counters;
pub mod definition;
pub mod element;

pub use catalog::{starter_deck, CardCatalog, CatalogError};
pub use counters::{CounterKind, Counters};
pub use definition::{ActionCard, ActionKind, AvatarCard, Card, CardId, CardInfo, Rarity, Skill};
pub use element::{cost, Element, EnergyCost};
