//! Elements and energy costs.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::str::FromStr;

/// Card element. `Neutral` in a cost means "any element".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Water,
    Ground,
    Air,
    Neutral,
}

/// An energy cost: one entry per energy required.
///
/// Costs are short (rarely more than four symbols), so they live inline.
pub type EnergyCost = SmallVec<[Element; 4]>;

impl Element {
    /// The four concrete elements, in cost-matching order.
    pub const CONCRETE: [Element; 4] = [Element::Fire, Element::Water, Element::Ground, Element::Air];

    /// Whether this element names a specific energy type.
    #[must_use]
    pub const fn is_concrete(self) -> bool {
        !matches!(self, Element::Neutral)
    }

    /// Lowercase name as used in card text.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Element::Fire => "fire",
            Element::Water => "water",
            Element::Ground => "ground",
            Element::Air => "air",
            Element::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Element {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fire" => Ok(Element::Fire),
            "water" => Ok(Element::Water),
            "ground" | "earth" => Ok(Element::Ground),
            "air" | "wind" => Ok(Element::Air),
            "neutral" | "any" => Ok(Element::Neutral),
            _ => Err(()),
        }
    }
}

/// Build a cost from a slice of elements.
///
/// ```
/// use avatar_ccg::cards::{cost, Element};
///
/// let c = cost(&[Element::Fire, Element::Neutral]);
/// assert_eq!(c.len(), 2);
/// ```
#[must_use]
pub fn cost(elements: &[Element]) -> EnergyCost {
    SmallVec::from_slice(elements)
}
