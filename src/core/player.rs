//! Side identification and per-side data storage.
//!
//! ## Side
//!
//! The game is strictly two-player: the local `Player` and the `Opponent`.
//! Which of the two is driven by a human and which by an AI is a matter of
//! configuration, not of the side itself.
//!
//! ## SideMap
//!
//! Fixed two-slot storage indexed by `Side`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two seats at the table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    /// Both sides, in seating order.
    pub const ALL: [Side; 2] = [Side::Player, Side::Opponent];

    /// The other side.
    ///
    /// ```
    /// use avatar_ccg::core::Side;
    ///
    /// assert_eq!(Side::Player.other(), Side::Opponent);
    /// assert_eq!(Side::Opponent.other(), Side::Player);
    /// ```
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Side::Player => Side::Opponent,
            Side::Opponent => Side::Player,
        }
    }

    /// Slot index (0 for player, 1 for opponent).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Side::Player => 0,
            Side::Opponent => 1,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Player => write!(f, "player"),
            Side::Opponent => write!(f, "opponent"),
        }
    }
}

/// Per-side data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use avatar_ccg::core::{Side, SideMap};
///
/// let mut health: SideMap<u32> = SideMap::with_value(4);
/// health[Side::Opponent] -= 1;
///
/// assert_eq!(health[Side::Player], 4);
/// assert_eq!(health[Side::Opponent], 3);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideMap<T> {
    data: [T; 2],
}

impl<T> SideMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(factory: impl Fn(Side) -> T) -> Self {
        Self {
            data: [factory(Side::Player), factory(Side::Opponent)],
        }
    }

    /// Create a map with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Create a map with default values.
    pub fn with_default() -> Self
    where
        T: Default,
    {
        Self::new(|_| T::default())
    }

    /// Get a reference to a side's data.
    #[must_use]
    pub fn get(&self, side: Side) -> &T {
        &self.data[side.index()]
    }

    /// Get a mutable reference to a side's data.
    pub fn get_mut(&mut self, side: Side) -> &mut T {
        &mut self.data[side.index()]
    }

    /// Iterate over (Side, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        Side::ALL.into_iter().zip(self.data.iter())
    }

    /// Iterate over (Side, &mut T) pairs.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Side, &mut T)> {
        Side::ALL.into_iter().zip(self.data.iter_mut())
    }
}

impl<T> From<[T; 2]> for SideMap<T> {
    /// Build from `[player, opponent]`.
    fn from(data: [T; 2]) -> Self {
        Self { data }
    }
}

impl<T> IntoIterator for SideMap<T> {
    type Item = (Side, T);
    type IntoIter = std::iter::Zip<std::array::IntoIter<Side, 2>, std::array::IntoIter<T, 2>>;

    fn into_iter(self) -> Self::IntoIter {
        Side::ALL.into_iter().zip(self.data)
    }
}

impl<T: Default> Default for SideMap<T> {
    fn default() -> Self {
        Self::with_default()
    }
}

impl<T> Index<Side> for SideMap<T> {
    type Output = T;

    fn index(&self, side: Side) -> &Self::Output {
        self.get(side)
    }
}

impl<T> IndexMut<Side> for SideMap<T> {
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        self.get_mut(side)
    }
}
