//! Card instance identification.
//!
//! Every card copied out of the catalog into a deck receives a fresh
//! `EntityId`. Catalog entries are identified separately by
//! [`CardId`](crate::cards::CardId); two copies of the same catalog card
//! share a `CardId` but never an `EntityId`.
//!
//! ## Usage
//!
//! ```
//! use avatar_ccg::core::{EntityId, IdAllocator};
//!
//! let mut ids = IdAllocator::new();
//! let first = ids.alloc();
//! let second = ids.alloc();
//!
//! assert_ne!(first, second);
//! assert_eq!(first, EntityId(1));
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a card instance in one game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic allocator for card instance IDs.
///
/// IDs start at 1 so that a zeroed id is never a live card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    /// Create a new allocator.
    #[must_use]
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Allocate the next id.
    pub fn alloc(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }

    /// Peek at the id the next `alloc` will return.
    #[must_use]
    pub fn peek(&self) -> EntityId {
        EntityId(self.next)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
