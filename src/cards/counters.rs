//! Status counters carried by avatars.
//!
//! Counters are non-negative integers. Only combat resolution (and the
//! refresh-phase bleed tick) changes them.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Named counter kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CounterKind {
    Damage,
    Bleed,
    Burn,
    Freeze,
    Poison,
    Stun,
    Shield,
}

impl CounterKind {
    /// Lowercase name as used in card text.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            CounterKind::Damage => "damage",
            CounterKind::Bleed => "bleed",
            CounterKind::Burn => "burn",
            CounterKind::Freeze => "freeze",
            CounterKind::Poison => "poison",
            CounterKind::Stun => "stun",
            CounterKind::Shield => "shield",
        }
    }
}

impl std::fmt::Display for CounterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CounterKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "damage" => Ok(CounterKind::Damage),
            "bleed" => Ok(CounterKind::Bleed),
            "burn" => Ok(CounterKind::Burn),
            "freeze" => Ok(CounterKind::Freeze),
            "poison" => Ok(CounterKind::Poison),
            "stun" => Ok(CounterKind::Stun),
            "shield" => Ok(CounterKind::Shield),
            _ => Err(()),
        }
    }
}

/// Counter values on one avatar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Counters {
    pub damage: u32,
    pub bleed: u32,
    pub burn: u32,
    pub freeze: u32,
    pub poison: u32,
    pub stun: u32,
    pub shield: u32,
}

impl Counters {
    /// Get a counter value.
    #[must_use]
    pub const fn get(&self, kind: CounterKind) -> u32 {
        match kind {
            CounterKind::Damage => self.damage,
            CounterKind::Bleed => self.bleed,
            CounterKind::Burn => self.burn,
            CounterKind::Freeze => self.freeze,
            CounterKind::Poison => self.poison,
            CounterKind::Stun => self.stun,
            CounterKind::Shield => self.shield,
        }
    }

    /// Get a mutable reference to a counter.
    pub fn get_mut(&mut self, kind: CounterKind) -> &mut u32 {
        match kind {
            CounterKind::Damage => &mut self.damage,
            CounterKind::Bleed => &mut self.bleed,
            CounterKind::Burn => &mut self.burn,
            CounterKind::Freeze => &mut self.freeze,
            CounterKind::Poison => &mut self.poison,
            CounterKind::Stun => &mut self.stun,
            CounterKind::Shield => &mut self.shield,
        }
    }

    /// Add to a counter, saturating.
    pub fn add(&mut self, kind: CounterKind, amount: u32) {
        let slot = self.get_mut(kind);
        *slot = slot.saturating_add(amount);
    }

    /// Remove from a counter, flooring at zero. Returns the amount removed.
    pub fn remove(&mut self, kind: CounterKind, amount: u32) -> u32 {
        let slot = self.get_mut(kind);
        let removed = amount.min(*slot);
        *slot -= removed;
        removed
    }

    /// Whether a counter is non-zero.
    #[must_use]
    pub const fn has(&self, kind: CounterKind) -> bool {
        self.get(kind) > 0
    }
}
