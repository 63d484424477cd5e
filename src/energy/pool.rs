//! Energy cost matching and payment.
//!
//! Energy is a multiset of avatar cards, each carrying an element. A cost
//! vector is matched in two passes:
//!
//! 1. Every concrete requirement (fire/water/ground/air) takes an unused
//!    card of exactly that element. Requirements with no match carry over
//!    as shortfall.
//! 2. The shortfall plus every `neutral` requirement is covered by any
//!    remaining cards.
//!
//! Paying moves exactly the matched cards from `energy_pile` to
//! `used_energy_pile`; nothing is destroyed.

use im::Vector;
use rustc_hash::FxHashMap;

use crate::cards::{AvatarCard, Element};
use crate::core::{GameError, PlayerState};

/// Pool indices chosen to pay a cost.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CostPlan {
    /// Indices into the energy pile, ascending.
    pub indices: Vec<usize>,
}

impl CostPlan {
    /// Number of energy cards the plan spends.
    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Count pool cards per element.
#[must_use]
pub fn element_tally(pool: &Vector<AvatarCard>) -> FxHashMap<Element, usize> {
    let mut tally = FxHashMap::default();
    for card in pool {
        *tally.entry(card.info.element).or_insert(0) += 1;
    }
    tally
}

/// Match `cost` against `pool` with the two-pass rule.
///
/// Returns `None` when the pool cannot cover the cost.
///
/// ```
/// use avatar_ccg::cards::Element::{Fire, Neutral};
/// use avatar_ccg::energy::plan_payment;
///
/// let pool = im::Vector::new();
/// assert!(plan_payment(&pool, &[]).is_some());
/// assert!(plan_payment(&pool, &[Fire, Neutral]).is_none());
/// ```
#[must_use]
pub fn plan_payment(pool: &Vector<AvatarCard>, cost: &[Element]) -> Option<CostPlan> {
    if cost.len() > pool.len() {
        return None;
    }

    let mut used = vec![false; pool.len()];
    let mut open = 0usize;

    // Pass 1: exact elements.
    for &required in cost {
        if !required.is_concrete() {
            open += 1;
            continue;
        }
        let exact = pool
            .iter()
            .enumerate()
            .position(|(i, card)| !used[i] && card.info.element == required);
        match exact {
            Some(i) => used[i] = true,
            None => open += 1,
        }
    }

    // Pass 2: shortfall and neutral from whatever is left.
    let remaining: Vec<usize> = (0..pool.len()).filter(|&i| !used[i]).collect();
    if remaining.len() < open {
        return None;
    }
    for &i in &remaining[..open] {
        used[i] = true;
    }

    let indices = used
        .iter()
        .enumerate()
        .filter_map(|(i, &u)| u.then_some(i))
        .collect();
    Some(CostPlan { indices })
}

/// Whether `player` can pay `cost` from unspent energy.
#[must_use]
pub fn has_enough_energy(player: &PlayerState, cost: &[Element]) -> bool {
    plan_payment(&player.energy_pile, cost).is_some()
}

/// Pay `cost`, moving the matched cards to the used pile.
///
/// Returns the number of cards spent. On error `player` is unchanged.
pub fn pay(player: &mut PlayerState, cost: &[Element]) -> Result<usize, GameError> {
    let plan = plan_payment(&player.energy_pile, cost).ok_or(GameError::InsufficientEnergy {
        required: cost.len(),
        available: player.energy_pile.len(),
    })?;

    // Remove from the back so earlier indices stay valid.
    let mut spent = Vec::with_capacity(plan.len());
    for &i in plan.indices.iter().rev() {
        spent.push(player.energy_pile.remove(i));
    }
    for card in spent.into_iter().rev() {
        player.used_energy_pile.push_back(card);
    }
    Ok(plan.len())
}

/// Return all spent energy to the unspent pile. Returns the amount moved.
pub fn refresh(player: &mut PlayerState) -> usize {
    let used = std::mem::take(&mut player.used_energy_pile);
    let amount = used.len();
    player.energy_pile.append(used);
    amount
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardId, Skill};
    use Element::{Air, Fire, Ground, Neutral, Water};

    fn energy(element: Element) -> AvatarCard {
        AvatarCard::new(CardId::new(1), "E", element, 1, "x", 5, Skill::new("s", &[], 1, ""))
    }

    fn pool(elements: &[Element]) -> Vector<AvatarCard> {
        elements.iter().copied().map(energy).collect()
    }

    #[test]
    fn test_shortfall_covered_by_other_elements() {
        let p = pool(&[Fire, Water, Water]);
        let plan = plan_payment(&p, &[Fire, Fire, Neutral]).unwrap();
        assert_eq!(plan.indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_not_enough_cards() {
        assert!(plan_payment(&pool(&[Water]), &[Fire, Fire]).is_none());
    }

    #[test]
    fn test_exact_matches_taken_first() {
        // The neutral requirement must not steal the only ground card.
        let p = pool(&[Ground, Air, Air]);
        let plan = plan_payment(&p, &[Neutral, Ground]).unwrap();
        assert!(plan.indices.contains(&0));
        assert_eq!(plan.len(), 2);
    }

    #[test]
    fn test_pay_moves_exact_cards() {
        let mut player = PlayerState::new(4);
        player.energy_pile = pool(&[Water, Fire, Air]);

        assert_eq!(pay(&mut player, &[Fire]).unwrap(), 1);
        assert_eq!(player.energy_pile.len(), 2);
        assert_eq!(player.used_energy_pile.len(), 1);
        assert_eq!(player.used_energy_pile[0].info.element, Fire);
        assert!(player.energy_pile.iter().all(|c| c.info.element != Fire));
    }

    #[test]
    fn test_pay_failure_leaves_player_unchanged() {
        let mut player = PlayerState::new(4);
        player.energy_pile = pool(&[Water]);
        let before = player.clone();

        let err = pay(&mut player, &[Fire, Fire]).unwrap_err();
        assert_eq!(err, GameError::InsufficientEnergy { required: 2, available: 1 });
        assert_eq!(player, before);
    }

    #[test]
    fn test_refresh_returns_everything() {
        let mut player = PlayerState::new(4);
        player.energy_pile = pool(&[Fire, Water, Ground]);
        pay(&mut player, &[Neutral, Neutral]).unwrap();

        assert_eq!(refresh(&mut player), 2);
        assert_eq!(player.energy_pile.len(), 3);
        assert!(player.used_energy_pile.is_empty());
    }

    #[test]
    fn test_tally() {
        let tally = element_tally(&pool(&[Fire, Fire, Air]));
        assert_eq!(tally.get(&Fire), Some(&2));
        assert_eq!(tally.get(&Air), Some(&1));
        assert_eq!(tally.get(&Water), None);
    }
}
