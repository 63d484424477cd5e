//! Card movement primitives.
//!
//! Cards flow from hand to an avatar slot, the energy pile, the field, or
//! the graveyard. Each primitive validates first and mutates only once the
//! move is known to be legal, so a returned error means `player` is
//! untouched.

use crate::cards::{ActionCard, AvatarCard, Card};
use crate::core::{
    EvolveTarget, GameError, GameEvent, InvariantError, PhaseViolation, PlayerState, Side, Slot,
    TargetError,
};

// === Hand access ===

/// Borrow a hand card, checking the index.
pub fn hand_card(player: &PlayerState, index: usize) -> Result<&Card, GameError> {
    player.hand.get(index).ok_or_else(|| {
        TargetError::HandIndex {
            index,
            len: player.hand.len(),
        }
        .into()
    })
}

/// Borrow a hand card that must be an avatar.
pub fn hand_avatar(player: &PlayerState, index: usize) -> Result<&AvatarCard, GameError> {
    hand_card(player, index)?
        .as_avatar()
        .ok_or(GameError::InvalidTarget(TargetError::NotAnAvatar))
}

fn take_hand_avatar(player: &mut PlayerState, index: usize) -> Result<AvatarCard, GameError> {
    hand_avatar(player, index)?;
    match player.hand.remove(index) {
        Card::Avatar(avatar) => Ok(avatar),
        Card::Action(_) => Err(TargetError::NotAnAvatar.into()),
    }
}

// === Avatar slots ===

/// Place a level 1 avatar from hand into the empty active slot.
pub fn play_as_active(
    player: &mut PlayerState,
    side: Side,
    hand_index: usize,
    turn: u32,
) -> Result<GameEvent, GameError> {
    let candidate = hand_avatar(player, hand_index)?;
    if candidate.level > 1 {
        return Err(InvariantError::LevelTwoNeedsEvolution.into());
    }
    if player.active_avatar.is_some() {
        return Err(TargetError::ActiveOccupied { side }.into());
    }

    let mut avatar = take_hand_avatar(player, hand_index)?;
    avatar.turn_played = Some(turn);
    avatar.is_tapped = false;
    let name = avatar.info.name.clone();
    player.active_avatar = Some(avatar);

    Ok(GameEvent::AvatarPlayed {
        side,
        avatar: name,
        slot: Slot::Active,
    })
}

/// Place a level 1 avatar from hand into a free reserve slot.
pub fn play_as_reserve(
    player: &mut PlayerState,
    side: Side,
    hand_index: usize,
    turn: u32,
    capacity: usize,
) -> Result<GameEvent, GameError> {
    let candidate = hand_avatar(player, hand_index)?;
    if candidate.level > 1 {
        return Err(InvariantError::LevelTwoNeedsEvolution.into());
    }
    if player.reserve_avatars.len() >= capacity {
        return Err(TargetError::ReserveFull { capacity }.into());
    }

    let mut avatar = take_hand_avatar(player, hand_index)?;
    avatar.turn_played = Some(turn);
    avatar.is_tapped = false;
    let name = avatar.info.name.clone();
    player.reserve_avatars.push_back(avatar);

    Ok(GameEvent::AvatarPlayed {
        side,
        avatar: name,
        slot: Slot::Reserve,
    })
}

/// Slot an avatar goes to when the caller does not say.
#[must_use]
pub fn default_slot(player: &PlayerState) -> Slot {
    if player.active_avatar.is_none() {
        Slot::Active
    } else {
        Slot::Reserve
    }
}

/// Promote a reserve avatar to the empty active slot.
///
/// Counters and tap state are reset on promotion.
pub fn promote_reserve(player: &mut PlayerState, side: Side, index: usize) -> Result<GameEvent, GameError> {
    if index >= player.reserve_avatars.len() {
        return Err(TargetError::ReserveIndex {
            index,
            len: player.reserve_avatars.len(),
        }
        .into());
    }
    if player.active_avatar.is_some() {
        return Err(TargetError::ActiveOccupied { side }.into());
    }

    let mut avatar = player.reserve_avatars.remove(index);
    avatar.counters = Default::default();
    avatar.is_tapped = false;
    let name = avatar.info.name.clone();
    player.active_avatar = Some(avatar);
    player.needs_to_select_reserve_avatar = false;

    Ok(GameEvent::ReservePromoted { side, avatar: name })
}

// === Evolution ===

/// Replace an in-play level 1 avatar with a level 2 avatar from hand.
///
/// The level 2 card inherits counters, tap state, equipment and the turn
/// the original entered play. The level 1 card goes to the graveyard.
pub fn evolve(
    player: &mut PlayerState,
    side: Side,
    hand_index: usize,
    target: EvolveTarget,
    turn: u32,
) -> Result<GameEvent, GameError> {
    let evolution = hand_avatar(player, hand_index)?;
    let base = match target {
        EvolveTarget::Active => player
            .active_avatar
            .as_ref()
            .ok_or(GameError::InvalidTarget(TargetError::NoActiveAvatar { side }))?,
        EvolveTarget::Reserve(i) => player.reserve_avatars.get(i).ok_or_else(|| {
            GameError::from(TargetError::ReserveIndex {
                index: i,
                len: player.reserve_avatars.len(),
            })
        })?,
    };

    if evolution.level != 2 || base.level != 1 {
        return Err(InvariantError::EvolveLevelMismatch.into());
    }
    if !evolution.sub_type.eq_ignore_ascii_case(&base.sub_type) {
        return Err(InvariantError::SubtypeMismatch {
            target: base.sub_type.clone(),
            evolution: evolution.sub_type.clone(),
        }
        .into());
    }
    if base.turn_played.map_or(true, |played| played >= turn) {
        return Err(InvariantError::EvolvedTooSoon.into());
    }

    let mut evolved = take_hand_avatar(player, hand_index)?;
    let slot = match target {
        EvolveTarget::Active => player.active_avatar.as_mut(),
        EvolveTarget::Reserve(i) => player.reserve_avatars.get_mut(i),
    };
    let Some(slot) = slot else {
        return Err(TargetError::NoActiveAvatar { side }.into());
    };

    evolved.counters = slot.counters;
    evolved.is_tapped = slot.is_tapped;
    evolved.turn_played = slot.turn_played;
    evolved.equipment = std::mem::take(&mut slot.equipment);

    let original = std::mem::replace(slot, evolved);
    let event = GameEvent::AvatarEvolved {
        side,
        from: original.info.name.clone(),
        to: slot.info.name.clone(),
    };
    player.graveyard.push_back(Card::Avatar(original));
    Ok(event)
}

// === Energy ===

/// Move an avatar from hand to the energy pile.
pub fn move_to_energy(
    player: &mut PlayerState,
    side: Side,
    hand_index: usize,
    per_turn: u32,
) -> Result<GameEvent, GameError> {
    hand_avatar(player, hand_index)?;
    if player.avatar_to_energy_count >= per_turn {
        return Err(PhaseViolation::EnergyLimitReached.into());
    }

    let mut avatar = take_hand_avatar(player, hand_index)?;
    avatar.counters = Default::default();
    avatar.is_tapped = false;
    let name = avatar.info.name.clone();
    player.energy_pile.push_back(avatar);
    player.avatar_to_energy_count += 1;

    Ok(GameEvent::EnergyAdded { side, card: name })
}

// === Discard and draw ===

/// Move a hand card to the graveyard.
pub fn discard(player: &mut PlayerState, side: Side, hand_index: usize) -> Result<GameEvent, GameError> {
    hand_card(player, hand_index)?;
    let card = player.hand.remove(hand_index);
    let name = card.name().to_owned();
    player.graveyard.push_back(card);
    Ok(GameEvent::CardDiscarded { side, card: name })
}

/// Draw `count` cards from the top of the deck.
///
/// Drawing from an empty deck is logged, not fatal.
pub fn draw(player: &mut PlayerState, side: Side, count: u32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    for _ in 0..count {
        match player.deck.pop_front() {
            Some(card) => {
                events.push(GameEvent::CardDrawn {
                    side,
                    card: card.name().to_owned(),
                });
                player.hand.push_back(card);
            }
            None => {
                tracing::warn!(%side, "draw from empty deck");
                events.push(GameEvent::DeckEmpty { side });
                break;
            }
        }
    }
    events
}

// === Action cards in play ===

/// Attach equipment or ritual armor to the active avatar.
pub fn attach_to_active(player: &mut PlayerState, side: Side, card: ActionCard) -> Result<GameEvent, GameError> {
    let Some(active) = player.active_avatar.as_mut() else {
        return Err(TargetError::NoActiveAvatar { side }.into());
    };
    let event = GameEvent::EquipmentAttached {
        side,
        avatar: active.info.name.clone(),
        equipment: card.info.name.clone(),
    };
    active.equipment.push(card);
    Ok(event)
}

/// Put a field card into play, replacing the side's previous one.
pub fn play_field(player: &mut PlayerState, side: Side, card: ActionCard) -> Option<GameEvent> {
    let new = card.info.name.clone();
    let replaced = std::mem::take(&mut player.field_cards);
    player.field_cards.push_back(card);

    let mut event = None;
    for old in replaced {
        event = Some(GameEvent::FieldReplaced {
            side,
            old: old.info.name.clone(),
            new: new.clone(),
        });
        player.graveyard.push_back(Card::Action(old));
    }
    event
}

/// Send an avatar and everything attached to it to the graveyard.
pub fn bury_avatar(player: &mut PlayerState, mut avatar: AvatarCard) {
    for equipment in std::mem::take(&mut avatar.equipment) {
        player.graveyard.push_back(Card::Action(equipment));
    }
    player.graveyard.push_back(Card::Avatar(avatar));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{ActionKind, CardId, Element, Skill};

    fn avatar(level: u8, sub_type: &str, health: u32) -> AvatarCard {
        AvatarCard::new(
            CardId::new(u32::from(level)),
            if level == 1 { "Pup" } else { "Wolf" },
            Element::Fire,
            level,
            sub_type,
            health,
            Skill::new("Bite", &[Element::Fire], 2, ""),
        )
    }

    fn gear(name: &str, kind: ActionKind) -> ActionCard {
        ActionCard::new(CardId::new(50), name, Element::Neutral, kind, &[], "")
    }

    #[test]
    fn test_play_active_then_reserve() {
        let mut p = PlayerState::new(4);
        p.hand.push_back(Card::Avatar(avatar(1, "beast", 8)));
        p.hand.push_back(Card::Avatar(avatar(1, "beast", 8)));

        assert_eq!(default_slot(&p), Slot::Active);
        play_as_active(&mut p, Side::Player, 0, 1).unwrap();
        assert_eq!(default_slot(&p), Slot::Reserve);

        let err = play_as_active(&mut p, Side::Player, 0, 1).unwrap_err();
        assert_eq!(err, GameError::InvalidTarget(TargetError::ActiveOccupied { side: Side::Player }));

        play_as_reserve(&mut p, Side::Player, 0, 1, 2).unwrap();
        assert!(p.hand.is_empty());
        assert_eq!(p.reserve_avatars.len(), 1);
        assert_eq!(p.reserve_avatars[0].turn_played, Some(1));
    }

    #[test]
    fn test_reserve_capacity() {
        let mut p = PlayerState::new(4);
        for _ in 0..3 {
            p.hand.push_back(Card::Avatar(avatar(1, "beast", 8)));
        }
        play_as_reserve(&mut p, Side::Player, 0, 1, 2).unwrap();
        play_as_reserve(&mut p, Side::Player, 0, 1, 2).unwrap();
        let before = p.clone();

        let err = play_as_reserve(&mut p, Side::Player, 0, 1, 2).unwrap_err();
        assert_eq!(err, GameError::InvalidTarget(TargetError::ReserveFull { capacity: 2 }));
        assert_eq!(p, before);
    }

    #[test]
    fn test_level_two_cannot_be_played_directly() {
        let mut p = PlayerState::new(4);
        p.hand.push_back(Card::Avatar(avatar(2, "beast", 12)));
        let err = play_as_active(&mut p, Side::Player, 0, 1).unwrap_err();
        assert_eq!(err, GameError::InvariantViolation(InvariantError::LevelTwoNeedsEvolution));
    }

    #[test]
    fn test_evolve_preserves_counters_and_tap() {
        let mut p = PlayerState::new(4);
        let mut base = avatar(1, "beast", 8);
        base.counters.damage = 3;
        base.is_tapped = true;
        base.turn_played = Some(1);
        base.equipment.push(gear("Claws", ActionKind::Equipment));
        p.active_avatar = Some(base);
        p.hand.push_back(Card::Avatar(avatar(2, "beast", 12)));

        evolve(&mut p, Side::Player, 0, EvolveTarget::Active, 2).unwrap();

        let evolved = p.active_avatar.as_ref().unwrap();
        assert_eq!(evolved.level, 2);
        assert_eq!(evolved.health, 12);
        assert_eq!(evolved.counters.damage, 3);
        assert!(evolved.is_tapped);
        assert_eq!(evolved.equipment.len(), 1);
        assert_eq!(p.graveyard.len(), 1);
        assert_eq!(p.graveyard[0].name(), "Pup");
    }

    #[test]
    fn test_evolve_rules() {
        let mut p = PlayerState::new(4);
        let mut base = avatar(1, "beast", 8);
        base.turn_played = Some(2);
        p.active_avatar = Some(base);
        p.hand.push_back(Card::Avatar(avatar(2, "bird", 12)));
        p.hand.push_back(Card::Avatar(avatar(2, "beast", 12)));
        p.hand.push_back(Card::Avatar(avatar(1, "beast", 8)));

        let err = evolve(&mut p, Side::Player, 0, EvolveTarget::Active, 3).unwrap_err();
        assert!(matches!(err, GameError::InvariantViolation(InvariantError::SubtypeMismatch { .. })));

        let err = evolve(&mut p, Side::Player, 1, EvolveTarget::Active, 2).unwrap_err();
        assert_eq!(err, GameError::InvariantViolation(InvariantError::EvolvedTooSoon));

        let err = evolve(&mut p, Side::Player, 2, EvolveTarget::Active, 3).unwrap_err();
        assert_eq!(err, GameError::InvariantViolation(InvariantError::EvolveLevelMismatch));

        let err = evolve(&mut p, Side::Player, 1, EvolveTarget::Reserve(0), 3).unwrap_err();
        assert!(matches!(err, GameError::InvalidTarget(TargetError::ReserveIndex { .. })));

        assert!(evolve(&mut p, Side::Player, 1, EvolveTarget::Active, 3).is_ok());
    }

    #[test]
    fn test_move_to_energy_limit() {
        let mut p = PlayerState::new(4);
        p.hand.push_back(Card::Avatar(avatar(1, "beast", 8)));
        p.hand.push_back(Card::Avatar(avatar(1, "beast", 8)));
        p.hand.push_back(Card::Action(gear("Rock", ActionKind::Item)));

        let err = move_to_energy(&mut p, Side::Player, 2, 1).unwrap_err();
        assert_eq!(err, GameError::InvalidTarget(TargetError::NotAnAvatar));

        move_to_energy(&mut p, Side::Player, 0, 1).unwrap();
        assert_eq!(p.energy_pile.len(), 1);

        let err = move_to_energy(&mut p, Side::Player, 0, 1).unwrap_err();
        assert_eq!(err, GameError::IllegalPhase(PhaseViolation::EnergyLimitReached));
    }

    #[test]
    fn test_draw_from_empty_deck() {
        let mut p = PlayerState::new(4);
        p.deck.push_back(Card::Avatar(avatar(1, "beast", 8)));

        let events = draw(&mut p, Side::Opponent, 3);
        assert_eq!(p.hand.len(), 1);
        assert_eq!(events.last(), Some(&GameEvent::DeckEmpty { side: Side::Opponent }));
    }

    #[test]
    fn test_field_replacement() {
        let mut p = PlayerState::new(4);
        assert!(play_field(&mut p, Side::Player, gear("Volcano", ActionKind::Field)).is_none());
        let event = play_field(&mut p, Side::Player, gear("Lagoon", ActionKind::Field));

        assert!(matches!(event, Some(GameEvent::FieldReplaced { .. })));
        assert_eq!(p.field_cards.len(), 1);
        assert_eq!(p.field_cards[0].info.name, "Lagoon");
        assert_eq!(p.graveyard.len(), 1);
    }

    #[test]
    fn test_promote_resets_counters() {
        let mut p = PlayerState::new(4);
        let mut reserve = avatar(1, "beast", 8);
        reserve.counters.bleed = 2;
        reserve.is_tapped = true;
        p.reserve_avatars.push_back(reserve);
        p.needs_to_select_reserve_avatar = true;

        promote_reserve(&mut p, Side::Player, 0).unwrap();
        let active = p.active_avatar.as_ref().unwrap();
        assert_eq!(active.counters.bleed, 0);
        assert!(!active.is_tapped);
        assert!(!p.needs_to_select_reserve_avatar);
    }

    #[test]
    fn test_bury_takes_equipment() {
        let mut p = PlayerState::new(4);
        let mut a = avatar(1, "knight", 8);
        a.equipment.push(gear("Sword", ActionKind::Equipment));
        bury_avatar(&mut p, a);
        assert_eq!(p.graveyard.len(), 2);
    }
}
