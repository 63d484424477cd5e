//! Effect-text patterns.
//!
//! Card text is matched case-insensitively against the canonical phrasings
//! below. Each regex is compiled once per process; each card's text is
//! compiled into rule records once, when the card is constructed.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

fn pattern(src: &str) -> Regex {
    // Every pattern is a literal in this file and covered by the tests below.
    match Regex::new(src) {
        Ok(re) => re,
        Err(err) => unreachable!("effect pattern {src:?} failed to compile: {err}"),
    }
}

// === Conditional damage ===

pub(crate) static DISCARD_OVERRIDE: Lazy<Regex> = Lazy::new(|| {
    pattern(r"(?i)if (?:the player|you) (?:may )?discards? a card[^.]*?damage (?:becomes|is) (\d+)")
});

pub(crate) static OPPONENT_COUNTER_OVERRIDE: Lazy<Regex> = Lazy::new(|| {
    pattern(
        r"(?i)if (?:the )?opponent(?:'s)? (?:active )?avatar has (?:an? )?(bleed|burn|freeze|poison|stun) counters?[^.]*?damage becomes (\d+)",
    )
});

pub(crate) static OPPONENT_TYPE_OVERRIDE: Lazy<Regex> = Lazy::new(|| {
    pattern(
        r#"(?i)if (?:the )?opponent(?:'s)? (?:active )?avatar (?:has|is) (?:an? )?(?:type|sub-?type|element) "?([\w-]+)"?[^.]*?damage becomes (\d+)"#,
    )
});

pub(crate) static EQUIPMENT_OVERRIDE: Lazy<Regex> = Lazy::new(|| {
    pattern(r"(?i)if this (?:card|avatar) has (?:an? )?equipment attached[^.]*?damage becomes (\d+)")
});

pub(crate) static SELF_COUNTER_BONUS: Lazy<Regex> = Lazy::new(|| {
    pattern(r"(?i)if this (?:card|avatar) has (?:an? )?(\w+) counters?[^.]*?damage gets \+(\d+)")
});

// === Passive ===

pub(crate) static ACTIVE_TYPE_PASSIVE: Lazy<Regex> = Lazy::new(|| {
    pattern(
        r#"(?i)if your active avatar has (?:type|sub-?type|element) "?([\w-]+)"?,? (?:its )?attack damage gets \+(\d+)"#,
    )
});

// === Skill triggers ===

pub(crate) static HAND_SIZE_OVERRIDE: Lazy<Regex> = Lazy::new(|| {
    pattern(r"(?i)if you have (\d+) or more cards in (?:your )?hand[^.]*?damage becomes (\d+)")
});

pub(crate) static ELEMENT_BONUS: Lazy<Regex> =
    Lazy::new(|| pattern(r"(?i)\+(\d+) damage (?:against|vs\.?|to) (fire|water|ground|air) avatars?"));

pub(crate) static APPLY_BLEED: Lazy<Regex> = Lazy::new(|| {
    pattern(r"(?i)(?:apply|applies|inflict|inflicts|put|puts) (\d+) bleed counters? (?:on|to) (?:the )?(?:target|opponent)")
});

pub(crate) static SELF_SHIELD: Lazy<Regex> =
    Lazy::new(|| pattern(r"(?i)this avatar gains (\d+) shield"));

// === On-defeat hooks ===

pub(crate) static DEFEAT_DRAW: Lazy<Regex> =
    Lazy::new(|| pattern(r"(?i)when this avatar is defeated,? draw (\d+) cards?"));

pub(crate) static DEFEAT_DAMAGE: Lazy<Regex> = Lazy::new(|| {
    pattern(r"(?i)when this avatar is defeated,? deal (\d+) damage to (?:the )?opponent(?:'s)? active avatar")
});

// === Spell effects ===

pub(crate) static SPELL_DAMAGE: Lazy<Regex> =
    Lazy::new(|| pattern(r"(?i)deal (\d+) damage to (?:the )?opponent(?:'s)? active avatar"));

pub(crate) static SPELL_HEAL: Lazy<Regex> =
    Lazy::new(|| pattern(r"(?i)heal (\d+) damage from your active avatar"));

pub(crate) static SPELL_DRAW: Lazy<Regex> = Lazy::new(|| pattern(r"(?i)draw (\d+) cards?"));

pub(crate) static SPELL_COUNTER: Lazy<Regex> = Lazy::new(|| {
    pattern(
        r"(?i)(?:apply|put|give) (\d+) (bleed|burn|freeze|poison|stun) counters? (?:on|to) (?:the )?opponent(?:'s)? active avatar",
    )
});

pub(crate) static SPELL_SHIELD: Lazy<Regex> =
    Lazy::new(|| pattern(r"(?i)your active avatar gains (\d+) shield"));

/// Parse capture group `idx` as a number. Absurd values saturate.
pub(crate) fn number(caps: &Captures<'_>, idx: usize) -> Option<u32> {
    caps.get(idx).and_then(|m| m.as_str().parse::<u64>().ok()).map(|n| n.min(u64::from(u32::MAX)) as u32)
}

/// Capture group `idx` lowercased.
pub(crate) fn word(caps: &Captures<'_>, idx: usize) -> Option<String> {
    caps.get(idx).map(|m| m.as_str().to_ascii_lowercase())
}
