//! Status effects and the per-actor ledger that tracks them.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::actor::Stats;
use crate::consts::DOT_MIN_DAMAGE;

/// Status effect families.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum StatusKind {
    Bleed,
    Poison,
    Burn,
    Stun,
    Freeze,
}

impl StatusKind {
    /// Damage-over-time kinds tick for damage each turn.
    pub const fn is_damage_over_time(&self) -> bool {
        matches!(self, StatusKind::Bleed | StatusKind::Poison | StatusKind::Burn)
    }

    /// Incapacitating kinds cost the afflicted actor its action.
    pub const fn is_incapacitating(&self) -> bool {
        matches!(self, StatusKind::Stun | StatusKind::Freeze)
    }

    /// Short noun for damage messages ("takes 2 burn damage").
    pub const fn noun(&self) -> &'static str {
        match self {
            StatusKind::Bleed => "bleed",
            StatusKind::Poison => "poison",
            StatusKind::Burn => "burn",
            StatusKind::Stun => "stun",
            StatusKind::Freeze => "frost",
        }
    }

    /// Past-participle for application messages ("is poisoned").
    pub const fn applied(&self) -> &'static str {
        match self {
            StatusKind::Bleed => "bleeding",
            StatusKind::Poison => "poisoned",
            StatusKind::Burn => "burning",
            StatusKind::Stun => "stunned",
            StatusKind::Freeze => "frozen",
        }
    }
}

/// One active status on an actor. At most one instance per kind exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: StatusKind,
    pub remaining_turns: i32,
    pub magnitude: i32,
}

impl StatusEffect {
    pub const fn new(kind: StatusKind, remaining_turns: i32, magnitude: i32) -> Self {
        Self {
            kind,
            remaining_turns,
            magnitude,
        }
    }
}

/// What a ledger tick did, for the encounter to narrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTickEvent {
    DamageOverTime { kind: StatusKind, amount: i32 },
    Expired { kind: StatusKind },
}

/// Per-actor status ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusLedger {
    effects: Vec<StatusEffect>,
}

impl StatusLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an effect with refresh semantics: re-applying a kind keeps the
    /// larger duration and the larger magnitude, never a second entry.
    /// Returns true when the kind was not already present.
    pub fn apply(&mut self, effect: StatusEffect) -> bool {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == effect.kind) {
            existing.remaining_turns = existing.remaining_turns.max(effect.remaining_turns);
            existing.magnitude = existing.magnitude.max(effect.magnitude);
            false
        } else {
            self.effects.push(effect);
            true
        }
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn get(&self, kind: StatusKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    /// Whether the actor loses its action this turn.
    pub fn is_incapacitated(&self) -> bool {
        self.effects.iter().any(|e| e.kind.is_incapacitating())
    }

    /// Remove all damage-over-time effects; returns how many were removed.
    pub fn cleanse_damage_over_time(&mut self) -> usize {
        let before = self.effects.len();
        self.effects.retain(|e| !e.kind.is_damage_over_time());
        before - self.effects.len()
    }

    /// One end-of-turn tick, in fixed order: damage-over-time effects deal
    /// `max(1, magnitude)` read before any decrement, then every duration
    /// drops by one, then spent entries are purged.
    pub fn tick(&mut self, stats: &mut Stats) -> Vec<StatusTickEvent> {
        let mut events = Vec::new();

        for effect in &self.effects {
            if effect.kind.is_damage_over_time() {
                let amount = effect.magnitude.max(DOT_MIN_DAMAGE);
                stats.take_damage(amount);
                events.push(StatusTickEvent::DamageOverTime {
                    kind: effect.kind,
                    amount,
                });
            }
        }

        for effect in &mut self.effects {
            effect.remaining_turns -= 1;
        }

        self.effects.retain(|effect| {
            if effect.remaining_turns > 0 {
                true
            } else {
                events.push(StatusTickEvent::Expired { kind: effect.kind });
                false
            }
        });

        events
    }
}
