//! Combat stat block.

use serde::{Deserialize, Serialize};

/// Core numbers every combatant carries.
///
/// `hp` is private: every mutation goes through [`Stats::take_damage`],
/// [`Stats::heal`], or [`Stats::set_hp`], all of which keep it inside
/// `[0, max_hp]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub max_hp: i32,
    hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub speed: i32,
}

impl Stats {
    /// New stat block at full health.
    pub const fn new(max_hp: i32, attack: i32, defense: i32, speed: i32) -> Self {
        Self {
            max_hp,
            hp: max_hp,
            attack,
            defense,
            speed,
        }
    }

    pub const fn hp(&self) -> i32 {
        self.hp
    }

    /// Clamped setter, for restores and scripted setups.
    pub fn set_hp(&mut self, hp: i32) {
        self.hp = hp.clamp(0, self.max_hp);
    }

    /// Apply damage. Negative amounts are treated as zero.
    pub fn take_damage(&mut self, damage: i32) {
        self.hp = (self.hp - damage.max(0)).max(0);
    }

    /// Recover hp, capped at `max_hp`. Negative amounts are treated as zero.
    pub fn heal(&mut self, amount: i32) {
        self.hp = (self.hp + amount.max(0)).min(self.max_hp);
    }

    pub const fn is_dead(&self) -> bool {
        self.hp <= 0
    }
}
