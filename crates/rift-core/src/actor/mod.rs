//! Actors: the player, enemies, and the state ledgers they carry.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::combat::Position3D;
use crate::item::Item;
use crate::log::ScreenAnchor;

pub mod class;
pub mod cooldown;
pub mod enemy;
pub mod knowledge;
pub mod player;
pub mod stats;
pub mod status;

pub use class::PlayerClass;
pub use cooldown::CooldownLedger;
pub use enemy::Enemy;
pub use knowledge::{AiTier, EnemyKnowledge};
pub use player::Player;
pub use stats::Stats;
pub use status::{StatusEffect, StatusKind, StatusLedger, StatusTickEvent};

/// Vertical posture of a combatant. Pure melee cannot touch anything
/// that is not on the ground.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum HeightLevel {
    #[default]
    Ground,
    Elevated,
    Flying,
}

impl HeightLevel {
    pub const fn is_melee_reachable(&self) -> bool {
        matches!(self, HeightLevel::Ground)
    }
}

/// Common surface the executor resolves attacks through, implemented by
/// both sides of an encounter. Defaults cover what most enemies lack:
/// no cooldown ledger, no consumables, no equipment bonuses.
pub trait Combatant {
    fn name(&self) -> &str;
    fn stats(&self) -> &Stats;
    fn stats_mut(&mut self) -> &mut Stats;
    fn statuses(&self) -> &StatusLedger;
    fn statuses_mut(&mut self) -> &mut StatusLedger;
    fn position(&self) -> Position3D;
    fn set_position(&mut self, position: Position3D);

    fn cooldowns(&self) -> Option<&CooldownLedger> {
        None
    }

    fn cooldowns_mut(&mut self) -> Option<&mut CooldownLedger> {
        None
    }

    fn height(&self) -> HeightLevel {
        HeightLevel::Ground
    }

    fn is_player(&self) -> bool {
        false
    }

    fn anchor(&self) -> ScreenAnchor {
        ScreenAnchor::default()
    }

    /// Attack stat after equipment, where the combatant has any.
    fn effective_attack(&self) -> i32 {
        self.stats().attack
    }

    /// Defense stat after equipment, where the combatant has any.
    fn effective_defense(&self) -> i32 {
        self.stats().defense
    }

    fn is_dead(&self) -> bool {
        self.stats().is_dead()
    }

    fn consumable_count(&self) -> usize {
        0
    }

    fn take_restorative(&mut self, _index: usize) -> Option<Item> {
        None
    }
}

impl Combatant for Player {
    fn name(&self) -> &str {
        &self.name
    }

    fn stats(&self) -> &Stats {
        &self.stats
    }

    fn stats_mut(&mut self) -> &mut Stats {
        &mut self.stats
    }

    fn statuses(&self) -> &StatusLedger {
        &self.statuses
    }

    fn statuses_mut(&mut self) -> &mut StatusLedger {
        &mut self.statuses
    }

    fn position(&self) -> Position3D {
        self.position
    }

    fn set_position(&mut self, position: Position3D) {
        self.position = position;
    }

    fn cooldowns(&self) -> Option<&CooldownLedger> {
        Some(&self.cooldowns)
    }

    fn cooldowns_mut(&mut self) -> Option<&mut CooldownLedger> {
        Some(&mut self.cooldowns)
    }

    fn height(&self) -> HeightLevel {
        self.height
    }

    fn is_player(&self) -> bool {
        true
    }

    fn anchor(&self) -> ScreenAnchor {
        self.anchor
    }

    fn effective_attack(&self) -> i32 {
        Player::effective_attack(self)
    }

    fn effective_defense(&self) -> i32 {
        Player::effective_defense(self)
    }

    fn consumable_count(&self) -> usize {
        Player::consumable_count(self)
    }

    fn take_restorative(&mut self, index: usize) -> Option<Item> {
        Player::take_restorative(self, index)
    }
}

impl Combatant for Enemy {
    fn name(&self) -> &str {
        &self.name
    }

    fn stats(&self) -> &Stats {
        &self.stats
    }

    fn stats_mut(&mut self) -> &mut Stats {
        &mut self.stats
    }

    fn statuses(&self) -> &StatusLedger {
        &self.statuses
    }

    fn statuses_mut(&mut self) -> &mut StatusLedger {
        &mut self.statuses
    }

    fn position(&self) -> Position3D {
        self.position
    }

    fn set_position(&mut self, position: Position3D) {
        self.position = position;
    }

    fn height(&self) -> HeightLevel {
        self.height
    }

    fn anchor(&self) -> ScreenAnchor {
        self.anchor
    }
}
