//! The player character: stats, gear, and combat bookkeeping.

use serde::{Deserialize, Serialize};

use crate::actor::{
    CooldownLedger, HeightLevel, PlayerClass, Stats, StatusLedger,
};
use crate::combat::Position3D;
use crate::item::{Item, Rarity, WeaponCategory};
use crate::log::ScreenAnchor;

/// Player state carried through an encounter and across saves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub class: PlayerClass,
    pub stats: Stats,
    pub position: Position3D,
    pub height: HeightLevel,
    pub main_hand: Option<Item>,
    pub off_hand: Option<Item>,
    consumables: Vec<Item>,
    pub statuses: StatusLedger,
    pub cooldowns: CooldownLedger,
    pub anchor: ScreenAnchor,
}

impl Player {
    pub fn new(name: impl Into<String>, class: PlayerClass, stats: Stats) -> Self {
        Self {
            name: name.into(),
            class,
            stats,
            position: Position3D::ORIGIN,
            height: HeightLevel::Ground,
            main_hand: None,
            off_hand: None,
            consumables: Vec::new(),
            statuses: StatusLedger::new(),
            cooldowns: CooldownLedger::new(),
            anchor: ScreenAnchor::default(),
        }
    }

    /// Both hands, main hand first.
    pub fn equipped(&self) -> impl Iterator<Item = &Item> {
        self.main_hand.iter().chain(self.off_hand.iter())
    }

    /// Swap an item into the main hand, returning the displaced one.
    pub fn equip_main_hand(&mut self, item: Item) -> Option<Item> {
        self.main_hand.replace(item)
    }

    /// Swap an item into the off hand, returning the displaced one.
    pub fn equip_off_hand(&mut self, item: Item) -> Option<Item> {
        self.off_hand.replace(item)
    }

    pub fn has_weapon(&self) -> bool {
        self.equipped().any(Item::is_weapon)
    }

    pub fn has_ranged_weapon(&self) -> bool {
        self.equipped().any(Item::is_ranged_weapon)
    }

    /// Best rarity among equipped weapons of the given category.
    /// Either hand satisfies the unlock.
    pub fn weapon_tier(&self, category: WeaponCategory) -> Option<Rarity> {
        self.equipped()
            .filter(|item| item.weapon_category() == Some(category))
            .map(|item| item.rarity)
            .max()
    }

    /// Attack stat with every equipment and affix bonus folded in.
    pub fn effective_attack(&self) -> i32 {
        self.stats.attack
            + self
                .equipped()
                .map(Item::total_attack_bonus)
                .sum::<i32>()
    }

    /// Defense stat with every equipment and affix bonus folded in.
    pub fn effective_defense(&self) -> i32 {
        self.stats.defense
            + self
                .equipped()
                .map(Item::total_defense_bonus)
                .sum::<i32>()
    }

    pub fn add_consumable(&mut self, item: Item) {
        self.consumables.push(item);
    }

    pub fn consumables(&self) -> &[Item] {
        &self.consumables
    }

    pub fn consumable_count(&self) -> usize {
        self.consumables.len()
    }

    /// Remove and return the consumable at `index` if it is a
    /// restorative. Anything else stays in the bag.
    pub fn take_restorative(&mut self, index: usize) -> Option<Item> {
        if self.consumables.get(index).is_some_and(Item::is_restorative) {
            Some(self.consumables.remove(index))
        } else {
            None
        }
    }
}
