//! Item instances as combat consumes them.
//!
//! Loot generation happens elsewhere; combat only reads bonuses, rarity, and
//! the weapon category, and eats restoratives.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

/// Item rarity. `Rare` and above unlock the stronger weapon-tier action.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize, Display,
    EnumIter,
)]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
}

impl Rarity {
    /// Whether this rarity unlocks the second weapon-tier action.
    pub const fn unlocks_strong_action(&self) -> bool {
        matches!(self, Rarity::Rare | Rarity::Epic)
    }
}

/// Weapon family, deciding which weapon-tier actions an item unlocks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum WeaponCategory {
    Sword,
    Axe,
    Bow,
    Staff,
    Dagger,
}

impl WeaponCategory {
    /// The display-name substring that identifies untagged items of this
    /// family.
    pub const fn keyword(&self) -> &'static str {
        match self {
            WeaponCategory::Sword => "sword",
            WeaponCategory::Axe => "axe",
            WeaponCategory::Bow => "bow",
            WeaponCategory::Staff => "staff",
            WeaponCategory::Dagger => "dagger",
        }
    }

    /// Bows satisfy ranged gating; everything else is a melee family.
    pub const fn is_ranged(&self) -> bool {
        matches!(self, WeaponCategory::Bow)
    }

    /// Recover a category from an item display name. First keyword match in
    /// declaration order wins. Kept only for items minted before categories
    /// were tagged explicitly.
    pub fn from_name(name: &str) -> Option<WeaponCategory> {
        let lowered = name.to_lowercase();
        WeaponCategory::iter().find(|c| lowered.contains(c.keyword()))
    }
}

/// A named bonus rider on an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affix {
    pub name: String,
    pub attack: i32,
    pub defense: i32,
}

impl Affix {
    pub fn new(name: impl Into<String>, attack: i32, defense: i32) -> Self {
        Self {
            name: name.into(),
            attack,
            defense,
        }
    }
}

/// What the item is, as far as combat cares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// Equippable weapon. `category` is tagged at creation; `None` means a
    /// legacy item that falls back to the name scan.
    Weapon { category: Option<WeaponCategory> },
    /// Consumable. Heals and optionally burns off damage-over-time effects.
    Restorative { heal: i32, cleanses: bool },
}

/// An item instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub rarity: Rarity,
    pub kind: ItemKind,
    pub attack_bonus: i32,
    pub defense_bonus: i32,
    pub affixes: Vec<Affix>,
}

impl Item {
    /// A weapon with its category tagged explicitly.
    pub fn weapon(name: impl Into<String>, category: WeaponCategory, rarity: Rarity) -> Self {
        Self {
            name: name.into(),
            rarity,
            kind: ItemKind::Weapon {
                category: Some(category),
            },
            attack_bonus: 0,
            defense_bonus: 0,
            affixes: Vec::new(),
        }
    }

    /// A weapon without a category tag; the name scan decides its family.
    pub fn weapon_untagged(name: impl Into<String>, rarity: Rarity) -> Self {
        Self {
            name: name.into(),
            rarity,
            kind: ItemKind::Weapon { category: None },
            attack_bonus: 0,
            defense_bonus: 0,
            affixes: Vec::new(),
        }
    }

    /// A combat consumable.
    pub fn restorative(name: impl Into<String>, heal: i32, cleanses: bool) -> Self {
        Self {
            name: name.into(),
            rarity: Rarity::Common,
            kind: ItemKind::Restorative { heal, cleanses },
            attack_bonus: 0,
            defense_bonus: 0,
            affixes: Vec::new(),
        }
    }

    pub fn with_attack_bonus(mut self, bonus: i32) -> Self {
        self.attack_bonus = bonus;
        self
    }

    pub fn with_defense_bonus(mut self, bonus: i32) -> Self {
        self.defense_bonus = bonus;
        self
    }

    pub fn with_affix(mut self, affix: Affix) -> Self {
        self.affixes.push(affix);
        self
    }

    pub const fn is_weapon(&self) -> bool {
        matches!(self.kind, ItemKind::Weapon { .. })
    }

    pub const fn is_restorative(&self) -> bool {
        matches!(self.kind, ItemKind::Restorative { .. })
    }

    /// The weapon family: explicit tag first, name scan as fallback.
    pub fn weapon_category(&self) -> Option<WeaponCategory> {
        match self.kind {
            ItemKind::Weapon { category: Some(c) } => Some(c),
            ItemKind::Weapon { category: None } => WeaponCategory::from_name(&self.name),
            _ => None,
        }
    }

    /// Whether this item satisfies requires-ranged gating.
    pub fn is_ranged_weapon(&self) -> bool {
        self.weapon_category().is_some_and(|c| c.is_ranged())
    }

    /// Base bonus plus affix riders.
    pub fn total_attack_bonus(&self) -> i32 {
        self.attack_bonus + self.affixes.iter().map(|a| a.attack).sum::<i32>()
    }

    pub fn total_defense_bonus(&self) -> i32 {
        self.defense_bonus + self.affixes.iter().map(|a| a.defense).sum::<i32>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_tag_wins_over_name() {
        // Tagged as an axe even though the name says sword.
        let item = Item::weapon("Swordbreaker", WeaponCategory::Axe, Rarity::Common);
        assert_eq!(item.weapon_category(), Some(WeaponCategory::Axe));
    }

    #[test]
    fn test_keyword_fallback_for_untagged() {
        let sword = Item::weapon_untagged("Rusted Sword", Rarity::Common);
        assert_eq!(sword.weapon_category(), Some(WeaponCategory::Sword));

        let bow = Item::weapon_untagged("Longbow of Embers", Rarity::Rare);
        assert_eq!(bow.weapon_category(), Some(WeaponCategory::Bow));
        assert!(bow.is_ranged_weapon());

        let club = Item::weapon_untagged("Knotted Club", Rarity::Common);
        assert_eq!(club.weapon_category(), None);
    }

    #[test]
    fn test_rarity_strong_action_threshold() {
        assert!(!Rarity::Common.unlocks_strong_action());
        assert!(!Rarity::Uncommon.unlocks_strong_action());
        assert!(Rarity::Rare.unlocks_strong_action());
        assert!(Rarity::Epic.unlocks_strong_action());
    }

    #[test]
    fn test_affixes_fold_into_bonuses() {
        let item = Item::weapon("Riftfang Dagger", WeaponCategory::Dagger, Rarity::Epic)
            .with_attack_bonus(2)
            .with_affix(Affix {
                name: "of the Viper".into(),
                attack: 3,
                defense: 1,
            });
        assert_eq!(item.total_attack_bonus(), 5);
        assert_eq!(item.total_defense_bonus(), 1);
    }

    #[test]
    fn test_restorative_is_not_a_weapon() {
        let tonic = Item::restorative("Bitterroot Tonic", 8, true);
        assert!(!tonic.is_weapon());
        assert_eq!(tonic.weapon_category(), None);
    }
}
