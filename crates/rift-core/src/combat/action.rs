//! The action catalog: every combat action and its immutable profile.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::actor::{StatusEffect, StatusKind};
use crate::combat::DistanceBand;
use crate::consts::AOE_MAX_TARGETS;
use crate::item::WeaponCategory;

bitflags! {
    /// Classification bits on an action profile.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ActionFlags: u16 {
        /// Defender gets a brace roll against the incoming hit.
        const TELEGRAPHED = 1 << 0;
        /// Needs any weapon in either hand.
        const REQUIRES_WEAPON = 1 << 1;
        /// Needs a ranged weapon; resolves with accuracy and crit rolls.
        const REQUIRES_RANGED = 1 << 2;
        /// Always hits and ignores the height gate.
        const SPELL = 1 << 3;
        /// Repositions instead of attacking.
        const MOVEMENT = 1 << 4;
        /// Weapon melee and unarmed strikes; casters never use these.
        const MELEE_TIER = 1 << 5;
        /// Innate enemy action, never offered to the player.
        const NATURAL = 1 << 6;
        /// Strikes every eligible target instead of one.
        const AOE = 1 << 7;
    }
}

/// Reach and target cap for an area action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AoeProfile {
    /// Widest band still struck.
    pub reach: DistanceBand,
    /// `None` hits everything in reach.
    pub max_targets: Option<usize>,
}

/// Immutable design data for one action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionProfile {
    /// Band the attacker must be at or beyond, enforced at execution
    /// time only. `None` means no band requirement.
    pub min_band: Option<DistanceBand>,
    pub cooldown: u8,
    pub multiplier: f32,
    pub on_hit: Option<StatusEffect>,
    pub flags: ActionFlags,
    pub aoe: Option<AoeProfile>,
}

impl ActionProfile {
    pub fn is_telegraphed(&self) -> bool {
        self.flags.contains(ActionFlags::TELEGRAPHED)
    }

    pub fn requires_weapon(&self) -> bool {
        self.flags.contains(ActionFlags::REQUIRES_WEAPON)
    }

    pub fn requires_ranged(&self) -> bool {
        self.flags.contains(ActionFlags::REQUIRES_RANGED)
    }

    pub fn is_spell(&self) -> bool {
        self.flags.contains(ActionFlags::SPELL)
    }

    pub fn is_movement(&self) -> bool {
        self.flags.contains(ActionFlags::MOVEMENT)
    }

    pub fn is_melee_tier(&self) -> bool {
        self.flags.contains(ActionFlags::MELEE_TIER)
    }

    pub fn is_natural(&self) -> bool {
        self.flags.contains(ActionFlags::NATURAL)
    }

    pub fn is_aoe(&self) -> bool {
        self.flags.contains(ActionFlags::AOE)
    }

    pub fn deals_damage(&self) -> bool {
        self.multiplier > 0.0
    }

    /// Pure melee is whatever deals damage without being ranged or a
    /// spell; only pure melee is blocked by target height.
    pub fn is_pure_melee(&self) -> bool {
        self.deals_damage() && !self.requires_ranged() && !self.is_spell()
    }
}

static WAIT: ActionProfile = ActionProfile {
    min_band: None,
    cooldown: 0,
    multiplier: 0.0,
    on_hit: None,
    flags: ActionFlags::empty(),
    aoe: None,
};

static PUNCH: ActionProfile = ActionProfile {
    min_band: None,
    cooldown: 0,
    multiplier: 0.5,
    on_hit: None,
    flags: ActionFlags::MELEE_TIER,
    aoe: None,
};

static SLASH: ActionProfile = ActionProfile {
    min_band: None,
    cooldown: 0,
    multiplier: 1.0,
    on_hit: None,
    flags: ActionFlags::REQUIRES_WEAPON.union(ActionFlags::MELEE_TIER),
    aoe: None,
};

static HEAVY_SLASH: ActionProfile = ActionProfile {
    min_band: None,
    cooldown: 2,
    multiplier: 1.5,
    on_hit: Some(StatusEffect::new(StatusKind::Bleed, 3, 2)),
    flags: ActionFlags::REQUIRES_WEAPON
        .union(ActionFlags::MELEE_TIER)
        .union(ActionFlags::TELEGRAPHED),
    aoe: None,
};

static CLEAVE: ActionProfile = ActionProfile {
    min_band: None,
    cooldown: 1,
    multiplier: 0.8,
    on_hit: None,
    flags: ActionFlags::REQUIRES_WEAPON
        .union(ActionFlags::MELEE_TIER)
        .union(ActionFlags::AOE),
    aoe: Some(AoeProfile {
        reach: DistanceBand::Melee,
        max_targets: None,
    }),
};

static WHIRLWIND: ActionProfile = ActionProfile {
    min_band: None,
    cooldown: 3,
    multiplier: 0.7,
    on_hit: None,
    flags: ActionFlags::REQUIRES_WEAPON
        .union(ActionFlags::MELEE_TIER)
        .union(ActionFlags::AOE)
        .union(ActionFlags::TELEGRAPHED),
    aoe: Some(AoeProfile {
        reach: DistanceBand::Close,
        max_targets: Some(AOE_MAX_TARGETS),
    }),
};

static SHOOT: ActionProfile = ActionProfile {
    min_band: None,
    cooldown: 0,
    multiplier: 1.0,
    on_hit: None,
    flags: ActionFlags::REQUIRES_WEAPON.union(ActionFlags::REQUIRES_RANGED),
    aoe: None,
};

static SNIPE: ActionProfile = ActionProfile {
    min_band: Some(DistanceBand::Medium),
    cooldown: 3,
    multiplier: 2.0,
    on_hit: None,
    flags: ActionFlags::REQUIRES_WEAPON.union(ActionFlags::REQUIRES_RANGED),
    aoe: None,
};

static STAFF_STRIKE: ActionProfile = ActionProfile {
    min_band: None,
    cooldown: 0,
    multiplier: 1.1,
    on_hit: None,
    flags: ActionFlags::REQUIRES_WEAPON.union(ActionFlags::MELEE_TIER),
    aoe: None,
};

static STUNNING_BLOW: ActionProfile = ActionProfile {
    min_band: None,
    cooldown: 2,
    multiplier: 0.9,
    on_hit: Some(StatusEffect::new(StatusKind::Stun, 1, 1)),
    flags: ActionFlags::REQUIRES_WEAPON.union(ActionFlags::MELEE_TIER),
    aoe: None,
};

static STAB: ActionProfile = ActionProfile {
    min_band: None,
    cooldown: 0,
    multiplier: 0.9,
    on_hit: None,
    flags: ActionFlags::REQUIRES_WEAPON.union(ActionFlags::MELEE_TIER),
    aoe: None,
};

static VENOM_STRIKE: ActionProfile = ActionProfile {
    min_band: None,
    cooldown: 2,
    multiplier: 1.1,
    on_hit: Some(StatusEffect::new(StatusKind::Poison, 4, 1)),
    flags: ActionFlags::REQUIRES_WEAPON.union(ActionFlags::MELEE_TIER),
    aoe: None,
};

static ARCANE_BOLT: ActionProfile = ActionProfile {
    min_band: None,
    cooldown: 0,
    multiplier: 1.2,
    on_hit: None,
    flags: ActionFlags::SPELL,
    aoe: None,
};

static ARCANE_BURST: ActionProfile = ActionProfile {
    min_band: None,
    cooldown: 3,
    multiplier: 1.8,
    on_hit: Some(StatusEffect::new(StatusKind::Burn, 3, 2)),
    flags: ActionFlags::SPELL
        .union(ActionFlags::REQUIRES_WEAPON)
        .union(ActionFlags::TELEGRAPHED),
    aoe: None,
};

static ADVANCE: ActionProfile = ActionProfile {
    min_band: None,
    cooldown: 0,
    multiplier: 0.0,
    on_hit: None,
    flags: ActionFlags::MOVEMENT,
    aoe: None,
};

static RETREAT: ActionProfile = ActionProfile {
    min_band: None,
    cooldown: 0,
    multiplier: 0.0,
    on_hit: None,
    flags: ActionFlags::MOVEMENT,
    aoe: None,
};

static BLINK_STEP: ActionProfile = ActionProfile {
    min_band: None,
    cooldown: 4,
    multiplier: 0.0,
    on_hit: None,
    flags: ActionFlags::SPELL.union(ActionFlags::MOVEMENT),
    aoe: None,
};

static USE_ITEM: ActionProfile = ActionProfile {
    min_band: None,
    cooldown: 0,
    multiplier: 0.0,
    on_hit: None,
    flags: ActionFlags::empty(),
    aoe: None,
};

static BITE: ActionProfile = ActionProfile {
    min_band: None,
    cooldown: 0,
    multiplier: 1.1,
    on_hit: None,
    flags: ActionFlags::NATURAL.union(ActionFlags::MELEE_TIER),
    aoe: None,
};

static FROST_SPIT: ActionProfile = ActionProfile {
    min_band: None,
    cooldown: 2,
    multiplier: 0.8,
    on_hit: Some(StatusEffect::new(StatusKind::Freeze, 2, 1)),
    flags: ActionFlags::NATURAL
        .union(ActionFlags::SPELL)
        .union(ActionFlags::TELEGRAPHED),
    aoe: None,
};

/// Broad action family, recorded into enemy knowledge.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum ActionCategory {
    Melee,
    Ranged,
    Spell,
    Movement,
    Item,
    Wait,
}

/// Every combat action. Declaration order is menu order; legacy aliases
/// sit at the end and never reach the executor.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum CombatAction {
    #[strum(serialize = "wait")]
    Wait,
    #[strum(serialize = "punch")]
    Punch,
    #[strum(serialize = "slash")]
    Slash,
    #[strum(serialize = "heavy slash")]
    HeavySlash,
    #[strum(serialize = "cleave")]
    Cleave,
    #[strum(serialize = "whirlwind")]
    Whirlwind,
    #[strum(serialize = "shoot")]
    Shoot,
    #[strum(serialize = "snipe")]
    Snipe,
    #[strum(serialize = "staff strike")]
    StaffStrike,
    #[strum(serialize = "stunning blow")]
    StunningBlow,
    #[strum(serialize = "stab")]
    Stab,
    #[strum(serialize = "venom strike")]
    VenomStrike,
    #[strum(serialize = "arcane bolt")]
    ArcaneBolt,
    #[strum(serialize = "arcane burst")]
    ArcaneBurst,
    #[strum(serialize = "advance")]
    Advance,
    #[strum(serialize = "retreat")]
    Retreat,
    #[strum(serialize = "blink step")]
    BlinkStep,
    #[strum(serialize = "use item")]
    UseItem,
    #[strum(serialize = "bite")]
    Bite,
    #[strum(serialize = "frost spit")]
    FrostSpit,
    #[strum(serialize = "attack")]
    Attack,
    #[strum(serialize = "ranged")]
    Ranged,
}

impl CombatAction {
    /// Resolve legacy aliases to their modern identifiers. Everything
    /// else maps to itself.
    pub const fn canonical(&self) -> CombatAction {
        match self {
            CombatAction::Attack => CombatAction::Slash,
            CombatAction::Ranged => CombatAction::Shoot,
            other => *other,
        }
    }

    pub const fn is_legacy(&self) -> bool {
        matches!(self, CombatAction::Attack | CombatAction::Ranged)
    }

    /// Catalog lookup, total over the enum. Legacy aliases share their
    /// canonical action's profile.
    pub fn profile(&self) -> &'static ActionProfile {
        match self {
            CombatAction::Wait => &WAIT,
            CombatAction::Punch => &PUNCH,
            CombatAction::Slash | CombatAction::Attack => &SLASH,
            CombatAction::HeavySlash => &HEAVY_SLASH,
            CombatAction::Cleave => &CLEAVE,
            CombatAction::Whirlwind => &WHIRLWIND,
            CombatAction::Shoot | CombatAction::Ranged => &SHOOT,
            CombatAction::Snipe => &SNIPE,
            CombatAction::StaffStrike => &STAFF_STRIKE,
            CombatAction::StunningBlow => &STUNNING_BLOW,
            CombatAction::Stab => &STAB,
            CombatAction::VenomStrike => &VENOM_STRIKE,
            CombatAction::ArcaneBolt => &ARCANE_BOLT,
            CombatAction::ArcaneBurst => &ARCANE_BURST,
            CombatAction::Advance => &ADVANCE,
            CombatAction::Retreat => &RETREAT,
            CombatAction::BlinkStep => &BLINK_STEP,
            CombatAction::UseItem => &USE_ITEM,
            CombatAction::Bite => &BITE,
            CombatAction::FrostSpit => &FROST_SPIT,
        }
    }

    /// Which weapon family unlocks this action, and whether it needs
    /// rare or better.
    pub const fn weapon_unlock(&self) -> Option<(WeaponCategory, bool)> {
        match self.canonical() {
            CombatAction::Slash => Some((WeaponCategory::Sword, false)),
            CombatAction::HeavySlash => Some((WeaponCategory::Sword, true)),
            CombatAction::Cleave => Some((WeaponCategory::Axe, false)),
            CombatAction::Whirlwind => Some((WeaponCategory::Axe, true)),
            CombatAction::Shoot => Some((WeaponCategory::Bow, false)),
            CombatAction::Snipe => Some((WeaponCategory::Bow, true)),
            CombatAction::StaffStrike => Some((WeaponCategory::Staff, false)),
            CombatAction::StunningBlow => Some((WeaponCategory::Staff, true)),
            CombatAction::Stab => Some((WeaponCategory::Dagger, false)),
            CombatAction::VenomStrike => Some((WeaponCategory::Dagger, true)),
            _ => None,
        }
    }

    /// Family for enemy knowledge tracking.
    pub fn category(&self) -> ActionCategory {
        let action = self.canonical();
        if action == CombatAction::Wait {
            return ActionCategory::Wait;
        }
        if action == CombatAction::UseItem {
            return ActionCategory::Item;
        }
        let profile = action.profile();
        if profile.is_movement() {
            ActionCategory::Movement
        } else if profile.requires_ranged() {
            ActionCategory::Ranged
        } else if profile.is_spell() {
            ActionCategory::Spell
        } else {
            ActionCategory::Melee
        }
    }

    /// Parse a display name ("heavy slash"). Unknown names are `None`;
    /// callers that must not fail use [`CombatAction::resolve_name`].
    pub fn from_name(name: &str) -> Option<CombatAction> {
        let needle = name.trim().to_lowercase();
        CombatAction::iter().find(|action| action.to_string() == needle)
    }

    /// Name lookup that fails open: unknown names resolve to `Wait`,
    /// legacy names to their canonical action.
    pub fn resolve_name(name: &str) -> CombatAction {
        CombatAction::from_name(name)
            .map(|action| action.canonical())
            .unwrap_or(CombatAction::Wait)
    }
}

/// Profile lookup by display name, failing open to the `Wait` profile.
pub fn profile_by_name(name: &str) -> &'static ActionProfile {
    CombatAction::resolve_name(name).profile()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_resolve_to_canonical_actions() {
        assert_eq!(CombatAction::Attack.canonical(), CombatAction::Slash);
        assert_eq!(CombatAction::Ranged.canonical(), CombatAction::Shoot);
        assert_eq!(CombatAction::Snipe.canonical(), CombatAction::Snipe);
        assert!(CombatAction::Attack.is_legacy());
        assert!(!CombatAction::Slash.is_legacy());
    }

    #[test]
    fn test_alias_shares_canonical_profile() {
        assert!(core::ptr::eq(
            CombatAction::Attack.profile(),
            CombatAction::Slash.profile()
        ));
        assert!(core::ptr::eq(
            CombatAction::Ranged.profile(),
            CombatAction::Shoot.profile()
        ));
    }

    #[test]
    fn test_catalog_lookup_is_total() {
        for action in CombatAction::iter() {
            let profile = action.profile();
            assert!(profile.multiplier >= 0.0, "{action}");
        }
    }

    #[test]
    fn test_catalog_spot_values() {
        let snipe = CombatAction::Snipe.profile();
        assert_eq!(snipe.min_band, Some(DistanceBand::Medium));
        assert_eq!(snipe.cooldown, 3);
        assert_eq!(snipe.multiplier, 2.0);
        assert!(snipe.requires_ranged());
        assert!(!snipe.is_telegraphed());

        let heavy = CombatAction::HeavySlash.profile();
        assert!(heavy.is_telegraphed());
        assert_eq!(
            heavy.on_hit,
            Some(StatusEffect::new(StatusKind::Bleed, 3, 2))
        );

        let whirlwind = CombatAction::Whirlwind.profile();
        let aoe = whirlwind.aoe.unwrap();
        assert_eq!(aoe.reach, DistanceBand::Close);
        assert_eq!(aoe.max_targets, Some(3));

        let cleave = CombatAction::Cleave.profile();
        let aoe = cleave.aoe.unwrap();
        assert_eq!(aoe.reach, DistanceBand::Melee);
        assert_eq!(aoe.max_targets, None);
        assert_eq!(cleave.cooldown, 1);
    }

    #[test]
    fn test_resolution_class_derivation() {
        assert!(CombatAction::Slash.profile().is_pure_melee());
        assert!(CombatAction::Bite.profile().is_pure_melee());
        assert!(!CombatAction::Shoot.profile().is_pure_melee());
        assert!(!CombatAction::ArcaneBolt.profile().is_pure_melee());
        assert!(!CombatAction::Wait.profile().is_pure_melee());
        assert!(CombatAction::FrostSpit.profile().is_spell());
    }

    #[test]
    fn test_categories() {
        assert_eq!(CombatAction::Slash.category(), ActionCategory::Melee);
        assert_eq!(CombatAction::Punch.category(), ActionCategory::Melee);
        assert_eq!(CombatAction::Shoot.category(), ActionCategory::Ranged);
        assert_eq!(CombatAction::ArcaneBolt.category(), ActionCategory::Spell);
        assert_eq!(CombatAction::BlinkStep.category(), ActionCategory::Movement);
        assert_eq!(CombatAction::Advance.category(), ActionCategory::Movement);
        assert_eq!(CombatAction::UseItem.category(), ActionCategory::Item);
        assert_eq!(CombatAction::Wait.category(), ActionCategory::Wait);
        assert_eq!(CombatAction::Attack.category(), ActionCategory::Melee);
    }

    #[test]
    fn test_from_name_and_fail_open() {
        assert_eq!(
            CombatAction::from_name("heavy slash"),
            Some(CombatAction::HeavySlash)
        );
        assert_eq!(
            CombatAction::from_name("  Whirlwind  "),
            Some(CombatAction::Whirlwind)
        );
        assert_eq!(CombatAction::from_name("summon dragon"), None);

        assert_eq!(CombatAction::resolve_name("attack"), CombatAction::Slash);
        assert_eq!(CombatAction::resolve_name("ranged"), CombatAction::Shoot);
        assert_eq!(CombatAction::resolve_name("summon dragon"), CombatAction::Wait);
        assert!(core::ptr::eq(profile_by_name("no such move"), &WAIT));
    }

    #[test]
    fn test_weapon_unlocks() {
        assert_eq!(
            CombatAction::Slash.weapon_unlock(),
            Some((WeaponCategory::Sword, false))
        );
        assert_eq!(
            CombatAction::VenomStrike.weapon_unlock(),
            Some((WeaponCategory::Dagger, true))
        );
        assert_eq!(
            CombatAction::Attack.weapon_unlock(),
            Some((WeaponCategory::Sword, false))
        );
        assert_eq!(CombatAction::ArcaneBolt.weapon_unlock(), None);
        assert_eq!(CombatAction::Punch.weapon_unlock(), None);
    }
}
