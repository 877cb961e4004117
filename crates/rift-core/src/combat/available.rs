//! Builds the player's action menu for the current turn.

use strum::IntoEnumIterator;

use crate::actor::Player;
use crate::combat::{CombatAction, DistanceBand};

/// Collect every action the player may pick this turn, in menu order.
///
/// The band is accepted for signature compatibility but deliberately
/// never consulted: band requirements (`Snipe`) are enforced by the
/// executor, so an action can be offered here and still rejected at
/// resolution. Callers rely on that two-stage behavior.
pub fn available_actions(player: &Player, _band: DistanceBand) -> Vec<CombatAction> {
    let caster = player.class.is_caster();
    let armed = player.has_weapon();
    let mut out = Vec::new();

    // Armed casters lead with their weapon-triggered spell variants,
    // gated by cooldown alone.
    if caster && armed {
        for spell in [CombatAction::ArcaneBolt, CombatAction::ArcaneBurst] {
            if player.cooldowns.is_ready(spell) {
                out.push(spell);
            }
        }
    }

    for action in CombatAction::iter() {
        let profile = action.profile();
        if action.is_legacy() || profile.is_natural() {
            continue;
        }
        // Already force-included above; skip the scan copies.
        if caster
            && armed
            && matches!(action, CombatAction::ArcaneBolt | CombatAction::ArcaneBurst)
        {
            continue;
        }
        if caster && profile.is_melee_tier() {
            continue;
        }
        if !caster && profile.is_spell() {
            continue;
        }
        if action == CombatAction::Punch && armed {
            continue;
        }
        if action == CombatAction::UseItem && player.consumable_count() == 0 {
            continue;
        }
        if let Some((category, needs_rare)) = action.weapon_unlock() {
            match player.weapon_tier(category) {
                Some(rarity) if !needs_rare || rarity.unlocks_strong_action() => {}
                _ => continue,
            }
        } else if profile.requires_weapon() && !armed {
            continue;
        }
        if profile.requires_ranged() && !player.has_ranged_weapon() {
            continue;
        }
        if !player.cooldowns.is_ready(action) {
            continue;
        }
        out.push(action);
    }

    out
}
