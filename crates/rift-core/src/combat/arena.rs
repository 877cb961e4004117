//! Battlefield hazards: fixed tiles that fire on whoever lands there.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::actor::Combatant;
use crate::actor::StatusEffect;
use crate::actor::StatusKind;
use crate::combat::Position3D;
use crate::dungeon::Dungeon;
use crate::log::{CombatLog, MessageKind};
use crate::rng::GameRng;

/// Tile hazards. Three hurt, one helps; none is consumed by firing.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Hazard {
    #[strum(serialize = "spike trap")]
    SpikeTrap,
    #[strum(serialize = "ember vent")]
    EmberVent,
    #[strum(serialize = "frost rune")]
    FrostRune,
    #[strum(serialize = "spring of vigor")]
    SpringOfVigor,
}

impl Hazard {
    pub const fn is_beneficial(self) -> bool {
        matches!(self, Hazard::SpringOfVigor)
    }
}

/// The hazard overlay for one encounter.
///
/// Stored as a flat pair list: hazard counts stay in single digits, and
/// a list keeps placement order stable for save files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatArena {
    hazards: Vec<(Hazard, Position3D)>,
}

impl CombatArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hazards(&self) -> &[(Hazard, Position3D)] {
        &self.hazards
    }

    /// Place a hazard, displacing whatever already sat on that tile.
    pub fn place(&mut self, hazard: Hazard, pos: Position3D) {
        self.hazards.retain(|&(_, p)| p != pos);
        self.hazards.push((hazard, pos));
    }

    pub fn hazard_at(&self, pos: Position3D) -> Option<Hazard> {
        self.hazards
            .iter()
            .find(|&&(_, p)| p == pos)
            .map(|&(h, _)| h)
    }

    /// Fire the hazard under `pos` at the occupant, if there is one.
    /// Returns whether anything triggered.
    pub fn apply_hazard<C: Combatant>(
        &self,
        pos: Position3D,
        occupant: &mut C,
        log: &mut CombatLog,
        rng: &mut GameRng,
    ) -> bool {
        let Some(hazard) = self.hazard_at(pos) else {
            return false;
        };
        let sub = if occupant.is_player() {
            "you".to_string()
        } else {
            format!("the {}", occupant.name())
        };
        let sub_cap = if occupant.is_player() {
            "You".to_string()
        } else {
            format!("The {}", occupant.name())
        };
        let is = if occupant.is_player() { "are" } else { "is" };
        match hazard {
            Hazard::SpikeTrap => {
                let damage = rng.dice(2, 4) as i32;
                occupant.stats_mut().take_damage(damage);
                log.damage_number(damage, occupant.anchor(), occupant.is_player(), false);
                log.push(
                    MessageKind::Hazard,
                    format!("Spikes tear into {sub} for {damage} damage!"),
                );
                if occupant.is_dead() && !occupant.is_player() {
                    log.push(MessageKind::Combat, format!("{sub_cap} dies!"));
                }
            }
            Hazard::EmberVent => {
                occupant
                    .statuses_mut()
                    .apply(StatusEffect::new(StatusKind::Burn, 3, 2));
                log.push(
                    MessageKind::Hazard,
                    format!("The vent belches fire! {sub_cap} {is} burning!"),
                );
            }
            Hazard::FrostRune => {
                occupant
                    .statuses_mut()
                    .apply(StatusEffect::new(StatusKind::Freeze, 2, 1));
                log.push(
                    MessageKind::Hazard,
                    format!("The rune discharges! {sub_cap} {is} frozen!"),
                );
            }
            Hazard::SpringOfVigor => {
                let before = occupant.stats().hp();
                let heal = (rng.rnd(6) + 2) as i32;
                occupant.stats_mut().heal(heal);
                let restored = occupant.stats().hp() - before;
                log.push(
                    MessageKind::Hazard,
                    format!("The spring's waters restore {restored} hp to {sub}."),
                );
            }
        }
        true
    }

    /// Scatter hazards across the floor: `rolls` placement attempts
    /// over a `width` by `height` grid. Attempts that land on blocked
    /// or already-hazarded tiles are discarded, not retried, so the
    /// final count may be lower.
    pub fn generate_random(
        &mut self,
        dungeon: &dyn Dungeon,
        width: i32,
        height: i32,
        rolls: u32,
        rng: &mut GameRng,
    ) {
        if width <= 0 || height <= 0 {
            return;
        }
        let kinds: Vec<Hazard> = Hazard::iter().collect();
        for _ in 0..rolls {
            let x = rng.rn2(width as u32) as i32;
            let y = rng.rn2(height as u32) as i32;
            if !dungeon.is_walkable(x, y) {
                continue;
            }
            let pos = Position3D::new(x, y, 0);
            if self.hazard_at(pos).is_some() {
                continue;
            }
            if let Some(&kind) = rng.choose(&kinds) {
                self.hazards.push((kind, pos));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{Enemy, Player, PlayerClass, Stats};
    use crate::dungeon::SquareChamber;

    fn pos(x: i32, y: i32) -> Position3D {
        Position3D::new(x, y, 0)
    }

    #[test]
    fn test_place_replaces_same_tile() {
        let mut arena = CombatArena::new();
        arena.place(Hazard::SpikeTrap, pos(2, 2));
        arena.place(Hazard::SpringOfVigor, pos(2, 2));
        assert_eq!(arena.hazards().len(), 1);
        assert_eq!(arena.hazard_at(pos(2, 2)), Some(Hazard::SpringOfVigor));
    }

    #[test]
    fn test_empty_tile_triggers_nothing() {
        let arena = CombatArena::new();
        let mut player = Player::new("Asha", PlayerClass::Vanguard, Stats::new(30, 5, 2, 5));
        let mut log = CombatLog::new();
        let mut rng = GameRng::new(3);
        assert!(!arena.apply_hazard(pos(1, 1), &mut player, &mut log, &mut rng));
        assert!(log.pending().is_empty());
    }

    #[test]
    fn test_spike_trap_damage_bounds() {
        let arena = {
            let mut a = CombatArena::new();
            a.place(Hazard::SpikeTrap, pos(1, 1));
            a
        };
        for seed in 0..20 {
            let mut player = Player::new("Asha", PlayerClass::Vanguard, Stats::new(30, 5, 2, 5));
            let mut log = CombatLog::new();
            let mut rng = GameRng::new(seed);
            assert!(arena.apply_hazard(pos(1, 1), &mut player, &mut log, &mut rng));
            let lost = 30 - player.stats.hp();
            assert!((2..=8).contains(&lost), "2d4 out of bounds: {lost}");
        }
    }

    #[test]
    fn test_vent_and_rune_afflict() {
        let mut arena = CombatArena::new();
        arena.place(Hazard::EmberVent, pos(0, 0));
        arena.place(Hazard::FrostRune, pos(1, 0));
        let mut rat = Enemy::new("rat", Stats::new(10, 2, 0, 4));
        let mut log = CombatLog::new();
        let mut rng = GameRng::new(3);

        arena.apply_hazard(pos(0, 0), &mut rat, &mut log, &mut rng);
        assert!(rat.statuses.has(crate::actor::StatusKind::Burn));

        arena.apply_hazard(pos(1, 0), &mut rat, &mut log, &mut rng);
        assert!(rat.statuses.has(crate::actor::StatusKind::Freeze));
        assert!(rat.statuses.is_incapacitated());
    }

    #[test]
    fn test_spring_heals_and_clamps() {
        let mut arena = CombatArena::new();
        arena.place(Hazard::SpringOfVigor, pos(0, 0));
        let mut player = Player::new("Asha", PlayerClass::Vanguard, Stats::new(30, 5, 2, 5));
        player.stats.set_hp(29);
        let mut log = CombatLog::new();
        let mut rng = GameRng::new(3);
        arena.apply_hazard(pos(0, 0), &mut player, &mut log, &mut rng);
        assert_eq!(player.stats.hp(), 30);
    }

    #[test]
    fn test_generate_random_avoids_blocked_tiles() {
        let mut chamber = SquareChamber::new(6, 6);
        for x in 0..6 {
            for y in 0..3 {
                chamber.block(x, y);
            }
        }
        let mut arena = CombatArena::new();
        let mut rng = GameRng::new(9);
        arena.generate_random(&chamber, 6, 6, 40, &mut rng);

        assert!(!arena.hazards().is_empty());
        assert!(arena.hazards().len() <= 40);
        for &(_, p) in arena.hazards() {
            assert!(p.y >= 3, "hazard on a blocked tile at {p:?}");
            assert!(chamber.is_walkable(p.x, p.y));
        }
        // No two hazards share a tile.
        for (i, &(_, a)) in arena.hazards().iter().enumerate() {
            for &(_, b) in &arena.hazards()[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_generate_random_zero_area_is_a_no_op() {
        let chamber = SquareChamber::new(0, 0);
        let mut arena = CombatArena::new();
        let mut rng = GameRng::new(9);
        arena.generate_random(&chamber, 0, 0, 10, &mut rng);
        assert!(arena.hazards().is_empty());
    }
}
