//! The turn loop for one fight: player phase, enemy phase, upkeep.
//!
//! The encounter owns all combat state and is what save files capture
//! mid-fight. Frontends drive it either through [`Encounter::run`] or
//! phase by phase, and plug in at two seams: an [`ActionPrompt`] that
//! picks the player's action and an [`EnemyDecider`] that picks each
//! enemy's.

use core::cmp::Reverse;

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::actor::{Combatant, Enemy, Player};
use crate::combat::{
    available_actions, band_between, resolve_action, CombatAction, CombatArena, CombatContext,
    CombatTuning, DistanceBand, ResolutionOutcome,
};
use crate::consts::MENU_ATTEMPT_LIMIT;
use crate::dungeon::Dungeon;
use crate::error::PromptError;
use crate::log::{CombatLog, MessageKind};
use crate::rng::GameRng;

/// Where the loop currently stands.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display,
)]
pub enum EncounterPhase {
    #[default]
    AwaitingPlayerAction,
    EnemyTurn,
    EndOfTurn,
    Victory,
    Defeat,
}

impl EncounterPhase {
    pub const fn is_terminal(self) -> bool {
        matches!(self, EncounterPhase::Victory | EncounterPhase::Defeat)
    }
}

/// The player's answer to a menu: an index into the offered list, plus
/// targeting details the menu itself cannot express.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerChoice {
    pub choice_index: usize,
    pub target_index: usize,
    pub item_index: Option<usize>,
}

impl PlayerChoice {
    pub fn new(choice_index: usize) -> Self {
        Self {
            choice_index,
            target_index: 0,
            item_index: None,
        }
    }

    pub fn with_target(mut self, target_index: usize) -> Self {
        self.target_index = target_index;
        self
    }

    pub fn with_item(mut self, item_index: usize) -> Self {
        self.item_index = Some(item_index);
        self
    }
}

/// Read-only snapshot handed to the two decision seams.
pub struct EncounterView<'a> {
    pub player: &'a Player,
    pub enemies: &'a [Enemy],
    pub turn: u32,
}

/// Asks the player to pick from an action menu. Implemented by the
/// frontend; a terminal UI blocks on keyboard input here.
pub trait ActionPrompt {
    fn choose(
        &mut self,
        menu: &[CombatAction],
        view: &EncounterView<'_>,
    ) -> Result<PlayerChoice, PromptError>;
}

/// Picks one action for one enemy on its turn.
pub trait EnemyDecider {
    fn decide(&mut self, enemy_index: usize, view: &EncounterView<'_>) -> CombatAction;
}

/// Baseline enemy behavior: close the gap when out of melee, otherwise
/// use the first listed action whose range requirement holds.
pub struct InstinctDecider;

impl EnemyDecider for InstinctDecider {
    fn decide(&mut self, enemy_index: usize, view: &EncounterView<'_>) -> CombatAction {
        let Some(enemy) = view.enemies.get(enemy_index) else {
            return CombatAction::Wait;
        };
        let band = band_between(enemy.position, view.player.position);
        if band > DistanceBand::Melee && enemy.actions.contains(&CombatAction::Advance) {
            return CombatAction::Advance;
        }
        for &action in &enemy.actions {
            if let Some(min_band) = action.profile().min_band {
                if band < min_band {
                    continue;
                }
            }
            return action;
        }
        CombatAction::Wait
    }
}

/// One fight from first menu to victory or defeat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Encounter {
    player: Player,
    enemies: Vec<Enemy>,
    arena: CombatArena,
    log: CombatLog,
    rng: GameRng,
    tuning: CombatTuning,
    turn: u32,
    phase: EncounterPhase,
}

impl Encounter {
    pub fn new(player: Player, enemies: Vec<Enemy>, seed: u64) -> Self {
        Self {
            player,
            enemies,
            arena: CombatArena::new(),
            log: CombatLog::new(),
            rng: GameRng::new(seed),
            tuning: CombatTuning::default(),
            turn: 1,
            phase: EncounterPhase::AwaitingPlayerAction,
        }
    }

    pub fn with_arena(mut self, arena: CombatArena) -> Self {
        self.arena = arena;
        self
    }

    pub fn with_tuning(mut self, tuning: CombatTuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn enemies_mut(&mut self) -> &mut [Enemy] {
        &mut self.enemies
    }

    pub fn arena(&self) -> &CombatArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut CombatArena {
        &mut self.arena
    }

    pub fn log(&self) -> &CombatLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut CombatLog {
        &mut self.log
    }

    pub fn rng_mut(&mut self) -> &mut GameRng {
        &mut self.rng
    }

    pub fn tuning(&self) -> &CombatTuning {
        &self.tuning
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn phase(&self) -> EncounterPhase {
        self.phase
    }

    /// Band between the player and the nearest living enemy.
    pub fn player_band(&self) -> DistanceBand {
        self.enemies
            .iter()
            .filter(|e| e.is_alive())
            .map(|e| band_between(self.player.position, e.position))
            .min()
            .unwrap_or(DistanceBand::Melee)
    }

    /// The action menu the player would be offered right now.
    pub fn menu(&self) -> Vec<CombatAction> {
        available_actions(&self.player, self.player_band())
    }

    /// Drive the whole fight. Returns true on victory.
    pub fn run(
        &mut self,
        prompt: &mut dyn ActionPrompt,
        decider: &mut dyn EnemyDecider,
        dungeon: &dyn Dungeon,
    ) -> bool {
        while !self.phase.is_terminal() {
            match self.phase {
                EncounterPhase::AwaitingPlayerAction => {
                    self.player_turn(prompt, dungeon);
                }
                EncounterPhase::EnemyTurn => self.enemy_turns(decider, dungeon),
                EncounterPhase::EndOfTurn => self.end_turn(),
                EncounterPhase::Victory | EncounterPhase::Defeat => break,
            }
        }
        self.phase == EncounterPhase::Victory
    }

    /// The player phase: prompt, resolve, teach the enemies, fire
    /// hazards the player stepped onto.
    ///
    /// Returns `None` when an incapacitating status swallowed the turn.
    pub fn player_turn(
        &mut self,
        prompt: &mut dyn ActionPrompt,
        dungeon: &dyn Dungeon,
    ) -> Option<ResolutionOutcome> {
        if self.phase != EncounterPhase::AwaitingPlayerAction {
            return None;
        }

        if self.player.statuses.is_incapacitated() {
            let noun = self
                .player
                .statuses
                .iter()
                .find(|e| e.kind.is_incapacitating())
                .map(|e| e.kind.applied())
                .unwrap_or("held");
            self.log
                .push(MessageKind::System, format!("You are {noun} and cannot act!"));
            self.advance_after(EncounterPhase::EnemyTurn);
            return None;
        }

        let menu = self.menu();
        let mut selected = None;
        for _ in 0..MENU_ATTEMPT_LIMIT {
            let view = EncounterView {
                player: &self.player,
                enemies: &self.enemies,
                turn: self.turn,
            };
            match prompt.choose(&menu, &view) {
                Ok(choice) if choice.choice_index < menu.len() => {
                    selected = Some(choice);
                    break;
                }
                Ok(_) | Err(_) => {}
            }
        }

        let (action, choice) = match selected {
            Some(choice) => (menu[choice.choice_index], choice),
            None => {
                self.log.push(
                    MessageKind::System,
                    "You hesitate, and the moment passes.",
                );
                (CombatAction::Wait, PlayerChoice::new(0))
            }
        };

        let mut ctx = CombatContext::new(action, choice.target_index);
        ctx.item_index = choice.item_index;
        let outcome = resolve_action(
            &mut self.player,
            &mut self.enemies,
            &mut ctx,
            dungeon,
            &self.tuning,
            &mut self.log,
            &mut self.rng,
        );

        // Living enemies study every action the player pulls off.
        if outcome.success {
            let category = outcome.action.category();
            for enemy in self.enemies.iter_mut().filter(|e| e.is_alive()) {
                enemy.knowledge.record(category);
            }
        }

        if let Some(dest) = outcome.moved_to {
            self.arena
                .apply_hazard(dest, &mut self.player, &mut self.log, &mut self.rng);
        }

        self.advance_after(EncounterPhase::EnemyTurn);
        Some(outcome)
    }

    /// The enemy phase: every living enemy acts once, fastest first.
    pub fn enemy_turns(&mut self, decider: &mut dyn EnemyDecider, dungeon: &dyn Dungeon) {
        if self.phase != EncounterPhase::EnemyTurn {
            return;
        }

        let mut order: Vec<usize> = (0..self.enemies.len()).collect();
        order.sort_by_key(|&i| Reverse(self.enemies[i].stats.speed));

        for idx in order {
            if !self.enemies[idx].is_alive() {
                continue;
            }
            if self.enemies[idx].statuses.is_incapacitated() {
                let noun = self.enemies[idx]
                    .statuses
                    .iter()
                    .find(|e| e.kind.is_incapacitating())
                    .map(|e| e.kind.applied())
                    .unwrap_or("held");
                self.log.push(
                    MessageKind::Combat,
                    format!("The {} is {noun} and cannot act!", self.enemies[idx].name),
                );
                continue;
            }

            let view = EncounterView {
                player: &self.player,
                enemies: &self.enemies,
                turn: self.turn,
            };
            let chosen = decider.decide(idx, &view).canonical();
            // Enemies only get what their action list grants.
            let action = if self.enemies[idx]
                .actions
                .iter()
                .any(|a| a.canonical() == chosen)
                || chosen == CombatAction::Wait
            {
                chosen
            } else {
                CombatAction::Wait
            };

            let mut ctx = CombatContext::new(action, 0);
            let outcome = resolve_action(
                &mut self.enemies[idx],
                core::slice::from_mut(&mut self.player),
                &mut ctx,
                dungeon,
                &self.tuning,
                &mut self.log,
                &mut self.rng,
            );

            if let Some(dest) = outcome.moved_to {
                self.arena
                    .apply_hazard(dest, &mut self.enemies[idx], &mut self.log, &mut self.rng);
            }

            if self.player.is_dead() {
                break;
            }
        }

        self.advance_after(EncounterPhase::EndOfTurn);
    }

    /// Upkeep: cooldowns tick down, statuses burn and expire, and the
    /// turn counter moves.
    pub fn end_turn(&mut self) {
        if self.phase != EncounterPhase::EndOfTurn {
            return;
        }

        self.player.cooldowns.tick();
        let player_anchor = self.player.anchor;
        let events = self.player.statuses.tick(&mut self.player.stats);
        for event in events {
            match event {
                crate::actor::StatusTickEvent::DamageOverTime { kind, amount } => {
                    self.log.damage_number(amount, player_anchor, true, false);
                    self.log.push(
                        MessageKind::Combat,
                        format!("You suffer {amount} damage from {}.", kind.noun()),
                    );
                }
                crate::actor::StatusTickEvent::Expired { kind } => {
                    self.log.push(
                        MessageKind::System,
                        format!("You are no longer {}.", kind.applied()),
                    );
                }
            }
        }

        for enemy in &mut self.enemies {
            if !enemy.is_alive() {
                continue;
            }
            let anchor = enemy.anchor;
            let events = enemy.statuses.tick(&mut enemy.stats);
            for event in events {
                match event {
                    crate::actor::StatusTickEvent::DamageOverTime { kind, amount } => {
                        self.log.damage_number(amount, anchor, false, false);
                        self.log.push(
                            MessageKind::Combat,
                            format!(
                                "The {} suffers {amount} damage from {}.",
                                enemy.name,
                                kind.noun(),
                            ),
                        );
                    }
                    crate::actor::StatusTickEvent::Expired { kind } => {
                        self.log.push(
                            MessageKind::System,
                            format!("The {} is no longer {}.", enemy.name, kind.applied()),
                        );
                    }
                }
            }
            if enemy.stats.is_dead() {
                self.log
                    .push(MessageKind::Combat, format!("The {} dies!", enemy.name));
            }
        }

        self.turn += 1;
        self.advance_after(EncounterPhase::AwaitingPlayerAction);
    }

    /// Move to `next` unless somebody just died. A player death always
    /// wins that race.
    fn advance_after(&mut self, next: EncounterPhase) {
        if self.player.is_dead() {
            self.log
                .push(MessageKind::System, "You have fallen. The rift claims you.");
            self.phase = EncounterPhase::Defeat;
        } else if self.enemies.iter().all(|e| !e.is_alive()) {
            self.log
                .push(MessageKind::System, "The rift falls silent. You are victorious!");
            self.phase = EncounterPhase::Victory;
        } else {
            self.phase = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{PlayerClass, Stats, StatusEffect, StatusKind};
    use crate::combat::{ActionCategory, Position3D};
    use crate::dungeon::SquareChamber;
    use crate::item::{Item, Rarity, WeaponCategory};

    /// Returns the same choice every time it is asked.
    struct RepeatPrompt(PlayerChoice);

    impl ActionPrompt for RepeatPrompt {
        fn choose(
            &mut self,
            _menu: &[CombatAction],
            _view: &EncounterView<'_>,
        ) -> Result<PlayerChoice, PromptError> {
            Ok(self.0)
        }
    }

    struct FailingPrompt;

    impl ActionPrompt for FailingPrompt {
        fn choose(
            &mut self,
            _menu: &[CombatAction],
            _view: &EncounterView<'_>,
        ) -> Result<PlayerChoice, PromptError> {
            Err(PromptError::Cancelled)
        }
    }

    /// Remembers which enemies were asked, in order.
    #[derive(Default)]
    struct RecordingDecider {
        asked: Vec<usize>,
    }

    impl EnemyDecider for RecordingDecider {
        fn decide(&mut self, enemy_index: usize, _view: &EncounterView<'_>) -> CombatAction {
            self.asked.push(enemy_index);
            CombatAction::Wait
        }
    }

    fn chamber() -> SquareChamber {
        SquareChamber::new(20, 20)
    }

    fn swordsman() -> Player {
        let mut player =
            Player::new("Asha", PlayerClass::Vanguard, Stats::new(40, 10, 4, 5));
        player.equip_main_hand(Item::weapon(
            "Runed Sword",
            WeaponCategory::Sword,
            Rarity::Common,
        ));
        player
    }

    fn rat(x: i32) -> Enemy {
        Enemy::new("rift rat", Stats::new(8, 3, 0, 4)).with_position(Position3D::new(x, 0, 0))
    }

    #[test]
    fn test_player_action_teaches_every_living_enemy() {
        let mut encounter = Encounter::new(swordsman(), vec![rat(1), rat(2)], 5);
        // Menu for a common sword: wait, slash, advance, retreat.
        let mut prompt = RepeatPrompt(PlayerChoice::new(1));
        let outcome = encounter.player_turn(&mut prompt, &chamber()).unwrap();

        assert_eq!(outcome.action, CombatAction::Slash);
        assert!(outcome.success);
        // The struck rat died before it could learn anything; the
        // survivor logged one melee observation.
        assert!(encounter.enemies()[0].is_dead());
        assert_eq!(encounter.enemies()[0].knowledge.total_observations(), 0);
        assert_eq!(encounter.enemies()[1].knowledge.count(ActionCategory::Melee), 1);
    }

    #[test]
    fn test_prompt_exhaustion_falls_back_to_wait() {
        let mut encounter = Encounter::new(swordsman(), vec![rat(3)], 5);
        let mut prompt = FailingPrompt;
        let outcome = encounter.player_turn(&mut prompt, &chamber()).unwrap();

        assert_eq!(outcome.action, CombatAction::Wait);
        assert!(outcome.success);
        assert_eq!(encounter.phase(), EncounterPhase::EnemyTurn);
        // The fallback is still an observed action.
        assert_eq!(encounter.enemies()[0].knowledge.count(ActionCategory::Wait), 1);
    }

    #[test]
    fn test_invalid_choice_index_counts_as_a_failed_attempt() {
        let mut encounter = Encounter::new(swordsman(), vec![rat(3)], 5);
        let mut prompt = RepeatPrompt(PlayerChoice::new(99));
        let outcome = encounter.player_turn(&mut prompt, &chamber()).unwrap();
        assert_eq!(outcome.action, CombatAction::Wait);
    }

    #[test]
    fn test_incapacitated_player_loses_the_turn() {
        let mut encounter = Encounter::new(swordsman(), vec![rat(1)], 5);
        encounter
            .player_mut()
            .statuses
            .apply(StatusEffect::new(StatusKind::Freeze, 2, 1));
        let mut prompt = RepeatPrompt(PlayerChoice::new(1));

        assert!(encounter.player_turn(&mut prompt, &chamber()).is_none());
        assert_eq!(encounter.phase(), EncounterPhase::EnemyTurn);
        assert_eq!(encounter.enemies()[0].stats.hp(), 8);
    }

    #[test]
    fn test_enemies_act_fastest_first() {
        let player = swordsman();
        let enemies = vec![
            Enemy::new("slug", Stats::new(10, 1, 0, 2)).with_position(Position3D::new(1, 0, 0)),
            Enemy::new("hawk", Stats::new(10, 1, 0, 9)).with_position(Position3D::new(2, 0, 0)),
            Enemy::new("wolf", Stats::new(10, 1, 0, 5)).with_position(Position3D::new(3, 0, 0)),
        ];
        let mut encounter = Encounter::new(player, enemies, 5);
        let mut prompt = RepeatPrompt(PlayerChoice::new(0));
        encounter.player_turn(&mut prompt, &chamber());

        let mut decider = RecordingDecider::default();
        encounter.enemy_turns(&mut decider, &chamber());
        assert_eq!(decider.asked, vec![1, 2, 0]);
    }

    #[test]
    fn test_incapacitated_enemy_skips_its_turn() {
        let mut encounter = Encounter::new(swordsman(), vec![rat(1)], 5);
        encounter.enemies_mut()[0]
            .statuses
            .apply(StatusEffect::new(StatusKind::Stun, 1, 1));
        let mut prompt = RepeatPrompt(PlayerChoice::new(0));
        encounter.player_turn(&mut prompt, &chamber());

        let hp_before = encounter.player().stats.hp();
        let mut decider = InstinctDecider;
        encounter.enemy_turns(&mut decider, &chamber());
        assert_eq!(encounter.player().stats.hp(), hp_before);
    }

    #[test]
    fn test_end_turn_ticks_cooldowns_and_statuses() {
        let mut encounter = Encounter::new(swordsman(), vec![rat(1)], 5);
        encounter
            .player_mut()
            .cooldowns
            .set(CombatAction::HeavySlash, 2);
        encounter
            .player_mut()
            .statuses
            .apply(StatusEffect::new(StatusKind::Poison, 1, 2));
        encounter.phase = EncounterPhase::EndOfTurn;

        encounter.end_turn();

        let player = encounter.player();
        assert_eq!(player.cooldowns.remaining(CombatAction::HeavySlash), 1);
        // One last poison tick, then it expired.
        assert_eq!(player.stats.hp(), 38);
        assert!(player.statuses.is_empty());
        assert_eq!(encounter.turn(), 2);
        assert_eq!(encounter.phase(), EncounterPhase::AwaitingPlayerAction);
    }

    #[test]
    fn test_dot_finishing_the_last_enemy_wins() {
        let mut enemy = rat(4);
        enemy.stats.take_damage(7);
        let mut encounter = Encounter::new(swordsman(), vec![enemy], 5);
        encounter.enemies_mut()[0]
            .statuses
            .apply(StatusEffect::new(StatusKind::Bleed, 3, 2));
        encounter.phase = EncounterPhase::EndOfTurn;

        encounter.end_turn();
        assert_eq!(encounter.phase(), EncounterPhase::Victory);
    }

    #[test]
    fn test_player_death_outranks_enemy_death() {
        let mut player = swordsman();
        player.stats.set_hp(1);
        player
            .statuses
            .apply(StatusEffect::new(StatusKind::Burn, 2, 2));
        let mut enemy = rat(4);
        enemy.stats.take_damage(7);
        let mut encounter = Encounter::new(player, vec![enemy], 5);
        encounter.enemies_mut()[0]
            .statuses
            .apply(StatusEffect::new(StatusKind::Bleed, 3, 2));
        encounter.phase = EncounterPhase::EndOfTurn;

        encounter.end_turn();
        assert_eq!(encounter.phase(), EncounterPhase::Defeat);
    }

    #[test]
    fn test_run_to_victory() {
        let mut encounter = Encounter::new(swordsman(), vec![rat(1)], 5);
        let mut prompt = RepeatPrompt(PlayerChoice::new(1));
        let mut decider = InstinctDecider;

        assert!(encounter.run(&mut prompt, &mut decider, &chamber()));
        assert_eq!(encounter.phase(), EncounterPhase::Victory);
        // The rat fell before it could bite.
        assert_eq!(encounter.player().stats.hp(), 40);
    }

    #[test]
    fn test_run_to_defeat() {
        let player = Player::new("Asha", PlayerClass::Vanguard, Stats::new(5, 0, 0, 5));
        let ogre = Enemy::new("rift ogre", Stats::new(60, 30, 10, 6))
            .with_position(Position3D::new(1, 0, 0));
        let mut encounter = Encounter::new(player, vec![ogre], 5);
        let mut prompt = RepeatPrompt(PlayerChoice::new(0));
        let mut decider = InstinctDecider;

        assert!(!encounter.run(&mut prompt, &mut decider, &chamber()));
        assert_eq!(encounter.phase(), EncounterPhase::Defeat);
        assert!(encounter.player().is_dead());
    }

    #[test]
    fn test_instinct_closes_distance_when_it_can() {
        let view_player = swordsman();
        let enemies = vec![Enemy::new("wolf", Stats::new(10, 3, 0, 5))
            .with_position(Position3D::new(6, 0, 0))
            .with_actions(vec![CombatAction::Bite, CombatAction::Advance])];
        let view = EncounterView {
            player: &view_player,
            enemies: &enemies,
            turn: 1,
        };
        let mut decider = InstinctDecider;
        assert_eq!(decider.decide(0, &view), CombatAction::Advance);
    }

    #[test]
    fn test_player_band_tracks_nearest_living_enemy() {
        let mut far = rat(9);
        let near = rat(2);
        far.stats.take_damage(100);
        let encounter = Encounter::new(swordsman(), vec![far, near], 5);
        assert_eq!(encounter.player_band(), DistanceBand::Close);
    }
}
