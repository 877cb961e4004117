//! The single resolution path every combat action goes through.
//!
//! Player-attacks-enemy and enemy-attacks-player both come here; there
//! is exactly one executor, generic over the `Combatant` trait.

use serde::{Deserialize, Serialize};

use crate::actor::Combatant;
use crate::combat::{band_between, CombatAction, DistanceBand, Position3D};
use crate::consts::{
    ACCURACY_BY_BAND, BLINK_ATTEMPTS, BLINK_RANGE, RANGED_CRIT_CHANCE, RANGED_CRIT_SCALE,
    TELEGRAPH_BRACE_CHANCE, TELEGRAPH_BRACE_SCALE,
};
use crate::dungeon::Dungeon;
use crate::error::CombatError;
use crate::item::ItemKind;
use crate::log::{CombatLog, MessageKind};
use crate::rng::GameRng;

/// Probabilistic knobs, copied from the design constants so tests can
/// pin individual chances to 0 or 100. The per-band damage modifier is
/// deliberately absent: it is pinned to 1.0 and not tunable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombatTuning {
    pub accuracy_by_band: [u32; 5],
    pub brace_chance: u32,
    pub brace_scale: f32,
    pub crit_chance: u32,
    pub crit_scale: f32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            accuracy_by_band: ACCURACY_BY_BAND,
            brace_chance: TELEGRAPH_BRACE_CHANCE,
            brace_scale: TELEGRAPH_BRACE_SCALE,
            crit_chance: RANGED_CRIT_CHANCE,
            crit_scale: RANGED_CRIT_SCALE,
        }
    }
}

impl CombatTuning {
    pub fn accuracy(&self, band: DistanceBand) -> u32 {
        self.accuracy_by_band[band.index()]
    }
}

/// Stack-scoped state for one resolution. Never persisted.
#[derive(Debug, Clone)]
pub struct CombatContext {
    pub action: CombatAction,
    pub target_index: usize,
    pub item_index: Option<usize>,
    pub attacker_pos: Position3D,
    pub target_pos: Position3D,
    pub band: DistanceBand,
    pub success: bool,
}

impl CombatContext {
    /// Aliases resolve here, at the boundary: the executor never sees a
    /// legacy identifier.
    pub fn new(action: CombatAction, target_index: usize) -> Self {
        Self {
            action: action.canonical(),
            target_index,
            item_index: None,
            attacker_pos: Position3D::ORIGIN,
            target_pos: Position3D::ORIGIN,
            band: DistanceBand::Melee,
            success: false,
        }
    }

    pub fn with_item(mut self, item_index: usize) -> Self {
        self.item_index = Some(item_index);
        self
    }
}

/// What one resolution did.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionOutcome {
    pub action: CombatAction,
    /// The action was carried out (a ranged miss still counts).
    pub success: bool,
    /// The damage path connected with at least one target.
    pub hit: bool,
    pub total_damage: i32,
    pub targets_hit: u8,
    pub critical: bool,
    pub braced: bool,
    /// New position after a movement action, for hazard checks.
    pub moved_to: Option<Position3D>,
    pub error: Option<CombatError>,
}

impl ResolutionOutcome {
    fn new(action: CombatAction) -> Self {
        Self {
            action,
            success: false,
            hit: false,
            total_damage: 0,
            targets_hit: 0,
            critical: false,
            braced: false,
            moved_to: None,
            error: None,
        }
    }

    fn failed(action: CombatAction, error: CombatError) -> Self {
        Self {
            error: Some(error),
            ..Self::new(action)
        }
    }
}

fn subject<C: Combatant + ?Sized>(c: &C) -> String {
    if c.is_player() {
        "you".to_string()
    } else {
        format!("the {}", c.name())
    }
}

fn subject_cap<C: Combatant + ?Sized>(c: &C) -> String {
    if c.is_player() {
        "You".to_string()
    } else {
        format!("The {}", c.name())
    }
}

fn verb<'a, C: Combatant + ?Sized>(c: &C, plain: &'a str, s_form: &'a str) -> &'a str {
    if c.is_player() {
        plain
    } else {
        s_form
    }
}

/// Resolve one already-chosen action against the defender list.
///
/// The context's positions and band are refreshed from live state on
/// entry; distance is never carried over from a previous turn. Once an
/// action passes cooldown validation it completes fully, with no
/// partial effects and no rollback.
pub fn resolve_action<A, D>(
    attacker: &mut A,
    defenders: &mut [D],
    ctx: &mut CombatContext,
    dungeon: &dyn Dungeon,
    tuning: &CombatTuning,
    log: &mut CombatLog,
    rng: &mut GameRng,
) -> ResolutionOutcome
where
    A: Combatant,
    D: Combatant,
{
    let action = ctx.action.canonical();
    ctx.action = action;
    let profile = action.profile();
    ctx.success = false;

    // Bounds failures stay internal: unsuccessful outcome, no mutation,
    // no player-visible message.
    if ctx.target_index >= defenders.len() {
        return ResolutionOutcome::failed(
            action,
            CombatError::TargetOutOfBounds {
                index: ctx.target_index,
                count: defenders.len(),
            },
        );
    }

    ctx.attacker_pos = attacker.position();
    ctx.target_pos = defenders[ctx.target_index].position();
    ctx.band = band_between(ctx.attacker_pos, ctx.target_pos);

    if let Some(cooldowns) = attacker.cooldowns() {
        let remaining = cooldowns.remaining(action);
        if remaining > 0 {
            log.push(
                MessageKind::Warning,
                format!("Your {action} is not ready yet."),
            );
            return ResolutionOutcome::failed(action, CombatError::OnCooldown { action, remaining });
        }
    }

    // Band requirements bite here and only here; availability never
    // looked at them.
    if let Some(min_band) = profile.min_band {
        if ctx.band < min_band {
            log.push(
                MessageKind::Warning,
                format!(
                    "{} {} too close to use {action}!",
                    subject_cap(attacker),
                    verb(attacker, "are", "is"),
                ),
            );
            return ResolutionOutcome::failed(action, CombatError::OutOfRange { action });
        }
    }

    match action {
        CombatAction::Wait => {
            let mut outcome = ResolutionOutcome::new(action);
            log.push(
                MessageKind::Combat,
                format!(
                    "{} {} ground.",
                    subject_cap(attacker),
                    verb(attacker, "hold your", "holds its"),
                ),
            );
            outcome.success = true;
            ctx.success = true;
            return outcome;
        }
        CombatAction::UseItem => {
            let outcome = resolve_use_item(attacker, ctx.item_index, log);
            ctx.success = outcome.success;
            return outcome;
        }
        CombatAction::Advance | CombatAction::Retreat => {
            let outcome = resolve_step(
                attacker,
                action,
                ctx.target_pos,
                dungeon,
                log,
            );
            ctx.success = outcome.success;
            return outcome;
        }
        CombatAction::BlinkStep => {
            let outcome = resolve_blink(attacker, dungeon, log, rng);
            ctx.success = outcome.success;
            return outcome;
        }
        _ => {}
    }

    let outcome = if profile.is_aoe() {
        resolve_aoe(attacker, defenders, action, tuning, log, rng)
    } else {
        resolve_strike(attacker, defenders, ctx, tuning, log, rng)
    };
    ctx.success = outcome.success;
    outcome
}

/// Single-target damage path.
fn resolve_strike<A, D>(
    attacker: &mut A,
    defenders: &mut [D],
    ctx: &CombatContext,
    tuning: &CombatTuning,
    log: &mut CombatLog,
    rng: &mut GameRng,
) -> ResolutionOutcome
where
    A: Combatant,
    D: Combatant,
{
    let action = ctx.action;
    let profile = action.profile();
    let mut outcome = ResolutionOutcome::new(action);
    let idx = ctx.target_index;

    let defender_height = defenders[idx].height();
    let defender_anchor = defenders[idx].anchor();
    let defender_is_player = defenders[idx].is_player();
    let defender_sub = subject(&defenders[idx]);
    let defender_sub_cap = subject_cap(&defenders[idx]);
    let defender_is = if defender_is_player { "are" } else { "is" };
    let eff_defense = defenders[idx].effective_defense();

    // Hard precondition: pure melee cannot touch a raised target.
    if profile.is_pure_melee() && !defender_height.is_melee_reachable() {
        log.push(
            MessageKind::Warning,
            format!("{defender_sub_cap} {defender_is} out of reach!"),
        );
        return ResolutionOutcome::failed(action, CombatError::OutOfReach);
    }

    if profile.is_telegraphed() {
        log.push(
            MessageKind::Warning,
            format!(
                "{} {} up for a {action}!",
                subject_cap(attacker),
                verb(attacker, "wind", "winds"),
            ),
        );
    }

    // Cooldown is committed before any damage is rolled.
    if profile.cooldown > 0 {
        if let Some(cooldowns) = attacker.cooldowns_mut() {
            cooldowns.set(action, profile.cooldown);
        }
    }

    // Fixed roll order: accuracy, then critical, then brace.
    let is_ranged = profile.requires_ranged();
    if is_ranged && !rng.percent(tuning.accuracy(ctx.band)) {
        log.push(
            MessageKind::Combat,
            format!(
                "{} {} {defender_sub}.",
                subject_cap(attacker),
                verb(attacker, "miss", "misses"),
            ),
        );
        outcome.success = true;
        return outcome;
    }
    let critical = is_ranged && rng.percent(tuning.crit_chance);

    let base = (attacker.effective_attack() - eff_defense).max(0);
    let mut damage =
        (base as f32 * profile.multiplier * ctx.band.damage_modifier()).floor() as i32;
    if critical {
        damage = (damage as f32 * tuning.crit_scale).floor() as i32;
    }
    let mut braced = false;
    if profile.is_telegraphed() && rng.percent(tuning.brace_chance) {
        braced = true;
        damage = (damage as f32 * tuning.brace_scale).floor() as i32;
        log.push(
            MessageKind::Combat,
            format!(
                "{defender_sub_cap} {} against the blow!",
                if defender_is_player { "brace" } else { "braces" },
            ),
        );
    }

    defenders[idx].stats_mut().take_damage(damage);
    log.damage_number(damage, defender_anchor, defender_is_player, critical);
    let hit_verb = if critical { "critically hits" } else { "hits" };
    if attacker.is_player() {
        log.push(
            MessageKind::Combat,
            format!("Your {action} {hit_verb} {defender_sub} for {damage} damage!"),
        );
    } else {
        log.push(
            MessageKind::Combat,
            format!(
                "The {}'s {action} {hit_verb} {defender_sub} for {damage} damage!",
                attacker.name(),
            ),
        );
    }

    if let Some(effect) = profile.on_hit {
        defenders[idx].statuses_mut().apply(effect);
        log.push(
            MessageKind::Combat,
            format!("{defender_sub_cap} {defender_is} {}!", effect.kind.applied()),
        );
    }

    if defenders[idx].is_dead() {
        if defender_is_player {
            log.push(MessageKind::Combat, "You die...");
        } else {
            log.push(MessageKind::Combat, format!("{defender_sub_cap} dies!"));
        }
    }

    outcome.success = true;
    outcome.hit = true;
    outcome.total_damage = damage;
    outcome.targets_hit = 1;
    outcome.critical = critical;
    outcome.braced = braced;
    outcome
}

/// Area path: every eligible defender, bounded by the profile cap.
/// One shared cooldown is set after the loop; an empty sweep sets none.
fn resolve_aoe<A, D>(
    attacker: &mut A,
    defenders: &mut [D],
    action: CombatAction,
    tuning: &CombatTuning,
    log: &mut CombatLog,
    rng: &mut GameRng,
) -> ResolutionOutcome
where
    A: Combatant,
    D: Combatant,
{
    let profile = action.profile();
    let mut outcome = ResolutionOutcome::new(action);
    let reach = match profile.aoe {
        Some(aoe) => aoe,
        None => return ResolutionOutcome::failed(action, CombatError::NoAoeTargets),
    };
    let attacker_pos = attacker.position();
    let pure_melee = profile.is_pure_melee();

    let eligible: Vec<usize> = defenders
        .iter()
        .enumerate()
        .filter(|(_, d)| {
            !d.is_dead()
                && band_between(attacker_pos, d.position()) <= reach.reach
                && (!pure_melee || d.height().is_melee_reachable())
        })
        .map(|(i, _)| i)
        .collect();

    if eligible.is_empty() {
        log.push(MessageKind::Warning, "There is nothing in reach to hit.");
        return ResolutionOutcome::failed(action, CombatError::NoAoeTargets);
    }

    if profile.is_telegraphed() {
        log.push(
            MessageKind::Warning,
            format!(
                "{} {} up for a {action}!",
                subject_cap(attacker),
                verb(attacker, "wind", "winds"),
            ),
        );
    }

    let cap = reach.max_targets.unwrap_or(eligible.len());
    let eff_attack = attacker.effective_attack();
    let attacker_is_player = attacker.is_player();
    let attacker_name = attacker.name().to_string();

    for &idx in eligible.iter().take(cap) {
        let base = (eff_attack - defenders[idx].effective_defense()).max(0);
        let band = band_between(attacker_pos, defenders[idx].position());
        let mut damage = (base as f32 * profile.multiplier * band.damage_modifier()).floor() as i32;
        // Each defender gets its own brace roll.
        if profile.is_telegraphed() && rng.percent(tuning.brace_chance) {
            damage = (damage as f32 * tuning.brace_scale).floor() as i32;
            outcome.braced = true;
            log.push(
                MessageKind::Combat,
                format!(
                    "{} {} against the blow!",
                    subject_cap(&defenders[idx]),
                    if defenders[idx].is_player() { "brace" } else { "braces" },
                ),
            );
        }
        defenders[idx].stats_mut().take_damage(damage);
        log.damage_number(
            damage,
            defenders[idx].anchor(),
            defenders[idx].is_player(),
            false,
        );
        if attacker_is_player {
            log.push(
                MessageKind::Combat,
                format!(
                    "Your {action} hits {} for {damage} damage!",
                    subject(&defenders[idx]),
                ),
            );
        } else {
            log.push(
                MessageKind::Combat,
                format!(
                    "The {attacker_name}'s {action} hits {} for {damage} damage!",
                    subject(&defenders[idx]),
                ),
            );
        }
        if let Some(effect) = profile.on_hit {
            defenders[idx].statuses_mut().apply(effect);
        }
        if defenders[idx].is_dead() {
            log.push(
                MessageKind::Combat,
                format!("{} dies!", subject_cap(&defenders[idx])),
            );
        }
        outcome.total_damage += damage;
        outcome.targets_hit += 1;
    }

    if profile.cooldown > 0 {
        if let Some(cooldowns) = attacker.cooldowns_mut() {
            cooldowns.set(action, profile.cooldown);
        }
    }

    outcome.success = true;
    outcome.hit = outcome.targets_hit > 0;
    outcome
}

/// One step along the dominant axis, toward or away from the target.
fn resolve_step<A>(
    attacker: &mut A,
    action: CombatAction,
    target_pos: Position3D,
    dungeon: &dyn Dungeon,
    log: &mut CombatLog,
) -> ResolutionOutcome
where
    A: Combatant,
{
    let mut outcome = ResolutionOutcome::new(action);
    let from = attacker.position();
    let dx = target_pos.x - from.x;
    let dy = target_pos.y - from.y;
    let (step_x, step_y) = if dx.abs() >= dy.abs() {
        (dx.signum(), 0)
    } else {
        (0, dy.signum())
    };
    let (step_x, step_y) = if action == CombatAction::Retreat {
        (-step_x, -step_y)
    } else {
        (step_x, step_y)
    };
    let dest = Position3D::new(from.x + step_x, from.y + step_y, from.depth);

    if dest == from || !dungeon.in_bounds(dest.x, dest.y) || !dungeon.is_walkable(dest.x, dest.y)
    {
        log.push(
            MessageKind::Warning,
            format!("{} way is blocked.", verb(attacker, "Your", "Its")),
        );
        return ResolutionOutcome::failed(action, CombatError::MoveBlocked);
    }

    attacker.set_position(dest);
    let moved = if action == CombatAction::Retreat {
        verb(attacker, "fall back", "falls back")
    } else {
        verb(attacker, "advance", "advances")
    };
    log.push(
        MessageKind::Combat,
        format!("{} {moved}.", subject_cap(attacker)),
    );
    outcome.success = true;
    outcome.moved_to = Some(dest);
    outcome
}

/// Short-range teleport: bounded random placement attempts, fizzles on
/// exhaustion. The cooldown is spent the moment the spell is attempted.
fn resolve_blink<A>(
    attacker: &mut A,
    dungeon: &dyn Dungeon,
    log: &mut CombatLog,
    rng: &mut GameRng,
) -> ResolutionOutcome
where
    A: Combatant,
{
    let action = CombatAction::BlinkStep;
    let mut outcome = ResolutionOutcome::new(action);
    let cooldown = action.profile().cooldown;
    if cooldown > 0 {
        if let Some(cooldowns) = attacker.cooldowns_mut() {
            cooldowns.set(action, cooldown);
        }
    }

    let from = attacker.position();
    for _ in 0..BLINK_ATTEMPTS {
        let dest = Position3D::new(
            from.x + rng.offset(BLINK_RANGE),
            from.y + rng.offset(BLINK_RANGE),
            from.depth,
        );
        if dest != from && dungeon.in_bounds(dest.x, dest.y) && dungeon.is_walkable(dest.x, dest.y)
        {
            attacker.set_position(dest);
            log.push(
                MessageKind::Combat,
                format!(
                    "Reality folds and {} {} through.",
                    subject(attacker),
                    verb(attacker, "step", "steps"),
                ),
            );
            outcome.success = true;
            outcome.moved_to = Some(dest);
            return outcome;
        }
    }

    log.push(MessageKind::Warning, "The blink fizzles.");
    outcome
}

/// Consume a restorative from the attacker's bag.
fn resolve_use_item<A>(
    attacker: &mut A,
    item_index: Option<usize>,
    log: &mut CombatLog,
) -> ResolutionOutcome
where
    A: Combatant,
{
    let action = CombatAction::UseItem;
    let Some(index) = item_index else {
        return ResolutionOutcome::failed(action, CombatError::NoItemSelected);
    };
    let count = attacker.consumable_count();
    if index >= count {
        return ResolutionOutcome::failed(action, CombatError::InvalidItemIndex { index, count });
    }
    let Some(item) = attacker.take_restorative(index) else {
        return ResolutionOutcome::failed(action, CombatError::InvalidItemIndex { index, count });
    };

    let mut outcome = ResolutionOutcome::new(action);
    if let ItemKind::Restorative { heal, cleanses } = item.kind {
        let before = attacker.stats().hp();
        attacker.stats_mut().heal(heal);
        let restored = attacker.stats().hp() - before;
        log.push(
            MessageKind::Combat,
            format!(
                "{} {} the {} and {} {restored} hp.",
                subject_cap(attacker),
                verb(attacker, "use", "uses"),
                item.name,
                verb(attacker, "recover", "recovers"),
            ),
        );
        if cleanses {
            let removed = attacker.statuses_mut().cleanse_damage_over_time();
            if removed > 0 {
                log.push(
                    MessageKind::Combat,
                    format!(
                        "{} afflictions wash away.",
                        verb(attacker, "Your", "Its"),
                    ),
                );
            }
        }
    }
    outcome.success = true;
    outcome
}
