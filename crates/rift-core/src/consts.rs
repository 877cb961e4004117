//! Combat tuning constants for Riftgate.
//!
//! Anything a designer would want to retune lives here; the executor reads
//! these through `CombatTuning` so tests can pin individual chances.

/// Distance band upper bounds (inclusive) on the weighted raw distance.
pub const MELEE_RANGE_MAX: i32 = 1;
pub const CLOSE_RANGE_MAX: i32 = 3;
pub const MEDIUM_RANGE_MAX: i32 = 6;
pub const FAR_RANGE_MAX: i32 = 10;

/// Depth axis weight: each point of depth separation counts as 3/2 tiles.
pub const DEPTH_WEIGHT_NUM: i32 = 3;
pub const DEPTH_WEIGHT_DEN: i32 = 2;

/// Ranged accuracy percentage per distance band (Melee..Extreme).
pub const ACCURACY_BY_BAND: [u32; 5] = [95, 90, 80, 65, 40];

/// Chance (percent) that a telegraphed attack is braced against.
pub const TELEGRAPH_BRACE_CHANCE: u32 = 30;
/// Damage scale applied when the defender braces.
pub const TELEGRAPH_BRACE_SCALE: f32 = 0.7;

/// Chance (percent) that a ranged hit is a critical.
pub const RANGED_CRIT_CHANCE: u32 = 15;
/// Damage scale applied on a critical hit.
pub const RANGED_CRIT_SCALE: f32 = 1.5;

/// Upper bound on targets struck by capped area attacks.
pub const AOE_MAX_TARGETS: usize = 3;

/// How many tiles a blink step may cover.
pub const BLINK_RANGE: i32 = 4;
/// Placement attempts before a blink fizzles.
pub const BLINK_ATTEMPTS: u32 = 8;

/// Menu input attempts before the turn degrades to a wait.
pub const MENU_ATTEMPT_LIMIT: u32 = 3;

/// Slots in an enemy's circular action history.
pub const KNOWLEDGE_HISTORY_SLOTS: usize = 10;

/// Observation counts at which an enemy's adaptation tier rises.
pub const AI_TIER_LEARNING: u32 = 3;
pub const AI_TIER_ADAPTED: u32 = 7;
pub const AI_TIER_MASTER: u32 = 10;

/// Minimum damage a damage-over-time effect deals per tick.
pub const DOT_MIN_DAMAGE: i32 = 1;
