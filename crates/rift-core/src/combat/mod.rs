//! Tactical combat: distance bands, the action catalog, one shared
//! resolution path and the encounter turn loop that drives it.

pub mod action;
pub mod arena;
pub mod available;
pub mod distance;
pub mod encounter;
pub mod executor;

pub use action::{
    profile_by_name, ActionCategory, ActionFlags, ActionProfile, AoeProfile, CombatAction,
};
pub use arena::{CombatArena, Hazard};
pub use available::available_actions;
pub use distance::{band_between, raw_distance, DistanceBand, Position3D};
pub use encounter::{
    ActionPrompt, Encounter, EncounterPhase, EncounterView, EnemyDecider, InstinctDecider,
    PlayerChoice,
};
pub use executor::{resolve_action, CombatContext, CombatTuning, ResolutionOutcome};
