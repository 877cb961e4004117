//! Combat error taxonomy.
//!
//! Every variant is recoverable at the point it occurs; the worst outcome of
//! malformed input is a turn that does nothing. Nothing here ever escapes the
//! combat loop as a panic or process exit.

use thiserror::Error;

use crate::combat::CombatAction;

/// Recoverable failures raised while resolving a single action.
///
/// These travel inside `ResolutionOutcome` as internal diagnostics; the
/// player-visible consequence is a log message, if anything.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CombatError {
    #[error("target index {index} out of bounds for {count} combatants")]
    TargetOutOfBounds { index: usize, count: usize },

    #[error("{action} is on cooldown for {remaining} more turns")]
    OnCooldown { action: CombatAction, remaining: u8 },

    #[error("{action} needs more distance to line up")]
    OutOfRange { action: CombatAction },

    #[error("target is out of reach")]
    OutOfReach,

    #[error("no targets in the area")]
    NoAoeTargets,

    #[error("item use requested without an item index")]
    NoItemSelected,

    #[error("consumable index {index} out of bounds for {count} items")]
    InvalidItemIndex { index: usize, count: usize },

    #[error("movement blocked")]
    MoveBlocked,
}

/// Failures while acquiring the player's menu choice.
///
/// The encounter retries up to its attempt ceiling, then substitutes a wait;
/// any real backoff sleep belongs to the prompt implementation, not the core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    #[error("input source unavailable")]
    Unavailable,

    #[error("choice {index} not in the offered menu of {count}")]
    InvalidChoice { index: usize, count: usize },

    #[error("prompt cancelled")]
    Cancelled,
}
