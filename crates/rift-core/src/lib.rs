//! rift-core: combat resolution for Riftgate
//!
//! This crate contains the tactical combat engine with no I/O
//! dependencies. It is designed to be pure and testable: frontends
//! drive a [`combat::Encounter`] and plug in through the
//! [`combat::ActionPrompt`] and [`combat::EnemyDecider`] traits.

pub mod actor;
pub mod combat;
pub mod dungeon;
pub mod item;
pub mod log;

mod consts;
mod error;
mod rng;

pub use consts::*;
pub use error::{CombatError, PromptError};
pub use rng::GameRng;
