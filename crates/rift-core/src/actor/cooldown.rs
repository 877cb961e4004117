//! Cooldown bookkeeping for actions that cannot fire every turn.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::combat::CombatAction;

/// Remaining cooldowns, one entry per action still recovering.
/// Ready actions carry no entry at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooldownLedger {
    remaining: HashMap<CombatAction, u8>,
}

impl CooldownLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a cooldown. A zero-turn cooldown clears the entry instead.
    pub fn set(&mut self, action: CombatAction, turns: u8) {
        if turns == 0 {
            self.remaining.remove(&action);
        } else {
            self.remaining.insert(action, turns);
        }
    }

    pub fn remaining(&self, action: CombatAction) -> u8 {
        self.remaining.get(&action).copied().unwrap_or(0)
    }

    pub fn is_ready(&self, action: CombatAction) -> bool {
        self.remaining(action) == 0
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Advance one turn: every entry drops by one and spent entries vanish.
    pub fn tick(&mut self) {
        for cd in self.remaining.values_mut() {
            *cd = cd.saturating_sub(1);
        }
        self.remaining.retain(|_, &mut cd| cd > 0);
    }
}
