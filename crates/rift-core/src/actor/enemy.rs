//! Enemy instances.

use serde::{Deserialize, Serialize};

use crate::actor::{EnemyKnowledge, HeightLevel, Stats, StatusLedger};
use crate::combat::{CombatAction, Position3D};
use crate::log::ScreenAnchor;

/// One enemy in an encounter. Enemies fight with their natural action
/// repertoire and carry no equipment or cooldown ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub name: String,
    pub stats: Stats,
    pub position: Position3D,
    pub height: HeightLevel,
    /// Actions the AI layer may pick from.
    pub actions: Vec<CombatAction>,
    pub statuses: StatusLedger,
    pub knowledge: EnemyKnowledge,
    pub anchor: ScreenAnchor,
}

impl Enemy {
    pub fn new(name: impl Into<String>, stats: Stats) -> Self {
        Self {
            name: name.into(),
            stats,
            position: Position3D::ORIGIN,
            height: HeightLevel::Ground,
            actions: vec![CombatAction::Bite],
            statuses: StatusLedger::new(),
            knowledge: EnemyKnowledge::new(),
            anchor: ScreenAnchor::default(),
        }
    }

    pub fn with_position(mut self, position: Position3D) -> Self {
        self.position = position;
        self
    }

    pub fn with_height(mut self, height: HeightLevel) -> Self {
        self.height = height;
        self
    }

    pub fn with_actions(mut self, actions: Vec<CombatAction>) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_anchor(mut self, anchor: ScreenAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn is_alive(&self) -> bool {
        !self.stats.is_dead()
    }
}
