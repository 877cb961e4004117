//! What an enemy has learned about the player's fighting habits.
//!
//! Combat resolution only records observations here; reading them to
//! pick enemy actions is the AI layer's business.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::combat::ActionCategory;
use crate::consts::{
    AI_TIER_ADAPTED, AI_TIER_LEARNING, AI_TIER_MASTER, KNOWLEDGE_HISTORY_SLOTS,
};

/// How well an enemy has the player figured out. Derived from the
/// lifetime observation count, never stored.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
pub enum AiTier {
    #[default]
    Basic,
    Learning,
    Adapted,
    Master,
}

/// Per-enemy memory of observed player actions: lifetime counters per
/// category plus a fixed-size ring of the most recent ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyKnowledge {
    counts: HashMap<ActionCategory, u32>,
    history: Vec<ActionCategory>,
    next_slot: usize,
    total_observations: u32,
}

impl EnemyKnowledge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observed action. The ring keeps the last
    /// `KNOWLEDGE_HISTORY_SLOTS` entries, overwriting the oldest;
    /// the lifetime total never decreases.
    pub fn record(&mut self, category: ActionCategory) {
        *self.counts.entry(category).or_insert(0) += 1;
        if self.history.len() < KNOWLEDGE_HISTORY_SLOTS {
            self.history.push(category);
        } else {
            self.history[self.next_slot] = category;
        }
        self.next_slot = (self.next_slot + 1) % KNOWLEDGE_HISTORY_SLOTS;
        self.total_observations += 1;
    }

    pub fn count(&self, category: ActionCategory) -> u32 {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    pub fn total_observations(&self) -> u32 {
        self.total_observations
    }

    pub fn tier(&self) -> AiTier {
        match self.total_observations {
            n if n >= AI_TIER_MASTER => AiTier::Master,
            n if n >= AI_TIER_ADAPTED => AiTier::Adapted,
            n if n >= AI_TIER_LEARNING => AiTier::Learning,
            _ => AiTier::Basic,
        }
    }

    /// The category seen most often. Ties go to the earliest-declared
    /// category; `max_by_key` keeps the last maximum, so iterate in
    /// reverse.
    pub fn most_seen(&self) -> Option<ActionCategory> {
        ActionCategory::iter()
            .rev()
            .map(|c| (c, self.count(c)))
            .filter(|&(_, n)| n > 0)
            .max_by_key(|&(_, n)| n)
            .map(|(c, _)| c)
    }

    /// Ring contents oldest first.
    pub fn recent(&self) -> Vec<ActionCategory> {
        if self.history.len() < KNOWLEDGE_HISTORY_SLOTS {
            self.history.clone()
        } else {
            let mut out = Vec::with_capacity(KNOWLEDGE_HISTORY_SLOTS);
            out.extend_from_slice(&self.history[self.next_slot..]);
            out.extend_from_slice(&self.history[..self.next_slot]);
            out
        }
    }
}
