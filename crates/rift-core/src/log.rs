//! Combat log and floating damage numbers.
//!
//! The core never prints; it queues messages and damage-number events here
//! and the presentation layer drains them after each resolution. Screen
//! anchors are caller-supplied and pass through untouched.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Coarse message category, used by the frontend for styling only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum MessageKind {
    /// Hits, misses, damage, deaths.
    Combat,
    /// Telegraphs, rejected actions, cooldown refusals.
    Warning,
    /// Hazard triggers.
    Hazard,
    /// Turn bookkeeping and fallbacks.
    System,
}

/// A floating damage number the frontend may animate.
///
/// `row_anchor`/`col_anchor` are whatever the caller registered for that
/// combatant; the core attaches them verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageNumber {
    pub amount: i32,
    pub row_anchor: u16,
    pub col_anchor: u16,
    pub is_player_target: bool,
    pub is_critical: bool,
}

/// Where a combatant's damage numbers should float from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenAnchor {
    pub row: u16,
    pub col: u16,
}

impl ScreenAnchor {
    pub const fn new(row: u16, col: u16) -> Self {
        Self { row, col }
    }
}

/// Message and event queues for one encounter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatLog {
    /// Messages not yet drained by the frontend.
    #[serde(skip)]
    pending: Vec<(MessageKind, String)>,
    /// Damage numbers not yet drained by the frontend.
    #[serde(skip)]
    damage_numbers: Vec<DamageNumber>,
    /// Full history, kept for scrollback and post-mortems.
    history: Vec<String>,
}

impl CombatLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a message. Fire-and-forget: failures to display are not the
    /// core's problem.
    pub fn push(&mut self, kind: MessageKind, text: impl Into<String>) {
        let text = text.into();
        self.history.push(text.clone());
        self.pending.push((kind, text));
    }

    /// Queue a floating damage number.
    pub fn damage_number(
        &mut self,
        amount: i32,
        anchor: ScreenAnchor,
        is_player_target: bool,
        is_critical: bool,
    ) {
        self.damage_numbers.push(DamageNumber {
            amount,
            row_anchor: anchor.row,
            col_anchor: anchor.col,
            is_player_target,
            is_critical,
        });
    }

    /// Drain queued messages for display.
    pub fn take_messages(&mut self) -> Vec<(MessageKind, String)> {
        core::mem::take(&mut self.pending)
    }

    /// Drain queued damage numbers for animation.
    pub fn take_damage_numbers(&mut self) -> Vec<DamageNumber> {
        core::mem::take(&mut self.damage_numbers)
    }

    /// Messages queued and not yet drained.
    pub fn pending(&self) -> &[(MessageKind, String)] {
        &self.pending
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_drain() {
        let mut log = CombatLog::new();
        log.push(MessageKind::Combat, "You hit the thrall.");
        log.push(MessageKind::Warning, "The wisp rears back!");

        let msgs = log.take_messages();
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0].0, MessageKind::Combat);
        assert!(log.take_messages().is_empty());
        assert_eq!(log.history().len(), 2);
    }

    #[test]
    fn test_damage_numbers_pass_anchors_through() {
        let mut log = CombatLog::new();
        log.damage_number(12, ScreenAnchor::new(3, 40), false, true);

        let events = log.take_damage_numbers();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].amount, 12);
        assert_eq!(events[0].row_anchor, 3);
        assert_eq!(events[0].col_anchor, 40);
        assert!(events[0].is_critical);
        assert!(!events[0].is_player_target);
        assert!(log.take_damage_numbers().is_empty());
    }
}
