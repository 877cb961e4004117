//! Player class definitions.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Player class. Only the Sorcerer works magic; the martial classes
/// fight with whatever weapon tier they have unlocked.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum PlayerClass {
    #[default]
    Vanguard,
    Ranger,
    Sorcerer,
}

impl PlayerClass {
    /// Casters draw on spells instead of the melee tier.
    pub const fn is_caster(&self) -> bool {
        matches!(self, PlayerClass::Sorcerer)
    }

    /// Short epithet for flavor text.
    pub const fn epithet(&self) -> &'static str {
        match self {
            PlayerClass::Vanguard => "shield of the vanguard",
            PlayerClass::Ranger => "warden of the wilds",
            PlayerClass::Sorcerer => "weaver of the rift",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_only_sorcerer_casts() {
        let casters: Vec<_> = PlayerClass::iter().filter(|c| c.is_caster()).collect();
        assert_eq!(casters, vec![PlayerClass::Sorcerer]);
    }
}
