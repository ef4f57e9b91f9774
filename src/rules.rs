//! Tunable rule parameters.

use serde::{Deserialize, Serialize};

use crate::error::SetupError;

/// Conventional dice cap per area.
pub const DEFAULT_MAX_DICE: u8 = 8;

/// Conventional cap on banked reinforcement dice per player.
pub const DEFAULT_MAX_STOCK: u32 = 64;

/// Ties in an attack go to the defender. Fixed by the classic rules.
pub const TIE_FAVORS_DEFENDER: bool = true;

/// Rule variant parameters for a game.
///
/// Missing fields take their defaults when deserialized, so `{}` is the
/// classic rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Upper bound of dice on one area. Applied only by reinforcement.
    pub max_dice: u8,
    /// Reinforcement dice a player may bank when all areas are full.
    /// Zero discards every leftover die.
    pub max_stock: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            max_dice: DEFAULT_MAX_DICE,
            max_stock: DEFAULT_MAX_STOCK,
        }
    }
}

impl Rules {
    /// Parses rules from JSON, e.g. `{"max_dice": 10}`.
    pub fn from_json(s: &str) -> Result<Rules, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Checks that the parameters describe a playable game.
    pub fn validate(&self) -> Result<(), SetupError> {
        // An area needs two dice to attack.
        if self.max_dice < 2 {
            return Err(SetupError::InvalidMaxDice(self.max_dice));
        }
        Ok(())
    }
}
