//! Players and their elimination status.

use serde::{Deserialize, Serialize};

use super::area::PlayerId;

/// Whether a player still takes turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerStatus {
    Active,
    /// Owns no areas. Permanent: an eliminated player never returns.
    Eliminated,
}

impl PlayerStatus {
    /// Returns the single-character notation abbreviation.
    pub const fn notation_char(self) -> char {
        match self {
            PlayerStatus::Active => 'a',
            PlayerStatus::Eliminated => 'x',
        }
    }

    /// Parses a status from its single-character notation abbreviation.
    pub fn from_notation_char(c: char) -> Option<PlayerStatus> {
        match c {
            'a' => Some(PlayerStatus::Active),
            'x' => Some(PlayerStatus::Eliminated),
            _ => None,
        }
    }
}

/// A seat at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub status: PlayerStatus,
    /// Reinforcement dice banked because every area was full.
    pub stock: u32,
}

impl Player {
    /// Creates an active player with an empty stock.
    pub fn new(id: PlayerId) -> Self {
        Player {
            id,
            status: PlayerStatus::Active,
            stock: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == PlayerStatus::Active
    }

    /// Marks the player eliminated. Any banked stock is forfeited.
    pub fn eliminate(&mut self) {
        self.status = PlayerStatus::Eliminated;
        self.stock = 0;
    }
}
