//! Area and player identifiers.
//!
//! Areas and players are referred to by dense integer ids so that all
//! per-area and per-player data can live in plain vectors indexed by id.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies an area on a board. Ids are dense: `0..board.area_count()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AreaId(pub u16);

impl AreaId {
    /// The largest number of areas a board can hold.
    pub const LIMIT: usize = u16::MAX as usize + 1;

    /// Returns the id as a vector index.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Converts a vector index into an id, if it fits.
    pub fn from_index(index: usize) -> Option<AreaId> {
        u16::try_from(index).ok().map(AreaId)
    }
}

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifies a player. The id is also the player's seat in turn order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// The largest number of players a game can seat.
    pub const LIMIT: usize = u8::MAX as usize + 1;

    /// Returns the id as a vector index.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Converts a vector index into an id, if it fits.
    pub fn from_index(index: usize) -> Option<PlayerId> {
        u8::try_from(index).ok().map(PlayerId)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}
