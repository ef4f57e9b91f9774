//! Save and resume.
//!
//! A `Snapshot` holds the rules, the position and, for seeded dice, the
//! point reached in the dice stream. The board is not included: a snapshot is
//! restored against the same `Arc<Board>` it was taken from. The step history
//! is not saved either.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::board::{Board, GameState, Position};
use crate::dice::{DiceCheckpoint, DiceSource, SeededDice};
use crate::error::SetupError;
use crate::rules::Rules;

/// Serializable state of a game in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub rules: Rules,
    pub position: Position,
    /// `None` for dice sources that cannot be resumed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dice: Option<DiceCheckpoint>,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(s: &str) -> Result<Snapshot, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl<D: DiceSource> GameState<D> {
    /// Captures the current position, rules and dice stream.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            rules: self.rules,
            position: self.position.clone(),
            dice: self.dice.checkpoint(),
        }
    }

    /// Rebuilds a game from a snapshot with a caller-supplied dice source.
    ///
    /// The snapshot's dice checkpoint, if any, is ignored.
    pub fn from_snapshot(board: Arc<Board>, snapshot: Snapshot, dice: D) -> Result<Self, SetupError> {
        GameState::from_position(board, snapshot.position, snapshot.rules, dice)
    }
}

impl GameState<SeededDice> {
    /// Rebuilds a seeded game so that it continues the identical dice stream.
    pub fn restore(board: Arc<Board>, snapshot: Snapshot) -> Result<Self, SetupError> {
        let checkpoint = snapshot.dice.ok_or(SetupError::MissingDiceCheckpoint)?;
        GameState::from_snapshot(board, snapshot, SeededDice::resume(checkpoint))
    }
}
