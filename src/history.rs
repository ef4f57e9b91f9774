//! Step log of a game.
//!
//! Every successful attack and turn end appends one `Step`, so a game can be
//! replayed or rendered after the fact.

use serde::{Deserialize, Serialize};

use crate::board::PlayerId;
use crate::resolve::{AttackOutcome, Supply};

/// One executed action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    Attack(AttackOutcome),
    /// Reinforcement granted when a player ended the turn.
    Supply(Supply),
}

impl Step {
    /// The player who acted.
    pub fn player(&self) -> PlayerId {
        match self {
            Step::Attack(outcome) => outcome.attacker,
            Step::Supply(supply) => supply.player,
        }
    }
}
