//! Error types for game construction and play.
//!
//! Every error leaves the game untouched: mutators validate before they
//! change anything.

use crate::board::{AreaId, PlayerId};

/// Reasons a game cannot be built from the given setup or snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("a game needs at least one player")]
    NoPlayers,

    #[error("{0} players exceed the supported {limit}", limit = PlayerId::LIMIT)]
    TooManyPlayers(usize),

    #[error("assignment covers {got} areas but the board has {expected}")]
    AssignmentLength { expected: usize, got: usize },

    #[error("area {area} is assigned to unknown player {owner}")]
    UnknownOwner { area: AreaId, owner: PlayerId },

    #[error("area {area} holds {dice} dice, outside 1..={max}")]
    DiceOutOfRange { area: AreaId, dice: u8, max: u8 },

    #[error("max_dice must be at least 2, got {0}")]
    InvalidMaxDice(u8),

    #[error("player list entry {index} carries id {id}")]
    PlayerOutOfOrder { index: usize, id: PlayerId },

    #[error("player {player} status disagrees with the {areas} areas it owns")]
    StatusMismatch { player: PlayerId, areas: usize },

    #[error("player {player} banks {stock} dice, above the limit of {max}")]
    StockOverLimit { player: PlayerId, stock: u32, max: u32 },

    #[error("current player {0} is not an active player")]
    InactiveCurrentPlayer(PlayerId),

    #[error("phase does not match the {active} active players")]
    PhaseMismatch { active: usize },

    #[error("snapshot carries no dice checkpoint to resume from")]
    MissingDiceCheckpoint,
}

/// Rule violations that reject an attack.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttackError {
    #[error("area {0} does not exist")]
    UnknownArea(AreaId),

    #[error("area {area} belongs to {owner}, not to the current player {current}")]
    NotOwner { area: AreaId, owner: PlayerId, current: PlayerId },

    #[error("area {0} already belongs to the current player")]
    FriendlyTarget(AreaId),

    #[error("areas {from} and {to} are not adjacent")]
    NotAdjacent { from: AreaId, to: AreaId },

    #[error("area {area} has {dice} dice; attacking needs at least 2")]
    NotEnoughDice { area: AreaId, dice: u8 },
}

/// Errors returned by the game's mutating operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("illegal attack: {0}")]
    IllegalAttack(#[from] AttackError),

    /// The illegal-state error: any attack or turn end once the game is over.
    #[error("the game is already over")]
    GameAlreadyOver,
}
