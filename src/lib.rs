//! DiceWars rules engine.
//!
//! Board topology, game state, attack resolution, reinforcement and turn
//! rotation for a territory-conquest dice game, plus the notation, snapshot,
//! setup and simulation helpers used by tests and the `simulate` binary.
//!
//! ```
//! use std::sync::Arc;
//! use dicewars_engine::{AreaId, Board, GameState, Holding, PlayerId, Rules, ScriptedDice};
//!
//! let board = Arc::new(Board::build(2, &[(AreaId(0), AreaId(1))]).unwrap());
//! let holdings = vec![Holding::new(PlayerId(0), 3), Holding::new(PlayerId(1), 1)];
//! let mut game = GameState::new(board, 2, holdings, Rules::default(), ScriptedDice::new([6, 6, 6, 1])).unwrap();
//!
//! let outcome = game.attack(AreaId(0), AreaId(1)).unwrap();
//! assert!(outcome.is_victory());
//! assert_eq!(game.winner(), Some(PlayerId(0)));
//! ```

pub mod agent;
pub mod board;
pub mod dice;
pub mod error;
pub mod history;
pub mod movegen;
pub mod protocol;
pub mod resolve;
pub mod rules;
pub mod setup;
pub mod simulate;

pub use agent::{Agent, PassiveAgent, RandomAgent};
pub use board::{AreaId, Board, GameState, Holding, Phase, Player, PlayerId, PlayerStatus, Position};
pub use dice::{DiceCheckpoint, DiceSource, ScriptedDice, SeededDice};
pub use error::{AttackError, GameError, SetupError};
pub use history::Step;
pub use protocol::{encode_position, parse_position, NotationError, Snapshot};
pub use resolve::{AttackOutcome, Supply, TurnEnd};
pub use rules::Rules;
