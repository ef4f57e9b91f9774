//! Board representation and game-state types.
//!
//! Contains the area and player identifiers, the adjacency graph, the
//! player roster and the overall game state.

pub mod area;
pub mod player;
pub mod state;
pub mod topology;

pub use area::{AreaId, PlayerId};
pub use player::{Player, PlayerStatus};
pub use state::{GameState, Holding, Phase, Position};
pub use topology::{Board, BoardSpec, TopologyError};
