//! Move resolution.
//!
//! Attacks, end-of-turn reinforcement and turn rotation. The functions here
//! back `GameState::attack` and `GameState::end_turn`.

pub mod attack;
pub mod phase;
pub mod supply;

pub use attack::{attacker_wins, validate_attack, AttackOutcome};
pub use phase::{next_active, TurnEnd};
pub use supply::{connected_regions, distribute, largest_region, Supply};
