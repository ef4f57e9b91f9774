//! Text and JSON forms of a game.
//!
//! `notation` is a compact one-line encoding of a position, handy for tests
//! and logs; `snapshot` is the serde form used to save and resume a game.

pub mod notation;
pub mod snapshot;

pub use notation::{encode_position, parse_position, NotationError};
pub use snapshot::Snapshot;
