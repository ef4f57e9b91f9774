//! Decision makers.
//!
//! An `Agent` is whatever sits in a seat: a UI relaying a human's clicks, a
//! bot, or a test script. During its turn the match loop asks it for attacks
//! until it answers `None`, which ends the turn.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::board::{AreaId, Board, PlayerId, Position};
use crate::movegen::random_attack;

/// Chooses attacks for one seat.
pub trait Agent {
    /// Returns the next attack for `player`, or `None` to end the turn.
    ///
    /// An illegal answer is rejected by the engine and ends the turn.
    fn choose_attack(&mut self, board: &Board, position: &Position, player: PlayerId) -> Option<(AreaId, AreaId)>;

    /// Label used in logs and match records.
    fn name(&self) -> &str {
        "agent"
    }
}

impl<A: Agent + ?Sized> Agent for Box<A> {
    fn choose_attack(&mut self, board: &Board, position: &Position, player: PlayerId) -> Option<(AreaId, AreaId)> {
        (**self).choose_attack(board, position, player)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Never attacks.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassiveAgent;

impl Agent for PassiveAgent {
    fn choose_attack(&mut self, _: &Board, _: &Position, _: PlayerId) -> Option<(AreaId, AreaId)> {
        None
    }

    fn name(&self) -> &str {
        "passive"
    }
}

/// Picks a uniformly random legal attack, ending the turn with probability
/// `pass_chance` before each pick.
#[derive(Debug, Clone)]
pub struct RandomAgent {
    rng: SmallRng,
    pass_chance: f64,
}

impl RandomAgent {
    pub const DEFAULT_PASS_CHANCE: f64 = 0.2;

    pub fn new(seed: u64) -> Self {
        RandomAgent {
            rng: SmallRng::seed_from_u64(seed),
            pass_chance: Self::DEFAULT_PASS_CHANCE,
        }
    }

    /// Sets the chance of ending the turn early, clamped to `0.0..=1.0`.
    pub fn with_pass_chance(mut self, pass_chance: f64) -> Self {
        self.pass_chance = if pass_chance.is_nan() { 0.0 } else { pass_chance.clamp(0.0, 1.0) };
        self
    }

    pub fn pass_chance(&self) -> f64 {
        self.pass_chance
    }
}

impl Agent for RandomAgent {
    fn choose_attack(&mut self, board: &Board, position: &Position, player: PlayerId) -> Option<(AreaId, AreaId)> {
        if self.rng.gen_bool(self.pass_chance) {
            return None;
        }
        random_attack(board, &position.holdings, player, &mut self.rng)
    }

    fn name(&self) -> &str {
        "random"
    }
}
