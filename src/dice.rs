//! Dice sources.
//!
//! Every game owns its own `DiceSource`. The default `SeededDice` draws from a
//! ChaCha8 stream so a game can be replayed from its seed and resumed from a
//! checkpoint; `ScriptedDice` replays fixed values for tests.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Number of faces on a die.
pub const DIE_FACES: u8 = 6;

/// Produces dice rolls for attack resolution.
pub trait DiceSource {
    /// Rolls `n` dice, returning values in `1..=DIE_FACES` in roll order.
    fn roll(&mut self, n: usize) -> Vec<u8>;

    /// Returns the position of the stream, if the source can be resumed.
    fn checkpoint(&self) -> Option<DiceCheckpoint> {
        None
    }
}

impl<D: DiceSource + ?Sized> DiceSource for Box<D> {
    fn roll(&mut self, n: usize) -> Vec<u8> {
        (**self).roll(n)
    }

    fn checkpoint(&self) -> Option<DiceCheckpoint> {
        (**self).checkpoint()
    }
}

/// Resumable position of a `SeededDice` stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceCheckpoint {
    pub seed: u64,
    /// Offset into the ChaCha8 key stream, in 32-bit words.
    pub word_pos: u128,
}

/// Deterministic dice from a seeded ChaCha8 generator.
#[derive(Debug, Clone)]
pub struct SeededDice {
    seed: u64,
    rng: ChaCha8Rng,
}

impl SeededDice {
    pub fn new(seed: u64) -> Self {
        SeededDice {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seeds from the operating system's entropy source.
    pub fn from_entropy() -> Self {
        SeededDice::new(rand::random())
    }

    /// Continues a stream exactly where the checkpoint left it.
    pub fn resume(checkpoint: DiceCheckpoint) -> Self {
        let mut dice = SeededDice::new(checkpoint.seed);
        dice.rng.set_word_pos(checkpoint.word_pos);
        dice
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl DiceSource for SeededDice {
    fn roll(&mut self, n: usize) -> Vec<u8> {
        (0..n).map(|_| self.rng.gen_range(1..=DIE_FACES)).collect()
    }

    fn checkpoint(&self) -> Option<DiceCheckpoint> {
        Some(DiceCheckpoint {
            seed: self.seed,
            word_pos: self.rng.get_word_pos(),
        })
    }
}

/// Replays a fixed sequence of die values.
///
/// Intended for tests: an attack consumes the attacker's dice first, then the
/// defender's.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    values: VecDeque<u8>,
}

impl ScriptedDice {
    /// # Panics
    ///
    /// Panics if a value is outside `1..=DIE_FACES`.
    pub fn new(values: impl IntoIterator<Item = u8>) -> Self {
        let values: VecDeque<u8> = values.into_iter().collect();
        assert!(
            values.iter().all(|v| (1..=DIE_FACES).contains(v)),
            "scripted die value out of range: {values:?}"
        );
        ScriptedDice { values }
    }

    /// Appends more values to the script.
    pub fn extend(&mut self, values: impl IntoIterator<Item = u8>) {
        for v in values {
            assert!((1..=DIE_FACES).contains(&v), "scripted die value out of range: {v}");
            self.values.push_back(v);
        }
    }

    /// Number of values not yet consumed.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

impl DiceSource for ScriptedDice {
    /// # Panics
    ///
    /// Panics if the script holds fewer than `n` values.
    fn roll(&mut self, n: usize) -> Vec<u8> {
        assert!(
            n <= self.values.len(),
            "scripted dice exhausted: wanted {n}, have {}",
            self.values.len()
        );
        self.values.drain(..n).collect()
    }
}
