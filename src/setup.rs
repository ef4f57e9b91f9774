//! Random initial deal.
//!
//! Areas are split as evenly as possible between the players, in random
//! positions. Every area starts with one die; then each player in turn drops
//! one die on a random non-full area of theirs until twice the number of
//! areas has been dealt, about three dice per area overall.

use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::board::{Board, GameState, Holding, PlayerId};
use crate::dice::SeededDice;
use crate::error::SetupError;
use crate::rules::Rules;

/// Deals the board to `players` players.
///
/// Returns the holdings in area order, ready for `GameState::new`.
pub fn deal(board: &Board, players: usize, rules: &Rules, rng: &mut impl Rng) -> Result<Vec<Holding>, SetupError> {
    rules.validate()?;
    if players == 0 {
        return Err(SetupError::NoPlayers);
    }
    if players > PlayerId::LIMIT {
        return Err(SetupError::TooManyPlayers(players));
    }

    let area_count = board.area_count();
    let mut seats: Vec<PlayerId> = (0..players).map(|i| PlayerId(i as u8)).collect();

    seats.shuffle(rng);
    let mut owners: Vec<PlayerId> = (0..area_count).map(|a| seats[a % players]).collect();
    owners.shuffle(rng);

    let mut holdings: Vec<Holding> = owners.into_iter().map(|owner| Holding::new(owner, 1)).collect();

    seats.shuffle(rng);
    let mut candidates = Vec::with_capacity(area_count);
    for round in 0..area_count * 2 {
        let seat = seats[round % players];
        candidates.clear();
        candidates.extend(
            holdings
                .iter()
                .enumerate()
                .filter(|(_, h)| h.owner == seat && h.dice < rules.max_dice)
                .map(|(idx, _)| idx),
        );
        if let Some(&idx) = candidates.choose(rng) {
            holdings[idx].dice += 1;
        }
    }

    tracing::debug!(areas = area_count, players, "board dealt");
    Ok(holdings)
}

/// Deals a fresh game from one seed: the deal and the dice stream are both
/// derived from it.
pub fn random_game(board: Arc<Board>, players: usize, rules: Rules, seed: u64) -> Result<GameState, SetupError> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let holdings = deal(&board, players, &rules, &mut rng)?;
    GameState::new(board, players, holdings, rules, SeededDice::new(rng.gen()))
}
