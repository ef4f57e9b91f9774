//! Property-based tests for the game rules.
//!
//! Random boards are dealt with `setup::random_game` and played by random
//! agents; every step is checked against the rules.

use std::sync::Arc;

use proptest::prelude::*;

use dicewars_engine::agent::{Agent, RandomAgent};
use dicewars_engine::board::{AreaId, Board, GameState, Phase, PlayerId};
use dicewars_engine::dice::DiceSource;
use dicewars_engine::error::GameError;
use dicewars_engine::movegen::legal_attacks;
use dicewars_engine::resolve::{largest_region, next_active};
use dicewars_engine::rules::Rules;
use dicewars_engine::setup::random_game;

/// Checks the position-level invariants every reachable state must hold.
fn assert_consistent(game: &GameState) -> Result<(), TestCaseError> {
    prop_assert!(game.check_invariants().is_ok(), "{:?}", game.check_invariants());

    let max = game.rules().max_dice;
    for h in game.holdings() {
        prop_assert!((1..=max).contains(&h.dice));
        prop_assert!(game.player(h.owner).is_some_and(|p| p.is_active()));
    }

    let owned: usize = game.players().iter().map(|p| game.area_count_of(p.id)).sum();
    prop_assert_eq!(owned, game.board().area_count());
    Ok(())
}

fn dealt(width: u16, height: u16, players: usize, seed: u64) -> GameState {
    let board = Arc::new(Board::grid(width, height).unwrap());
    random_game(board, players, Rules::default(), seed).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Random matches never break an invariant, and each attack and turn end
    /// follows the transfer, rotation and reinforcement rules.
    #[test]
    fn prop_random_matches_follow_rules(
        width in 2u16..6,
        height in 1u16..5,
        players in 2usize..5,
        seed in any::<u64>(),
        pass in 0.0f64..0.6,
    ) {
        let mut game = dealt(width, height, players, seed);
        let mut agents: Vec<RandomAgent> = (0..players as u64)
            .map(|s| RandomAgent::new(seed ^ s).with_pass_chance(pass))
            .collect();
        assert_consistent(&game)?;

        while let Some(player) = game.current_player() {
            if game.turn() >= 400 {
                break;
            }

            while let Some((from, to)) = agents[player.index()].choose_attack(game.board(), game.position(), player) {
                let origin = game.holdings()[from.index()];
                let target = game.holdings()[to.index()];

                let outcome = game.attack(from, to).unwrap();
                prop_assert_eq!(game.dice_of(from), Some(1));
                prop_assert_eq!(outcome.attacker_rolls.len(), usize::from(origin.dice));
                prop_assert_eq!(outcome.defender_rolls.len(), usize::from(target.dice));
                if outcome.attacker_sum() > outcome.defender_sum() {
                    prop_assert_eq!(game.owner_of(to), Some(player));
                    prop_assert_eq!(game.dice_of(to), Some(origin.dice - 1));
                } else {
                    prop_assert_eq!(game.holdings()[to.index()], target);
                }
                if outcome.eliminated.is_some() {
                    prop_assert_eq!(game.area_count_of(target.owner), 0);
                }
                assert_consistent(&game)?;
                if game.is_game_over() {
                    break;
                }
            }
            if game.is_game_over() {
                break;
            }

            let region = largest_region(game.board(), game.holdings(), player) as u32;
            let banked = game.player(player).unwrap().stock;
            let dice_before = game.dice_total_of(player);
            let players_before = game.players().to_vec();

            let end = game.end_turn().unwrap();
            prop_assert_eq!(end.supply.granted, region);
            prop_assert_eq!(end.supply.placed + end.supply.stock + end.supply.discarded, region + banked);
            prop_assert_eq!(game.dice_total_of(player), dice_before + end.supply.placed);
            prop_assert_eq!(end.phase, Phase::AwaitingMove(next_active(&players_before, player).unwrap()));
            assert_consistent(&game)?;
        }

        if let Some(winner) = game.winner() {
            prop_assert_eq!(game.area_count_of(winner), game.board().area_count());
            prop_assert_eq!(game.active_players().count(), 1);
        }
    }

    /// Rejected attacks leave the state exactly as it was, dice stream included.
    #[test]
    fn prop_rejected_attacks_are_no_ops(
        width in 2u16..5,
        height in 2u16..5,
        players in 2usize..4,
        seed in any::<u64>(),
        from in 0u16..30,
        to in 0u16..30,
    ) {
        let mut game = dealt(width, height, players, seed);
        prop_assume!(!game.is_game_over());
        let player = game.current_player().unwrap();
        let (from, to) = (AreaId(from), AreaId(to));
        let legal = legal_attacks(game.board(), game.holdings(), player).contains(&(from, to));

        let before = game.position().clone();
        let checkpoint = game.dice().checkpoint();
        match game.attack(from, to) {
            Ok(_) => prop_assert!(legal),
            Err(GameError::IllegalAttack(_)) => {
                prop_assert!(!legal);
                prop_assert_eq!(game.position(), &before);
                prop_assert_eq!(game.dice().checkpoint(), checkpoint);
                prop_assert!(game.history().is_empty());
            }
            Err(other) => prop_assert!(false, "unexpected error {other}"),
        }
    }

    /// Single-die areas can never attack.
    #[test]
    fn prop_single_die_cannot_attack(
        seed in any::<u64>(),
        players in 2usize..5,
    ) {
        let mut game = dealt(5, 4, players, seed);
        prop_assume!(!game.is_game_over());
        let player = game.current_player().unwrap();
        let weak: Vec<AreaId> = game
            .areas_of(player)
            .into_iter()
            .filter(|&a| game.dice_of(a) == Some(1))
            .collect();
        let before = game.position().clone();
        for from in weak {
            let targets = game.board().neighbors(from).to_vec();
            for to in targets {
                prop_assert!(game.attack(from, to).is_err());
            }
        }
        prop_assert_eq!(game.position(), &before);
    }

    /// Turns rotate through active seats in order, wrapping once per round.
    #[test]
    fn prop_passive_rotation(
        seed in any::<u64>(),
        players in 2usize..7,
        turns in 1u32..40,
    ) {
        let mut game = dealt(4, 4, players, seed);
        prop_assume!(!game.is_game_over());
        let active: Vec<PlayerId> = game.active_players().collect();
        let start = active.iter().position(|&p| Some(p) == game.current_player()).unwrap();

        for t in 0..turns {
            let expected = active[(start + t as usize) % active.len()];
            prop_assert_eq!(game.current_player(), Some(expected));
            game.end_turn().unwrap();
        }
        prop_assert_eq!(game.turn(), turns);
        prop_assert_eq!(game.round(), turns / active.len() as u32);
    }
}
