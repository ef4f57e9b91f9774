//! Turn rotation and game-over detection.
//!
//! Ending a turn reinforces the current player and hands the move to the next
//! active seat. Passing the last seat completes a round.

use serde::{Deserialize, Serialize};

use crate::board::{GameState, Phase, Player, PlayerId, Position};
use crate::dice::DiceSource;
use crate::error::GameError;
use crate::history::Step;

use super::supply::{reinforce, Supply};

/// Result of `GameState::end_turn`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnEnd {
    pub supply: Supply,
    /// Phase after the turn passed on.
    pub phase: Phase,
    /// True if the rotation wrapped past the last seat.
    pub round_complete: bool,
}

/// Next active seat strictly after `after`, wrapping around.
///
/// Returns `after` itself if it is the only active player, `None` if nobody
/// is active.
pub fn next_active(players: &[Player], after: PlayerId) -> Option<PlayerId> {
    let n = players.len();
    if n == 0 {
        return None;
    }
    let start = after.index();
    (1..=n)
        .map(|step| &players[(start + step) % n])
        .find(|p| p.is_active())
        .map(|p| p.id)
}

/// Moves the position to GameOver if at most one player is still active.
///
/// Returns true if the game is (now) over.
pub(crate) fn conclude_if_decided(position: &mut Position) -> bool {
    if position.phase.is_game_over() {
        return true;
    }
    let (first, contested) = {
        let mut active = position.active_players();
        (active.next(), active.next().is_some())
    };
    if contested {
        return false;
    }
    position.phase = Phase::GameOver { winner: first };
    true
}

pub(crate) fn end_turn<D: DiceSource>(state: &mut GameState<D>) -> Result<TurnEnd, GameError> {
    let current = match state.position.phase {
        Phase::AwaitingMove(p) => p,
        Phase::GameOver { .. } => return Err(GameError::GameAlreadyOver),
    };

    let supply = reinforce(&state.board, &state.rules, &mut state.position, current);
    state.history.push(Step::Supply(supply.clone()));

    let position = &mut state.position;
    position.turn += 1;

    let mut round_complete = false;
    if !conclude_if_decided(position) {
        let next = next_active(&position.players, current).unwrap_or(current);
        if next <= current {
            position.round += 1;
            round_complete = true;
        }
        position.phase = Phase::AwaitingMove(next);
    }

    tracing::debug!(
        player = %current,
        turn = position.turn,
        round = position.round,
        granted = supply.granted,
        next = ?position.phase.current_player(),
        "turn ended"
    );

    let phase = position.phase;
    state.debug_assert_invariants();
    Ok(TurnEnd {
        supply,
        phase,
        round_complete,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::board::{AreaId, Board, PlayerStatus};
    use crate::dice::ScriptedDice;
    use crate::protocol::notation::parse_position;
    use crate::rules::Rules;

    fn ring4() -> Arc<Board> {
        let pairs: Vec<_> = (0..4).map(|i| (AreaId(i), AreaId((i + 1) % 4))).collect();
        Arc::new(Board::build(4, &pairs).unwrap())
    }

    fn game(notation: &str) -> GameState<ScriptedDice> {
        let position = parse_position(notation).unwrap();
        GameState::from_position(ring4(), position, Rules::default(), ScriptedDice::default()).unwrap()
    }

    fn roster(statuses: &[PlayerStatus]) -> Vec<Player> {
        statuses
            .iter()
            .enumerate()
            .map(|(i, &status)| Player { id: PlayerId(i as u8), status, stock: 0 })
            .collect()
    }

    #[test]
    fn next_active_skips_and_wraps() {
        use PlayerStatus::*;
        let players = roster(&[Active, Eliminated, Active, Eliminated]);
        assert_eq!(next_active(&players, PlayerId(0)), Some(PlayerId(2)));
        assert_eq!(next_active(&players, PlayerId(2)), Some(PlayerId(0)));
        assert_eq!(next_active(&players, PlayerId(1)), Some(PlayerId(2)));
        assert_eq!(next_active(&roster(&[Eliminated, Active]), PlayerId(1)), Some(PlayerId(1)));
        assert_eq!(next_active(&roster(&[Eliminated, Eliminated]), PlayerId(0)), None);
        assert_eq!(next_active(&[], PlayerId(0)), None);
    }

    #[test]
    fn rotation_visits_each_seat_once_per_round() {
        let mut g = game("0.0.p0/0:1,1:1,2:1,1:1/a0,a0,a0");
        let mut order = Vec::new();
        for _ in 0..6 {
            order.push(g.current_player().unwrap());
            g.end_turn().unwrap();
        }
        let ids: Vec<u8> = order.iter().map(|p| p.0).collect();
        assert_eq!(ids, vec![0, 1, 2, 0, 1, 2]);
        assert_eq!(g.turn(), 6);
        assert_eq!(g.round(), 2);
    }

    #[test]
    fn round_completes_on_wrap() {
        let mut g = game("0.0.p1/0:1,1:1,2:1,1:1/a0,a0,a0");
        let first = g.end_turn().unwrap();
        assert!(!first.round_complete);
        assert_eq!(first.phase, Phase::AwaitingMove(PlayerId(2)));
        let second = g.end_turn().unwrap();
        assert!(second.round_complete);
        assert_eq!(second.phase, Phase::AwaitingMove(PlayerId(0)));
        assert_eq!(g.round(), 1);
    }

    #[test]
    fn eliminated_seats_are_skipped() {
        let mut g = game("0.0.p0/0:1,2:1,0:1,2:1/a0,x0,a0");
        let end = g.end_turn().unwrap();
        assert_eq!(end.phase, Phase::AwaitingMove(PlayerId(2)));
    }

    #[test]
    fn end_turn_reinforces_current_player_only() {
        let mut g = game("0.0.p0/0:1,0:1,1:1,1:1/a0,a0");
        let end = g.end_turn().unwrap();
        assert_eq!(end.supply.player, PlayerId(0));
        assert_eq!(end.supply.granted, 2);
        assert_eq!(g.dice_total_of(PlayerId(0)), 4);
        assert_eq!(g.dice_total_of(PlayerId(1)), 2);
        assert_eq!(g.last_supply(), Some(&end.supply));
        assert_eq!(g.history().len(), 1);
    }

    #[test]
    fn end_turn_after_game_over_fails() {
        let mut g = game("3.1.w1/1:1,1:1,1:1,1:1/x0,a0");
        assert_eq!(g.end_turn(), Err(GameError::GameAlreadyOver));
        assert_eq!(g.turn(), 3);
        assert!(g.history().is_empty());
    }

    #[test]
    fn conclude_leaves_contested_games_alone() {
        let mut pos = parse_position("0.0.p0/0:1,1:1,0:1,1:1/a0,a0").unwrap();
        assert!(!conclude_if_decided(&mut pos));
        assert_eq!(pos.phase, Phase::AwaitingMove(PlayerId(0)));

        pos.players[1].eliminate();
        assert!(conclude_if_decided(&mut pos));
        assert_eq!(pos.phase, Phase::GameOver { winner: Some(PlayerId(0)) });
    }
}
