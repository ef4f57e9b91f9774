//! Attack validation and resolution.
//!
//! Both sides roll one die per die on their area. The attacker wins only with
//! a strictly higher sum; on a win all but one die move into the conquered
//! area, and either way the origin is left with a single die.

use serde::{Deserialize, Serialize};

use crate::board::{AreaId, Board, GameState, Holding, Phase, PlayerId, Position};
use crate::dice::DiceSource;
use crate::error::{AttackError, GameError};
use crate::history::Step;
use crate::rules::TIE_FAVORS_DEFENDER;

use super::phase::conclude_if_decided;

/// Record of one resolved attack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackOutcome {
    pub attacker: PlayerId,
    pub defender: PlayerId,
    pub from: AreaId,
    pub to: AreaId,
    pub attacker_rolls: Vec<u8>,
    pub defender_rolls: Vec<u8>,
    /// Owner of `to` after the attack.
    pub winner: PlayerId,
    /// Set when the defender lost its last area.
    pub eliminated: Option<PlayerId>,
}

impl AttackOutcome {
    pub fn attacker_sum(&self) -> u32 {
        self.attacker_rolls.iter().map(|&d| u32::from(d)).sum()
    }

    pub fn defender_sum(&self) -> u32 {
        self.defender_rolls.iter().map(|&d| u32::from(d)).sum()
    }

    /// True if the attacker conquered the target.
    pub fn is_victory(&self) -> bool {
        self.winner == self.attacker
    }
}

/// Compares roll sums.
pub fn attacker_wins(attacker_sum: u32, defender_sum: u32) -> bool {
    if TIE_FAVORS_DEFENDER {
        attacker_sum > defender_sum
    } else {
        attacker_sum >= defender_sum
    }
}

/// Checks that the current player may attack `to` from `from`.
///
/// Returns the current player on success. Checks run in a fixed order so the
/// reported error is deterministic.
pub fn validate_attack(
    board: &Board,
    position: &Position,
    from: AreaId,
    to: AreaId,
) -> Result<PlayerId, GameError> {
    let current = match position.phase {
        Phase::AwaitingMove(p) => p,
        Phase::GameOver { .. } => return Err(GameError::GameAlreadyOver),
    };

    let origin = position
        .holdings
        .get(from.index())
        .ok_or(AttackError::UnknownArea(from))?;
    let target = position
        .holdings
        .get(to.index())
        .ok_or(AttackError::UnknownArea(to))?;

    if origin.owner != current {
        return Err(AttackError::NotOwner {
            area: from,
            owner: origin.owner,
            current,
        }
        .into());
    }
    if target.owner == current {
        return Err(AttackError::FriendlyTarget(to).into());
    }
    if !board.is_adjacent(from, to) {
        return Err(AttackError::NotAdjacent { from, to }.into());
    }
    if origin.dice < 2 {
        return Err(AttackError::NotEnoughDice {
            area: from,
            dice: origin.dice,
        }
        .into());
    }
    Ok(current)
}

pub(crate) fn attack<D: DiceSource>(
    state: &mut GameState<D>,
    from: AreaId,
    to: AreaId,
) -> Result<AttackOutcome, GameError> {
    let attacker = validate_attack(&state.board, &state.position, from, to)?;

    let origin = state.position.holdings[from.index()];
    let target = state.position.holdings[to.index()];
    let defender = target.owner;

    let attacker_rolls = state.dice.roll(usize::from(origin.dice));
    let defender_rolls = state.dice.roll(usize::from(target.dice));

    let mut outcome = AttackOutcome {
        attacker,
        defender,
        from,
        to,
        attacker_rolls,
        defender_rolls,
        winner: defender,
        eliminated: None,
    };

    let position = &mut state.position;
    position.holdings[from.index()].dice = 1;

    if attacker_wins(outcome.attacker_sum(), outcome.defender_sum()) {
        outcome.winner = attacker;
        position.holdings[to.index()] = Holding::new(attacker, origin.dice - 1);

        if position.area_count_of(defender) == 0 {
            position.players[defender.index()].eliminate();
            outcome.eliminated = Some(defender);
            tracing::info!(player = %defender, by = %attacker, "player eliminated");
            if conclude_if_decided(position) {
                tracing::info!(winner = ?position.phase.winner(), turn = position.turn, "game over");
            }
        }
    }

    tracing::debug!(
        attacker = %attacker,
        from = %from,
        to = %to,
        attack = outcome.attacker_sum(),
        defend = outcome.defender_sum(),
        won = outcome.is_victory(),
        "attack resolved"
    );

    state.history.push(Step::Attack(outcome.clone()));
    state.debug_assert_invariants();
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::dice::ScriptedDice;
    use crate::protocol::notation::parse_position;
    use crate::rules::Rules;

    fn line3() -> Arc<Board> {
        Arc::new(Board::build(3, &[(AreaId(0), AreaId(1)), (AreaId(1), AreaId(2))]).unwrap())
    }

    fn game(notation: &str, rolls: &[u8]) -> GameState<ScriptedDice> {
        let position = parse_position(notation).unwrap();
        GameState::from_position(line3(), position, Rules::default(), ScriptedDice::new(rolls.to_vec()))
            .unwrap()
    }

    #[test]
    fn tie_goes_to_defender() {
        assert!(!attacker_wins(7, 7));
        assert!(attacker_wins(8, 7));
        assert!(!attacker_wins(3, 12));
    }

    #[test]
    fn victory_moves_all_but_one_die() {
        let mut g = game("0.0.p0/0:4,1:2,1:3/a0,a0", &[6, 6, 6, 6, 1, 1]);
        let outcome = g.attack(AreaId(0), AreaId(1)).unwrap();
        assert!(outcome.is_victory());
        assert_eq!(outcome.attacker_rolls.len(), 4);
        assert_eq!(outcome.defender_rolls.len(), 2);
        assert_eq!(outcome.attacker_sum(), 24);
        assert_eq!(g.dice_of(AreaId(0)), Some(1));
        assert_eq!(g.owner_of(AreaId(1)), Some(PlayerId(0)));
        assert_eq!(g.dice_of(AreaId(1)), Some(3));
        assert_eq!(outcome.eliminated, None);
        assert_eq!(g.current_player(), Some(PlayerId(0)));
    }

    #[test]
    fn defeat_keeps_target_and_drains_origin() {
        let mut g = game("0.0.p0/0:3,1:2,1:3/a0,a0", &[1, 1, 1, 6, 6]);
        let outcome = g.attack(AreaId(0), AreaId(1)).unwrap();
        assert!(!outcome.is_victory());
        assert_eq!(outcome.winner, PlayerId(1));
        assert_eq!(g.dice_of(AreaId(0)), Some(1));
        assert_eq!(g.owner_of(AreaId(1)), Some(PlayerId(1)));
        assert_eq!(g.dice_of(AreaId(1)), Some(2));
    }

    #[test]
    fn equal_sums_are_a_defeat() {
        let mut g = game("0.0.p0/0:2,1:2,1:3/a0,a0", &[3, 4, 5, 2]);
        let outcome = g.attack(AreaId(0), AreaId(1)).unwrap();
        assert_eq!(outcome.attacker_sum(), outcome.defender_sum());
        assert!(!outcome.is_victory());
    }

    #[test]
    fn last_area_eliminates_and_ends_game() {
        let mut g = game("0.0.p0/0:1,0:3,1:2/a0,a0", &[6, 6, 6, 1, 1]);
        let outcome = g.attack(AreaId(1), AreaId(2)).unwrap();
        assert_eq!(outcome.eliminated, Some(PlayerId(1)));
        assert!(g.is_game_over());
        assert_eq!(g.winner(), Some(PlayerId(0)));
        assert!(!g.player(PlayerId(1)).unwrap().is_active());
        assert_eq!(g.last_attack(), Some(&outcome));
    }

    #[test]
    fn elimination_with_survivors_continues() {
        let mut g = game("0.0.p0/0:3,1:2,2:3/a0,a0,a0", &[6, 6, 6, 1, 1]);
        let outcome = g.attack(AreaId(0), AreaId(1)).unwrap();
        assert_eq!(outcome.eliminated, Some(PlayerId(1)));
        assert!(!g.is_game_over());
        assert_eq!(g.current_player(), Some(PlayerId(0)));
    }

    #[test]
    fn rejections_leave_state_untouched() {
        let mut g = game("0.0.p0/0:1,0:3,1:2/a0,a0", &[]);
        let before = g.position().clone();
        let cases = [
            (AreaId(9), AreaId(1), GameError::from(AttackError::UnknownArea(AreaId(9)))),
            (AreaId(1), AreaId(9), AttackError::UnknownArea(AreaId(9)).into()),
            (
                AreaId(2),
                AreaId(1),
                AttackError::NotOwner { area: AreaId(2), owner: PlayerId(1), current: PlayerId(0) }.into(),
            ),
            (AreaId(1), AreaId(0), AttackError::FriendlyTarget(AreaId(0)).into()),
            (AreaId(0), AreaId(1), AttackError::FriendlyTarget(AreaId(1)).into()),
            (AreaId(0), AreaId(2), AttackError::NotAdjacent { from: AreaId(0), to: AreaId(2) }.into()),
        ];
        for (from, to, expected) in cases {
            assert_eq!(g.attack(from, to), Err(expected));
        }
        assert_eq!(g.position(), &before);
        assert!(g.history().is_empty());
    }

    #[test]
    fn rejects_non_adjacent_and_single_die() {
        let mut g = game("0.0.p0/0:3,1:2,1:3/a0,a0", &[]);
        assert_eq!(
            g.attack(AreaId(0), AreaId(2)),
            Err(AttackError::NotAdjacent { from: AreaId(0), to: AreaId(2) }.into())
        );
        let mut g = game("0.0.p0/0:1,1:2,1:3/a0,a0", &[]);
        assert_eq!(
            g.attack(AreaId(0), AreaId(1)),
            Err(AttackError::NotEnoughDice { area: AreaId(0), dice: 1 }.into())
        );
    }

    #[test]
    fn no_attacks_after_game_over() {
        let mut g = game("5.2.w0/0:3,0:2,0:3/a0,x0", &[]);
        assert_eq!(g.attack(AreaId(0), AreaId(1)), Err(GameError::GameAlreadyOver));
    }

    #[test]
    fn full_origin_moves_one_less_than_cap() {
        let mut g = game("0.0.p0/0:8,1:8,1:3/a0,a0", &[6, 6, 6, 6, 6, 6, 6, 6, 1, 1, 1, 1, 1, 1, 1, 1]);
        g.attack(AreaId(0), AreaId(1)).unwrap();
        assert_eq!(g.dice_of(AreaId(1)), Some(7));
    }
}
