//! Legal attack generation.
//!
//! Enumerates the attacks a player may launch from a given position. The
//! checks mirror `resolve::validate_attack`, minus the phase.

use rand::Rng;

use crate::board::{AreaId, Board, Holding, PlayerId};

/// All legal `(from, to)` attacks for `player`, ascending by `from` then `to`.
pub fn legal_attacks(board: &Board, holdings: &[Holding], player: PlayerId) -> Vec<(AreaId, AreaId)> {
    let mut attacks = Vec::new();
    for (idx, holding) in holdings.iter().enumerate() {
        if holding.owner != player || holding.dice < 2 {
            continue;
        }
        let from = AreaId(idx as u16);
        for &to in board.neighbors(from) {
            if holdings.get(to.index()).is_some_and(|h| h.owner != player) {
                attacks.push((from, to));
            }
        }
    }
    attacks
}

/// True if `player` has at least one legal attack.
pub fn has_legal_attack(board: &Board, holdings: &[Holding], player: PlayerId) -> bool {
    holdings.iter().enumerate().any(|(idx, h)| {
        h.owner == player
            && h.dice >= 2
            && board
                .neighbors(AreaId(idx as u16))
                .iter()
                .any(|to| holdings.get(to.index()).is_some_and(|t| t.owner != player))
    })
}

/// Picks one legal attack uniformly at random.
pub fn random_attack(
    board: &Board,
    holdings: &[Holding],
    player: PlayerId,
    rng: &mut impl Rng,
) -> Option<(AreaId, AreaId)> {
    let legal = legal_attacks(board, holdings, player);
    if legal.is_empty() {
        return None;
    }
    Some(legal[rng.gen_range(0..legal.len())])
}
