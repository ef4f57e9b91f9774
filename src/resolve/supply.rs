//! Connected regions and end-of-turn reinforcement.
//!
//! A player is granted one die per area in their largest connected region.
//! Granted dice plus any banked stock are spread over the player's areas;
//! whatever does not fit is banked up to `Rules::max_stock`.

use serde::{Deserialize, Serialize};

use crate::board::{AreaId, Board, Holding, PlayerId, Position};
use crate::rules::Rules;

/// Record of one reinforcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supply {
    pub player: PlayerId,
    /// Dice granted this turn (largest region size).
    pub granted: u32,
    /// Areas that received dice, with how many, ascending by area.
    pub placements: Vec<(AreaId, u8)>,
    /// Total dice placed, stock included.
    pub placed: u32,
    /// Stock banked after this reinforcement.
    pub stock: u32,
    /// Dice lost to the stock limit.
    pub discarded: u32,
}

/// All connected groups of `player`'s areas.
///
/// Each region is sorted ascending; regions are ordered by their lowest area.
pub fn connected_regions(board: &Board, holdings: &[Holding], player: PlayerId) -> Vec<Vec<AreaId>> {
    let owned = |area: AreaId| holdings.get(area.index()).is_some_and(|h| h.owner == player);

    let mut visited = vec![false; holdings.len()];
    let mut regions = Vec::new();
    let mut stack = Vec::new();

    for start in board.areas() {
        if !owned(start) || visited.get(start.index()).copied().unwrap_or(true) {
            continue;
        }
        visited[start.index()] = true;
        stack.push(start);
        let mut region = Vec::new();

        while let Some(area) = stack.pop() {
            region.push(area);
            for &next in board.neighbors(area) {
                if owned(next) && !visited[next.index()] {
                    visited[next.index()] = true;
                    stack.push(next);
                }
            }
        }

        region.sort_unstable();
        regions.push(region);
    }
    regions
}

/// Size of the largest connected group of `player`'s areas, 0 if none.
pub fn largest_region(board: &Board, holdings: &[Holding], player: PlayerId) -> usize {
    connected_regions(board, holdings, player)
        .iter()
        .map(Vec::len)
        .max()
        .unwrap_or(0)
}

/// Places up to `pool` dice on `player`'s areas, one at a time in ascending
/// area order, wrapping around and skipping areas at `max_dice`.
///
/// Returns the per-area placements; dice that did not fit are not placed.
pub fn distribute(
    holdings: &mut [Holding],
    player: PlayerId,
    pool: u32,
    max_dice: u8,
) -> Vec<(AreaId, u8)> {
    let areas: Vec<usize> = holdings
        .iter()
        .enumerate()
        .filter(|(_, h)| h.owner == player)
        .map(|(idx, _)| idx)
        .collect();
    let mut added = vec![0u8; areas.len()];
    let mut remaining = pool;

    while remaining > 0 {
        let mut progressed = false;
        for (slot, &idx) in areas.iter().enumerate() {
            if remaining == 0 {
                break;
            }
            let holding = &mut holdings[idx];
            if holding.dice < max_dice {
                holding.dice += 1;
                added[slot] += 1;
                remaining -= 1;
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }

    areas
        .iter()
        .zip(added)
        .filter(|&(_, n)| n > 0)
        .map(|(&idx, n)| (AreaId(idx as u16), n))
        .collect()
}

/// Reinforces `player` in place.
pub(crate) fn reinforce(board: &Board, rules: &Rules, position: &mut Position, player: PlayerId) -> Supply {
    let granted = largest_region(board, &position.holdings, player) as u32;
    let banked = position.players[player.index()].stock;
    let pool = granted.saturating_add(banked);

    let placements = distribute(&mut position.holdings, player, pool, rules.max_dice);
    let placed: u32 = placements.iter().map(|&(_, n)| u32::from(n)).sum();

    let leftover = pool - placed;
    let stock = leftover.min(rules.max_stock);
    let discarded = leftover - stock;
    position.players[player.index()].stock = stock;

    tracing::trace!(
        player = %player,
        granted,
        banked,
        placed,
        stock,
        discarded,
        "reinforced"
    );

    Supply {
        player,
        granted,
        placements,
        placed,
        stock,
        discarded,
    }
}
