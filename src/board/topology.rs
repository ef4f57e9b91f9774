//! Board topology: the adjacency graph between areas.
//!
//! A `Board` is built once per map from a list of undirected adjacency pairs
//! and never changes afterwards. Neighbour lists are stored in one flat vector
//! sorted by source area, with a `(start, end)` offset per area, so a lookup
//! is a slice borrow and `is_adjacent` is a binary search.
//!
//! Boards are validated on construction: every pair must name known areas,
//! every area must have at least one neighbour and the whole graph must be
//! connected.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::area::AreaId;

/// Errors that make a topology unusable as a board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyError {
    #[error("board has no areas")]
    Empty,

    #[error("board has {0} areas, more than the supported {limit}", limit = AreaId::LIMIT)]
    TooManyAreas(usize),

    #[error("adjacency references unknown area {area} (board has {count} areas)")]
    UnknownArea { area: AreaId, count: usize },

    #[error("area {0} is listed as adjacent to itself")]
    SelfAdjacent(AreaId),

    #[error("area {0} has no neighbours")]
    Isolated(AreaId),

    #[error("board is not connected: only {reachable} of {total} areas reachable from {start}", start = AreaId(0))]
    Disconnected { reachable: usize, total: usize },
}

/// Serializable description of a board: area count plus undirected edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSpec {
    pub areas: usize,
    pub adjacency: Vec<(AreaId, AreaId)>,
}

/// Immutable adjacency graph of a map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BoardSpec", into = "BoardSpec")]
pub struct Board {
    /// Neighbour ids of every area, concatenated in area order.
    neighbors: Vec<AreaId>,
    /// `(start, end)` range into `neighbors` for each area.
    offsets: Vec<(u32, u32)>,
}

impl Board {
    /// Builds a board with `area_count` areas and the given undirected edges.
    ///
    /// Each pair may be listed in either or both orientations; duplicates are
    /// merged.
    pub fn build(area_count: usize, adjacency: &[(AreaId, AreaId)]) -> Result<Board, TopologyError> {
        if area_count == 0 {
            return Err(TopologyError::Empty);
        }
        if area_count > AreaId::LIMIT {
            return Err(TopologyError::TooManyAreas(area_count));
        }

        let mut lists: Vec<Vec<AreaId>> = vec![Vec::new(); area_count];
        for &(a, b) in adjacency {
            for area in [a, b] {
                if area.index() >= area_count {
                    return Err(TopologyError::UnknownArea { area, count: area_count });
                }
            }
            if a == b {
                return Err(TopologyError::SelfAdjacent(a));
            }
            lists[a.index()].push(b);
            lists[b.index()].push(a);
        }

        let mut neighbors = Vec::with_capacity(adjacency.len() * 2);
        let mut offsets = Vec::with_capacity(area_count);
        for (idx, list) in lists.iter_mut().enumerate() {
            list.sort_unstable();
            list.dedup();
            if list.is_empty() {
                return Err(TopologyError::Isolated(AreaId(idx as u16)));
            }
            let start = neighbors.len() as u32;
            neighbors.extend_from_slice(list);
            offsets.push((start, neighbors.len() as u32));
        }

        let board = Board { neighbors, offsets };
        let reachable = board.reachable_from(AreaId(0));
        if reachable != area_count {
            return Err(TopologyError::Disconnected { reachable, total: area_count });
        }
        Ok(board)
    }

    /// Builds a `width` x `height` lattice where each cell touches its
    /// orthogonal neighbours. Area ids run row by row.
    ///
    /// Handy as a fixture for tests and simulations.
    pub fn grid(width: u16, height: u16) -> Result<Board, TopologyError> {
        let (w, h) = (usize::from(width), usize::from(height));
        let count = w * h;
        if count > AreaId::LIMIT {
            return Err(TopologyError::TooManyAreas(count));
        }
        let id = |x: usize, y: usize| AreaId((y * w + x) as u16);
        let mut pairs = Vec::new();
        for y in 0..h {
            for x in 0..w {
                if x + 1 < w {
                    pairs.push((id(x, y), id(x + 1, y)));
                }
                if y + 1 < h {
                    pairs.push((id(x, y), id(x, y + 1)));
                }
            }
        }
        Board::build(count, &pairs)
    }

    /// Number of areas on the board.
    pub fn area_count(&self) -> usize {
        self.offsets.len()
    }

    /// Iterates over all area ids in ascending order.
    pub fn areas(&self) -> impl Iterator<Item = AreaId> + '_ {
        (0..self.offsets.len()).map(|idx| AreaId(idx as u16))
    }

    /// Returns true if the id names an area of this board.
    pub fn contains(&self, area: AreaId) -> bool {
        area.index() < self.offsets.len()
    }

    /// Returns the neighbours of an area in ascending order.
    ///
    /// Unknown areas have no neighbours.
    #[inline]
    pub fn neighbors(&self, area: AreaId) -> &[AreaId] {
        match self.offsets.get(area.index()) {
            Some(&(start, end)) => &self.neighbors[start as usize..end as usize],
            None => &[],
        }
    }

    /// Returns true if `a` and `b` share a border.
    #[inline]
    pub fn is_adjacent(&self, a: AreaId, b: AreaId) -> bool {
        self.neighbors(a).binary_search(&b).is_ok()
    }

    /// Iterates over every undirected edge once, as `(low, high)` pairs.
    pub fn edges(&self) -> impl Iterator<Item = (AreaId, AreaId)> + '_ {
        self.areas().flat_map(move |a| {
            self.neighbors(a)
                .iter()
                .filter(move |&&b| a < b)
                .map(move |&b| (a, b))
        })
    }

    /// Counts the areas reachable from `start` (breadth-first).
    fn reachable_from(&self, start: AreaId) -> usize {
        let mut seen = vec![false; self.area_count()];
        let mut queue = VecDeque::from([start]);
        seen[start.index()] = true;
        let mut count = 0;
        while let Some(area) = queue.pop_front() {
            count += 1;
            for &next in self.neighbors(area) {
                if !seen[next.index()] {
                    seen[next.index()] = true;
                    queue.push_back(next);
                }
            }
        }
        count
    }
}

impl TryFrom<BoardSpec> for Board {
    type Error = TopologyError;

    fn try_from(spec: BoardSpec) -> Result<Self, Self::Error> {
        Board::build(spec.areas, &spec.adjacency)
    }
}

impl From<Board> for BoardSpec {
    fn from(board: Board) -> Self {
        BoardSpec {
            areas: board.area_count(),
            adjacency: board.edges().collect(),
        }
    }
}
