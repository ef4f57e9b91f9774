//! Game state representation.
//!
//! A `Position` is everything about a game that changes while it is played:
//! who holds each area and with how many dice, the player roster, the phase
//! and the counters. A `GameState` pairs a position with the (shared,
//! immutable) board, the rule set, the dice source and the step history, and
//! is the only way to mutate a position.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::area::{AreaId, PlayerId};
use super::player::{Player, PlayerStatus};
use super::topology::Board;
use crate::dice::{DiceSource, SeededDice};
use crate::error::{GameError, SetupError};
use crate::history::Step;
use crate::resolve::{self, AttackOutcome, Supply, TurnEnd};
use crate::rules::Rules;

/// Owner and dice count of one area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Holding {
    pub owner: PlayerId,
    pub dice: u8,
}

impl Holding {
    pub const fn new(owner: PlayerId, dice: u8) -> Self {
        Holding { owner, dice }
    }
}

/// Where the game stands.
///
/// There is a single playing phase: the current player attacks zero or more
/// times and then ends the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Waiting for the given player to attack or end the turn.
    AwaitingMove(PlayerId),
    /// Terminal. `winner` is the last active player, `None` only if nobody
    /// was left.
    GameOver { winner: Option<PlayerId> },
}

impl Phase {
    pub const fn current_player(self) -> Option<PlayerId> {
        match self {
            Phase::AwaitingMove(p) => Some(p),
            Phase::GameOver { .. } => None,
        }
    }

    pub const fn winner(self) -> Option<PlayerId> {
        match self {
            Phase::AwaitingMove(_) => None,
            Phase::GameOver { winner } => winner,
        }
    }

    pub const fn is_game_over(self) -> bool {
        matches!(self, Phase::GameOver { .. })
    }
}

/// The mutable data of a game, indexed by area and player id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// One entry per board area, indexed by `AreaId`.
    pub holdings: Vec<Holding>,
    /// Players in turn order, indexed by `PlayerId`.
    pub players: Vec<Player>,
    pub phase: Phase,
    /// Completed turns.
    pub turn: u32,
    /// Completed rotations through all players.
    pub round: u32,
}

impl Position {
    /// Builds the opening position for `player_count` players.
    ///
    /// Players that were dealt no area start eliminated. The first active
    /// seat moves first; with fewer than two active players the game is
    /// decided before it starts.
    pub fn opening(player_count: usize, holdings: Vec<Holding>) -> Result<Position, SetupError> {
        if player_count == 0 {
            return Err(SetupError::NoPlayers);
        }
        if player_count > PlayerId::LIMIT {
            return Err(SetupError::TooManyPlayers(player_count));
        }

        let mut owned = vec![0usize; player_count];
        for (idx, h) in holdings.iter().enumerate() {
            match owned.get_mut(h.owner.index()) {
                Some(count) => *count += 1,
                None => {
                    return Err(SetupError::UnknownOwner {
                        area: AreaId(idx as u16),
                        owner: h.owner,
                    })
                }
            }
        }

        let players: Vec<Player> = owned
            .iter()
            .enumerate()
            .map(|(idx, &count)| {
                let mut player = Player::new(PlayerId(idx as u8));
                if count == 0 {
                    player.eliminate();
                }
                player
            })
            .collect();

        let first = players.iter().find(|p| p.is_active()).map_or(PlayerId(0), |p| p.id);
        let mut position = Position {
            holdings,
            players,
            phase: Phase::AwaitingMove(first),
            turn: 0,
            round: 0,
        };
        resolve::phase::conclude_if_decided(&mut position);
        Ok(position)
    }

    /// Ids of active players in turn order.
    pub fn active_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.iter().filter(|p| p.is_active()).map(|p| p.id)
    }

    /// Areas owned by a player, ascending.
    pub fn areas_of(&self, player: PlayerId) -> Vec<AreaId> {
        self.holdings
            .iter()
            .enumerate()
            .filter(|(_, h)| h.owner == player)
            .map(|(idx, _)| AreaId(idx as u16))
            .collect()
    }

    pub fn area_count_of(&self, player: PlayerId) -> usize {
        self.holdings.iter().filter(|h| h.owner == player).count()
    }

    /// Total dice on a player's areas.
    pub fn dice_total_of(&self, player: PlayerId) -> u32 {
        self.holdings
            .iter()
            .filter(|h| h.owner == player)
            .map(|h| u32::from(h.dice))
            .sum()
    }

    /// Checks every game invariant against the board and rules.
    ///
    /// Returns the first violation found.
    pub fn validate(&self, board: &Board, rules: &Rules) -> Result<(), SetupError> {
        rules.validate()?;

        if self.players.is_empty() {
            return Err(SetupError::NoPlayers);
        }
        if self.players.len() > PlayerId::LIMIT {
            return Err(SetupError::TooManyPlayers(self.players.len()));
        }
        for (index, player) in self.players.iter().enumerate() {
            if player.id.index() != index {
                return Err(SetupError::PlayerOutOfOrder { index, id: player.id });
            }
        }

        if self.holdings.len() != board.area_count() {
            return Err(SetupError::AssignmentLength {
                expected: board.area_count(),
                got: self.holdings.len(),
            });
        }

        let mut owned = vec![0usize; self.players.len()];
        for (idx, h) in self.holdings.iter().enumerate() {
            let area = AreaId(idx as u16);
            match owned.get_mut(h.owner.index()) {
                Some(count) => *count += 1,
                None => return Err(SetupError::UnknownOwner { area, owner: h.owner }),
            }
            if h.dice == 0 || h.dice > rules.max_dice {
                return Err(SetupError::DiceOutOfRange {
                    area,
                    dice: h.dice,
                    max: rules.max_dice,
                });
            }
        }

        for (player, &areas) in self.players.iter().zip(&owned) {
            let should_be_active = areas > 0;
            if player.is_active() != should_be_active {
                return Err(SetupError::StatusMismatch { player: player.id, areas });
            }
            if player.stock > rules.max_stock {
                return Err(SetupError::StockOverLimit {
                    player: player.id,
                    stock: player.stock,
                    max: rules.max_stock,
                });
            }
        }

        let active: Vec<PlayerId> = self.active_players().collect();
        match self.phase {
            Phase::AwaitingMove(current) => {
                let is_active = self
                    .players
                    .get(current.index())
                    .is_some_and(|p| p.status == PlayerStatus::Active);
                if !is_active {
                    return Err(SetupError::InactiveCurrentPlayer(current));
                }
                if active.len() < 2 {
                    return Err(SetupError::PhaseMismatch { active: active.len() });
                }
            }
            Phase::GameOver { winner } => {
                if active.len() > 1 || winner != active.first().copied() {
                    return Err(SetupError::PhaseMismatch { active: active.len() });
                }
            }
        }
        Ok(())
    }
}

/// A game session: board, rules, position, dice source and history.
///
/// Mutated only through [`GameState::attack`] and [`GameState::end_turn`];
/// both are all-or-nothing and leave the invariants intact.
#[derive(Debug, Clone)]
pub struct GameState<D = SeededDice> {
    pub(crate) board: Arc<Board>,
    pub(crate) rules: Rules,
    pub(crate) position: Position,
    pub(crate) history: Vec<Step>,
    pub(crate) dice: D,
}

impl<D: DiceSource> GameState<D> {
    /// Starts a new game.
    ///
    /// `holdings` gives the initial owner and dice of every area in id order.
    pub fn new(
        board: Arc<Board>,
        player_count: usize,
        holdings: Vec<Holding>,
        rules: Rules,
        dice: D,
    ) -> Result<Self, SetupError> {
        let position = Position::opening(player_count, holdings)?;
        GameState::from_position(board, position, rules, dice)
    }

    /// Resumes a game from an arbitrary position, validating it first.
    pub fn from_position(
        board: Arc<Board>,
        position: Position,
        rules: Rules,
        dice: D,
    ) -> Result<Self, SetupError> {
        position.validate(&board, &rules)?;
        tracing::debug!(
            areas = board.area_count(),
            players = position.players.len(),
            phase = ?position.phase,
            "game state ready"
        );
        Ok(GameState {
            board,
            rules,
            position,
            history: Vec::new(),
            dice,
        })
    }

    /// Attacks `to` from `from` on behalf of the current player.
    pub fn attack(&mut self, from: AreaId, to: AreaId) -> Result<AttackOutcome, GameError> {
        resolve::attack::attack(self, from, to)
    }

    /// Ends the current player's turn: reinforces, then passes the turn on.
    pub fn end_turn(&mut self) -> Result<TurnEnd, GameError> {
        resolve::phase::end_turn(self)
    }

    /// Mutable access to the dice source, e.g. to extend a script.
    pub fn dice_mut(&mut self) -> &mut D {
        &mut self.dice
    }
}

impl<D> GameState<D> {
    pub fn board(&self) -> &Arc<Board> {
        &self.board
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn holdings(&self) -> &[Holding] {
        &self.position.holdings
    }

    pub fn owner_of(&self, area: AreaId) -> Option<PlayerId> {
        self.position.holdings.get(area.index()).map(|h| h.owner)
    }

    pub fn dice_of(&self, area: AreaId) -> Option<u8> {
        self.position.holdings.get(area.index()).map(|h| h.dice)
    }

    pub fn players(&self) -> &[Player] {
        &self.position.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.position.players.get(id.index())
    }

    pub fn active_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.position.active_players()
    }

    /// The player to move, `None` once the game is over.
    pub fn current_player(&self) -> Option<PlayerId> {
        self.position.phase.current_player()
    }

    pub fn phase(&self) -> Phase {
        self.position.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.position.phase.is_game_over()
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.position.phase.winner()
    }

    pub fn turn(&self) -> u32 {
        self.position.turn
    }

    pub fn round(&self) -> u32 {
        self.position.round
    }

    pub fn areas_of(&self, player: PlayerId) -> Vec<AreaId> {
        self.position.areas_of(player)
    }

    pub fn area_count_of(&self, player: PlayerId) -> usize {
        self.position.area_count_of(player)
    }

    pub fn dice_total_of(&self, player: PlayerId) -> u32 {
        self.position.dice_total_of(player)
    }

    /// Size of the player's largest connected group of areas.
    pub fn largest_region_of(&self, player: PlayerId) -> usize {
        resolve::supply::largest_region(&self.board, &self.position.holdings, player)
    }

    /// All connected groups of the player's areas.
    pub fn regions_of(&self, player: PlayerId) -> Vec<Vec<AreaId>> {
        resolve::supply::connected_regions(&self.board, &self.position.holdings, player)
    }

    /// Every attack and supply so far, oldest first.
    ///
    /// The log grows for the whole session; long-lived sessions should drain
    /// it with [`GameState::take_history`].
    pub fn history(&self) -> &[Step] {
        &self.history
    }

    /// Removes and returns the recorded steps, leaving the log empty.
    pub fn take_history(&mut self) -> Vec<Step> {
        std::mem::take(&mut self.history)
    }

    pub fn last_attack(&self) -> Option<&AttackOutcome> {
        self.history.iter().rev().find_map(|step| match step {
            Step::Attack(outcome) => Some(outcome),
            Step::Supply(_) => None,
        })
    }

    pub fn last_supply(&self) -> Option<&Supply> {
        self.history.iter().rev().find_map(|step| match step {
            Step::Supply(supply) => Some(supply),
            Step::Attack(_) => None,
        })
    }

    pub fn dice(&self) -> &D {
        &self.dice
    }

    /// Checks every game invariant; a failure means an engine defect.
    pub fn check_invariants(&self) -> Result<(), SetupError> {
        self.position.validate(&self.board, &self.rules)
    }

    #[inline]
    pub(crate) fn debug_assert_invariants(&self) {
        if cfg!(debug_assertions) {
            if let Err(e) = self.check_invariants() {
                panic!("game invariant violated: {e}");
            }
        }
    }
}
