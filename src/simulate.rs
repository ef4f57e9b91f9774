//! Match loop and batch simulation.
//!
//! `play_match` drives one game with a set of agents; `run_simulation` deals
//! and plays many independent games on a shared board, optionally on a
//! rayon pool, and collects one `MatchRecord` per game.

use std::fmt;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::agent::{Agent, RandomAgent};
use crate::board::{Board, GameState, PlayerId};
use crate::dice::DiceSource;
use crate::error::SetupError;
use crate::rules::Rules;
use crate::setup::random_game;

/// Settings for a batch of simulated games.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Number of games to play.
    pub num_games: usize,
    /// Seats per game.
    pub players: usize,
    /// Turn limit after which a game is abandoned undecided.
    pub max_turns: u32,
    /// Chance that a random agent ends its turn before each attack.
    pub pass_chance: f64,
    /// Number of parallel threads for concurrent games.
    pub threads: usize,
    /// Random seed (0 = use entropy).
    pub seed: u64,
    /// Suppress per-game progress output.
    pub quiet: bool,
    pub rules: Rules,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            num_games: 10,
            players: 4,
            max_turns: 2000,
            pass_chance: RandomAgent::DEFAULT_PASS_CHANCE,
            threads: 4,
            seed: 0,
            quiet: false,
            rules: Rules::default(),
        }
    }
}

/// Errors that stop a simulation run.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("invalid game setup: {0}")]
    Setup(#[from] SetupError),

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// How a single match went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchOutcome {
    pub winner: Option<PlayerId>,
    pub turns: u32,
    pub rounds: u32,
    pub attacks: u32,
    pub conquests: u32,
    /// Attacks the engine refused; each one ended the agent's turn.
    pub rejected: u32,
    /// Players in order of elimination, with the turn it happened on.
    pub eliminations: Vec<(PlayerId, u32)>,
    /// True if the turn limit was hit before the game was decided.
    pub truncated: bool,
}

/// One line of simulation output.
#[derive(Debug, Clone, Serialize)]
pub struct MatchRecord {
    pub game_id: usize,
    pub seed: u64,
    #[serde(flatten)]
    pub outcome: MatchOutcome,
    /// Final areas held per player.
    pub final_areas: Vec<usize>,
    /// Final dice held per player.
    pub final_dice: Vec<u32>,
    /// Final position in notation form.
    pub final_position: String,
}

/// Plays `state` to the end, or until `max_turns` turns have been taken.
///
/// `agents[i]` plays for `PlayerId(i)`; a seat without an agent never
/// attacks.
pub fn play_match<D, A>(state: &mut GameState<D>, agents: &mut [A], max_turns: u32) -> MatchOutcome
where
    D: DiceSource,
    A: Agent,
{
    let mut outcome = MatchOutcome {
        winner: None,
        turns: 0,
        rounds: 0,
        attacks: 0,
        conquests: 0,
        rejected: 0,
        eliminations: Vec::new(),
        truncated: false,
    };

    while let Some(player) = state.current_player() {
        if state.turn() >= max_turns {
            outcome.truncated = true;
            break;
        }

        if let Some(agent) = agents.get_mut(player.index()) {
            while let Some((from, to)) = agent.choose_attack(state.board(), state.position(), player) {
                match state.attack(from, to) {
                    Ok(result) => {
                        outcome.attacks += 1;
                        if result.is_victory() {
                            outcome.conquests += 1;
                        }
                        if let Some(out) = result.eliminated {
                            outcome.eliminations.push((out, state.turn()));
                        }
                    }
                    Err(e) => {
                        tracing::warn!(player = %player, agent = agent.name(), error = %e, "attack rejected");
                        outcome.rejected += 1;
                        break;
                    }
                }
                if state.is_game_over() {
                    break;
                }
            }
        }

        if state.is_game_over() || state.end_turn().is_err() {
            break;
        }
    }

    outcome.winner = state.winner();
    outcome.turns = state.turn();
    outcome.rounds = state.round();
    outcome
}

/// Deals and plays one game with random agents.
pub fn simulate_game(
    board: Arc<Board>,
    config: &SimulationConfig,
    game_id: usize,
    seed: u64,
) -> Result<MatchRecord, SetupError> {
    let mut state = random_game(board, config.players, config.rules, seed)?;
    let mut agents: Vec<RandomAgent> = (0..config.players)
        .map(|seat| RandomAgent::new(seed.wrapping_add(seat as u64 + 1)).with_pass_chance(config.pass_chance))
        .collect();

    let outcome = play_match(&mut state, &mut agents, config.max_turns);

    let seats = state.players().iter().map(|p| p.id);
    Ok(MatchRecord {
        game_id,
        seed,
        final_areas: seats.clone().map(|p| state.area_count_of(p)).collect(),
        final_dice: seats.map(|p| state.dice_total_of(p)).collect(),
        final_position: state.to_notation(),
        outcome,
    })
}

/// Seed for game `index`: derived from the base seed, or fresh entropy.
fn game_seed(config: &SimulationConfig, index: usize) -> u64 {
    if config.seed != 0 {
        config.seed.wrapping_add(index as u64)
    } else {
        rand::random()
    }
}

fn log_game(config: &SimulationConfig, done: usize, record: &MatchRecord, started: Instant) {
    if config.quiet {
        return;
    }
    let result = match record.outcome.winner {
        Some(w) => format!("{w} wins"),
        None => "undecided".to_string(),
    };
    tracing::info!(
        "Game {}/{}: {} after {} turns ({:.2}s)",
        done,
        config.num_games,
        result,
        record.outcome.turns,
        started.elapsed().as_secs_f64()
    );
}

/// Plays `config.num_games` games on `board`.
///
/// Records come back in game order. When `config.threads > 1`, games are
/// played concurrently using rayon.
pub fn run_simulation(board: Arc<Board>, config: &SimulationConfig) -> Result<Vec<MatchRecord>, SimulationError> {
    if config.threads > 1 {
        run_parallel(board, config)
    } else {
        run_sequential(board, config)
    }
}

fn run_sequential(board: Arc<Board>, config: &SimulationConfig) -> Result<Vec<MatchRecord>, SimulationError> {
    let mut records = Vec::with_capacity(config.num_games);
    for i in 0..config.num_games {
        let started = Instant::now();
        let record = simulate_game(board.clone(), config, i, game_seed(config, i))?;
        log_game(config, i + 1, &record, started);
        records.push(record);
    }
    Ok(records)
}

fn run_parallel(board: Arc<Board>, config: &SimulationConfig) -> Result<Vec<MatchRecord>, SimulationError> {
    use rayon::prelude::*;

    let completed = AtomicUsize::new(0);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;

    let records = pool.install(|| {
        (0..config.num_games)
            .into_par_iter()
            .map(|i| -> Result<MatchRecord, SetupError> {
                let started = Instant::now();
                let record = simulate_game(board.clone(), config, i, game_seed(config, i))?;
                let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                log_game(config, done, &record, started);
                Ok(record)
            })
            .collect::<Result<Vec<_>, SetupError>>()
    })?;
    Ok(records)
}

/// Writes match records as JSONL (one JSON object per line).
pub fn write_jsonl<W: Write>(records: &[MatchRecord], out: &mut W) -> std::io::Result<()> {
    for record in records {
        serde_json::to_writer(&mut *out, record)?;
        writeln!(out)?;
    }
    out.flush()
}

/// Aggregate figures over a batch of matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub games: usize,
    /// Wins per seat.
    pub wins: Vec<usize>,
    pub undecided: usize,
    pub avg_turns: f64,
    pub avg_attacks: f64,
}

impl Summary {
    pub fn from_records(records: &[MatchRecord], players: usize) -> Summary {
        let mut wins = vec![0usize; players];
        let mut undecided = 0;
        let mut turns = 0u64;
        let mut attacks = 0u64;
        for record in records {
            match record.outcome.winner {
                Some(w) => {
                    if let Some(count) = wins.get_mut(w.index()) {
                        *count += 1;
                    }
                }
                None => undecided += 1,
            }
            turns += u64::from(record.outcome.turns);
            attacks += u64::from(record.outcome.attacks);
        }
        let games = records.len();
        let n = games.max(1) as f64;
        Summary {
            games,
            wins,
            undecided,
            avg_turns: turns as f64 / n,
            avg_attacks: attacks as f64 / n,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Simulation Summary ===")?;
        writeln!(f, "Games: {}", self.games)?;
        writeln!(f, "Avg turns/game: {:.1}", self.avg_turns)?;
        writeln!(f, "Avg attacks/game: {:.1}", self.avg_attacks)?;
        writeln!(f, "Undecided: {}", self.undecided)?;
        writeln!(f, "Win distribution:")?;
        for (seat, &count) in self.wins.iter().enumerate() {
            let pct = 100.0 * count as f64 / self.games.max(1) as f64;
            writeln!(f, "  P{seat}: {count} ({pct:.1}%)")?;
        }
        Ok(())
    }
}
