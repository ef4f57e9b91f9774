//! Position notation.
//!
//! A compact single-line text form of a `Position`, in the spirit of chess
//! FEN. It carries everything that changes during a game; the board and the
//! rules are given separately.
//!
//! Format: `<turn>.<round>.<phase>/<holdings>/<players>`
//!
//! - phase: `p<id>` when player `id` is to move, `w<id>` once `id` has won,
//!   `w-` for a game that ended without a winner;
//! - holdings: `<owner>:<dice>` per area in id order, comma separated;
//! - players: `<status><stock>` per seat in turn order, comma separated,
//!   status `a` (active) or `x` (eliminated).
//!
//! Example: `0.0.p0/0:2,0:2,1:3/a0,a0`.
//!
//! Parsing only checks syntax. Game invariants are checked when the position
//! is turned into a `GameState`.

use crate::board::{GameState, Holding, Phase, Player, PlayerId, PlayerStatus, Position};

/// Errors that can occur while parsing position notation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    #[error("expected 3 sections separated by '/', got {0}")]
    WrongSectionCount(usize),

    #[error("invalid counters '{0}', expected <turn>.<round>.<phase>")]
    InvalidCounters(String),

    #[error("invalid phase '{0}'")]
    InvalidPhase(String),

    #[error("invalid holding entry '{0}'")]
    InvalidHolding(String),

    #[error("invalid player entry '{0}'")]
    InvalidPlayer(String),

    #[error("invalid status character '{0}'")]
    InvalidStatus(char),
}

/// Parses a player id written as a decimal number.
fn parse_player_id(s: &str) -> Option<PlayerId> {
    s.parse::<u8>().ok().map(PlayerId)
}

/// Parses the phase token (e.g. "p0", "w1", "w-").
fn parse_phase(s: &str) -> Result<Phase, NotationError> {
    let invalid = || NotationError::InvalidPhase(s.to_string());
    let mut chars = s.chars();
    let tag = chars.next().ok_or_else(invalid)?;
    let rest = chars.as_str();
    match tag {
        'p' => parse_player_id(rest).map(Phase::AwaitingMove).ok_or_else(invalid),
        'w' if rest == "-" => Ok(Phase::GameOver { winner: None }),
        'w' => parse_player_id(rest)
            .map(|p| Phase::GameOver { winner: Some(p) })
            .ok_or_else(invalid),
        _ => Err(invalid()),
    }
}

/// Parses the counters section (e.g. "12.3.p1").
fn parse_counters(s: &str) -> Result<(u32, u32, Phase), NotationError> {
    let parts: Vec<&str> = s.split('.').collect();
    if parts.len() != 3 {
        return Err(NotationError::InvalidCounters(s.to_string()));
    }
    let turn = parts[0]
        .parse()
        .map_err(|_| NotationError::InvalidCounters(s.to_string()))?;
    let round = parts[1]
        .parse()
        .map_err(|_| NotationError::InvalidCounters(s.to_string()))?;
    let phase = parse_phase(parts[2])?;
    Ok((turn, round, phase))
}

/// Parses the holdings section (comma-separated `owner:dice` entries).
fn parse_holdings(s: &str) -> Result<Vec<Holding>, NotationError> {
    s.split(',')
        .map(|entry| {
            let invalid = || NotationError::InvalidHolding(entry.to_string());
            let (owner, dice) = entry.split_once(':').ok_or_else(invalid)?;
            let owner = parse_player_id(owner).ok_or_else(invalid)?;
            let dice = dice.parse::<u8>().map_err(|_| invalid())?;
            Ok(Holding::new(owner, dice))
        })
        .collect()
}

/// Parses the players section (comma-separated `<status><stock>` entries).
fn parse_players(s: &str) -> Result<Vec<Player>, NotationError> {
    s.split(',')
        .enumerate()
        .map(|(idx, entry)| {
            let invalid = || NotationError::InvalidPlayer(entry.to_string());
            let mut chars = entry.chars();
            let status_char = chars.next().ok_or_else(invalid)?;
            let status = PlayerStatus::from_notation_char(status_char)
                .ok_or(NotationError::InvalidStatus(status_char))?;
            let stock = chars.as_str().parse::<u32>().map_err(|_| invalid())?;
            let id = PlayerId::from_index(idx).ok_or_else(invalid)?;
            Ok(Player { id, status, stock })
        })
        .collect()
}

/// Parses position notation into a `Position`.
pub fn parse_position(s: &str) -> Result<Position, NotationError> {
    let sections: Vec<&str> = s.trim().split('/').collect();
    if sections.len() != 3 {
        return Err(NotationError::WrongSectionCount(sections.len()));
    }

    let (turn, round, phase) = parse_counters(sections[0])?;
    let holdings = parse_holdings(sections[1])?;
    let players = parse_players(sections[2])?;

    Ok(Position {
        holdings,
        players,
        phase,
        turn,
        round,
    })
}

/// Encodes the phase token.
fn encode_phase(phase: Phase) -> String {
    match phase {
        Phase::AwaitingMove(p) => format!("p{}", p.0),
        Phase::GameOver { winner: Some(p) } => format!("w{}", p.0),
        Phase::GameOver { winner: None } => "w-".to_string(),
    }
}

/// Encodes a `Position` into its canonical notation.
pub fn encode_position(position: &Position) -> String {
    let holdings: Vec<String> = position
        .holdings
        .iter()
        .map(|h| format!("{}:{}", h.owner.0, h.dice))
        .collect();
    let players: Vec<String> = position
        .players
        .iter()
        .map(|p| format!("{}{}", p.status.notation_char(), p.stock))
        .collect();

    format!(
        "{}.{}.{}/{}/{}",
        position.turn,
        position.round,
        encode_phase(position.phase),
        holdings.join(","),
        players.join(",")
    )
}

impl<D> GameState<D> {
    /// The current position in notation form.
    pub fn to_notation(&self) -> String {
        encode_position(&self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPENING: &str = "0.0.p0/0:2,0:2,1:3/a0,a0";

    #[test]
    fn parse_opening() {
        let pos = parse_position(OPENING).unwrap();
        assert_eq!(pos.turn, 0);
        assert_eq!(pos.round, 0);
        assert_eq!(pos.phase, Phase::AwaitingMove(PlayerId(0)));
        assert_eq!(pos.holdings.len(), 3);
        assert_eq!(pos.holdings[2], Holding::new(PlayerId(1), 3));
        assert_eq!(pos.players.len(), 2);
        assert_eq!(pos.players[1].id, PlayerId(1));
        assert!(pos.players.iter().all(|p| p.is_active() && p.stock == 0));
    }

    #[test]
    fn encode_is_canonical() {
        let pos = parse_position(OPENING).unwrap();
        assert_eq!(encode_position(&pos), OPENING);
    }

    #[test]
    fn game_over_forms() {
        let pos = parse_position("14.4.w1/1:1,1:3/x0,a7").unwrap();
        assert_eq!(pos.phase, Phase::GameOver { winner: Some(PlayerId(1)) });
        assert_eq!(pos.players[0].status, PlayerStatus::Eliminated);
        assert_eq!(pos.players[1].stock, 7);
        assert_eq!(encode_position(&pos), "14.4.w1/1:1,1:3/x0,a7");

        let pos = parse_position("3.1.w-/0:1/x0").unwrap();
        assert_eq!(pos.phase, Phase::GameOver { winner: None });
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert!(parse_position(&format!("  {OPENING}\n")).is_ok());
    }

    #[test]
    fn rejects_wrong_section_count() {
        assert_eq!(
            parse_position("0.0.p0/0:1"),
            Err(NotationError::WrongSectionCount(2))
        );
    }

    #[test]
    fn rejects_bad_counters() {
        assert!(matches!(
            parse_position("0.p0/0:1/a0"),
            Err(NotationError::InvalidCounters(_))
        ));
        assert!(matches!(
            parse_position("x.0.p0/0:1/a0"),
            Err(NotationError::InvalidCounters(_))
        ));
    }

    #[test]
    fn rejects_bad_phase() {
        assert_eq!(
            parse_position("0.0.q0/0:1/a0"),
            Err(NotationError::InvalidPhase("q0".to_string()))
        );
        assert!(matches!(
            parse_position("0.0.p/0:1/a0"),
            Err(NotationError::InvalidPhase(_))
        ));
    }

    #[test]
    fn rejects_bad_holdings() {
        assert_eq!(
            parse_position("0.0.p0/0:1,02/a0"),
            Err(NotationError::InvalidHolding("02".to_string()))
        );
        assert!(matches!(
            parse_position("0.0.p0/0:x/a0"),
            Err(NotationError::InvalidHolding(_))
        ));
        assert!(matches!(
            parse_position("0.0.p0//a0"),
            Err(NotationError::InvalidHolding(_))
        ));
    }

    #[test]
    fn rejects_bad_players() {
        assert_eq!(
            parse_position("0.0.p0/0:1/z0"),
            Err(NotationError::InvalidStatus('z'))
        );
        assert!(matches!(
            parse_position("0.0.p0/0:1/a"),
            Err(NotationError::InvalidPlayer(_))
        ));
    }
}
