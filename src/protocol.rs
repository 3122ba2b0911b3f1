#![cfg(feature = "std")]
//! Line-oriented wire grammar and protocol-level errors.
//!
//! Exactly three message shapes cross the wire, one per line:
//!
//! * `"<x>,<y>"`: an attack coordinate, both in `0..=9`
//! * `"Hit! Game over."` / `"Missed! Water"`: the attack result
//! * `"Game over"`: unilateral termination announcement

use std::fmt;
use std::str::FromStr;

use crate::common::{Coord, Outcome};

pub const HIT_LINE: &str = "Hit! Game over.";
pub const MISS_LINE: &str = "Missed! Water";
pub const GAME_OVER_LINE: &str = "Game over";

/// One logical protocol message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    Coordinate(Coord),
    Result(Outcome),
    GameOver,
}

impl Message {
    /// Which shape this is, for diagnostics.
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Coordinate(_) => MessageKind::Coordinate,
            Message::Result(_) => MessageKind::Result,
            Message::GameOver => MessageKind::GameOver,
        }
    }

    /// Parse one received line. A single trailing `\r` is tolerated.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        match line {
            HIT_LINE => Ok(Message::Result(Outcome::Hit)),
            MISS_LINE => Ok(Message::Result(Outcome::Miss)),
            GAME_OVER_LINE => Ok(Message::GameOver),
            _ => parse_coord(line).map(Message::Coordinate),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::Coordinate(c) => write!(f, "{}", c),
            Message::Result(Outcome::Hit) => f.write_str(HIT_LINE),
            Message::Result(Outcome::Miss) => f.write_str(MISS_LINE),
            Message::GameOver => f.write_str(GAME_OVER_LINE),
        }
    }
}

impl FromStr for Message {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Message::parse(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Coordinate,
    Result,
    GameOver,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::Coordinate => f.write_str("coordinate"),
            MessageKind::Result => f.write_str("attack result"),
            MessageKind::GameOver => f.write_str("game over"),
        }
    }
}

fn parse_coord(line: &str) -> Result<Coord, ProtocolError> {
    let malformed = || ProtocolError::MalformedMessage {
        line: line.to_string(),
        reason: "expected \"<x>,<y>\", a result or \"Game over\"",
    };
    let out_of_range = || ProtocolError::InvalidCoordinate {
        line: line.to_string(),
    };
    // plain decimal, no sign and no leading zeros
    let canonical = |s: &str| {
        !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) && !(s.len() > 1 && s.starts_with('0'))
    };
    let (xs, ys) = line.split_once(',').ok_or_else(malformed)?;
    if !canonical(xs) || !canonical(ys) {
        return Err(malformed());
    }
    // anything wider than one digit is a well-formed number past the grid
    let (x, y) = match (xs.parse::<usize>(), ys.parse::<usize>()) {
        (Ok(x), Ok(y)) => (x, y),
        _ => return Err(out_of_range()),
    };
    Coord::new(x, y).map_err(|_| out_of_range())
}

/// Failures of the connection or of the turn protocol. All are fatal to the
/// current session except `InvalidInput`, which stays local.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Could not bind, accept or connect.
    ConnectionSetup(String),
    /// Peer went away mid-protocol.
    ConnectionClosed,
    /// Received line does not match the grammar.
    MalformedMessage { line: String, reason: &'static str },
    /// Well-formed coordinate outside the grid.
    InvalidCoordinate { line: String },
    /// Valid message of the wrong shape for the current phase.
    UnexpectedMessage {
        expected: &'static str,
        got: MessageKind,
    },
    /// Peer attacked a cell that was already hit or missed.
    CellAlreadyResolved(Coord),
    /// Bounded receive wait expired.
    Timeout(std::time::Duration),
    /// Operator typed something that is not a coordinate.
    InvalidInput(String),
}

impl ProtocolError {
    /// Errors that mean the stream itself is gone.
    pub fn is_disconnect(&self) -> bool {
        matches!(self, ProtocolError::ConnectionClosed)
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::ConnectionSetup(why) => write!(f, "Connection setup failed: {}", why),
            ProtocolError::ConnectionClosed => write!(f, "Connection closed by peer"),
            ProtocolError::MalformedMessage { line, reason } => {
                write!(f, "Malformed message {:?}: {}", line, reason)
            }
            ProtocolError::InvalidCoordinate { line } => {
                write!(f, "Coordinate {:?} is outside the 10x10 grid", line)
            }
            ProtocolError::UnexpectedMessage { expected, got } => {
                write!(f, "Unexpected {} message, expected {}", got, expected)
            }
            ProtocolError::CellAlreadyResolved(c) => {
                write!(f, "Peer attacked {} which was already resolved", c)
            }
            ProtocolError::Timeout(d) => write!(f, "Receive timeout after {:?}", d),
            ProtocolError::InvalidInput(why) => write!(f, "Invalid input: {}", why),
        }
    }
}

impl std::error::Error for ProtocolError {}
