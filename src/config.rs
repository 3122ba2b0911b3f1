use core::time::Duration;

pub const BOARD_SIZE: u8 = 10;
pub const NUM_SHIPS: usize = 10;

/// Port the original console game listened on.
pub const DEFAULT_PORT: u16 = 5555;

/// Longest line accepted from a peer, terminator excluded. Every valid
/// message is well under this.
pub const MAX_LINE_LEN: usize = 64;

/// Per-session knobs chosen at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Ships seeded onto the local board.
    pub ship_count: usize,
    /// Upper bound on a single `recv_line` wait. `None` blocks forever.
    pub recv_timeout: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ship_count: NUM_SHIPS,
            recv_timeout: None,
        }
    }
}
