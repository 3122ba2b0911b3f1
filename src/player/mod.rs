//! Input and display collaborators for a game session.
//!
//! - AiPlayer: fires at random untried cells
//! - CliPlayer: interactive console player
//! - ScriptedPlayer: replays a fixed list of targets

use crate::board::{BoardSnapshot, ShotBoard};
use crate::common::{Coord, GameResult, Outcome};

/// What a session needs from whoever drives one side of the game.
///
/// Only `select_target` is required; the rest are notifications that a
/// renderer can use.
pub trait Player: Send {
    /// Choose the next cell to attack, given our shots so far.
    fn select_target(&mut self, shots: &ShotBoard) -> anyhow::Result<Coord>;

    /// The last target was refused locally and will be asked for again.
    fn reject_target(&mut self, _coord: Coord, _reason: &str) {}

    /// Called before each of our turns.
    fn show_boards(&mut self, _own: &BoardSnapshot, _opponent: &BoardSnapshot) {}

    /// Peer reported the outcome of our attack.
    fn handle_attack_result(&mut self, _coord: Coord, _outcome: Outcome) {}

    /// Peer attacked us.
    fn handle_opponent_attack(&mut self, _coord: Coord, _outcome: Outcome) {}

    fn handle_waiting(&mut self) {}

    fn handle_game_over(&mut self, _result: GameResult, _own: &BoardSnapshot) {}
}

impl<P: Player + ?Sized> Player for Box<P> {
    fn select_target(&mut self, shots: &ShotBoard) -> anyhow::Result<Coord> {
        (**self).select_target(shots)
    }
    fn reject_target(&mut self, coord: Coord, reason: &str) {
        (**self).reject_target(coord, reason)
    }
    fn show_boards(&mut self, own: &BoardSnapshot, opponent: &BoardSnapshot) {
        (**self).show_boards(own, opponent)
    }
    fn handle_attack_result(&mut self, coord: Coord, outcome: Outcome) {
        (**self).handle_attack_result(coord, outcome)
    }
    fn handle_opponent_attack(&mut self, coord: Coord, outcome: Outcome) {
        (**self).handle_opponent_attack(coord, outcome)
    }
    fn handle_waiting(&mut self) {
        (**self).handle_waiting()
    }
    fn handle_game_over(&mut self, result: GameResult, own: &BoardSnapshot) {
        (**self).handle_game_over(result, own)
    }
}

pub mod ai;
pub mod cli;
pub mod scripted;

pub use ai::AiPlayer;
pub use cli::CliPlayer;
pub use scripted::ScriptedPlayer;
