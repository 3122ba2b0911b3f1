use std::io::{self, BufRead, BufReader, Write};

use crate::board::{BoardSnapshot, ShotBoard};
use crate::common::{Coord, GameResult, Outcome};
use crate::config::BOARD_SIZE;
use crate::protocol::ProtocolError;
use crate::ui;

use super::Player;

/// Interactive console player. Reads targets one axis at a time, 1-based.
pub struct CliPlayer {
    input: Box<dyn BufRead + Send>,
    output: Box<dyn Write + Send>,
}

impl CliPlayer {
    /// Player on the process's stdin and stdout.
    pub fn new() -> Self {
        Self::with_io(Box::new(BufReader::new(io::stdin())), Box::new(io::stdout()))
    }

    pub fn with_io(input: Box<dyn BufRead + Send>, output: Box<dyn Write + Send>) -> Self {
        Self { input, output }
    }

    fn say(&mut self, text: &str) {
        let _ = writeln!(self.output, "{}", text);
        let _ = self.output.flush();
    }

    fn prompt(&mut self, text: &str) -> anyhow::Result<String> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(anyhow::anyhow!("input closed while waiting for a target"));
        }
        Ok(line.trim().to_string())
    }

    fn ask_axis(&mut self, axis: char) -> anyhow::Result<usize> {
        loop {
            let line = self.prompt(&format!(
                "Enter {} coordinate to attack (1-{}): ",
                axis, BOARD_SIZE
            ))?;
            match parse_axis(&line) {
                Ok(v) => return Ok(v),
                Err(e) => self.say(&format!("✗ {}", e)),
            }
        }
    }
}

impl Default for CliPlayer {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse one 1-based axis value into a 0-based index.
pub fn parse_axis(input: &str) -> Result<usize, ProtocolError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ProtocolError::InvalidInput("empty input".to_string()));
    }
    let value: usize = input
        .parse()
        .map_err(|_| ProtocolError::InvalidInput(format!("'{}' is not a number", input)))?;
    if value == 0 || value > BOARD_SIZE as usize {
        return Err(ProtocolError::InvalidInput(format!(
            "{} is out of range, must be 1-{}",
            value, BOARD_SIZE
        )));
    }
    Ok(value - 1)
}

/// Human-facing, 1-based form of a coordinate.
pub fn describe(coord: Coord) -> String {
    format!("X={} Y={}", coord.x() + 1, coord.y() + 1)
}

impl Player for CliPlayer {
    fn select_target(&mut self, shots: &ShotBoard) -> anyhow::Result<Coord> {
        loop {
            let x = self.ask_axis('X')?;
            let y = self.ask_axis('Y')?;
            let coord = Coord::new(x, y)?;
            if shots.already_targeted(coord) {
                self.say(&format!("✗ You already fired at {}. Choose another target.", describe(coord)));
                continue;
            }
            return Ok(coord);
        }
    }

    fn reject_target(&mut self, coord: Coord, reason: &str) {
        self.say(&format!("✗ {} rejected: {}", describe(coord), reason));
    }

    fn show_boards(&mut self, own: &BoardSnapshot, opponent: &BoardSnapshot) {
        self.say("\nYour turn:");
        let view = ui::render_player_view(own, opponent);
        self.say(&view);
    }

    fn handle_attack_result(&mut self, coord: Coord, outcome: Outcome) {
        match outcome {
            Outcome::Hit => self.say(&format!("\n💥 HIT! Your shot at {} sank a ship.", describe(coord))),
            Outcome::Miss => self.say(&format!("\n💦 Missed! Water at {}.", describe(coord))),
        }
    }

    fn handle_opponent_attack(&mut self, coord: Coord, outcome: Outcome) {
        match outcome {
            Outcome::Hit => self.say(&format!("\n⚠️  The opponent hit your ship at {}!", describe(coord))),
            Outcome::Miss => self.say(&format!("\nThe opponent missed at {}.", describe(coord))),
        }
    }

    fn handle_waiting(&mut self) {
        self.say("Waiting for the opponent's attack...");
    }

    fn handle_game_over(&mut self, result: GameResult, own: &BoardSnapshot) {
        match result {
            GameResult::Won => self.say("\n🎉 You won!"),
            GameResult::Lost => {
                self.say("\n💀 You lost, a ship was sunk.");
                let board = ui::render_board("Your board:", own, true);
                self.say(&board);
            }
        }
    }
}
