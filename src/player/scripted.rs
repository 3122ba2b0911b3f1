use std::collections::VecDeque;

use crate::board::{BoardSnapshot, ShotBoard};
use crate::common::{BoardError, Coord, GameResult, Outcome};

use super::Player;

/// Replays a fixed list of targets and remembers what it was told.
#[derive(Debug, Default)]
pub struct ScriptedPlayer {
    targets: VecDeque<Coord>,
    pub results: Vec<(Coord, Outcome)>,
    pub incoming: Vec<(Coord, Outcome)>,
    pub rejected: Vec<Coord>,
    pub game_over: Option<GameResult>,
}

impl ScriptedPlayer {
    pub fn new<I: IntoIterator<Item = Coord>>(targets: I) -> Self {
        Self {
            targets: targets.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Script from raw `(x, y)` pairs.
    pub fn from_pairs(pairs: &[(usize, usize)]) -> Result<Self, BoardError> {
        let targets = pairs
            .iter()
            .map(|&(x, y)| Coord::new(x, y))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(targets))
    }
}

impl Player for ScriptedPlayer {
    fn select_target(&mut self, _shots: &ShotBoard) -> anyhow::Result<Coord> {
        self.targets
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("scripted player ran out of targets"))
    }

    fn reject_target(&mut self, coord: Coord, _reason: &str) {
        self.rejected.push(coord);
    }

    fn handle_attack_result(&mut self, coord: Coord, outcome: Outcome) {
        self.results.push((coord, outcome));
    }

    fn handle_opponent_attack(&mut self, coord: Coord, outcome: Outcome) {
        self.incoming.push((coord, outcome));
    }

    fn handle_game_over(&mut self, result: GameResult, _own: &BoardSnapshot) {
        self.game_over = Some(result);
    }
}
