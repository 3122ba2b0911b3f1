use rand::rngs::SmallRng;
use rand::Rng;

use crate::board::ShotBoard;
use crate::common::Coord;

use super::Player;

/// Fires at a uniformly random cell it has not tried yet.
pub struct AiPlayer {
    rng: SmallRng,
}

impl AiPlayer {
    pub fn new(rng: SmallRng) -> Self {
        Self { rng }
    }
}

impl Player for AiPlayer {
    fn select_target(&mut self, shots: &ShotBoard) -> anyhow::Result<Coord> {
        let open: Vec<Coord> = Coord::all()
            .filter(|c| !shots.already_targeted(*c))
            .collect();
        if open.is_empty() {
            return Err(anyhow::anyhow!("no untried cells left"));
        }
        Ok(open[self.rng.random_range(0..open.len())])
    }
}
