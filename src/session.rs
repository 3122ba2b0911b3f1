#![cfg(feature = "std")]
//! Per-peer turn protocol: who attacks, who reports, and when the game ends.
//!
//! One [`GameSession`] runs on each side. The initiator opens by attacking,
//! the responder by waiting; from then on the two strictly alternate:
//!
//! ```text
//! MyTurnToAttack ──send x,y──▶ AwaitingMyAttackResult ──Miss──▶ AwaitingOpponentAttack
//!       ▲                               │ Hit                      │ x,y        │ "Game over"
//!       │                               ▼                          ▼            ▼
//!       └────────────Miss───────── ReportingResult ◀───────────────┘        GameOver
//!                                       │ Hit ─────────────────────────────▶ GameOver
//! ```
//!
//! The side whose own board takes a hit always loses.

use crate::board::{Board, ShotBoard};
use crate::common::{Coord, GameResult, Outcome};
use crate::player::Player;
use crate::protocol::{Message, ProtocolError};
use crate::transport::LineChannel;

/// Attempts at picking a fresh target before the local player is given up on.
const MAX_TARGET_ATTEMPTS: usize = 100;

/// Which side of the connection this peer plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Attacks first. The side that dialed.
    Initiator,
    /// Waits for the first attack. The side that accepted.
    Responder,
}

impl Role {
    pub fn initial_phase(self) -> Phase {
        match self {
            Role::Initiator => Phase::MyTurnToAttack,
            Role::Responder => Phase::AwaitingOpponentAttack,
        }
    }
}

/// Protocol state of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    MyTurnToAttack,
    AwaitingMyAttackResult,
    AwaitingOpponentAttack,
    ReportingResult,
    /// Absorbing; nothing is sent or received once here.
    GameOver,
}

pub struct GameSession<C: LineChannel> {
    board: Board,
    shots: ShotBoard,
    role: Role,
    phase: Phase,
    terminated: bool,
    result: Option<GameResult>,
    channel: C,
    pending_target: Option<Coord>,
    pending_report: Option<Outcome>,
    rounds: usize,
}

impl<C: LineChannel> GameSession<C> {
    /// Session over an established channel with an already seeded board.
    pub fn new(role: Role, board: Board, channel: C) -> Self {
        Self {
            board,
            shots: ShotBoard::new(),
            role,
            phase: role.initial_phase(),
            terminated: false,
            result: None,
            channel,
            pending_target: None,
            pending_report: None,
            rounds: 0,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Set once the game is over or a fatal error stopped the session.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// `Some` once the session reached `GameOver`.
    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Our attacks so far and what the peer reported for them.
    pub fn shots(&self) -> &ShotBoard {
        &self.shots
    }

    /// Attacks this side has sent.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Play until the game ends.
    pub async fn run<P: Player + ?Sized>(&mut self, player: &mut P) -> anyhow::Result<GameResult> {
        while self.step(player).await? != Phase::GameOver {}
        self.result
            .ok_or_else(|| anyhow::anyhow!("game over without a result"))
    }

    /// Perform exactly one transition and return the phase it led to.
    ///
    /// Any error is fatal: the session is marked terminated and every later
    /// call fails.
    pub async fn step<P: Player + ?Sized>(&mut self, player: &mut P) -> anyhow::Result<Phase> {
        if self.phase == Phase::GameOver {
            return Ok(Phase::GameOver);
        }
        if self.terminated {
            return Err(anyhow::anyhow!("session was aborted by an earlier error"));
        }
        let next = match self.advance(player).await {
            Ok(next) => next,
            Err(e) => {
                self.terminated = true;
                log::error!("{:?} session aborted in {:?}: {:#}", self.role, self.phase, e);
                return Err(e);
            }
        };
        log::debug!("{:?}: {:?} -> {:?}", self.role, self.phase, next);
        self.phase = next;
        if next == Phase::GameOver {
            self.terminated = true;
        }
        Ok(next)
    }

    async fn advance<P: Player + ?Sized>(&mut self, player: &mut P) -> anyhow::Result<Phase> {
        match self.phase {
            Phase::MyTurnToAttack => {
                player.show_boards(&self.board.snapshot(), &self.shots.snapshot());
                let target = self.choose_target(player)?;
                self.send(Message::Coordinate(target)).await?;
                self.pending_target = Some(target);
                self.rounds += 1;
                Ok(Phase::AwaitingMyAttackResult)
            }
            Phase::AwaitingMyAttackResult => {
                let target = self
                    .pending_target
                    .take()
                    .ok_or_else(|| anyhow::anyhow!("awaiting a result with no attack in flight"))?;
                let outcome = match self.recv().await? {
                    Message::Result(outcome) => outcome,
                    other => {
                        return Err(ProtocolError::UnexpectedMessage {
                            expected: "attack result",
                            got: other.kind(),
                        }
                        .into())
                    }
                };
                self.shots.record(target, outcome)?;
                player.handle_attack_result(target, outcome);
                match outcome {
                    Outcome::Hit => {
                        self.announce_game_over().await;
                        Ok(self.finish(GameResult::Won, player))
                    }
                    Outcome::Miss => {
                        player.handle_waiting();
                        Ok(Phase::AwaitingOpponentAttack)
                    }
                }
            }
            Phase::AwaitingOpponentAttack => match self.recv().await? {
                Message::GameOver => Ok(self.finish(GameResult::Lost, player)),
                Message::Coordinate(coord) => {
                    if self.board.is_resolved(coord) {
                        return Err(ProtocolError::CellAlreadyResolved(coord).into());
                    }
                    let outcome = self.board.apply_attack(coord)?;
                    player.handle_opponent_attack(coord, outcome);
                    self.pending_report = Some(outcome);
                    Ok(Phase::ReportingResult)
                }
                other => Err(ProtocolError::UnexpectedMessage {
                    expected: "coordinate or game over",
                    got: other.kind(),
                }
                .into()),
            },
            Phase::ReportingResult => {
                let outcome = self
                    .pending_report
                    .take()
                    .ok_or_else(|| anyhow::anyhow!("reporting with no attack received"))?;
                self.send(Message::Result(outcome)).await?;
                if self.board.has_any_sunk_ship() {
                    self.announce_game_over().await;
                    Ok(self.finish(GameResult::Lost, player))
                } else {
                    Ok(Phase::MyTurnToAttack)
                }
            }
            Phase::GameOver => Ok(Phase::GameOver),
        }
    }

    fn choose_target<P: Player + ?Sized>(&mut self, player: &mut P) -> anyhow::Result<Coord> {
        for _ in 0..MAX_TARGET_ATTEMPTS {
            let target = player.select_target(&self.shots)?;
            if !self.shots.already_targeted(target) {
                return Ok(target);
            }
            log::warn!("target {} was already attacked, asking again", target);
            player.reject_target(target, "already fired at this cell");
        }
        Err(ProtocolError::InvalidInput(format!(
            "no fresh target after {} attempts",
            MAX_TARGET_ATTEMPTS
        ))
        .into())
    }

    fn finish<P: Player + ?Sized>(&mut self, result: GameResult, player: &mut P) -> Phase {
        log::info!("{:?} game over after {} attacks: {:?}", self.role, self.rounds, result);
        self.result = Some(result);
        player.handle_game_over(result, &self.board.snapshot());
        Phase::GameOver
    }

    /// The closing "Game over" is a courtesy; the peer may already be gone.
    async fn announce_game_over(&mut self) {
        if let Err(e) = self.send(Message::GameOver).await {
            match e.downcast_ref::<ProtocolError>() {
                Some(pe) if pe.is_disconnect() => {
                    log::debug!("peer closed before the game over notice: {}", pe)
                }
                _ => log::warn!("could not send game over notice: {:#}", e),
            }
        }
    }

    async fn send(&mut self, msg: Message) -> anyhow::Result<()> {
        self.channel.send_line(&msg.to_string()).await
    }

    async fn recv(&mut self) -> anyhow::Result<Message> {
        let line = self.channel.recv_line().await?;
        Ok(Message::parse(&line)?)
    }
}
