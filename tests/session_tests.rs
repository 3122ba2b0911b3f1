use broadside::transport::{check_alternation, LineChannel, RecordingTransport, TraceEvent};
use broadside::{
    AiPlayer, Board, Cell, Coord, GameResult, GameSession, InMemoryTransport, Phase,
    ProtocolError, Role, ScriptedPlayer, NUM_SHIPS,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::time::Duration;

fn c(x: usize, y: usize) -> Coord {
    Coord::new(x, y).unwrap()
}

fn board_with_ships(ships: &[(usize, usize)]) -> Board {
    let mut board = Board::new();
    for &(x, y) in ships {
        board.place_ship(c(x, y)).unwrap();
    }
    board
}

fn protocol_error(err: &anyhow::Error) -> &ProtocolError {
    err.downcast_ref::<ProtocolError>()
        .unwrap_or_else(|| panic!("expected ProtocolError, got {:#}", err))
}

#[tokio::test]
async fn test_initial_phase_depends_on_role() {
    let (a, b) = InMemoryTransport::pair();
    let initiator = GameSession::new(Role::Initiator, Board::new(), a);
    let responder = GameSession::new(Role::Responder, Board::new(), b);
    assert_eq!(initiator.phase(), Phase::MyTurnToAttack);
    assert_eq!(responder.phase(), Phase::AwaitingOpponentAttack);
    assert!(!initiator.is_terminated());
    assert_eq!(initiator.result(), None);
}

/// Initiator misses first, then the responder hits the initiator's only
/// ship at (2,2) and wins.
#[tokio::test]
async fn test_scenario_responder_sinks_initiator() -> anyhow::Result<()> {
    let (a, b) = InMemoryTransport::pair();
    let mut initiator = GameSession::new(Role::Initiator, board_with_ships(&[(2, 2)]), a);
    let mut responder = GameSession::new(Role::Responder, board_with_ships(&[(9, 9)]), b);
    let mut p1 = ScriptedPlayer::from_pairs(&[(0, 0)])?;
    let mut p2 = ScriptedPlayer::from_pairs(&[(2, 2)])?;

    let (r1, r2) = tokio::join!(initiator.run(&mut p1), responder.run(&mut p2));
    assert_eq!(r1?, GameResult::Lost);
    assert_eq!(r2?, GameResult::Won);

    assert_eq!(initiator.phase(), Phase::GameOver);
    assert_eq!(responder.phase(), Phase::GameOver);
    assert!(initiator.is_terminated() && responder.is_terminated());
    assert_eq!(initiator.board().cell(c(2, 2)), Cell::Hit);
    assert_eq!(responder.board().cell(c(0, 0)), Cell::Miss);
    assert_eq!(responder.shots().cell(c(2, 2)), Cell::Hit);

    assert_eq!(p1.results, vec![(c(0, 0), broadside::Outcome::Miss)]);
    assert_eq!(p1.incoming, vec![(c(2, 2), broadside::Outcome::Hit)]);
    assert_eq!(p1.game_over, Some(GameResult::Lost));
    assert_eq!(p2.game_over, Some(GameResult::Won));
    Ok(())
}

/// Exact wire trace for an initiator that misses at (0,0) and then loses its
/// ship at (5,5).
#[tokio::test]
async fn test_scenario_initiator_wire_trace() -> anyhow::Result<()> {
    let (a, mut peer) = InMemoryTransport::pair();
    let mut session = GameSession::new(Role::Initiator, board_with_ships(&[(5, 5)]), a);
    let mut player = ScriptedPlayer::from_pairs(&[(0, 0)])?;

    let peer_side = async {
        assert_eq!(peer.recv_line().await?, "0,0");
        peer.send_line("Missed! Water").await?;
        peer.send_line("5,5").await?;
        assert_eq!(peer.recv_line().await?, "Hit! Game over.");
        assert_eq!(peer.recv_line().await?, "Game over");
        anyhow::Ok(())
    };
    let (result, peer_result) = tokio::join!(session.run(&mut player), peer_side);
    peer_result?;
    assert_eq!(result?, GameResult::Lost);
    assert_eq!(session.rounds(), 1);
    Ok(())
}

#[tokio::test]
async fn test_hit_wins_and_announces_game_over() -> anyhow::Result<()> {
    let (a, mut peer) = InMemoryTransport::pair();
    let mut session = GameSession::new(Role::Initiator, board_with_ships(&[(0, 0)]), a);
    let mut player = ScriptedPlayer::from_pairs(&[(3, 7)])?;

    assert_eq!(session.step(&mut player).await?, Phase::AwaitingMyAttackResult);
    assert_eq!(peer.recv_line().await?, "3,7");
    peer.send_line("Hit! Game over.").await?;
    assert_eq!(session.step(&mut player).await?, Phase::GameOver);
    assert_eq!(session.result(), Some(GameResult::Won));
    assert_eq!(peer.recv_line().await?, "Game over");

    // absorbing: no further traffic
    assert_eq!(session.step(&mut player).await?, Phase::GameOver);
    Ok(())
}

#[tokio::test]
async fn test_winner_tolerates_peer_already_gone() -> anyhow::Result<()> {
    let (a, mut peer) = InMemoryTransport::pair();
    let mut session = GameSession::new(Role::Initiator, board_with_ships(&[(0, 0)]), a);
    let mut player = ScriptedPlayer::from_pairs(&[(1, 1)])?;

    session.step(&mut player).await?;
    assert_eq!(peer.recv_line().await?, "1,1");
    peer.send_line("Hit! Game over.").await?;
    drop(peer);
    assert_eq!(session.step(&mut player).await?, Phase::GameOver);
    assert_eq!(session.result(), Some(GameResult::Won));
    Ok(())
}

#[tokio::test]
async fn test_game_over_while_waiting_ends_without_further_reads() -> anyhow::Result<()> {
    let (a, mut peer) = InMemoryTransport::pair();
    let recording = RecordingTransport::new(a);
    let trace = recording.trace();
    let mut session = GameSession::new(Role::Responder, board_with_ships(&[(4, 4)]), recording);
    let mut player = ScriptedPlayer::default();

    peer.send_line("Game over").await?;
    // queued behind the notice; must never be read
    peer.send_line("1,1").await?;

    assert_eq!(session.step(&mut player).await?, Phase::GameOver);
    assert_eq!(session.result(), Some(GameResult::Lost));
    assert_eq!(session.step(&mut player).await?, Phase::GameOver);
    assert_eq!(trace.events()?, vec![TraceEvent::Received("Game over".to_string())]);
    Ok(())
}

#[tokio::test]
async fn test_report_matches_receiver_board() -> anyhow::Result<()> {
    for seed in 0..32u64 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let board = Board::seeded(&mut rng, NUM_SHIPS)?;
        let was_ship = board.cell(c(3, 7)) == Cell::Ship;

        let (a, mut peer) = InMemoryTransport::pair();
        let mut session = GameSession::new(Role::Responder, board, a);
        let mut player = ScriptedPlayer::default();

        peer.send_line("3,7").await?;
        assert_eq!(session.step(&mut player).await?, Phase::ReportingResult);
        let next = session.step(&mut player).await?;
        let report = peer.recv_line().await?;

        assert_eq!(report == "Hit! Game over.", was_ship, "seed {}", seed);
        if was_ship {
            assert_eq!(next, Phase::GameOver);
            assert_eq!(session.result(), Some(GameResult::Lost));
            assert_eq!(peer.recv_line().await?, "Game over");
        } else {
            assert_eq!(report, "Missed! Water");
            assert_eq!(next, Phase::MyTurnToAttack);
        }
    }
    Ok(())
}

#[tokio::test]
async fn test_ai_game_alternates_strictly() -> anyhow::Result<()> {
    for seed in 0..8u64 {
        let mut rng1 = SmallRng::seed_from_u64(seed);
        let mut rng2 = SmallRng::seed_from_u64(seed + 1000);
        let b1 = Board::seeded(&mut rng1, NUM_SHIPS)?;
        let b2 = Board::seeded(&mut rng2, NUM_SHIPS)?;

        let (a, b) = InMemoryTransport::pair();
        let (a, b) = (RecordingTransport::new(a), RecordingTransport::new(b));
        let (trace1, trace2) = (a.trace(), b.trace());

        let mut s1 = GameSession::new(Role::Initiator, b1, a);
        let mut s2 = GameSession::new(Role::Responder, b2, b);
        let mut p1 = AiPlayer::new(rng1);
        let mut p2 = AiPlayer::new(rng2);

        let (r1, r2) = tokio::join!(s1.run(&mut p1), s2.run(&mut p2));
        let (r1, r2) = (r1?, r2?);
        assert_ne!(r1, r2, "exactly one side wins");
        // the loser is always the side whose own board was hit
        let loser_board = if r1 == GameResult::Lost { s1.board() } else { s2.board() };
        assert!(loser_board.has_any_sunk_ship());

        check_alternation(&trace1.events()?)?;
        check_alternation(&trace2.events()?)?;
        // initiator never falls behind the responder
        assert!(s1.rounds() == s2.rounds() || s1.rounds() == s2.rounds() + 1);
    }
    Ok(())
}

#[test]
fn test_alternation_check_flags_double_attack() {
    let trace = vec![
        TraceEvent::Sent("1,1".to_string()),
        TraceEvent::Received("Missed! Water".to_string()),
        TraceEvent::Sent("2,2".to_string()),
        TraceEvent::Sent("3,3".to_string()),
    ];
    assert!(check_alternation(&trace).is_err());
    assert!(check_alternation(&trace[..3]).is_ok());
}

#[tokio::test]
async fn test_repeated_local_target_is_asked_again() -> anyhow::Result<()> {
    let (a, mut peer) = InMemoryTransport::pair();
    let mut session = GameSession::new(Role::Initiator, board_with_ships(&[(9, 9)]), a);
    let mut player = ScriptedPlayer::from_pairs(&[(0, 0), (0, 0), (1, 1)])?;

    session.step(&mut player).await?;
    assert_eq!(peer.recv_line().await?, "0,0");
    peer.send_line("Missed! Water").await?;
    session.step(&mut player).await?;
    peer.send_line("4,4").await?;
    session.step(&mut player).await?;
    session.step(&mut player).await?;
    assert_eq!(peer.recv_line().await?, "Missed! Water");

    assert_eq!(session.step(&mut player).await?, Phase::AwaitingMyAttackResult);
    assert_eq!(peer.recv_line().await?, "1,1");
    assert_eq!(player.rejected, vec![c(0, 0)]);
    Ok(())
}

#[tokio::test]
async fn test_malformed_line_is_fatal() -> anyhow::Result<()> {
    let (a, mut peer) = InMemoryTransport::pair();
    let mut session = GameSession::new(Role::Responder, board_with_ships(&[(0, 0)]), a);
    let mut player = ScriptedPlayer::default();

    peer.send_line("fire at will").await?;
    let err = session.step(&mut player).await.unwrap_err();
    assert!(matches!(protocol_error(&err), ProtocolError::MalformedMessage { .. }));
    assert!(session.is_terminated());
    assert_eq!(session.result(), None);
    assert!(session.step(&mut player).await.is_err());
    Ok(())
}

#[tokio::test]
async fn test_zero_padded_coordinate_is_fatal() -> anyhow::Result<()> {
    let (a, mut peer) = InMemoryTransport::pair();
    let mut session = GameSession::new(Role::Responder, board_with_ships(&[(0, 7)]), a);
    let mut player = ScriptedPlayer::default();

    peer.send_line("00,07").await?;
    let err = session.step(&mut player).await.unwrap_err();
    assert!(matches!(protocol_error(&err), ProtocolError::MalformedMessage { .. }));
    assert_eq!(session.board().cell(c(0, 7)), Cell::Ship);
    Ok(())
}

#[tokio::test]
async fn test_out_of_range_coordinate_is_fatal() -> anyhow::Result<()> {
    let (a, mut peer) = InMemoryTransport::pair();
    let mut session = GameSession::new(Role::Responder, board_with_ships(&[(0, 0)]), a);
    let mut player = ScriptedPlayer::default();

    peer.send_line("10,3").await?;
    let err = session.step(&mut player).await.unwrap_err();
    assert!(matches!(protocol_error(&err), ProtocolError::InvalidCoordinate { .. }));
    Ok(())
}

#[tokio::test]
async fn test_result_when_attack_expected_is_fatal() -> anyhow::Result<()> {
    let (a, mut peer) = InMemoryTransport::pair();
    let mut session = GameSession::new(Role::Responder, board_with_ships(&[(0, 0)]), a);
    let mut player = ScriptedPlayer::default();

    peer.send_line("Missed! Water").await?;
    let err = session.step(&mut player).await.unwrap_err();
    assert!(matches!(
        protocol_error(&err),
        ProtocolError::UnexpectedMessage { .. }
    ));
    Ok(())
}

#[tokio::test]
async fn test_coordinate_when_result_expected_is_fatal() -> anyhow::Result<()> {
    let (a, mut peer) = InMemoryTransport::pair();
    let mut session = GameSession::new(Role::Initiator, board_with_ships(&[(0, 0)]), a);
    let mut player = ScriptedPlayer::from_pairs(&[(2, 2)])?;

    session.step(&mut player).await?;
    peer.recv_line().await?;
    peer.send_line("2,2").await?;
    let err = session.step(&mut player).await.unwrap_err();
    assert!(matches!(
        protocol_error(&err),
        ProtocolError::UnexpectedMessage { .. }
    ));
    Ok(())
}

#[tokio::test]
async fn test_repeated_attack_from_peer_is_fatal() -> anyhow::Result<()> {
    let (a, mut peer) = InMemoryTransport::pair();
    let mut session = GameSession::new(Role::Responder, board_with_ships(&[(9, 9)]), a);
    let mut player = ScriptedPlayer::from_pairs(&[(0, 0)])?;

    peer.send_line("1,1").await?;
    session.step(&mut player).await?;
    session.step(&mut player).await?;
    assert_eq!(peer.recv_line().await?, "Missed! Water");
    session.step(&mut player).await?;
    assert_eq!(peer.recv_line().await?, "0,0");
    peer.send_line("Missed! Water").await?;
    session.step(&mut player).await?;

    peer.send_line("1,1").await?;
    let err = session.step(&mut player).await.unwrap_err();
    assert_eq!(protocol_error(&err), &ProtocolError::CellAlreadyResolved(c(1, 1)));
    Ok(())
}

#[tokio::test]
async fn test_disconnect_mid_game_is_fatal() -> anyhow::Result<()> {
    let (a, peer) = InMemoryTransport::pair();
    let mut session = GameSession::new(Role::Responder, board_with_ships(&[(0, 0)]), a);
    let mut player = ScriptedPlayer::default();

    drop(peer);
    let err = session.run(&mut player).await.unwrap_err();
    assert_eq!(protocol_error(&err), &ProtocolError::ConnectionClosed);
    assert!(session.is_terminated());
    Ok(())
}

#[tokio::test]
async fn test_silent_peer_times_out() -> anyhow::Result<()> {
    let (a, _peer) = InMemoryTransport::pair();
    let a = a.with_recv_timeout(Some(Duration::from_millis(50)));
    let mut session = GameSession::new(Role::Responder, board_with_ships(&[(0, 0)]), a);
    let mut player = ScriptedPlayer::default();

    let err = session.step(&mut player).await.unwrap_err();
    assert!(matches!(protocol_error(&err), ProtocolError::Timeout(_)));
    Ok(())
}
