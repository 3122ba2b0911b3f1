#![cfg(feature = "std")]

use broadside::{AiPlayer, Board, GameResult, GameSession, Role, TcpTransport, NUM_SHIPS};
use rand::{rngs::SmallRng, SeedableRng};
use tokio::net::TcpListener;

#[tokio::test(flavor = "multi_thread")]
async fn test_ai_vs_ai_tcp_game() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    // Responder: accepts and waits for the first attack.
    let server_future = tokio::spawn(async move {
        let (transport, _peer) = TcpTransport::accept(&listener).await?;
        let mut rng = SmallRng::seed_from_u64(0);
        let board = Board::seeded(&mut rng, NUM_SHIPS)?;
        let mut player = AiPlayer::new(rng);
        let mut session = GameSession::new(Role::Responder, board, transport);
        let result = session.run(&mut player).await?;
        anyhow::Ok((result, session.rounds()))
    });

    // Initiator: dials and opens fire.
    let client_future = tokio::spawn(async move {
        let transport = TcpTransport::connect(addr).await?;
        let mut rng = SmallRng::seed_from_u64(1);
        let board = Board::seeded(&mut rng, NUM_SHIPS)?;
        let mut player = AiPlayer::new(rng);
        let mut session = GameSession::new(Role::Initiator, board, transport);
        let result = session.run(&mut player).await?;
        anyhow::Ok((result, session.rounds()))
    });

    let (server, client) = tokio::try_join!(server_future, client_future)?;
    let ((server_result, server_rounds), (client_result, client_rounds)) = (server?, client?);

    // One must win, one must lose.
    assert!(
        (server_result == GameResult::Won && client_result == GameResult::Lost)
            || (server_result == GameResult::Lost && client_result == GameResult::Won)
    );
    assert!(client_rounds == server_rounds || client_rounds == server_rounds + 1);
    Ok(())
}

#[tokio::test]
async fn test_peer_vanishing_mid_game_ends_session_with_error() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server_future = tokio::spawn(async move {
        let (transport, _peer) = TcpTransport::accept(&listener).await?;
        let mut session = GameSession::new(Role::Responder, Board::new(), transport);
        let mut player = broadside::ScriptedPlayer::default();
        session.run(&mut player).await
    });

    let client = TcpTransport::connect(addr).await?;
    drop(client);

    let err = server_future.await?.unwrap_err();
    assert_eq!(
        err.downcast_ref::<broadside::ProtocolError>(),
        Some(&broadside::ProtocolError::ConnectionClosed)
    );
    Ok(())
}
