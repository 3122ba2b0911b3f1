use broadside::transport::{check_alternation, RecordingTransport};
use broadside::{AiPlayer, Board, GameResult, GameSession, InMemoryTransport, Role, NUM_SHIPS};
use rand::{rngs::SmallRng, SeedableRng};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <seed1> <seed2>", args[0]);
        std::process::exit(1);
    }
    let seed1: u64 = args[1].parse()?;
    let seed2: u64 = args[2].parse()?;

    let mut rng1 = SmallRng::seed_from_u64(seed1);
    let mut rng2 = SmallRng::seed_from_u64(seed2);

    let b1 = Board::seeded(&mut rng1, NUM_SHIPS)?;
    let b2 = Board::seeded(&mut rng2, NUM_SHIPS)?;
    let mut p1 = AiPlayer::new(rng1);
    let mut p2 = AiPlayer::new(rng2);

    let (t1, t2) = InMemoryTransport::pair();
    let (t1, t2) = (RecordingTransport::new(t1), RecordingTransport::new(t2));
    let (trace1, trace2) = (t1.trace(), t2.trace());

    let f1 = async move {
        let mut session = GameSession::new(Role::Initiator, b1, t1);
        let result = session.run(&mut p1).await?;
        Ok::<(GameResult, usize), anyhow::Error>((result, session.rounds()))
    };
    let f2 = async move {
        let mut session = GameSession::new(Role::Responder, b2, t2);
        let result = session.run(&mut p2).await?;
        Ok::<(GameResult, usize), anyhow::Error>((result, session.rounds()))
    };

    let (res1, res2) = tokio::try_join!(f1, f2)?;

    let winner = match (res1.0, res2.0) {
        (GameResult::Won, GameResult::Lost) => Some("player1"),
        (GameResult::Lost, GameResult::Won) => Some("player2"),
        _ => None,
    };
    let alternation_ok =
        check_alternation(&trace1.events()?).is_ok() && check_alternation(&trace2.events()?).is_ok();

    let result = json!({
        "player1": {"status": res1.0, "attacks": res1.1},
        "player2": {"status": res2.0, "attacks": res2.1},
        "winner": winner,
        "alternation_ok": alternation_ok,
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
