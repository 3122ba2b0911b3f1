#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use std::process::ExitCode;

#[cfg(feature = "std")]
use broadside::{
    init_logging, AiPlayer, Board, CliPlayer, GameResult, GameSession, InMemoryTransport,
    LineChannel, Player, ProtocolError, Role, SessionConfig, TcpTransport, DEFAULT_PORT,
};
#[cfg(feature = "std")]
use clap::{Parser, ValueEnum};
#[cfg(feature = "std")]
use rand::rngs::SmallRng;
#[cfg(feature = "std")]
use rand::SeedableRng;
#[cfg(feature = "std")]
use tokio::time::Duration;

/// Exit status when the connection could not be established.
#[cfg(feature = "std")]
const EXIT_SETUP_FAILURE: u8 = 2;
/// Exit status for any other fatal session error.
#[cfg(feature = "std")]
const EXIT_SESSION_FAILURE: u8 = 1;

#[derive(Parser)]
#[command(author, version, about = "Two-player one-hit battleship over TCP", long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
#[cfg(feature = "std")]
enum PlayerType {
    Human,
    Ai,
}

#[derive(Parser)]
#[cfg(feature = "std")]
enum Commands {
    /// Wait for one opponent to connect; they attack first.
    Serve {
        #[arg(long, default_value_t = format!("0.0.0.0:{}", DEFAULT_PORT))]
        bind: String,
        #[arg(long, value_enum, default_value_t = PlayerType::Human)]
        player: PlayerType,
        #[arg(long, help = "Fix RNG seed for reproducible boards (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, help = "Give up if the opponent is silent this many seconds")]
        timeout: Option<u64>,
    },
    /// Connect to a waiting opponent and attack first.
    Connect {
        #[arg(long, default_value_t = format!("127.0.0.1:{}", DEFAULT_PORT))]
        addr: String,
        #[arg(long, value_enum, default_value_t = PlayerType::Human)]
        player: PlayerType,
        #[arg(long, help = "Fix RNG seed for reproducible boards (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, help = "Give up if the opponent is silent this many seconds")]
        timeout: Option<u64>,
    },
    /// Watch two AIs play each other in-process.
    Local {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();
    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Game ended with an error: {:#}", e);
            match e.downcast_ref::<ProtocolError>() {
                Some(ProtocolError::ConnectionSetup(_)) => ExitCode::from(EXIT_SETUP_FAILURE),
                _ => ExitCode::from(EXIT_SESSION_FAILURE),
            }
        }
    }
}

#[cfg(feature = "std")]
fn make_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(s) => {
            println!("Using fixed seed: {} (board will be reproducible)", s);
            SmallRng::seed_from_u64(s)
        }
        None => {
            let mut seed_rng = rand::rng();
            SmallRng::from_rng(&mut seed_rng)
        }
    }
}

#[cfg(feature = "std")]
fn session_config(timeout: Option<u64>) -> SessionConfig {
    SessionConfig {
        recv_timeout: timeout.map(Duration::from_secs),
        ..SessionConfig::default()
    }
}

#[cfg(feature = "std")]
async fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Serve {
            bind,
            player,
            seed,
            timeout,
        } => {
            println!("Starting server at {}...", bind);
            let config = session_config(timeout);
            let (transport, peer) = TcpTransport::accept_one(&bind).await?;
            println!("Opponent connected from {}", peer);
            let transport = transport.with_recv_timeout(config.recv_timeout);
            play(Role::Responder, transport, player, make_rng(seed), &config).await
        }
        Commands::Connect {
            addr,
            player,
            seed,
            timeout,
        } => {
            println!("Connecting to {}...", addr);
            let config = session_config(timeout);
            let transport = TcpTransport::connect(&addr)
                .await?
                .with_recv_timeout(config.recv_timeout);
            println!("Connected successfully!");
            play(Role::Initiator, transport, player, make_rng(seed), &config).await
        }
        Commands::Local { seed } => {
            println!("Starting local AI vs AI game...");
            let config = SessionConfig::default();
            let rng1 = make_rng(seed);
            let rng2 = match seed {
                Some(s) => SmallRng::seed_from_u64(s.wrapping_add(1)),
                None => make_rng(None),
            };
            let (t1, t2) = InMemoryTransport::pair();
            tokio::try_join!(
                play(Role::Initiator, t1, PlayerType::Ai, rng1, &config),
                play(Role::Responder, t2, PlayerType::Ai, rng2, &config),
            )?;
            Ok(())
        }
    }
}

#[cfg(feature = "std")]
async fn play<C: LineChannel>(
    role: Role,
    transport: C,
    kind: PlayerType,
    mut rng: SmallRng,
    config: &SessionConfig,
) -> anyhow::Result<()> {
    let board = Board::seeded(&mut rng, config.ship_count)?;
    let mut player: Box<dyn Player> = match kind {
        PlayerType::Human => Box::new(CliPlayer::new()),
        PlayerType::Ai => Box::new(AiPlayer::new(SmallRng::from_rng(&mut rng))),
    };
    let mut session = GameSession::new(role, board, transport);
    let result = session.run(&mut player).await?;
    match result {
        GameResult::Won => println!("{:?}: won after {} attacks", role, session.rounds()),
        GameResult::Lost => println!("{:?}: lost after {} attacks", role, session.rounds()),
    }
    Ok(())
}
