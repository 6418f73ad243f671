use checkers_engine::api::{ai_move, apply_move, list_moves};
use checkers_engine::{Board, CheckersResult, Coord, Piece, SearchConfig, SearchEngine, Side};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "checkers", about = "Checkers move generation and engine play", long_about = None)]
struct Cli {
    /// Board file: 8 lines of `.`, `r`, `R`, `b`, `B`. Defaults to the opening position.
    #[arg(short, long, global = true)]
    board: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List legal moves, grouped by origin square
    Moves {
        #[arg(short, long, default_value = "r")]
        side: Side,
    },
    /// Play the piece on FROM to TO (coordinates as row,col)
    Apply {
        #[arg(long)]
        from: Coord,
        #[arg(long)]
        to: Coord,
    },
    /// Let the engine pick a move
    Ai {
        #[arg(short, long, default_value = "b")]
        side: Side,
        /// Search horizon in plies
        #[arg(short, long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
        depth: u32,
        /// Cache size in megabytes
        #[arg(long)]
        cache_mb: Option<usize>,
        /// Abort the search after this many milliseconds
        #[arg(long)]
        deadline_ms: Option<u64>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CheckersResult<()> {
    let board = match &cli.board {
        Some(path) => Board::from_file(path)?,
        None => Board::initial(),
    };

    match cli.command {
        Command::Moves { side } => {
            println!("{}", board.render_with_coords());
            let moves = list_moves(&board, side);
            if moves.is_empty() {
                println!("{} has no legal moves", side);
            }
            for (from, dests) in &moves {
                let dests: Vec<String> = dests.iter().map(|d| d.to_string()).collect();
                println!("{} -> {}", from, dests.join(", "));
            }
        }
        Command::Apply { from, to } => {
            let piece = board.piece_at(from.checked()?).unwrap_or(Piece::Empty);
            let next = apply_move(&board, from, to, piece)?;
            println!("{}", next);
        }
        Command::Ai {
            side,
            depth,
            cache_mb,
            deadline_ms,
        } => {
            let mut config = SearchConfig::default().with_horizon(depth);
            if let Some(mb) = cache_mb {
                config = config.with_cache_mb(mb);
            }
            if let Some(ms) = deadline_ms {
                config = config.with_deadline(Duration::from_millis(ms));
            }
            let mut engine = SearchEngine::new(config);
            let mv = ai_move(&mut engine, &board, side)?;
            println!("engine -> {} to {} (score {})", mv.from, mv.to, mv.score);
            println!("{}", mv.board.render_with_coords());
        }
    }
    Ok(())
}
