use clap::Parser;
use raywalk::board::{Position, START_FEN};
use raywalk::perft::{divide, perft, perft_count};
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, Position as _};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about = "Count move-tree leaves to validate the generator", long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = String::from(START_FEN))]
    fen: String,

    #[arg(short, long, default_value_t = 4)]
    depth: u8,

    /// Print node counts per root move
    #[arg(long)]
    divide: bool,

    /// Collect capture/check/castle/promotion statistics (slower)
    #[arg(long)]
    stats: bool,

    /// Cross-check the node count against shakmaty
    #[arg(long)]
    verify: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    raywalk::init();

    let args = Args::parse();
    let pos = match Position::from_fen(&args.fen) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Running perft on FEN: '{}' at depth {}", args.fen, args.depth);

    let start = std::time::Instant::now();
    let nodes = if args.divide {
        let parts = divide(&pos, args.depth);
        for (mv, n) in &parts {
            println!("{}: {}", mv, n);
        }
        parts.iter().map(|(_, n)| n).sum()
    } else if args.stats {
        let s = perft(&pos, args.depth);
        println!("{:#?}", s);
        s.nodes
    } else {
        perft_count(&pos, args.depth)
    };
    let duration = start.elapsed();

    println!(
        "perft({}) = {} nodes ({} ms, {:.2} Mnps)",
        args.depth,
        nodes,
        duration.as_millis(),
        nodes as f64 / (duration.as_micros().max(1) as f64)
    );

    if args.verify {
        let reference = match reference_position(&args.fen) {
            Some(p) => p,
            None => {
                eprintln!("shakmaty rejected the FEN");
                return ExitCode::FAILURE;
            }
        };
        let expected = perft_shakmaty(&reference, args.depth);
        if expected != nodes {
            println!("MISMATCH: shakmaty counts {} nodes", expected);
            return ExitCode::FAILURE;
        }
        println!("shakmaty agrees");
    }
    ExitCode::SUCCESS
}

fn reference_position(fen: &str) -> Option<Chess> {
    let fen: Fen = fen.parse().ok()?;
    fen.into_position(CastlingMode::Standard).ok()
}

fn perft_shakmaty(pos: &Chess, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let mut nodes = 0;
    for m in pos.legal_moves() {
        let mut new_pos = pos.clone();
        new_pos.play_unchecked(&m);
        nodes += perft_shakmaty(&new_pos, depth - 1);
    }
    nodes
}
