//! raywalk UCI chess engine main entry point.

use clap::Parser;
use raywalk::search::SearchParams;
use raywalk::uci::options::{DEPTH_MAX, DEPTH_MIN, HASH_MAX, HASH_MIN};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Default search depth in plies
    #[arg(short, long, default_value_t = 4,
          value_parser = clap::value_parser!(u8).range(DEPTH_MIN as i64..=DEPTH_MAX as i64))]
    depth: u8,

    /// Transposition table size in MB
    #[arg(long, default_value_t = 16,
          value_parser = clap::value_parser!(u64).range(HASH_MIN as u64..=HASH_MAX as u64))]
    hash: u64,

    /// Seed for the root tie-break (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Seed for the Zobrist key table
    #[arg(long)]
    zobrist_seed: Option<u64>,

    /// Log filter used when RUST_LOG is unset (e.g. "info", "raywalk=debug")
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // stdout carries the protocol; logs go to stderr
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let init = match args.zobrist_seed {
        Some(seed) => raywalk::init_with_zobrist_seed(seed),
        None => {
            raywalk::init();
            Ok(())
        }
    };
    if let Err(e) = init {
        tracing::error!(error = %e, "initialisation failed");
        return ExitCode::FAILURE;
    }

    let mut params = SearchParams::new()
        .max_depth(args.depth)
        .tt_size_mb(args.hash as usize);
    params.seed = args.seed;

    tracing::info!(depth = params.max_depth, hash_mb = params.tt_size_mb, "starting UCI loop");
    if let Err(e) = raywalk::uci::run_uci_loop(params) {
        tracing::error!(error = %e, "UCI loop failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
