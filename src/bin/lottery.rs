use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use classic_containers::lottery::run_session;
use classic_containers::LotteryConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Guess the drawn digits and win a prize.
#[derive(Parser, Debug)]
#[command(name = "lottery", version)]
struct Args {
    /// TOML file overriding the number of picks, digit range and prizes
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for reproducible draws
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => LotteryConfig::load(path)
            .with_context(|| format!("loading lottery config {}", path.display()))?,
        None => LotteryConfig::default(),
    };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_session(&mut stdin.lock(), &mut stdout.lock(), &mut rng, &config)
        .context("lottery session failed")?;
    Ok(())
}
