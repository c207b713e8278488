use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use monopoly_sim::{BoardSchema, Game, GameConfig, GameResult, Standing};

/// Simulate a game of Monopoly between computer players.
#[derive(Parser, Debug)]
#[command(name = "monopoly-sim")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Game configuration (JSON). Missing fields take their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Board schema (JSON). Defaults to the Singapore edition.
    #[arg(long)]
    schema: Option<PathBuf>,

    /// Random seed, overriding the configuration
    #[arg(short, long)]
    seed: Option<u64>,

    /// Maximum rounds, overriding the configuration
    #[arg(short, long)]
    rounds: Option<u32>,
}

fn run(args: Args) -> GameResult<Vec<Standing>> {
    let mut config = match &args.config {
        Some(path) => GameConfig::from_path(path)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(rounds) = args.rounds {
        config.max_rounds = rounds;
    }

    let schema = match &args.schema {
        Some(path) => BoardSchema::from_path(path)?,
        None => BoardSchema::standard()?,
    };

    let mut game = Game::new(config, &schema)?;
    let standings = game.play()?;
    print!("{}", game);

    Ok(standings)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let start = Instant::now();
    let result = run(Args::parse());
    let duration = start.elapsed();

    match result {
        Ok(standings) => {
            for (place, standing) in standings.iter().enumerate() {
                println!("{}. {}", place + 1, standing);
            }
            println!("Time elapsed: {:?}", duration);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
