mod args;
mod autoplay;

use args::Args;
use clap::Parser;
use log::info;
use model::Game;
use rand::{rngs::StdRng, SeedableRng};

fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log)).init();

    let config = args.game_config()?;
    let mut game = Game::with_config(&config)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(
        "playing {0}x{0} to {1} with seed {seed}",
        config.size, config.max_piece
    );
    let mut rng = StdRng::seed_from_u64(seed);

    let summary = autoplay::play(&mut game, &mut rng, args.max_moves);
    print!("{game}");
    println!("{summary}");
    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}
