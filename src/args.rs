use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use model::GameConfig;

/// Plays 2048 by itself and prints the final field.
#[derive(Parser, Debug)]
pub struct Args {
    /// JSON game config (size, max_piece, four_probability, initial_tiles).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Field size, overriding the config.
    #[arg(long)]
    pub size: Option<usize>,
    /// Tile value that ends the game, overriding the config.
    #[arg(long)]
    pub max_piece: Option<u32>,
    /// Seed for tile spawning. Random if omitted.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Stop after this many tilts.
    #[arg(long, default_value_t = 10_000)]
    pub max_moves: usize,
    /// Log filter, e.g. "info", "debug". RUST_LOG takes precedence.
    #[arg(long, default_value = "info")]
    pub log: String,
}

impl Args {
    pub fn game_config(&self) -> anyhow::Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => GameConfig::default(),
        };
        if let Some(size) = self.size {
            config.size = size;
        }
        if let Some(max_piece) = self.max_piece {
            config.max_piece = max_piece;
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = Args::parse_from(["tilt2048", "--size", "5", "--max-piece", "512"]);
        let config = args.game_config().unwrap();
        assert_eq!(config.size, 5);
        assert_eq!(config.max_piece, 512);
        assert_eq!(config.initial_tiles, 2);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let args = Args::parse_from(["tilt2048", "--max-piece", "100"]);
        assert!(args.game_config().is_err());
    }

    #[test]
    fn missing_config_file_names_the_path() {
        let args = Args::parse_from(["tilt2048", "--config", "/nonexistent/game.json"]);
        let err = args.game_config().unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/game.json"));
    }
}
