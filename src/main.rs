use anyhow::{Context, Result, bail};
use clap::Parser;
use snake_arena::game::GameConfig;
use snake_arena::modes::HumanMode;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "snake_arena")]
#[command(version, about = "Local multiplayer Snake in the terminal")]
struct Cli {
    /// Screen rows, border included
    #[arg(long)]
    rows: Option<usize>,

    /// Screen columns, border included
    #[arg(long)]
    cols: Option<usize>,

    /// Snakes grow on every move and there is no food
    #[arg(long)]
    tron: bool,

    /// Number of players sharing the keyboard (1-4)
    #[arg(long, default_value = "1")]
    players: usize,

    /// Player names in join order; missing names become "Player N"
    #[arg(long = "name")]
    names: Vec<String>,

    /// Seed the spawn RNG for a reproducible layout
    #[arg(long)]
    seed: Option<u64>,

    /// JSON game configuration; flags above override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs here (filtered by RUST_LOG); the terminal belongs to the game
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)?,
            None => GameConfig::default(),
        };

        if let Some(rows) = self.rows {
            config.rows = rows;
        }
        if let Some(cols) = self.cols {
            config.cols = cols;
        }
        if self.tron {
            config.tron = true;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        if let Err(message) = config.validate() {
            bail!("Invalid configuration: {message}");
        }
        Ok(config)
    }

    fn player_names(&self, max: usize) -> Result<Vec<String>> {
        if self.players < 1 || self.players > max {
            bail!("Invalid number of players: {} (1-{max})", self.players);
        }
        Ok((0..self.players)
            .map(|index| {
                self.names
                    .get(index)
                    .cloned()
                    .unwrap_or_else(|| format!("Player {}", index + 1))
            })
            .collect())
    }
}

fn init_logging(path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create log file {:?}", path))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_logging(path)?;
    }

    let config = cli.game_config()?;
    let names = cli.player_names(config.max_players())?;

    tracing::info!(?config, players = names.len(), "starting {}", if config.tron { "tron" } else { "snake" });

    let mut mode = HumanMode::new(config, &names).await?;
    mode.run().await?;

    Ok(())
}
