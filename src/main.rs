use anyhow::{Context, Result};
use clap::Parser;
use grid_snake::game::{FoodSpawner, GameConfig};
use grid_snake::modes::HumanMode;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Snake on a 20x20 grid in your terminal")]
struct Cli {
    /// Seed for food placement, for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (filtered by RUST_LOG, default "info")
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Log to a file; the terminal belongs to the game screen
fn init_tracing(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {:?}", path))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        init_tracing(path)?;
    }

    let food_spawner = match cli.seed {
        Some(seed) => FoodSpawner::with_seed(seed),
        None => FoodSpawner::new(),
    };

    tracing::info!(seed = ?cli.seed, "starting grid_snake");

    let mut human_mode = HumanMode::new(GameConfig::default(), food_spawner)?;
    human_mode.run().await?;

    Ok(())
}
