mod config;
mod error;
mod fruit;
mod game;
mod grid;
mod session;
mod snake;
mod term;

use std::{fs::File, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, LevelFilter};
use simplelog::WriteLogger;

use crate::config::Config;
use crate::session::GameSession;

pub type TermInt = u16;
pub type Coords = (u16, u16);

/// Terminal snake: eat the fruit, stay on the board, don't bite yourself.
#[derive(Debug, Parser)]
#[command(version, about)]
struct CliArgs {
    /// Side of one grid cell, in coordinate units.
    #[arg(long, value_name = "UNITS", default_value_t = config::DEFAULT_CELL_SIZE,
        value_parser = clap::value_parser!(u32).range(1..))]
    cell_size: u32,
    /// Playable cells along each side of the board.
    #[arg(long, value_name = "CELLS", default_value_t = config::DEFAULT_GRID_CELLS)]
    grid_cells: u32,
    /// Cells of border around the board.
    #[arg(long, value_name = "CELLS", default_value_t = config::DEFAULT_BORDER_CELLS)]
    border_cells: u32,
    /// Points awarded for each fruit.
    #[arg(long, value_name = "POINTS", default_value_t = config::DEFAULT_POINTS_PER_FRUIT)]
    points_per_fruit: u32,
    /// Game updates per second.
    #[arg(long, value_name = "TICKS", default_value_t = config::DEFAULT_TICK_RATE,
        value_parser = clap::value_parser!(u32).range(1..=1000))]
    tick_rate: u32,
    /// Where to write the log, since the game owns the terminal.
    #[arg(long, value_name = "PATH", default_value = "snake.log")]
    log_file: PathBuf,
    #[arg(long, value_name = "LEVEL", default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

impl CliArgs {
    fn config(&self) -> Config {
        Config {
            cell_size: self.cell_size,
            grid_cells: self.grid_cells,
            border_cells: self.border_cells,
            points_per_fruit: self.points_per_fruit,
            tick_rate: self.tick_rate,
        }
    }
}

fn main() -> Result<()> {
    let args = CliArgs::parse();

    let log_file = File::create(&args.log_file)
        .with_context(|| format!("cannot create log file {}", args.log_file.display()))?;
    WriteLogger::init(args.log_level, simplelog::Config::default(), log_file)
        .context("failed to initialize logger")?;

    let session = GameSession::new(args.config(), rand::thread_rng())
        .context("invalid game configuration")?;

    let mut game = game::SnakeGame::new(session).context("failed to open the terminal")?;
    game.initialize().context("failed to set up the terminal")?;

    // The terminal goes back to normal even if the game loop failed
    let res = game.play();
    game.shutdown().context("failed to restore the terminal")?;
    res.context("game loop failed")?;

    info!("Bye");
    Ok(())
}
