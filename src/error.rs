use std::{error::Error, fmt};

/// A game configuration that cannot produce a playable session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    ZeroCellSize,
    ZeroTickRate,
    GridTooSmall { grid_cells: u32 },
    FruitSpaceTooSmall { spawn_cells: u64 },
    TooLarge { extent: u64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::ZeroCellSize => write!(f, "cell size must be at least 1"),
            ConfigError::ZeroTickRate => write!(f, "tick rate must be at least 1 tick per second"),
            ConfigError::GridTooSmall { grid_cells } => write!(
                f,
                "a grid of {} cells per side cannot hold the starting snake (need at least 3)",
                grid_cells
            ),
            ConfigError::FruitSpaceTooSmall { spawn_cells } => write!(
                f,
                "the fruit can only spawn on {} cell(s), it needs at least 2 to move",
                spawn_cells
            ),
            ConfigError::TooLarge { extent } => write!(
                f,
                "the screen would span {} units, which does not fit a coordinate",
                extent
            ),
        }
    }
}

impl Error for ConfigError {}
