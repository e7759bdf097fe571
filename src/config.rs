use crate::error::ConfigError;

pub const DEFAULT_CELL_SIZE: u32 = 32;
pub const DEFAULT_GRID_CELLS: u32 = 12;
pub const DEFAULT_BORDER_CELLS: u32 = 3;
pub const DEFAULT_POINTS_PER_FRUIT: u32 = 10;
pub const DEFAULT_TICK_RATE: u32 = 8;

/// Cells the starting snake spans horizontally.
const MIN_GRID_CELLS: u32 = 3;

/// Immutable settings injected into a game session when it is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Side of one cell, in coordinate units.
    pub cell_size: u32,
    /// Playable cells along each axis.
    pub grid_cells: u32,
    /// Thickness of the surrounding border, in cells.
    pub border_cells: u32,
    pub points_per_fruit: u32,
    /// Updates per second.
    pub tick_rate: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cell_size: DEFAULT_CELL_SIZE,
            grid_cells: DEFAULT_GRID_CELLS,
            border_cells: DEFAULT_BORDER_CELLS,
            points_per_fruit: DEFAULT_POINTS_PER_FRUIT,
            tick_rate: DEFAULT_TICK_RATE,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_size == 0 {
            return Err(ConfigError::ZeroCellSize);
        }

        if self.tick_rate == 0 {
            return Err(ConfigError::ZeroTickRate);
        }

        if self.grid_cells < MIN_GRID_CELLS {
            return Err(ConfigError::GridTooSmall { grid_cells: self.grid_cells });
        }

        // Fruit spawns keep a one cell margin from every edge
        let side = self.grid_cells as u64 - 2;
        let spawn_cells = side * side;
        if spawn_cells < 2 {
            return Err(ConfigError::FruitSpaceTooSmall { spawn_cells });
        }

        // Leave room for a head that steps one cell past the far edge
        let extent = (self.screen_cells() as u64 + 1) * self.cell_size as u64;
        if extent > i32::MAX as u64 {
            return Err(ConfigError::TooLarge { extent });
        }

        Ok(())
    }

    /// Cells along each axis of the whole screen, border included.
    pub fn screen_cells(&self) -> u64 {
        self.grid_cells as u64 + 2 * self.border_cells as u64
    }
}
