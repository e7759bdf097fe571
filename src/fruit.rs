use crate::grid::{Cell, Grid};
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fruit {
    cell: Cell,
}

impl Fruit {
    /// A fruit in the middle of the grid.
    pub fn new(grid: &Grid) -> Self {
        let mid = grid.cells() / 2;
        Fruit { cell: grid.cell_at(mid, mid) }
    }

    pub fn cell(&self) -> Cell {
        self.cell
    }

    /// Moves the fruit to a random spawn cell other than `forbidden`.
    pub fn relocate<R: Rng + ?Sized>(&mut self, grid: &Grid, forbidden: Cell, rng: &mut R) {
        assert!(grid.spawn_cells() >= 2, "fruit has nowhere to move on this grid");

        let mut cell = grid.random_valid_cell(rng);
        while cell == forbidden {
            cell = grid.random_valid_cell(rng);
        }
        self.cell = cell;
    }
}
