use crate::config::Config;
use rand::Rng;

/// A grid aligned position, in the same units as the cell size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Cell { x: self.x + dx, y: self.y + dy }
    }

    pub fn is_aligned(self, cell_size: i32) -> bool {
        self.x.rem_euclid(cell_size) == 0 && self.y.rem_euclid(cell_size) == 0
    }
}

/// Geometry of the playable square: where it starts, how far it reaches, and
/// which of its cells may hold a fruit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    cell_size: i32,
    cells: i32,
    origin: i32,
}

impl Grid {
    /// `config` must already have passed `Config::validate`.
    pub fn new(config: &Config) -> Self {
        let cell_size = config.cell_size as i32;
        Grid {
            cell_size,
            cells: config.grid_cells as i32,
            origin: config.border_cells as i32 * cell_size,
        }
    }

    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    pub fn cells(&self) -> i32 {
        self.cells
    }

    pub fn origin(&self) -> i32 {
        self.origin
    }

    /// Length of each side of the playable area.
    pub fn extent(&self) -> i32 {
        self.cells * self.cell_size
    }

    /// The cell `col` columns right and `row` rows down from the playable origin.
    pub fn cell_at(&self, col: i32, row: i32) -> Cell {
        Cell::new(self.origin + col * self.cell_size, self.origin + row * self.cell_size)
    }

    pub fn is_within_playable_bounds(&self, cell: Cell) -> bool {
        let end = self.origin + self.extent();
        (self.origin..end).contains(&cell.x) && (self.origin..end).contains(&cell.y)
    }

    /// Number of cells a fruit can spawn on.
    pub fn spawn_cells(&self) -> usize {
        let side = (self.cells - 2).max(0) as usize;
        side * side
    }

    /// Uniformly picks a cell keeping at least one cell of margin to every edge.
    pub fn random_valid_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Cell {
        let col = rng.gen_range(1..self.cells - 1);
        let row = rng.gen_range(1..self.cells - 1);
        self.cell_at(col, row)
    }

    /// Column and row of `cell` on the whole screen, border included.
    pub fn screen_index(&self, cell: Cell) -> (i32, i32) {
        (cell.x.div_euclid(self.cell_size), cell.y.div_euclid(self.cell_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn grid() -> Grid {
        Grid::new(&Config { cell_size: 32, grid_cells: 12, border_cells: 3, ..Config::default() })
    }

    #[test]
    fn origin_and_extent_follow_the_config() {
        let grid = grid();
        assert_eq!(grid.origin(), 96);
        assert_eq!(grid.extent(), 384);
        assert_eq!(grid.cell_at(2, 1), Cell::new(160, 128));
    }

    #[test]
    fn bounds_include_the_origin_and_exclude_the_far_edge() {
        let grid = grid();
        let s = grid.cell_size();

        assert!(grid.is_within_playable_bounds(grid.cell_at(0, 0)));
        assert!(grid.is_within_playable_bounds(grid.cell_at(11, 11)));
        assert!(grid.is_within_playable_bounds(grid.cell_at(5, 7)));

        assert!(!grid.is_within_playable_bounds(grid.cell_at(0, 0).offset(-s, 0)));
        assert!(!grid.is_within_playable_bounds(grid.cell_at(0, 0).offset(0, -s)));
        assert!(!grid.is_within_playable_bounds(grid.cell_at(12, 5)));
        assert!(!grid.is_within_playable_bounds(grid.cell_at(5, 12)));
        assert!(!grid.is_within_playable_bounds(Cell::new(0, 0)));
    }

    #[test]
    fn bounds_without_a_border_start_at_zero() {
        let config = Config { border_cells: 0, grid_cells: 4, cell_size: 10, ..Config::default() };
        let grid = Grid::new(&config);
        assert!(grid.is_within_playable_bounds(Cell::new(0, 0)));
        assert!(grid.is_within_playable_bounds(Cell::new(30, 30)));
        assert!(!grid.is_within_playable_bounds(Cell::new(-10, 0)));
        assert!(!grid.is_within_playable_bounds(Cell::new(40, 0)));
    }

    #[test]
    fn random_cells_are_aligned_and_keep_a_margin() {
        let grid = grid();
        let mut rng = StdRng::seed_from_u64(7);
        let low = grid.cell_at(1, 1);
        let high = grid.cell_at(10, 10);

        for _ in 0..1000 {
            let cell = grid.random_valid_cell(&mut rng);
            assert!(cell.is_aligned(grid.cell_size()));
            assert!(cell.x >= low.x && cell.x <= high.x, "{:?}", cell);
            assert!(cell.y >= low.y && cell.y <= high.y, "{:?}", cell);
        }
    }

    #[test]
    fn random_cells_reach_every_spawn_cell() {
        let grid = Grid::new(&Config { grid_cells: 5, ..Config::default() });
        let mut rng = StdRng::seed_from_u64(3);
        let seen: std::collections::HashSet<Cell> =
            (0..500).map(|_| grid.random_valid_cell(&mut rng)).collect();
        assert_eq!(seen.len(), grid.spawn_cells());
        assert_eq!(grid.spawn_cells(), 9);
    }

    #[test]
    fn screen_index_counts_the_border() {
        let grid = grid();
        assert_eq!(grid.screen_index(grid.cell_at(0, 0)), (3, 3));
        assert_eq!(grid.screen_index(grid.cell_at(0, 0).offset(0, -32)), (3, 2));
    }
}
