use crate::grid::{Cell, Grid};
use std::collections::VecDeque;
use log::debug;
use Direction::*;
use MoveResult::*;

const INITIAL_SNAKE_LENGTH: i32 = 3;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    fn unit(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum MoveResult {
    Moved { new_head: Cell, old_head: Cell, old_tail: Option<Cell> },
    Idle
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    Head,
    Body
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Segment {
    pub cell: Cell,
    pub kind: SegmentKind,
}

/// The player's snake, head first. It only moves once a direction has been
/// chosen, and accepts at most one direction change between two steps.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Cell>,
    direction: Option<Direction>,
    cell_size: i32,
    grow_next_move: bool,
    direction_locked: bool,
}

impl Snake {
    /// A three cell snake lying along the top-left of the grid, head to the right.
    pub fn new(grid: &Grid) -> Self {
        let body = (0..INITIAL_SNAKE_LENGTH).rev()
            .map(|col| grid.cell_at(col, 0).offset(0, grid.cell_size()))
            .collect();

        Snake {
            body,
            direction: None,
            cell_size: grid.cell_size(),
            grow_next_move: false,
            direction_locked: false,
        }
    }

    #[cfg(test)]
    pub(crate) fn from_cells(cells: &[Cell], direction: Option<Direction>, cell_size: i32) -> Self {
        Snake {
            body: cells.iter().copied().collect(),
            direction,
            cell_size,
            grow_next_move: false,
            direction_locked: false,
        }
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn body(&self) -> &VecDeque<Cell> {
        &self.body
    }

    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.body.iter().enumerate().map(|(i, &cell)| Segment {
            cell,
            kind: if i == 0 { SegmentKind::Head } else { SegmentKind::Body },
        })
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Whether the head shares its cell with any other segment.
    pub fn head_overlaps_body(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|&cell| cell == head)
    }

    pub fn get_direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Returns whether the change was accepted. Reversals and a second change
    /// before the next step are ignored.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if self.direction_locked {
            debug!("Ignoring {:?}, direction already changed this tick", new_direction);
            return false;
        }

        if self.direction == Some(new_direction.opposite()) {
            debug!("Ignoring {:?}, the snake cannot reverse", new_direction);
            return false;
        }

        self.direction = Some(new_direction);
        self.direction_locked = true;
        true
    }

    pub fn grow(&mut self) {
        self.grow_next_move = true;
    }

    pub fn move_step(&mut self) -> MoveResult {
        let direction = match self.direction {
            Some(direction) => direction,
            None => return Idle,
        };

        let old_head = self.head();
        let (dx, dy) = direction.unit();
        let new_head = old_head.offset(dx * self.cell_size, dy * self.cell_size);
        debug_assert!(
            new_head.is_aligned(self.cell_size),
            "head left the grid lines: {:?}",
            new_head
        );

        self.body.push_front(new_head);

        let old_tail = if self.grow_next_move {
            None
        } else {
            self.body.pop_back()
        };

        self.grow_next_move = false;
        self.direction_locked = false;
        assert!(!self.body.is_empty(), "snake lost all its segments");

        Moved { new_head, old_head, old_tail }
    }

    pub fn head_char(&self) -> char {
        match self.direction {
            Some(Up) => '^',
            Some(Down) => 'v',
            Some(Left) => '<',
            Some(Right) | None => '>',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn grid() -> Grid {
        Grid::new(&Config::default())
    }

    fn cells(snake: &Snake) -> Vec<Cell> {
        snake.body().iter().copied().collect()
    }

    #[test]
    fn starts_as_three_cells_in_a_row() {
        let grid = grid();
        let snake = Snake::new(&grid);
        let (o, s) = (grid.origin(), grid.cell_size());

        assert_eq!(cells(&snake), vec![
            Cell::new(o + 2 * s, o + s),
            Cell::new(o + s, o + s),
            Cell::new(o, o + s),
        ]);
        assert_eq!(snake.get_direction(), None);
    }

    #[test]
    fn does_not_move_without_a_direction() {
        let mut snake = Snake::new(&grid());
        let before = cells(&snake);

        snake.grow();
        assert_eq!(snake.move_step(), Idle);
        assert_eq!(cells(&snake), before);
    }

    #[test]
    fn moves_one_cell_and_keeps_its_length() {
        let grid = grid();
        let mut snake = Snake::new(&grid);
        let s = grid.cell_size();
        let head = snake.head();
        let tail = *snake.body().back().unwrap();

        assert!(snake.set_direction(Down));
        let res = snake.move_step();

        let expected = Moved { new_head: head.offset(0, s), old_head: head, old_tail: Some(tail) };
        assert_eq!(res, expected);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), head.offset(0, s));
        assert!(snake.set_direction(Right));
    }

    #[test]
    fn segments_stay_one_cell_apart() {
        let grid = grid();
        let mut snake = Snake::new(&grid);
        let s = grid.cell_size();

        for &dir in &[Right, Down, Down, Left, Down, Right] {
            snake.set_direction(dir);
            snake.move_step();

            let body = cells(&snake);
            for pair in body.windows(2) {
                let (dx, dy) = ((pair[0].x - pair[1].x).abs(), (pair[0].y - pair[1].y).abs());
                assert!((dx, dy) == (s, 0) || (dx, dy) == (0, s), "{:?}", body);
            }
        }
    }

    #[test]
    fn growing_keeps_the_tail_for_one_step() {
        let mut snake = Snake::new(&grid());
        snake.set_direction(Right);

        snake.grow();
        snake.grow();
        assert!(matches!(snake.move_step(), Moved { old_tail: None, .. }));
        assert_eq!(snake.len(), 4);

        assert!(matches!(snake.move_step(), Moved { old_tail: Some(_), .. }));
        assert_eq!(snake.len(), 4);
    }

    #[test]
    fn rejects_reversals() {
        let mut snake = Snake::new(&grid());
        assert!(snake.set_direction(Right));
        snake.move_step();

        assert!(!snake.set_direction(Left));
        assert_eq!(snake.get_direction(), Some(Right));
    }

    #[test]
    fn accepts_one_change_per_step() {
        let mut snake = Snake::new(&grid());
        snake.set_direction(Right);
        snake.move_step();

        assert!(snake.set_direction(Up));
        assert!(!snake.set_direction(Down));
        assert!(!snake.set_direction(Left));
        snake.move_step();
        assert_eq!(snake.get_direction(), Some(Up));

        assert!(snake.set_direction(Left));
        assert_eq!(snake.get_direction(), Some(Left));
    }

    #[test]
    fn segments_mark_only_the_first_as_head() {
        let snake = Snake::new(&grid());
        let kinds: Vec<SegmentKind> = snake.segments().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![SegmentKind::Head, SegmentKind::Body, SegmentKind::Body]);
        assert!(snake.occupies(snake.head()));
        assert!(!snake.head_overlaps_body());
    }
}
