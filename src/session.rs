use crate::config::Config;
use crate::error::ConfigError;
use crate::fruit::Fruit;
use crate::grid::{Cell, Grid};
use crate::snake::{Direction, MoveResult, Snake};
use log::info;
use rand::{rngs::ThreadRng, Rng};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverCause {
    OutOfBounds,
    SelfCollision,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the first direction.
    Idle,
    Running,
    GameOver(GameOverCause),
}

/// What happened during one tick, for whoever plays sounds and redraws.
#[derive(Debug, PartialEq, Eq)]
pub struct TickEvents {
    pub fruit_eaten: bool,
    pub game_ended: bool,
    pub movement: MoveResult,
}

impl TickEvents {
    fn idle() -> Self {
        TickEvents { fruit_eaten: false, game_ended: false, movement: MoveResult::Idle }
    }
}

/// Read-only view of everything a renderer needs.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub snake: &'a Snake,
    pub fruit: Cell,
    pub score: u32,
    pub active: bool,
}

/// One play-through: owns the snake, the fruit and the score, and advances
/// them one tick at a time.
pub struct GameSession<R = ThreadRng> {
    config: Config,
    grid: Grid,
    rng: R,
    snake: Snake,
    fruit: Fruit,
    score: u32,
    game_over: Option<GameOverCause>,
}

impl<R: Rng> GameSession<R> {
    pub fn new(config: Config, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;

        let grid = Grid::new(&config);
        info!(
            "New session on a {0}x{0} grid (cell size {1}, border {2})",
            config.grid_cells, config.cell_size, config.border_cells
        );

        Ok(GameSession {
            config,
            grid,
            rng,
            snake: Snake::new(&grid),
            fruit: Fruit::new(&grid),
            score: 0,
            game_over: None,
        })
    }

    /// Puts everything back the way `new` left it.
    pub fn reset(&mut self) {
        self.snake = Snake::new(&self.grid);
        self.fruit = Fruit::new(&self.grid);
        self.score = 0;
        self.game_over = None;
        info!("Session reset");
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn fruit(&self) -> Cell {
        self.fruit.cell()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_active(&self) -> bool {
        self.game_over.is_none()
    }

    pub fn phase(&self) -> Phase {
        match (self.game_over, self.snake.get_direction()) {
            (Some(cause), _) => Phase::GameOver(cause),
            (None, None) => Phase::Idle,
            (None, Some(_)) => Phase::Running,
        }
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            snake: &self.snake,
            fruit: self.fruit.cell(),
            score: self.score,
            active: self.is_active(),
        }
    }

    /// Returns whether the snake took the new direction.
    pub fn handle_directional_input(&mut self, direction: Direction) -> bool {
        if !self.is_active() {
            return false;
        }

        let starting = self.phase() == Phase::Idle;
        let accepted = self.snake.set_direction(direction);
        if accepted && starting {
            info!("Snake set off heading {:?}", direction);
        }
        accepted
    }

    /// Starts over once the game has ended. Returns whether it did.
    pub fn handle_any_input(&mut self) -> bool {
        if self.is_active() {
            return false;
        }

        self.reset();
        true
    }

    pub fn tick(&mut self) -> TickEvents {
        if self.phase() != Phase::Running {
            return TickEvents::idle();
        }

        // Fruit is judged on the head the player already occupies
        let fruit_eaten = self.snake.head() == self.fruit.cell();
        if fruit_eaten {
            self.snake.grow();
            self.score = self.score.saturating_add(self.config.points_per_fruit);
            let eaten = self.fruit.cell();
            self.fruit.relocate(&self.grid, eaten, &mut self.rng);
            info!("Fruit eaten, score is now {}", self.score);
        }

        let movement = self.snake.move_step();

        let head = self.snake.head();
        let cause = if !self.grid.is_within_playable_bounds(head) {
            Some(GameOverCause::OutOfBounds)
        } else if self.snake.head_overlaps_body() {
            Some(GameOverCause::SelfCollision)
        } else {
            None
        };

        if let Some(cause) = cause {
            info!(
                "Game over ({:?}) with a score of {} and a snake of {} cells",
                cause, self.score, self.snake.len()
            );
            self.game_over = Some(cause);
        }

        TickEvents { fruit_eaten, game_ended: cause.is_some(), movement }
    }
}
