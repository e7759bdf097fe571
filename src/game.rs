use std::{io, time::{Duration, Instant}};

use crate::{Coords, TermInt};
use crate::grid::{Cell, Grid};
use crate::term::TermManager;
use crate::session::{GameSession, GameOverCause, Phase, TickEvents};
use crate::snake::{Direction::{*, self}, MoveResult, SegmentKind};

use crossterm::event::{KeyEvent, KeyModifiers, KeyCode};
use log::{info, warn};

// Every grid cell is drawn two columns wide so the board looks square
const CELL_WIDTH: TermInt = 2;
// The first row holds the guide text and the score
const HEADER_ROWS: TermInt = 1;

const SNAKE_BODY_CHAR: char = '█';
const APPLE_CHARS: [char; 2] = ['(', ')'];
const EMPTY_CHARS: [char; 2] = ['·', ' '];
const DEAD_SNAKE_CHAR: char = 'X';

const GUIDE_PLAYING: &str = "Use the arrow keys to move snake";
const GUIDE_GAME_OVER: &str = "Press any key to play again";

pub struct SnakeGame {
    session: GameSession,
    term: TermManager,
    board_cells: u32,
}

impl SnakeGame {
    pub fn new(session: GameSession) -> io::Result<Self> {
        let term = TermManager::new()?;
        let board_cells = u32::try_from(session.config().screen_cells()).map_err(|_| too_large())?;
        Ok(SnakeGame { session, term, board_cells })
    }

    /// Checks the board fits the terminal, then takes over the screen.
    pub fn initialize(&mut self) -> io::Result<()> {
        check_fits(self.board_cells, self.term.get_terminal_size())?;
        self.term.setup()
    }

    pub fn shutdown(&mut self) -> io::Result<()> {
        self.term.restore()
    }

    /// Runs ticks at the configured rate until the player quits.
    pub fn play(&mut self) -> io::Result<()> {
        self.draw_board()?;

        let period = Duration::from_secs(1) / self.session.config().tick_rate;
        let mut next_tick = Instant::now() + period;
        info!("Playing at one tick every {:?}", period);

        loop {
            let now = Instant::now();

            if now >= next_tick {
                if now - next_tick > period {
                    warn!("Running {:?} behind schedule", now - next_tick);
                    next_tick = now;
                }
                next_tick += period;

                let events = self.session.tick();
                self.print_tick(&events)?;
                continue;
            }

            if let Some(key_ev) = self.term.poll_key(next_tick - now)? {
                if is_quit(&key_ev) {
                    info!("Quit requested");
                    return Ok(());
                }
                self.handle_key(&key_ev)?;
            }
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn handle_key(&mut self, key_ev: &KeyEvent) -> io::Result<()> {
        if !self.session.is_active() {
            if self.session.handle_any_input() {
                self.draw_board()?;
            }
            return Ok(());
        }

        if let Some(dir) = key_direction(key_ev) {
            self.session.handle_directional_input(dir);
        }

        Ok(())
    }

    fn draw_board(&mut self) -> io::Result<()> {
        self.term.clear()?;

        let grid = *self.session.grid();
        let border = grid.origin() / grid.cell_size();
        if border > 0 {
            let frame_cells = to_term(grid.cells() as i64 + 2)?;
            let corner = to_term(border as i64 - 1)?;
            self.term.draw_borders(
                (to_term(corner as i64 * 2 + 1)?, corner + HEADER_ROWS),
                to_term(frame_cells as i64 * 2 - 2)?,
                frame_cells,
            )?;
        }

        for row in 0..grid.cells() {
            for col in 0..grid.cells() {
                self.print_cell(grid.cell_at(col, row), EMPTY_CHARS)?;
            }
        }

        let (segments, head_char, fruit) = {
            let snapshot = self.session.snapshot();
            let segments: Vec<_> = snapshot.snake.segments().collect();
            (segments, snapshot.snake.head_char(), snapshot.fruit)
        };

        for segment in segments {
            let ch = match segment.kind {
                SegmentKind::Head => head_char,
                SegmentKind::Body => SNAKE_BODY_CHAR,
            };
            self.print_cell(segment.cell, [ch; 2])?;
        }

        self.print_cell(fruit, APPLE_CHARS)?;
        self.print_header()?;
        self.term.flush()
    }

    fn print_tick(&mut self, events: &TickEvents) -> io::Result<()> {
        if let MoveResult::Moved { new_head, old_head, old_tail } = events.movement {
            if let Some(old_tail_pos) = old_tail {
                if !self.session.snake().occupies(old_tail_pos) {
                    self.print_cell(old_tail_pos, EMPTY_CHARS)?;
                }
            }
            self.print_cell(old_head, [SNAKE_BODY_CHAR; 2])?;
            self.print_cell(new_head, [self.session.snake().head_char(); 2])?;
        }

        // Fruit goes on top of the snake
        self.print_cell(self.session.fruit(), APPLE_CHARS)?;

        if events.fruit_eaten {
            self.term.beep()?;
            self.print_header()?;
        }

        if events.game_ended {
            self.term.beep()?;
            self.game_over()?;
        }

        self.term.flush()
    }

    fn game_over(&mut self) -> io::Result<()> {
        let cells: Vec<Cell> = self.session.snake().body().iter().copied().collect();
        for cell in cells {
            self.print_cell(cell, [DEAD_SNAKE_CHAR; 2])?;
        }

        self.print_header()?;

        let reason = match self.session.phase() {
            Phase::GameOver(GameOverCause::OutOfBounds) => "You hit the wall",
            Phase::GameOver(GameOverCause::SelfCollision) => "You bit yourself",
            _ => "",
        };
        let score = format!("Score: {}", self.session.score());
        self.term.show_message(&["Game Over", reason, &*score, "", GUIDE_GAME_OVER])
    }

    /// Guide text on the left of the header row, score on the right.
    fn print_header(&mut self) -> io::Result<()> {
        let width = self.board_cells as usize * CELL_WIDTH as usize;
        let snapshot = self.session.snapshot();
        let guide = if snapshot.active { GUIDE_PLAYING } else { GUIDE_GAME_OVER };
        let score = snapshot.score.to_string();
        let guide_width = width.saturating_sub(score.len() + 1);

        let line = format!("{:<gw$} {}", truncate(guide, guide_width), score, gw = guide_width);
        self.term.print_str_at((0, 0), &line)
    }

    /// Draws a grid cell; anything outside the playable area is skipped.
    fn print_cell(&mut self, cell: Cell, chars: [char; 2]) -> io::Result<()> {
        if let Some(pos) = cell_position(self.session.grid(), cell) {
            self.term.print_at(pos, chars[0])?;
            self.term.print_at((pos.0 + 1, pos.1), chars[1])?;
        }
        Ok(())
    }
}

/// Terminal position of a playable cell. The border and the frame around the
/// board are never drawn over.
fn cell_position(grid: &Grid, cell: Cell) -> Option<Coords> {
    if !grid.is_within_playable_bounds(cell) {
        return None;
    }

    let (col, row) = grid.screen_index(cell);
    let x = TermInt::try_from(col as i64 * CELL_WIDTH as i64).ok()?;
    let y = TermInt::try_from(row as i64 + HEADER_ROWS as i64).ok()?;
    Some((x, y))
}

fn check_fits(board_cells: u32, (w, h): Coords) -> io::Result<()> {
    let need_w = board_cells as u64 * CELL_WIDTH as u64;
    let need_h = board_cells as u64 + HEADER_ROWS as u64;

    if (w as u64) < need_w || (h as u64) < need_h {
        return Err(io::Error::new(io::ErrorKind::Other, format!(
            "terminal is {}x{}, the board needs at least {}x{}", w, h, need_w, need_h
        )));
    }

    Ok(())
}

fn to_term(value: i64) -> io::Result<TermInt> {
    TermInt::try_from(value).map_err(|_| too_large())
}

fn too_large() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "board is too large for a terminal")
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn key_direction(ev: &KeyEvent) -> Option<Direction> {
    match ev.code {
        KeyCode::Char('w') | KeyCode::Up => Some(Up),
        KeyCode::Char('a') | KeyCode::Left => Some(Left),
        KeyCode::Char('s') | KeyCode::Down => Some(Down),
        KeyCode::Char('d') | KeyCode::Right => Some(Right),
        _ => None,
    }
}

fn is_quit(ev: &KeyEvent) -> bool {
    match ev.code {
        KeyCode::Esc => true,
        KeyCode::Char('c') => ev.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}
