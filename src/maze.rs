//! Maze grid and randomized depth-first generation.
//!
//! The grid is a fixed 19×15 lattice of walls carved from cell (1,1). The
//! carve visits cells two apart, opening the wall in between, which yields a
//! spanning tree over the odd-coordinate lattice: every open cell ends up on
//! exactly one simple path from the start, no connectivity check needed.
//!
//! Coordinates are (x = column, y = row) everywhere, stored `cells[y][x]`.

use heapless::Vec;

pub const ROWS: usize = 19;
pub const COLS: usize = 15;

/// Carve candidates, two cells away.
const CARVE_DIRS: [(i8, i8); 4] = [(0, 2), (2, 0), (0, -2), (-2, 0)];

/// Upper bound on carve depth: one frame per cell of the 7×9 carve lattice.
const CARVE_STACK: usize = 64;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Cell {
    Wall,
    Path,
    Start,
    End,
}

impl Cell {
    /// Display protocol color character for this cell kind.
    pub fn color(self) -> char {
        match self {
            Cell::Wall => 'K',
            Cell::Path => 'W',
            Cell::Start => 'R',
            Cell::End => 'G',
        }
    }
}

/// xorshift32. Small, fast, and plenty for maze shuffling.
pub struct Rng(u32);

impl Rng {
    pub const fn new(seed: u32) -> Self {
        // xorshift sticks at zero
        Self(if seed == 0 { 0x9E37_79B9 } else { seed })
    }

    fn next(&mut self) -> u32 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 17;
        self.0 ^= self.0 << 5;
        self.0
    }

    fn range(&mut self, max: u32) -> u32 {
        self.next() % max
    }
}

/// One in-progress carve position: where we are and which shuffled
/// directions remain to try. Replaces the call stack of the recursive
/// formulation.
struct Frame {
    x: i8,
    y: i8,
    dirs: [(i8, i8); 4],
    next: u8,
}

impl Frame {
    fn new(x: i8, y: i8, rng: &mut Rng) -> Self {
        let mut dirs = CARVE_DIRS;
        for i in (1..dirs.len()).rev() {
            let j = rng.range(i as u32 + 1) as usize;
            dirs.swap(i, j);
        }
        Self { x, y, dirs, next: 0 }
    }

    fn step(&mut self) -> Option<(i8, i8)> {
        let d = *self.dirs.get(self.next as usize)?;
        self.next += 1;
        Some(d)
    }
}

pub struct Maze {
    cells: [[Cell; COLS]; ROWS],
}

impl Maze {
    /// Player spawn, always the carve origin.
    pub const START: (u8, u8) = (1, 1);
    /// Goal cell, always the far interior corner: (13, 17).
    pub const END: (u8, u8) = (COLS as u8 - 2, ROWS as u8 - 2);

    /// A grid of solid wall. Placeholder until the first generation runs.
    pub const fn filled() -> Self {
        Self {
            cells: [[Cell::Wall; COLS]; ROWS],
        }
    }

    /// Build a fresh maze: solid wall, randomized depth-first carve from
    /// (1,1), then mark start and end. Cannot fail for these dimensions.
    pub fn generate(rng: &mut Rng) -> Self {
        let mut maze = Self::filled();
        maze.cells[1][1] = Cell::Path;

        let mut stack: Vec<Frame, CARVE_STACK> = Vec::new();
        let _ = stack.push(Frame::new(1, 1, rng));

        loop {
            let Some(top) = stack.last_mut() else { break };
            let step = top.step();
            let (x, y) = (top.x as i32, top.y as i32);
            let Some((dx, dy)) = step else {
                stack.pop();
                continue;
            };

            let (nx, ny) = (x + dx as i32, y + dy as i32);
            let (wx, wy) = (x + dx as i32 / 2, y + dy as i32 / 2);
            if nx < 1 || nx > COLS as i32 - 2 || ny < 1 || ny > ROWS as i32 - 2 {
                continue;
            }
            // Both the target and the wall between must still be uncarved.
            if maze.cells[ny as usize][nx as usize] != Cell::Wall
                || maze.cells[wy as usize][wx as usize] != Cell::Wall
            {
                continue;
            }

            maze.cells[wy as usize][wx as usize] = Cell::Path;
            maze.cells[ny as usize][nx as usize] = Cell::Path;
            let _ = stack.push(Frame::new(nx as i8, ny as i8, rng));
        }

        let (sx, sy) = Self::START;
        let (ex, ey) = Self::END;
        maze.cells[sy as usize][sx as usize] = Cell::Start;
        maze.cells[ey as usize][ex as usize] = Cell::End;
        maze
    }

    pub fn at(&self, x: usize, y: usize) -> Cell {
        self.cells[y][x]
    }

    /// In bounds and not a wall — i.e. the player may stand here.
    pub fn is_open(&self, x: i32, y: i32) -> bool {
        x >= 0
            && x < COLS as i32
            && y >= 0
            && y < ROWS as i32
            && self.cells[y as usize][x as usize] != Cell::Wall
    }
}
