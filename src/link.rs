//! Line-oriented protocol to the external display.
//!
//! The display is a separate device on the other end of a UART (9600 baud)
//! that understands four one-line instructions:
//!
//! ```text
//! S <char>            screen mode: 'S' title, '1'.. level digit,
//!                     'A' intro animation, 'O' game over, 'L' level won
//! T <int>             countdown readout
//! M <col> <row> <c>   paint a maze cell (K/W/R/G)
//! B <col> <row> <c>   paint the player token ('P'), or repaint with the
//!                     underlying cell color to erase
//! ```
//!
//! Only the game task writes here, so line ordering is exactly its iteration
//! order. Transport errors are dropped: the stream is best-effort.

use core::fmt::Write as _;

use embedded_io_async::Write;
use heapless::String;

use crate::maze::{COLS, Maze, ROWS};

pub const SCREEN_TITLE: char = 'S';
pub const SCREEN_INTRO: char = 'A';
pub const SCREEN_OVER: char = 'O';
pub const SCREEN_WIN: char = 'L';

/// Color character for the player token.
pub const PLAYER: char = 'P';

/// Emitter for the display protocol over any byte sink.
pub struct DisplayLink<W> {
    port: W,
}

impl<W: Write> DisplayLink<W> {
    pub fn new(port: W) -> Self {
        Self { port }
    }

    async fn send(&mut self, line: &str) {
        let _ = self.port.write_all(line.as_bytes()).await;
    }

    pub async fn screen(&mut self, code: char) {
        let mut line: String<16> = String::new();
        let _ = write!(line, "S {}\n", code);
        self.send(&line).await;
    }

    pub async fn time(&mut self, seconds: u16) {
        let mut line: String<16> = String::new();
        let _ = write!(line, "T {}\n", seconds);
        self.send(&line).await;
    }

    pub async fn cell(&mut self, x: u8, y: u8, color: char) {
        let mut line: String<16> = String::new();
        let _ = write!(line, "M {} {} {}\n", x, y, color);
        self.send(&line).await;
    }

    pub async fn ball(&mut self, x: u8, y: u8, color: char) {
        let mut line: String<16> = String::new();
        let _ = write!(line, "B {} {} {}\n", x, y, color);
        self.send(&line).await;
    }

    /// Emit the whole grid, column by column.
    pub async fn full_grid(&mut self, maze: &Maze) {
        for x in 0..COLS as u8 {
            for y in 0..ROWS as u8 {
                self.cell(x, y, maze.at(x as usize, y as usize).color()).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Rng;
    use core::convert::Infallible;
    use embassy_futures::block_on;
    use std::{cell::RefCell, rc::Rc};

    #[derive(Clone)]
    struct Sink(Rc<RefCell<Vec<u8>>>);

    impl Sink {
        fn new() -> Self {
            Sink(Rc::new(RefCell::new(Vec::new())))
        }

        fn text(&self) -> std::string::String {
            std::string::String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    impl embedded_io_async::ErrorType for Sink {
        type Error = Infallible;
    }

    impl embedded_io_async::Write for Sink {
        async fn write(&mut self, buf: &[u8]) -> Result<usize, Infallible> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }
    }

    #[test]
    fn instruction_lines_are_byte_exact() {
        let sink = Sink::new();
        let mut link = DisplayLink::new(sink.clone());

        block_on(async {
            link.screen(SCREEN_TITLE).await;
            link.time(60).await;
            link.cell(3, 4, 'K').await;
            link.ball(1, 1, PLAYER).await;
        });

        assert_eq!(sink.text(), "S S\nT 60\nM 3 4 K\nB 1 1 P\n");
    }

    #[test]
    fn full_grid_emits_every_cell_column_major() {
        let maze = Maze::generate(&mut Rng::new(3));
        let sink = Sink::new();
        let mut link = DisplayLink::new(sink.clone());

        block_on(link.full_grid(&maze));

        let text = sink.text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), ROWS * COLS);
        assert_eq!(lines[0], "M 0 0 K");
        // Column 0 is emitted before column 1.
        assert_eq!(lines[ROWS], format!("M 1 0 {}", maze.at(1, 0).color()));
        // Start and end markers appear with their colors.
        assert!(lines.contains(&"M 1 1 R"));
        assert!(lines.contains(&"M 13 17 G"));
    }
}
