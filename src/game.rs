//! The game state machine.
//!
//! One task owns everything on this side: the maze, the player position, the
//! level counter, the state tag and the display link. Input, countdown and
//! forced resets arrive through the session handles; nothing here is shared
//! outward except the sound requests and the armed gate.
//!
//! Lifecycle: `Title → LevelIntro → MazeGeneration → Playing → {Win, Over}`,
//! with Win looping back to LevelIntro one level up. `End` is a reserved
//! terminal state no transition currently reaches. The button service can
//! force Title or LevelIntro from any state; that override is drained at the
//! top of every iteration.

use embassy_time::{Duration, Timer};
use embedded_io_async::Write;

use crate::{
    link::{DisplayLink, PLAYER, SCREEN_INTRO, SCREEN_OVER, SCREEN_TITLE, SCREEN_WIN},
    maze::{Cell, Maze, Rng},
    session::{ForcedState, GameHandle, InputCommand, SoundRequest},
};

/// Per-level time budget, in timer ticks (seconds).
pub const LEVEL_TIME: u16 = 60;

const TITLE_HOLD: Duration = Duration::from_millis(2000);
const LEVEL_HOLD: Duration = Duration::from_millis(2000);
const INTRO_HOLD: Duration = Duration::from_millis(3000);
const WIN_HOLD: Duration = Duration::from_millis(3000);
const IDLE_HOLD: Duration = Duration::from_millis(500);
const PLAY_POLL: Duration = Duration::from_millis(10);

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum State {
    Title,
    LevelIntro,
    MazeGeneration,
    Playing,
    Win,
    Over,
    /// Reserved explicit shutdown state; no transition reaches it yet.
    End,
}

pub struct Game<'s, W> {
    link: DisplayLink<W>,
    session: GameHandle<'s>,
    rng: Rng,
    maze: Maze,
    pos: (u8, u8),
    level: u8,
    state: State,
    /// Last countdown value reflected on the display. Persists across
    /// levels so a fresh budget shows up on the first Playing iteration.
    seen_countdown: u16,
}

impl<'s, W: Write> Game<'s, W> {
    pub fn new(port: W, session: GameHandle<'s>, seed: u32) -> Self {
        Self {
            link: DisplayLink::new(port),
            session,
            rng: Rng::new(seed),
            maze: Maze::filled(),
            pos: Maze::START,
            level: 1,
            state: State::Title,
            seen_countdown: 0,
        }
    }

    pub async fn run(mut self) -> ! {
        loop {
            if let Some(forced) = self.session.take_forced() {
                self.apply_forced(forced);
            }
            self.step().await;
        }
    }

    /// A forced reset silently discards whatever the current state was
    /// doing; the gate must not stay armed across it.
    fn apply_forced(&mut self, forced: ForcedState) {
        self.session.set_armed(false);
        self.state = match forced {
            ForcedState::Title => State::Title,
            ForcedState::LevelIntro => State::LevelIntro,
        };
    }

    /// One iteration of the current state.
    async fn step(&mut self) {
        match self.state {
            State::Title => {
                self.link.screen(SCREEN_TITLE).await;
                Timer::after(TITLE_HOLD).await;
                self.level = 1;
                self.state = State::LevelIntro;
            }
            State::LevelIntro => {
                self.link.screen((b'0' + self.level) as char).await;
                Timer::after(LEVEL_HOLD).await;
                self.link.screen(SCREEN_INTRO).await;
                Timer::after(INTRO_HOLD).await;
                self.state = State::MazeGeneration;
            }
            State::MazeGeneration => {
                self.maze = Maze::generate(&mut self.rng);
                self.link.full_grid(&self.maze).await;
                self.pos = Maze::START;
                self.link.ball(self.pos.0, self.pos.1, PLAYER).await;
                // Budget is loaded disarmed; the timer starts on first move.
                self.session.set_armed(false);
                self.session.reset_countdown(LEVEL_TIME);
                self.state = State::Playing;
            }
            State::Playing => {
                self.playing_tick().await;
                Timer::after(PLAY_POLL).await;
            }
            State::Win => {
                self.link.screen(SCREEN_WIN).await;
                self.session.request_sound(SoundRequest::WinJingle);
                Timer::after(WIN_HOLD).await;
                self.level = self.level.wrapping_add(1);
                self.state = State::LevelIntro;
            }
            State::Over | State::End => {
                // Holding states; only the button override leaves.
                Timer::after(IDLE_HOLD).await;
            }
        }
    }

    /// One Playing iteration: consume input, reflect the countdown, check
    /// win and loss.
    async fn playing_tick(&mut self) {
        if let Some(cmd) = self.session.take_input() {
            self.try_move(cmd).await;
            self.session.set_armed(true);
        }

        let countdown = self.session.countdown();
        if countdown != self.seen_countdown {
            self.link.time(countdown).await;
            self.seen_countdown = countdown;
            if countdown == 0 {
                self.link.screen(SCREEN_OVER).await;
                self.session.request_sound(SoundRequest::LoseJingle);
                self.session.set_armed(false);
                self.state = State::Over;
                return;
            }
        }

        if self.maze.at(self.pos.0 as usize, self.pos.1 as usize) == Cell::End {
            self.session.set_armed(false);
            self.state = State::Win;
        }
    }

    /// Apply a movement command. Walls and the grid edge reject the move
    /// with no output; an accepted move erases the vacated cell (painting it
    /// back in its own color) and paints the player on the target.
    async fn try_move(&mut self, cmd: InputCommand) {
        let (dx, dy) = cmd.offset();
        let (nx, ny) = (self.pos.0 as i32 + dx, self.pos.1 as i32 + dy);
        if !self.maze.is_open(nx, ny) {
            return;
        }

        let (ox, oy) = self.pos;
        self.link
            .cell(ox, oy, self.maze.at(ox as usize, oy as usize).color())
            .await;
        self.pos = (nx as u8, ny as u8);
        self.link.ball(self.pos.0, self.pos.1, PLAYER).await;
    }
}
