//! Shared session state and the per-task capability handles.
//!
//! The five tasks never lock anything; every shared field has exactly one
//! writer. [`Session::split`] hands each task a handle exposing only the
//! operations that task is allowed to perform, so the single-writer table is
//! enforced by the API instead of by convention:
//!
//! | field       | writer        | reader       |
//! |-------------|---------------|--------------|
//! | `input`     | tilt pipeline | game machine |
//! | `sound`     | game machine  | sound service|
//! | `forced`    | button service| game machine |
//! | `countdown` | timer service | game machine |
//! | `armed`     | game machine  | timer service|
//!
//! Mailboxes are [`Signal`]s used as single-slot latest-wins slots: a deposit
//! overwrites whatever is pending, a take clears the slot. A command dropped
//! by an overwrite is a defined outcome, not an error.
//!
//! `countdown` is also stored by the game machine when it loads a fresh level
//! budget; that store only happens while the gate is disarmed, so the timer
//! service is the sole writer whenever the value is live.

use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, signal::Signal};

/// A movement command produced by the tilt pipeline.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InputCommand {
    Up,
    Down,
    Left,
    Right,
}

impl InputCommand {
    /// Unit offset in (x = column, y = row) coordinates, +y downwards.
    pub fn offset(self) -> (i32, i32) {
        match self {
            InputCommand::Up => (0, -1),
            InputCommand::Down => (0, 1),
            InputCommand::Left => (-1, 0),
            InputCommand::Right => (1, 0),
        }
    }
}

/// A jingle request for the sound service.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SoundRequest {
    WinJingle,
    LoseJingle,
}

/// A forced state transition requested by the button service.
///
/// Drained at the top of every game-machine iteration; this is the one
/// sanctioned way a second task steers the state tag.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ForcedState {
    Title,
    LevelIntro,
}

type Slot<T> = Signal<CriticalSectionRawMutex, T>;

/// Process-wide shared state. One instance lives for the whole run
/// (allocate it with `mk_static!`); [`split`](Session::split) it once at
/// startup.
pub struct Session {
    input: Slot<InputCommand>,
    sound: Slot<SoundRequest>,
    forced: Slot<ForcedState>,
    countdown: AtomicU16,
    armed: AtomicBool,
}

impl Session {
    pub const fn new() -> Self {
        Self {
            input: Signal::new(),
            sound: Signal::new(),
            forced: Signal::new(),
            countdown: AtomicU16::new(0),
            armed: AtomicBool::new(false),
        }
    }

    /// Split into one capability handle per task. Handles are not `Clone`:
    /// each writer exists exactly once.
    pub fn split(&self) -> Handles<'_> {
        Handles {
            game: GameHandle { s: self },
            timer: TimerHandle { s: self },
            tilt: TiltHandle { s: self },
            sound: SoundHandle { s: self },
            button: ButtonHandle { s: self },
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// The full set of task handles produced by [`Session::split`].
pub struct Handles<'s> {
    pub game: GameHandle<'s>,
    pub timer: TimerHandle<'s>,
    pub tilt: TiltHandle<'s>,
    pub sound: SoundHandle<'s>,
    pub button: ButtonHandle<'s>,
}

/// Game state machine's view: consumes input and overrides, requests sounds,
/// observes the countdown and owns the armed gate.
pub struct GameHandle<'s> {
    s: &'s Session,
}

impl GameHandle<'_> {
    /// Take the pending movement command, clearing the mailbox.
    pub fn take_input(&self) -> Option<InputCommand> {
        self.s.input.try_take()
    }

    /// Take the pending forced transition, clearing the mailbox.
    pub fn take_forced(&self) -> Option<ForcedState> {
        self.s.forced.try_take()
    }

    /// Request a jingle. Overwrites any request the sound service has not
    /// picked up yet.
    pub fn request_sound(&self, req: SoundRequest) {
        self.s.sound.signal(req);
    }

    pub fn countdown(&self) -> u16 {
        self.s.countdown.load(Ordering::Relaxed)
    }

    /// Load a fresh level budget. Only valid while the gate is disarmed.
    pub fn reset_countdown(&self, seconds: u16) {
        self.s.countdown.store(seconds, Ordering::Relaxed);
    }

    /// Open or close the timer's decrement gate.
    pub fn set_armed(&self, armed: bool) {
        self.s.armed.store(armed, Ordering::Relaxed);
    }
}

/// Timer service's view: decrements the countdown while the gate is armed.
pub struct TimerHandle<'s> {
    s: &'s Session,
}

impl TimerHandle<'_> {
    /// One timer interval: decrement by one if armed, never below zero.
    pub fn tick(&self) {
        if !self.s.armed.load(Ordering::Relaxed) {
            return;
        }
        let _ = self
            .s
            .countdown
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| v.checked_sub(1));
    }
}

/// Tilt pipeline's view: deposits movement commands, latest wins.
pub struct TiltHandle<'s> {
    s: &'s Session,
}

impl TiltHandle<'_> {
    pub fn deposit(&self, cmd: InputCommand) {
        self.s.input.signal(cmd);
    }
}

/// Sound service's view: consumes jingle requests.
pub struct SoundHandle<'s> {
    s: &'s Session,
}

impl SoundHandle<'_> {
    /// Take the pending request, clearing the mailbox. Taking before playing
    /// means a request deposited during playback stays pending for the next
    /// round instead of being wiped.
    pub fn take(&self) -> Option<SoundRequest> {
        self.s.sound.try_take()
    }
}

/// Button service's view: forces a state transition from any state.
pub struct ButtonHandle<'s> {
    s: &'s Session,
}

impl ButtonHandle<'_> {
    pub fn force(&self, state: ForcedState) {
        self.s.forced.signal(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_mailbox_is_latest_wins() {
        let session = Session::new();
        let h = session.split();

        h.tilt.deposit(InputCommand::Up);
        h.tilt.deposit(InputCommand::Left);
        assert_eq!(h.game.take_input(), Some(InputCommand::Left));
        // Consuming clears the slot.
        assert_eq!(h.game.take_input(), None);
    }

    #[test]
    fn sound_mailbox_overwrites_and_clears() {
        let session = Session::new();
        let h = session.split();

        h.game.request_sound(SoundRequest::WinJingle);
        h.game.request_sound(SoundRequest::LoseJingle);
        assert_eq!(h.sound.take(), Some(SoundRequest::LoseJingle));
        assert_eq!(h.sound.take(), None);
    }

    #[test]
    fn forced_transition_is_single_shot() {
        let session = Session::new();
        let h = session.split();

        assert_eq!(h.game.take_forced(), None);
        h.button.force(ForcedState::Title);
        assert_eq!(h.game.take_forced(), Some(ForcedState::Title));
        assert_eq!(h.game.take_forced(), None);
    }

    #[test]
    fn countdown_only_decrements_while_armed() {
        let session = Session::new();
        let h = session.split();

        h.game.reset_countdown(3);
        h.timer.tick();
        assert_eq!(h.game.countdown(), 3, "gate closed, no decrement");

        h.game.set_armed(true);
        h.timer.tick();
        h.timer.tick();
        assert_eq!(h.game.countdown(), 1);

        h.game.set_armed(false);
        h.timer.tick();
        assert_eq!(h.game.countdown(), 1);
    }

    #[test]
    fn countdown_never_goes_below_zero() {
        let session = Session::new();
        let h = session.split();

        h.game.reset_countdown(1);
        h.game.set_armed(true);
        h.timer.tick();
        h.timer.tick();
        h.timer.tick();
        assert_eq!(h.game.countdown(), 0);
    }

    #[test]
    fn command_offsets() {
        assert_eq!(InputCommand::Up.offset(), (0, -1));
        assert_eq!(InputCommand::Down.offset(), (0, 1));
        assert_eq!(InputCommand::Left.offset(), (-1, 0));
        assert_eq!(InputCommand::Right.offset(), (1, 0));
    }
}
