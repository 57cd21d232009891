//! Sound service: square-wave tones on a GPIO-driven piezo.
//!
//! The service polls the sound mailbox and plays whichever jingle is
//! requested, note by note. Playback blocks only this task; a request
//! arriving mid-jingle sits in the mailbox (latest wins) and is honored once
//! the current jingle finishes.

use embassy_time::{Duration, Instant, Timer};
use embedded_hal::digital::StatefulOutputPin;

use crate::{
    session::{SoundHandle, SoundRequest},
    tunes::{GAME_OVER_JINGLE, Note, WIN_JINGLE},
};

const POLL_PERIOD: Duration = Duration::from_millis(50);

/// Piezo speaker on a plain push-pull pin.
pub struct Speaker<P> {
    pin: P,
}

impl<P: StatefulOutputPin> Speaker<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// Play a tone sequence to completion, no overlap between notes.
    pub async fn play(&mut self, tune: &[Note]) {
        for note in tune {
            self.tone(note.freq, note.ms).await;
        }
    }

    async fn tone(&mut self, freq: u16, ms: u16) {
        let half_period = Duration::from_micros(500_000 / freq as u64);
        let end = Instant::now() + Duration::from_millis(ms as u64);
        while Instant::now() < end {
            let _ = self.pin.toggle();
            Timer::after(half_period).await;
        }
        let _ = self.pin.set_low();
    }
}

/// Service loop: consume the mailbox, then play. Consuming first keeps an
/// overwrite that lands during playback pending for the next round.
pub async fn run<P: StatefulOutputPin>(mut speaker: Speaker<P>, requests: SoundHandle<'_>) -> ! {
    loop {
        if let Some(req) = requests.take() {
            match req {
                SoundRequest::WinJingle => speaker.play(&WIN_JINGLE).await,
                SoundRequest::LoseJingle => speaker.play(&GAME_OVER_JINGLE).await,
            }
        }
        Timer::after(POLL_PERIOD).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embassy_futures::block_on;

    #[derive(Default)]
    struct FakePin {
        level: bool,
        toggles: u32,
    }

    impl embedded_hal::digital::ErrorType for FakePin {
        type Error = Infallible;
    }

    impl embedded_hal::digital::OutputPin for FakePin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.level = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.level = true;
            Ok(())
        }
    }

    impl StatefulOutputPin for FakePin {
        fn is_set_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.level)
        }

        fn is_set_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.level)
        }

        fn toggle(&mut self) -> Result<(), Infallible> {
            self.level = !self.level;
            self.toggles += 1;
            Ok(())
        }
    }

    #[test]
    fn tone_drives_the_pin_and_leaves_it_low() {
        let mut speaker = Speaker::new(FakePin::default());
        block_on(speaker.tone(2000, 20));
        assert!(speaker.pin.toggles >= 2);
        assert!(!speaker.pin.level);
    }
}
