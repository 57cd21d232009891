//! Reset button service.
//!
//! A single active-high button forces a state transition from anywhere:
//! a short press restarts the level, holding it for two seconds returns to
//! the title screen. The external debounce circuit handles contact bounce;
//! a fixed hold after each classification keeps release chatter from
//! registering as a fresh press.

use embassy_time::{Duration, Instant, Timer};
use embedded_hal_async::digital::Wait;

use crate::session::{ButtonHandle, ForcedState};

/// Presses at or above this duration count as "long".
pub const LONG_PRESS: Duration = Duration::from_millis(2000);

const DEBOUNCE_HOLD: Duration = Duration::from_millis(500);

/// Short press restarts the level, long press goes back to the title.
pub fn classify(held: Duration) -> ForcedState {
    if held < LONG_PRESS {
        ForcedState::LevelIntro
    } else {
        ForcedState::Title
    }
}

/// Service loop: measure each press-release cycle and deposit the forced
/// transition. Pin faults abandon the current cycle silently.
pub async fn watch<P: Wait>(mut pin: P, resets: ButtonHandle<'_>) -> ! {
    loop {
        if pin.wait_for_high().await.is_err() {
            Timer::after(DEBOUNCE_HOLD).await;
            continue;
        }
        let pressed_at = Instant::now();
        if pin.wait_for_low().await.is_err() {
            Timer::after(DEBOUNCE_HOLD).await;
            continue;
        }
        resets.force(classify(pressed_at.elapsed()));
        Timer::after(DEBOUNCE_HOLD).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_press_durations() {
        assert_eq!(
            classify(Duration::from_millis(1999)),
            ForcedState::LevelIntro
        );
        assert_eq!(classify(Duration::from_millis(2000)), ForcedState::Title);
    }

    #[test]
    fn extremes() {
        assert_eq!(classify(Duration::from_millis(0)), ForcedState::LevelIntro);
        assert_eq!(classify(Duration::from_secs(60)), ForcedState::Title);
    }
}
