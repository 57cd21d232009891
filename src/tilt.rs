//! Tilt input pipeline: accelerometer sample → movement command.
//!
//! Samples the MPU6050 at a fixed cadence and classifies each reading with a
//! fixed threshold. The first axis over threshold wins, in a fixed priority
//! order; a level board produces nothing (dead zone). Classified commands
//! overwrite the input mailbox — latest wins, there is no queue.

use embassy_time::{Duration, Timer};
use embedded_hal_async::i2c::I2c;

use crate::{
    mpu6050::Mpu6050,
    session::{InputCommand, TiltHandle},
};

/// Raw accelerometer counts a tilt must exceed to register.
pub const TILT_THRESHOLD: i16 = 3000;

/// Sample cadence.
const SAMPLE_PERIOD: Duration = Duration::from_millis(200);

/// Classify one sample. Axis-to-direction mapping is the device's fixed
/// calibration: +X up, −X down, +Y right, −Y left, evaluated in that order.
/// The Z axis only carries gravity when the board is level and is ignored.
pub fn classify(ax: i16, ay: i16, _az: i16) -> Option<InputCommand> {
    if ax > TILT_THRESHOLD {
        Some(InputCommand::Up)
    } else if ax < -TILT_THRESHOLD {
        Some(InputCommand::Down)
    } else if ay > TILT_THRESHOLD {
        Some(InputCommand::Right)
    } else if ay < -TILT_THRESHOLD {
        Some(InputCommand::Left)
    } else {
        None
    }
}

/// Sampling loop. Bus errors are indistinguishable from "no tilt": the
/// sample is skipped and the next one is taken on schedule.
pub async fn run<B: I2c>(mut imu: Mpu6050<B>, inputs: TiltHandle<'_>) -> ! {
    let _ = imu.init().await;
    loop {
        if let Ok((ax, ay, az)) = imu.read_accel().await {
            if let Some(cmd) = classify(ax, ay, az) {
                inputs.deposit(cmd);
            }
        }
        Timer::after(SAMPLE_PERIOD).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_board_is_dead_zone() {
        assert_eq!(classify(0, 0, 16384), None);
        assert_eq!(classify(2999, -2999, 0), None);
    }

    #[test]
    fn threshold_is_strict() {
        assert_eq!(classify(3000, 0, 0), None);
        assert_eq!(classify(3001, 0, 0), Some(InputCommand::Up));
        assert_eq!(classify(-3000, 0, 0), None);
        assert_eq!(classify(-3001, 0, 0), Some(InputCommand::Down));
        assert_eq!(classify(0, 3001, 0), Some(InputCommand::Right));
        assert_eq!(classify(0, -3001, 0), Some(InputCommand::Left));
    }

    #[test]
    fn x_axis_takes_priority_over_y() {
        assert_eq!(classify(5000, 5000, 0), Some(InputCommand::Up));
        assert_eq!(classify(-5000, -5000, 0), Some(InputCommand::Down));
    }
}
