//! # tiltmaze
//!
//! Firmware core for a tilt-controlled handheld maze game.
//!
//! The device generates a random maze, draws it on an external text-protocol
//! display over UART, moves the player by tilting (MPU6050 accelerometer),
//! counts down a per-level time budget and beeps on win/lose. Five embassy
//! tasks run the services in parallel:
//!
//! - game state machine (owns the maze, the player and the display link)
//! - countdown timer
//! - tilt input sampling
//! - sound playback
//! - reset button handling
//!
//! Tasks share nothing but [`session::Session`]: single-slot latest-wins
//! mailboxes plus two polled scalars, split into one capability handle per
//! task so every shared field has exactly one writer.
//!
//! All modules here are hardware-agnostic (written against the
//! `embedded-hal-async` / `embedded-io-async` traits) and unit-test on the
//! host; the ESP32-S3 wiring lives in `main.rs`.

#![cfg_attr(not(test), no_std)]

// Host tests use the embassy-time std driver, whose timer queue is
// implemented by embassy-executor; reference it so the symbol links.
#[cfg(test)]
use embassy_executor as _;

pub mod button;
pub mod game;
pub mod link;
pub mod maze;
pub mod mpu6050;
pub mod session;
pub mod speaker;
pub mod tilt;
pub mod tunes;

/// StaticCell helper — allocates a value into a `static` exactly once.
#[macro_export]
macro_rules! mk_static {
    ($t:ty, $val:expr) => {{
        static STATIC_CELL: static_cell::StaticCell<$t> = static_cell::StaticCell::new();
        #[deny(unused_attributes)]
        let x = STATIC_CELL.uninit().write($val);
        x
    }};
}
