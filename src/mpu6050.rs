//! Minimal MPU6050 accelerometer driver.
//!
//! Only what the game needs: wake the device out of sleep and burst-read the
//! three acceleration axes. Generic over `embedded-hal-async` I2C so the
//! tilt pipeline can be exercised on the host with a fake bus.

use embedded_hal_async::i2c::I2c;

/// I2C device address (AD0 low).
pub const ADDR: u8 = 0x68;

/// Device identity register.
const WHO_AM_I: u8 = 0x75;
/// Power management register; the device boots asleep.
const PWR_MGMT_1: u8 = 0x6B;
/// First of the six accelerometer data registers (X/Y/Z, high byte first).
const ACCEL_XOUT_H: u8 = 0x3B;

pub struct Mpu6050<B> {
    bus: B,
}

impl<B: I2c> Mpu6050<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Read the identity register and wake the device. Returns the WHO_AM_I
    /// value (0x68 on genuine parts); callers are free to ignore it.
    pub async fn init(&mut self) -> Result<u8, B::Error> {
        let mut id = [0u8; 1];
        self.bus.write_read(ADDR, &[WHO_AM_I], &mut id).await?;
        self.bus.write(ADDR, &[PWR_MGMT_1, 0x00]).await?;
        Ok(id[0])
    }

    /// Burst-read raw acceleration for X, Y and Z.
    /// Big-endian two's-complement, full-scale counts.
    pub async fn read_accel(&mut self) -> Result<(i16, i16, i16), B::Error> {
        let mut raw = [0u8; 6];
        self.bus.write_read(ADDR, &[ACCEL_XOUT_H], &mut raw).await?;
        Ok((
            i16::from_be_bytes([raw[0], raw[1]]),
            i16::from_be_bytes([raw[2], raw[3]]),
            i16::from_be_bytes([raw[4], raw[5]]),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use embassy_futures::block_on;
    use embedded_hal_async::i2c::{ErrorType, Operation};

    /// Register-level fake: records writes, serves reads from a register
    /// image indexed by the last written register address.
    struct FakeBus {
        regs: [u8; 128],
        pointer: u8,
        writes: Vec<(u8, Vec<u8>)>,
    }

    impl FakeBus {
        fn new() -> Self {
            Self {
                regs: [0; 128],
                pointer: 0,
                writes: Vec::new(),
            }
        }
    }

    impl ErrorType for FakeBus {
        type Error = Infallible;
    }

    impl I2c for FakeBus {
        async fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Infallible> {
            assert_eq!(address, ADDR);
            for op in operations {
                match op {
                    Operation::Write(bytes) => {
                        self.pointer = bytes[0];
                        self.writes.push((bytes[0], bytes[1..].to_vec()));
                    }
                    Operation::Read(buf) => {
                        for (i, b) in buf.iter_mut().enumerate() {
                            *b = self.regs[self.pointer as usize + i];
                        }
                    }
                }
            }
            Ok(())
        }
    }

    #[test]
    fn init_reads_identity_and_wakes_device() {
        let mut bus = FakeBus::new();
        bus.regs[WHO_AM_I as usize] = 0x68;
        let mut imu = Mpu6050::new(bus);

        let id = block_on(imu.init()).unwrap();
        assert_eq!(id, 0x68);
        // Wake write: PWR_MGMT_1 <- 0x00
        assert!(imu.bus.writes.contains(&(PWR_MGMT_1, vec![0x00])));
    }

    #[test]
    fn accel_is_big_endian_signed() {
        let mut bus = FakeBus::new();
        // X = 0x1234, Y = -2 (0xFFFE), Z = 0x4000
        let data = [0x12, 0x34, 0xFF, 0xFE, 0x40, 0x00];
        bus.regs[ACCEL_XOUT_H as usize..ACCEL_XOUT_H as usize + 6].copy_from_slice(&data);
        let mut imu = Mpu6050::new(bus);

        let (ax, ay, az) = block_on(imu.read_accel()).unwrap();
        assert_eq!(ax, 0x1234);
        assert_eq!(ay, -2);
        assert_eq!(az, 0x4000);
    }
}
