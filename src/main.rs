//! Tilt-maze firmware for the ESP32-S3 handheld.
//!
//! Wires the five services to the hardware and spawns one task each:
//! game state machine (UART display link), countdown timer, tilt sampling
//! (MPU6050 over I2C), sound (piezo pin) and the reset button.
//!
//! Everything below is target-only; host builds compile the library and its
//! tests instead.

#![cfg_attr(target_arch = "xtensa", no_std)]
#![cfg_attr(target_arch = "xtensa", no_main)]

#[cfg(target_arch = "xtensa")]
mod app {
    use defmt::info;
    use embassy_executor::Spawner;
    use embassy_time::{Duration, Instant, Ticker, Timer};
    use esp_backtrace as _;
    use esp_hal::{
        Async,
        assign_resources,
        gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull},
        i2c::master::{Config as I2cConfig, I2c},
        timer::timg::TimerGroup,
        uart::{Config as UartConfig, Uart},
    };
    use esp_println as _;
    use tiltmaze::{
        button,
        game::Game,
        mk_static,
        mpu6050::Mpu6050,
        session::{ButtonHandle, GameHandle, Session, SoundHandle, TiltHandle, TimerHandle},
        speaker::{self, Speaker},
        tilt,
    };

    esp_bootloader_esp_idf::esp_app_desc!();

    const TIMER_PERIOD: Duration = Duration::from_secs(1);

    // ── Pin / peripheral assignments ────────────────────────────────────────

    assign_resources! {
        pub Resources<'d> {
            lcd: LcdResources<'d> {
                tx: GPIO17,
                uart: UART1,
            },
            imu: ImuResources<'d> {
                sda: GPIO8,
                scl: GPIO9,
                i2c: I2C0,
            },
            speaker: SpeakerResources<'d> {
                pin: GPIO10,
            },
            button: ButtonResources<'d> {
                pin: GPIO4,
            },
        }
    }

    // ── Tasks ───────────────────────────────────────────────────────────────

    #[embassy_executor::task]
    async fn game_task(lcd: Uart<'static, Async>, seat: GameHandle<'static>, seed: u32) {
        info!("game task up, seed {=u32}", seed);
        Game::new(lcd, seat, seed).run().await
    }

    #[embassy_executor::task]
    async fn timer_task(countdown: TimerHandle<'static>) {
        info!("timer task up");
        let mut ticker = Ticker::every(TIMER_PERIOD);
        loop {
            ticker.next().await;
            countdown.tick();
        }
    }

    #[embassy_executor::task]
    async fn tilt_task(i2c: I2c<'static, Async>, inputs: TiltHandle<'static>) {
        info!("tilt task up");
        tilt::run(Mpu6050::new(i2c), inputs).await
    }

    #[embassy_executor::task]
    async fn sound_task(pin: Output<'static>, requests: SoundHandle<'static>) {
        info!("sound task up");
        speaker::run(Speaker::new(pin), requests).await
    }

    #[embassy_executor::task]
    async fn button_task(pin: Input<'static>, resets: ButtonHandle<'static>) {
        info!("button task up");
        button::watch(pin, resets).await
    }

    // ── Entry ───────────────────────────────────────────────────────────────

    #[esp_rtos::main]
    async fn main(spawner: Spawner) -> ! {
        let peripherals = esp_hal::init(esp_hal::Config::default());
        let resources = split_resources!(peripherals);

        esp_alloc::heap_allocator!(size: 64 * 1024);

        let timg0 = TimerGroup::new(peripherals.TIMG0);
        esp_rtos::start(timg0.timer0);

        let session = mk_static!(Session, Session::new());
        let handles = session.split();

        let lcd = Uart::new(
            resources.lcd.uart,
            UartConfig::default().with_baudrate(9600),
        )
        .unwrap()
        .with_tx(resources.lcd.tx)
        .into_async();

        let i2c = I2c::new(resources.imu.i2c, I2cConfig::default())
            .unwrap()
            .with_sda(resources.imu.sda)
            .with_scl(resources.imu.scl)
            .into_async();

        let speaker_pin = Output::new(resources.speaker.pin, Level::Low, OutputConfig::default());
        let button_pin = Input::new(
            resources.button.pin,
            InputConfig::default().with_pull(Pull::Down),
        );

        let seed = Instant::now().as_micros() as u32;

        spawner.must_spawn(game_task(lcd, handles.game, seed));
        spawner.must_spawn(timer_task(handles.timer));
        spawner.must_spawn(tilt_task(i2c, handles.tilt));
        spawner.must_spawn(sound_task(speaker_pin, handles.sound));
        spawner.must_spawn(button_task(button_pin, handles.button));

        info!("tiltmaze up, all services running");

        loop {
            Timer::after(Duration::from_secs(600)).await;
        }
    }
}

#[cfg(not(target_arch = "xtensa"))]
fn main() {}
