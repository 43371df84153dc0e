#![no_std]
#![no_main]

use core::fmt::Write;

use panic_halt as _;
use cortex_m::peripheral::DWT;
use cortex_m_rt::entry;
use stm32f1xx_hal::{i2c::{BlockingI2c, DutyCycle, Mode}, pac, prelude::*, rcc, serial::{Config, Serial}, timer::Timer};
use tmp116::Tmp116;

// alarm window programmed at boot
const HIGH_LIMIT_C: f64 = 30.0;
const LOW_LIMIT_C: f64 = 10.0;

#[entry]
fn main() -> ! {
    // core peripherals
    let mut cp = cortex_m::Peripherals::take().unwrap();
    // device peripherals
    let dp = pac::Peripherals::take().unwrap();

    let mut flash = dp.FLASH.constrain();
    let mut rcc = dp.RCC.freeze(rcc::Config::hse(8.MHz()).sysclk(72.MHz()), &mut flash.acr);

    let mut led = {
        let mut gpioc = dp.GPIOC.split(&mut rcc);
        gpioc.pc13.into_push_pull_output(&mut gpioc.crh)
    };

    let (mut tx, _) = {
        let mut gpioa = dp.GPIOA.split(&mut rcc);
        let tx = gpioa.pa9.into_alternate_push_pull(&mut gpioa.crh);
        let rx = gpioa.pa10;
        let serial = Serial::new(dp.USART1, (tx, rx), Config::default().baudrate(115200.bps()), &mut rcc);
        serial.split()
    };

    // BlockingI2c times out on the cycle counter
    DWT::enable_cycle_counter(&mut cp.DWT);
    let i2c = {
        let gpiob = dp.GPIOB.split(&mut rcc);
        let mode = Mode::fast(400.kHz(), DutyCycle::Ratio16to9);

        BlockingI2c::new(dp.I2C1, (gpiob.pb6, gpiob.pb7), mode, &mut rcc, 1000, 10, 1000, 1000)
    };

    let mut tmp116 = Tmp116::new(i2c, dp.TIM2.delay_us(&mut rcc));

    // serial write errors have nowhere to go, drop them
    match tmp116.probe() {
        Ok(id) => { let _ = write!(tx, "TMP116, id, {:#06x}\r\n", id); }
        Err(_) => { let _ = write!(tx, "TMP116, error, probe\r\n"); }
    }

    if tmp116.write_high_limit(HIGH_LIMIT_C).and_then(|_| tmp116.write_low_limit(LOW_LIMIT_C)).is_err() {
        let _ = write!(tx, "TMP116, error, limits\r\n");
    }

    let mut timer = Timer::syst(cp.SYST, &rcc.clocks).counter_hz();
    timer.start(1.Hz()).unwrap();

    loop {
        nb::block!(timer.wait()).unwrap();

        let _ = match tmp116.read_temperature() {
            Ok(t) => write!(tx, "TMP116, temperature, {:.2}\r\n", t),
            Err(_) => write!(tx, "TMP116, error, read\r\n"),
        };
        led.toggle();
    }
}
