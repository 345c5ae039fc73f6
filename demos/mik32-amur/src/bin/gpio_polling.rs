#![no_main]
#![no_std]

use hal::delay::spin;
use hal::gpio::{Drive, Input, Level, Output, Pull};
use {defmt_rtt as _, mik32_hal as hal, panic_halt as _, riscv_rt as _};

#[hal::entry]
fn main() -> ! {
    let p = hal::init(Default::default());

    defmt::info!("Board init!");

    let mut led1 = Output::new(p.P0_9, Level::Low, Drive::default());
    let mut led2 = Output::new(p.P0_10, Level::Low, Drive::default());
    let button = Input::new(p.P1_15, Pull::None);

    loop {
        led2.toggle();
        spin(100_000);

        // LED1 follows the button
        led1.set_level(button.get_level());
    }
}
