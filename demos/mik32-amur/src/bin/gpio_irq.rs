#![no_main]
#![no_std]

use hal::event::{DebouncedToggle, Flag};
use hal::gpio::irq::{self, IrqInput, Line, Trigger};
use hal::gpio::{Drive, Level, Output, Pull};
use hal::interrupt::InterruptExt;
use riscv::delay::McycleDelay;
use {defmt_rtt as _, mik32_hal as hal, panic_halt as _, riscv_rt as _};

const BUTTON_LINE: Line = Line::Line3;
const DEBOUNCE_MS: u32 = 50;

static BUTTON_PRESSED: Flag = Flag::new();

#[allow(non_snake_case)]
#[no_mangle]
unsafe extern "C" fn GPIO_IRQ() {
    if irq::acknowledge(BUTTON_LINE) {
        BUTTON_PRESSED.signal();
    }
}

#[hal::entry]
fn main() -> ! {
    let p = hal::init(Default::default());

    defmt::info!("Board init!");

    let led = Output::new(p.P0_9, Level::Low, Drive::default());
    // P1_15 reaches line 3 through mux 8
    let _button = match IrqInput::new(p.P1_15, BUTTON_LINE, Pull::None, Trigger::FallingEdge) {
        Ok(button) => button,
        Err(e) => defmt::panic!("button line: {}", e),
    };

    unsafe {
        hal::interrupt::GPIO_IRQ.enable_level();
        hal::interrupt::enable_global();
    }

    let mut led = DebouncedToggle::new(led, McycleDelay::new(hal::pm::clocks().ahb.raw()), DEBOUNCE_MS);

    loop {
        if let Ok(true) = led.poll(&BUTTON_PRESSED) {
            defmt::info!("button pressed, led = {}", led.output().is_set_high());
        }
    }
}
