#![no_main]
#![no_std]

use hal::event::DebouncedToggle;
use hal::gpio::irq::{self, IrqInput, Line, Trigger};
use hal::gpio::{Drive, Level, Output, Pull};
use riscv::delay::McycleDelay;
use {defmt_rtt as _, mik32_hal as hal, panic_halt as _, riscv_rt as _};

hal::bind_interrupts!(struct Irqs {
    GPIO_IRQ => irq::InterruptHandler;
});

#[hal::entry]
fn main() -> ! {
    let p = hal::init(Default::default());

    defmt::info!("Board init!");

    let led = Output::new(p.P0_9, Level::Low, Drive::default());
    let button = match IrqInput::new(p.P1_15, Line::Line7, Pull::None, Trigger::FallingEdge) {
        Ok(button) => button,
        Err(e) => defmt::panic!("button line: {}", e),
    };

    irq::enable_interrupt(p.GPIO_IRQ, Irqs);
    unsafe { hal::interrupt::enable_global() };

    let mut led = DebouncedToggle::new(led, McycleDelay::new(hal::pm::clocks().ahb.raw()), 0);

    loop {
        if let Ok(n) = led.poll_counter(button.events()) {
            if n > 0 {
                defmt::info!("{} presses", n);
            }
        }
    }
}
