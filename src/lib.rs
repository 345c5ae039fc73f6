#![cfg_attr(not(test), no_std)]

// must be first, so the macros are visible to later modules
include!(concat!(env!("OUT_DIR"), "/_macros.rs"));

mod fmt;

pub mod pac;

pub mod delay;
pub mod event;
pub mod gpio;
pub mod pm;

pub(crate) mod internal;

#[cfg(all(feature = "rt", target_arch = "riscv32"))]
pub mod rt;

mod _generated {
    #![allow(dead_code)]
    #![allow(unused_imports)]
    #![allow(non_snake_case)]
    #![allow(missing_docs)]

    include!(concat!(env!("OUT_DIR"), "/_generated.rs"));
}

pub use _generated::{interrupt, peripherals, Peripherals};
pub use embassy_hal_internal::{into_ref, Peripheral, PeripheralRef};
#[cfg(all(feature = "rt", target_arch = "riscv32"))]
pub use riscv_rt::entry;

use crate::pm::ClockPeripheral;

/// Macro to bind interrupts to handlers.
///
/// This defines the right interrupt handlers, and creates a unit struct (like `struct Irqs;`)
/// and implements the right [`Binding`]s for it. You can pass this struct to drivers to
/// prove at compile-time that the right interrupts have been bound.
///
/// Example of how to bind one interrupt:
///
/// ```rust,ignore
/// use mik32_hal::{bind_interrupts, gpio};
///
/// bind_interrupts!(struct Irqs {
///     GPIO_IRQ => gpio::irq::InterruptHandler;
/// });
/// ```
///
/// [`Binding`]: crate::interrupt::typelevel::Binding
#[macro_export]
macro_rules! bind_interrupts {
    ($vis:vis struct $name:ident { $($irq:ident => $($handler:ty),*;)* }) => {
        #[derive(Copy, Clone)]
        $vis struct $name;

        $(
            #[allow(non_snake_case)]
            #[no_mangle]
            unsafe extern "C" fn $irq() {
                $(
                    <$handler as $crate::interrupt::typelevel::Handler<$crate::interrupt::typelevel::$irq>>::on_interrupt();
                )*
            }

            $(
                unsafe impl $crate::interrupt::typelevel::Binding<$crate::interrupt::typelevel::$irq, $handler> for $name {}
            )*
        )*
    };
}

/// Power manager gates of the bus infrastructure, always on.
const APB_M_ALWAYS_ON: u32 = 1 << 0 // PM
    | 1 << 7; // WU

/// HAL configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct Config {
    pub pm: pm::Config,
    /// Clock GPIO0, GPIO1, GPIO2
    pub gpio_ports: [bool; gpio::PORTS],
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pm: Default::default(),
            gpio_ports: [true; gpio::PORTS],
        }
    }
}

/// Initialize the HAL: clocks, clock gates of the GPIO infrastructure.
///
/// Returns the peripheral singletons. Panics if called twice.
pub fn init(config: Config) -> Peripherals {
    unsafe {
        pm::init(&config.pm);
    }

    pm::enable_gates(pm::Bus::ApbM, APB_M_ALWAYS_ON);
    peripherals::EPIC::enable();
    peripherals::PAD_CONFIG::enable();
    peripherals::GPIO_IRQ::enable();

    let [gpio0, gpio1, gpio2] = config.gpio_ports;
    if gpio0 {
        peripherals::GPIO0::enable();
    }
    if gpio1 {
        peripherals::GPIO1::enable();
    }
    if gpio2 {
        peripherals::GPIO2::enable();
    }

    info!("mik32-hal init, AHB {}Hz", pm::clocks().ahb.raw());

    Peripherals::take()
}
