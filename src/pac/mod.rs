//! Register blocks of the MIK32 peripherals this HAL drives.
//!
//! Every block is a `Copy` handle around a base pointer, so tests can place a
//! block over plain memory with `from_ptr`.
#![allow(clippy::missing_safety_doc)]
#![allow(non_camel_case_types)]

pub mod common;
pub mod epic;
pub mod gpio;
pub mod gpio_irq;
pub mod mtimer;
pub mod pad_config;
pub mod pm;

pub const PM: pm::Pm = unsafe { pm::Pm::from_ptr(0x0005_0000usize as _) };
pub const EPIC: epic::Epic = unsafe { epic::Epic::from_ptr(0x0005_0400usize as _) };
pub const PAD_CONFIG: pad_config::PadConfig = unsafe { pad_config::PadConfig::from_ptr(0x0005_0c00usize as _) };
pub const GPIO0: gpio::Gpio = unsafe { gpio::Gpio::from_ptr(0x0008_4000usize as _) };
pub const GPIO1: gpio::Gpio = unsafe { gpio::Gpio::from_ptr(0x0008_4400usize as _) };
pub const GPIO2: gpio::Gpio = unsafe { gpio::Gpio::from_ptr(0x0008_4800usize as _) };
pub const GPIO_IRQ: gpio_irq::GpioIrq = unsafe { gpio_irq::GpioIrq::from_ptr(0x0008_4c00usize as _) };
pub const MTIMER: mtimer::Mtimer = unsafe { mtimer::Mtimer::from_ptr(0x0049_0000usize as _) };

/// Number of EPIC lines.
pub const EPIC_LINES: usize = 32;

/// An interrupt source number.
pub trait InterruptNumber: Copy {
    fn number(self) -> u16;
}

/// EPIC interrupt lines.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum Interrupt {
    TIMER32_0 = 0,
    UART_0 = 1,
    UART_1 = 2,
    SPI_0 = 3,
    SPI_1 = 4,
    GPIO_IRQ = 5,
    I2C_0 = 6,
    I2C_1 = 7,
    WDT = 8,
    TIMER16_0 = 9,
    TIMER16_1 = 10,
    TIMER16_2 = 11,
    TIMER32_1 = 12,
    TIMER32_2 = 13,
    SPIFI = 14,
    RTC = 15,
    EEPROM = 16,
    WDT_DOM3 = 17,
    WDT_SPIFI = 18,
    WDT_EEPROM = 19,
    DMA = 20,
    FREQ_MON = 21,
    PVD_AVCC_UNDER = 22,
    PVD_AVCC_OVER = 23,
    PVD_VCC_UNDER = 24,
    PVD_VCC_OVER = 25,
    BATTERY_NON_GOOD = 26,
    BOR = 27,
    TSENS = 28,
    ADC = 29,
    DAC0 = 30,
    DAC1 = 31,
}

impl InterruptNumber for Interrupt {
    #[inline(always)]
    fn number(self) -> u16 {
        self as u16
    }
}
