//! General Purpose Input/Output
//!
//! Pins are named `P<port>_<pin>`: ports 0 and 1 have 16 pins, port 2 has 8.

use core::convert::Infallible;

use embassy_hal_internal::{impl_peripheral, into_ref, Peripheral, PeripheralRef};

use crate::{pac, peripherals};

pub mod irq;

/// Number of GPIO ports.
pub const PORTS: usize = 3;

/// Pin direction.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Input,
    Output,
}

/// One GPIO port.
///
/// Operates on pin masks; bit `n` is pin `n` of the port. Pin drivers like
/// [`Output`] and [`Input`] use this underneath.
#[derive(Copy, Clone)]
pub struct Port {
    regs: pac::gpio::Gpio,
}

impl Port {
    /// Take ownership of a whole port.
    pub fn new<T: Instance>(_port: impl Peripheral<P = T>) -> Self {
        Self::from_regs(T::regs())
    }

    pub(crate) const fn from_regs(regs: pac::gpio::Gpio) -> Self {
        Self { regs }
    }

    pub(crate) const fn from_index(port: usize) -> Self {
        match port {
            0 => Self::from_regs(pac::GPIO0),
            1 => Self::from_regs(pac::GPIO1),
            _ => Self::from_regs(pac::GPIO2),
        }
    }

    /// Set the direction of the pins in `mask`. Other pins are left alone.
    #[inline]
    pub fn set_direction(&self, mask: u32, direction: Direction) {
        match direction {
            Direction::Output => self.regs.direction_out().write_value(mask),
            Direction::Input => self.regs.direction_in().write_value(mask),
        }
    }

    /// Mask of pins configured as outputs.
    #[inline]
    pub fn outputs(&self) -> u32 {
        self.regs.direction_out().read()
    }

    #[inline]
    pub fn direction(&self, pin: u8) -> Direction {
        if self.outputs() & (1 << pin) != 0 {
            Direction::Output
        } else {
            Direction::Input
        }
    }

    /// Drive the pins in `mask` high.
    #[inline]
    pub fn set_high(&self, mask: u32) {
        self.regs.set().write_value(mask);
    }

    /// Drive the pins in `mask` low.
    #[inline]
    pub fn set_low(&self, mask: u32) {
        self.regs.clear().write_value(mask);
    }

    /// Drive the pins in `mask` to `level`.
    #[inline]
    pub fn write(&self, mask: u32, level: Level) {
        match level {
            Level::High => self.set_high(mask),
            Level::Low => self.set_low(mask),
        }
    }

    /// Input state of all pins.
    #[inline]
    pub fn read(&self) -> u32 {
        self.regs.set().read()
    }

    /// Output latch of all pins.
    #[inline]
    pub fn output(&self) -> u32 {
        self.regs.output().read()
    }

    /// Invert the output latch of the pins in `mask`.
    #[inline]
    pub fn toggle(&self, mask: u32) {
        critical_section::with(|_| {
            self.regs.output().modify(|w| *w ^= mask);
        });
    }
}

/// Pad configuration of all ports.
#[derive(Copy, Clone)]
pub struct Pads {
    regs: pac::pad_config::PadConfig,
}

impl Pads {
    pub(crate) const fn from_regs(regs: pac::pad_config::PadConfig) -> Self {
        Self { regs }
    }

    pub(crate) const fn new() -> Self {
        Self::from_regs(pac::PAD_CONFIG)
    }

    #[inline]
    pub fn set_function(&self, port: usize, pin: usize, function: PadFunction) {
        critical_section::with(|_| {
            self.regs
                .port(port)
                .cfg()
                .modify(|w| w.set_pin(pin, function as u8));
        });
    }

    #[inline]
    pub fn function(&self, port: usize, pin: usize) -> PadFunction {
        PadFunction::from_bits(self.regs.port(port).cfg().read().pin(pin))
    }

    #[inline]
    pub fn set_pull(&self, port: usize, pin: usize, pull: Pull) {
        critical_section::with(|_| {
            self.regs.port(port).pupd().modify(|w| w.set_pin(pin, pull as u8));
        });
    }

    #[inline]
    pub fn pull(&self, port: usize, pin: usize) -> Pull {
        match self.regs.port(port).pupd().read().pin(pin) {
            0b01 => Pull::Up,
            0b10 => Pull::Down,
            _ => Pull::None,
        }
    }

    #[inline]
    pub fn set_drive(&self, port: usize, pin: usize, drive: Drive) {
        critical_section::with(|_| {
            self.regs.port(port).ds().modify(|w| w.set_pin(pin, drive as u8));
        });
    }
}

/// GPIO flexible pin.
pub struct Flex<'d> {
    pub(crate) pin: PeripheralRef<'d, AnyPin>,
}

impl<'d> Flex<'d> {
    /// Wrap the pin in a `Flex`.
    ///
    /// The pad is switched to the GPIO function and the pin starts as an input.
    #[inline]
    pub fn new(pin: impl Peripheral<P = impl Pin> + 'd) -> Self {
        into_ref!(pin);
        pin.set_as_gpio();
        Self { pin: pin.map_into() }
    }

    /// Put the pin into input mode.
    #[inline]
    pub fn set_as_input(&mut self, pull: Pull) {
        critical_section::with(|_| {
            self.pin.set_pull(pull);
            self.pin.set_as_input();
        });
    }

    /// Put the pin into output mode.
    ///
    /// The pin level will be whatever was set before (or low by default). If you want it to begin
    /// at a specific level, call `set_high`/`set_low` on the pin first.
    #[inline]
    pub fn set_as_output(&mut self, drive: Drive) {
        critical_section::with(|_| {
            self.pin.pads().set_drive(self.pin._port(), self.pin._pin(), drive);
            self.pin.set_as_output();
        });
    }

    #[inline]
    pub fn set_pull(&mut self, pull: Pull) {
        self.pin.set_pull(pull);
    }

    /// Get whether the pin input level is high.
    #[inline]
    pub fn is_high(&self) -> bool {
        self.pin.is_high()
    }

    /// Get whether the pin input level is low.
    #[inline]
    pub fn is_low(&self) -> bool {
        !self.is_high()
    }

    /// Get the current pin input level.
    #[inline]
    pub fn get_level(&self) -> Level {
        self.is_high().into()
    }

    /// Get whether the output level is set to high.
    #[inline]
    pub fn is_set_high(&self) -> bool {
        self.pin.gpio().output() & self.pin.mask() != 0
    }

    /// Get whether the output level is set to low.
    #[inline]
    pub fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }

    /// Get the current output level.
    #[inline]
    pub fn get_output_level(&self) -> Level {
        self.is_set_high().into()
    }

    /// Set the output as high.
    #[inline]
    pub fn set_high(&mut self) {
        self.pin.set_high();
    }

    /// Set the output as low.
    #[inline]
    pub fn set_low(&mut self) {
        self.pin.set_low();
    }

    /// Set the output level.
    #[inline]
    pub fn set_level(&mut self, level: Level) {
        self.pin.gpio().write(self.pin.mask(), level);
    }

    /// Toggle the output level.
    #[inline]
    pub fn toggle(&mut self) {
        self.pin.gpio().toggle(self.pin.mask());
    }
}

impl<'d> Drop for Flex<'d> {
    #[inline]
    fn drop(&mut self) {
        // back to a floating input
        critical_section::with(|_| {
            self.pin.set_as_input();
            self.pin.set_pull(Pull::None);
        });
    }
}

/// Digital input or output level.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Low
    Low,
    /// High
    High,
}

impl From<bool> for Level {
    fn from(val: bool) -> Self {
        match val {
            true => Self::High,
            false => Self::Low,
        }
    }
}

impl From<Level> for bool {
    fn from(level: Level) -> bool {
        match level {
            Level::Low => false,
            Level::High => true,
        }
    }
}

/// Pull setting for an input.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    /// No pull
    None = 0b00,
    /// Pull up
    Up = 0b01,
    /// Pull down
    Down = 0b10,
}

/// Output drive strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Drive {
    #[default]
    _2mA = 0b00,
    _4mA = 0b01,
    _8mA = 0b10,
}

/// Pad function select, PORT_n_CFG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PadFunction {
    /// General purpose IO
    Gpio = 0b00,
    /// Serial interface function
    Alt1 = 0b01,
    /// Timer or analog function
    Alt2 = 0b10,
    Alt3 = 0b11,
}

impl PadFunction {
    const fn from_bits(val: u8) -> Self {
        match val & 0b11 {
            0b00 => PadFunction::Gpio,
            0b01 => PadFunction::Alt1,
            0b10 => PadFunction::Alt2,
            _ => PadFunction::Alt3,
        }
    }
}

/// GPIO input driver.
pub struct Input<'d> {
    pub(crate) pin: Flex<'d>,
}

impl<'d> Input<'d> {
    /// Create GPIO input driver for a [Pin] with the provided [Pull] configuration.
    #[inline]
    pub fn new(pin: impl Peripheral<P = impl Pin> + 'd, pull: Pull) -> Self {
        let mut pin = Flex::new(pin);
        pin.set_as_input(pull);
        Self { pin }
    }

    /// Get whether the pin input level is high.
    #[inline]
    pub fn is_high(&self) -> bool {
        self.pin.is_high()
    }

    /// Get whether the pin input level is low.
    #[inline]
    pub fn is_low(&self) -> bool {
        self.pin.is_low()
    }

    /// Get the current pin input level.
    #[inline]
    pub fn get_level(&self) -> Level {
        self.pin.get_level()
    }
}

/// GPIO output driver.
///
/// Note that pins will **return to their floating state** when `Output` is dropped.
/// If pins should retain their state indefinitely, either keep ownership of the
/// `Output`, or pass it to [`core::mem::forget`].
pub struct Output<'d> {
    pub(crate) pin: Flex<'d>,
}

impl<'d> Output<'d> {
    /// Create GPIO output driver for a [Pin] with the provided [Level] and [Drive] configuration.
    #[inline]
    pub fn new(pin: impl Peripheral<P = impl Pin> + 'd, initial_output: Level, drive: Drive) -> Self {
        let mut pin = Flex::new(pin);
        match initial_output {
            Level::High => pin.set_high(),
            Level::Low => pin.set_low(),
        }
        pin.set_as_output(drive);
        Self { pin }
    }

    /// Set the output as high.
    #[inline]
    pub fn set_high(&mut self) {
        self.pin.set_high();
    }

    /// Set the output as low.
    #[inline]
    pub fn set_low(&mut self) {
        self.pin.set_low();
    }

    /// Set the output level.
    #[inline]
    pub fn set_level(&mut self, level: Level) {
        self.pin.set_level(level)
    }

    /// Is the output pin set as high?
    #[inline]
    pub fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }

    /// Is the output pin set as low?
    #[inline]
    pub fn is_set_low(&self) -> bool {
        self.pin.is_set_low()
    }

    /// What level output is set to
    #[inline]
    pub fn get_output_level(&self) -> Level {
        self.pin.get_output_level()
    }

    /// Toggle pin output
    #[inline]
    pub fn toggle(&mut self) {
        self.pin.toggle();
    }
}

#[allow(unused)]
pub(crate) trait SealedPin: Sized {
    /// The pad index. The lower 5 bits are the pin number, and the higher bits are the port number.
    fn pin_pad(&self) -> u16;

    /// pin number, 0-15
    #[inline]
    fn _pin(&self) -> usize {
        (self.pin_pad() & 0x1f) as usize
    }

    /// port number, 0-2
    #[inline]
    fn _port(&self) -> usize {
        (self.pin_pad() >> 5) as usize
    }

    #[inline]
    fn mask(&self) -> u32 {
        1 << self._pin()
    }

    /// GPIO port
    #[inline]
    fn gpio(&self) -> Port {
        Port::from_index(self._port())
    }

    #[inline]
    fn pads(&self) -> Pads {
        Pads::new()
    }

    // helper method used across the HAL, not intended to be used by user code

    #[inline]
    fn set_high(&self) {
        self.gpio().set_high(self.mask());
    }

    #[inline]
    fn set_low(&self) {
        self.gpio().set_low(self.mask());
    }

    #[inline]
    fn set_as_input(&self) {
        self.gpio().set_direction(self.mask(), Direction::Input);
    }

    #[inline]
    fn set_as_output(&self) {
        self.gpio().set_direction(self.mask(), Direction::Output);
    }

    #[inline]
    fn set_pull(&self, pull: Pull) {
        self.pads().set_pull(self._port(), self._pin(), pull);
    }

    #[inline]
    fn is_high(&self) -> bool {
        self.gpio().read() & self.mask() != 0
    }

    #[inline]
    fn set_as_alt(&self, function: PadFunction) {
        self.pads().set_function(self._port(), self._pin(), function);
    }
}

#[allow(private_bounds)]
pub trait Pin: Peripheral<P = Self> + Into<AnyPin> + SealedPin + Sized + 'static {
    #[inline]
    fn pin(&self) -> u8 {
        self._pin() as u8
    }

    #[inline]
    fn port(&self) -> u8 {
        self._port() as u8
    }

    #[inline]
    fn degrade(self) -> AnyPin {
        AnyPin {
            pin_pad: self.pin_pad(),
        }
    }

    /// Set pad function to GPIO, input
    fn set_as_gpio(&self) {
        self.set_as_input();
        self.set_as_alt(PadFunction::Gpio);
    }
}

pub struct AnyPin {
    pin_pad: u16,
}
impl_peripheral!(AnyPin);
impl SealedPin for AnyPin {
    fn pin_pad(&self) -> u16 {
        self.pin_pad
    }
}
impl Pin for AnyPin {}

// ====================

foreach_pin!(
    ($pin_name:ident, $pin_pad:expr) => {
        impl Pin for peripherals::$pin_name {
        }
        impl SealedPin for peripherals::$pin_name {
            #[inline]
            fn pin_pad(&self) -> u16 {
                $pin_pad
            }
        }

        impl From<peripherals::$pin_name> for AnyPin {
            fn from(x: peripherals::$pin_name) -> Self {
                x.degrade()
            }
        }
    };
);

// ====================
// Port instances

pub(crate) trait SealedInstance {
    fn regs() -> pac::gpio::Gpio;
}

/// GPIO port peripheral.
#[allow(private_bounds)]
pub trait Instance: Peripheral<P = Self> + SealedInstance + crate::pm::ClockPeripheral + 'static {}

macro_rules! impl_port {
    ($inst:ident, $regs:expr) => {
        impl SealedInstance for peripherals::$inst {
            fn regs() -> pac::gpio::Gpio {
                $regs
            }
        }
        impl Instance for peripherals::$inst {}
    };
}

impl_port!(GPIO0, pac::GPIO0);
impl_port!(GPIO1, pac::GPIO1);
impl_port!(GPIO2, pac::GPIO2);

// ====================
// Implement embedded-hal traits

impl<'d> embedded_hal::digital::ErrorType for Input<'d> {
    type Error = Infallible;
}

impl<'d> embedded_hal::digital::InputPin for Input<'d> {
    #[inline]
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok((*self).is_high())
    }

    #[inline]
    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok((*self).is_low())
    }
}

impl<'d> embedded_hal::digital::ErrorType for Output<'d> {
    type Error = Infallible;
}

impl<'d> embedded_hal::digital::OutputPin for Output<'d> {
    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(self.set_high())
    }

    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(self.set_low())
    }
}

impl<'d> embedded_hal::digital::StatefulOutputPin for Output<'d> {
    #[inline]
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok((*self).is_set_high())
    }

    /// Is the output pin set as low?
    #[inline]
    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok((*self).is_set_low())
    }

    #[inline]
    fn toggle(&mut self) -> Result<(), Self::Error> {
        Ok(Output::toggle(self))
    }
}

impl<'d> embedded_hal::digital::ErrorType for Flex<'d> {
    type Error = Infallible;
}

impl<'d> embedded_hal::digital::InputPin for Flex<'d> {
    #[inline]
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok((*self).is_high())
    }

    #[inline]
    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok((*self).is_low())
    }
}

impl<'d> embedded_hal::digital::OutputPin for Flex<'d> {
    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(self.set_high())
    }

    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(self.set_low())
    }
}

impl<'d> embedded_hal::digital::StatefulOutputPin for Flex<'d> {
    #[inline]
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok((*self).is_set_high())
    }

    /// Is the output pin set as low?
    #[inline]
    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok((*self).is_set_low())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn port(mem: &mut [u32; 8]) -> Port {
        Port::from_regs(unsafe { pac::gpio::Gpio::from_ptr(mem.as_mut_ptr() as _) })
    }

    fn pads(mem: &mut [u32; 9]) -> Pads {
        Pads::from_regs(unsafe { pac::pad_config::PadConfig::from_ptr(mem.as_mut_ptr() as _) })
    }

    #[test]
    fn pad_function_reads_back() {
        let mut mem = [0u32; 9];
        // everything on an alternate function
        mem[0] = 0xffff_ffff;
        mem[3] = 0xffff_ffff;
        let pads = pads(&mut mem);

        pads.set_function(0, 9, PadFunction::Gpio);
        pads.set_function(0, 10, PadFunction::Gpio);
        pads.set_function(1, 15, PadFunction::Gpio);

        assert_eq!(pads.function(0, 9), PadFunction::Gpio);
        assert_eq!(pads.function(0, 10), PadFunction::Gpio);
        assert_eq!(pads.function(1, 15), PadFunction::Gpio);
        // neighbours untouched
        assert_eq!(pads.function(0, 8), PadFunction::Alt3);
        assert_eq!(pads.function(0, 11), PadFunction::Alt3);
        assert_eq!(pads.function(1, 14), PadFunction::Alt3);

        assert_eq!(mem[0], !(0b11 << 18 | 0b11 << 20));
        assert_eq!(mem[3], !(0b11 << 30));
    }

    #[test]
    fn pad_pull_and_drive_use_their_own_registers() {
        let mut mem = [0u32; 9];
        let pads = pads(&mut mem);

        pads.set_pull(2, 6, Pull::Up);
        pads.set_drive(2, 7, Drive::_8mA);
        assert_eq!(pads.pull(2, 6), Pull::Up);
        assert_eq!(pads.pull(2, 7), Pull::None);

        pads.set_pull(2, 6, Pull::Down);
        assert_eq!(pads.pull(2, 6), Pull::Down);
        assert_eq!(mem[8], 0b10 << 12);
        assert_eq!(mem[7], 0b10 << 14);
        assert_eq!(mem[6], 0);
    }

    #[test]
    fn direction_writes_set_registers() {
        let mut mem = [0u32; 8];
        let port = port(&mut mem);

        port.set_direction(1 << 9, Direction::Output);
        assert_eq!(port.direction(9), Direction::Output);
        assert_eq!(port.direction(10), Direction::Input);

        port.set_direction(1 << 15, Direction::Input);
        assert_eq!(mem[3], 1 << 15);
    }

    #[test]
    fn write_and_read() {
        let mut mem = [0u32; 8];
        let port = port(&mut mem);

        port.write(1 << 9, Level::High);
        assert_eq!(mem[0], 1 << 9);
        port.write(1 << 9, Level::Low);
        assert_eq!(mem[1], 1 << 9);

        // STATE shares the address of SET
        mem[0] = 1 << 15;
        let port = Port::from_regs(unsafe { pac::gpio::Gpio::from_ptr(mem.as_mut_ptr() as _) });
        assert_eq!(port.read() & (1 << 15), 1 << 15);
    }

    #[test]
    fn toggle_flips_only_masked_pins() {
        let mut mem = [0u32; 8];
        mem[4] = 1 << 3;
        let port = port(&mut mem);

        port.toggle(1 << 10);
        assert_eq!(port.output(), 1 << 3 | 1 << 10);
        port.toggle(1 << 10);
        assert_eq!(port.output(), 1 << 3);
    }

    #[test]
    fn level_converts_from_bool() {
        assert_eq!(Level::from(true), Level::High);
        assert!(!bool::from(Level::Low));
    }
}
