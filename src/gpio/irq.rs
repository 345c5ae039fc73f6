//! GPIO interrupt lines.
//!
//! The GPIO_IRQ block has 8 lines shared by all ports, each selecting one pin
//! through a 4-bit mux field. Pending lines raise EPIC line `GPIO_IRQ`.

use core::cell::Cell;

use embassy_hal_internal::{into_ref, Peripheral};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use static_assertions::const_assert_eq;

use super::{Input, Pin as GpioPin, Pull};
use crate::event::EventCounter;
use crate::internal::interrupt::Controller;
use crate::internal::BitIter;
use crate::interrupt::typelevel;
use crate::pac::InterruptNumber;
use crate::{pac, peripherals};

/// Number of GPIO interrupt lines.
pub const LINES: usize = 8;

// one 4-bit mux field per line in LINE_MUX
const_assert_eq!(LINES * 4, 32);

#[allow(clippy::declare_interior_mutable_const)]
const NEW_COUNTER: EventCounter = EventCounter::new();
static LINE_EVENTS: [EventCounter; LINES] = [NEW_COUNTER; LINES];

static LINES_USED: Mutex<CriticalSectionRawMutex, Cell<u8>> = Mutex::new(Cell::new(0));

/// GPIO interrupt line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    Line0 = 0,
    Line1 = 1,
    Line2 = 2,
    Line3 = 3,
    Line4 = 4,
    Line5 = 5,
    Line6 = 6,
    Line7 = 7,
}

impl Line {
    pub const fn from_index(n: u8) -> Option<Self> {
        Some(match n {
            0 => Line::Line0,
            1 => Line::Line1,
            2 => Line::Line2,
            3 => Line::Line3,
            4 => Line::Line4,
            5 => Line::Line5,
            6 => Line::Line6,
            7 => Line::Line7,
            _ => return None,
        })
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    const fn mask(self) -> u32 {
        1 << self as u32
    }

    /// Events counted on this line by [`InterruptHandler`].
    #[inline]
    pub fn events(self) -> &'static EventCounter {
        &LINE_EVENTS[self.index()]
    }
}

/// Condition that raises a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trigger {
    RisingEdge,
    FallingEdge,
    AnyEdge,
    High,
    Low,
}

/// GPIO interrupt line error.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// The pin cannot be connected to the requested line
    NoRoute,
    /// The line is already owned by another [`IrqInput`]
    LineInUse,
}

/// Mux value connecting `line` to pin `pin` of `port`, if the pin can reach it.
///
/// Line `L` reaches pins whose number modulo 8 is `L` (mux 0 to 4) or `L + 4`
/// modulo 8 (mux 5 to 9).
pub const fn mux_for(port: u8, pin: u8, line: Line) -> Option<u8> {
    if port > 2 || pin > 15 {
        return None;
    }
    let l = line as u8;
    let group = 2 * port + pin / 8;
    if group > 4 {
        None
    } else if pin % 8 == l {
        Some(group)
    } else if pin % 8 == (l + 4) % 8 {
        Some(5 + group)
    } else {
        None
    }
}

/// The two lines a pin can be routed to.
pub const fn lines_for(pin: u8) -> [Line; 2] {
    let direct = pin % 8;
    let shifted = (direct + 4) % 8;
    match (Line::from_index(direct), Line::from_index(shifted)) {
        (Some(a), Some(b)) => [a, b],
        _ => unreachable!(),
    }
}

/// Register level operations on the line block.
#[derive(Copy, Clone)]
pub(crate) struct Lines {
    regs: pac::gpio_irq::GpioIrq,
}

impl Lines {
    pub(crate) const fn from_regs(regs: pac::gpio_irq::GpioIrq) -> Self {
        Self { regs }
    }

    pub(crate) const fn new() -> Self {
        Self::from_regs(pac::GPIO_IRQ)
    }

    pub fn set_mux(self, line: Line, mux: u8) {
        critical_section::with(|_| {
            self.regs.line_mux().modify(|w| w.set_mux(line.index(), mux));
        });
    }

    #[allow(unused)]
    pub fn mux(self, line: Line) -> u8 {
        self.regs.line_mux().read().mux(line.index())
    }

    pub fn set_trigger(self, line: Line, trigger: Trigger) {
        let mask = line.mask();
        let r = self.regs;
        match trigger {
            Trigger::RisingEdge | Trigger::FallingEdge | Trigger::AnyEdge => r.edge().write_value(mask),
            Trigger::High | Trigger::Low => r.level().write_value(mask),
        }
        match trigger {
            Trigger::AnyEdge => r.any_edge_set().write_value(mask),
            _ => r.any_edge_clear().write_value(mask),
        }
        match trigger {
            Trigger::RisingEdge | Trigger::High => r.level_set().write_value(mask),
            Trigger::FallingEdge | Trigger::Low => r.level_clear().write_value(mask),
            Trigger::AnyEdge => {}
        }
    }

    pub fn enable(self, line: Line) {
        self.regs.enable_set().write_value(line.mask());
    }

    pub fn disable(self, line: Line) {
        self.regs.enable_clear().write_value(line.mask());
    }

    pub fn is_enabled(self, line: Line) -> bool {
        self.regs.enable_set().read() & line.mask() != 0
    }

    pub fn pending(self) -> u32 {
        self.regs.interrupt().read()
    }

    pub fn clear(self, mask: u32) {
        self.regs.clear().write_value(mask);
    }

    pub fn state(self, line: Line) -> bool {
        self.regs.state().read() & line.mask() != 0
    }
}

fn claim(line: Line) -> Result<(), Error> {
    LINES_USED.lock(|used| {
        let bits = used.get();
        if bits & (1 << line.index()) != 0 {
            return Err(Error::LineInUse);
        }
        used.set(bits | (1 << line.index()));
        Ok(())
    })
}

fn release(line: Line) {
    LINES_USED.lock(|used| used.set(used.get() & !(1 << line.index())));
}

/// Input pin connected to a GPIO interrupt line.
///
/// The line is enabled in GPIO_IRQ on creation. The `GPIO_IRQ` line at EPIC and
/// the global interrupt flag are left to the caller.
pub struct IrqInput<'d> {
    pin: Input<'d>,
    line: Line,
}

impl<'d> IrqInput<'d> {
    pub fn new(
        pin: impl Peripheral<P = impl GpioPin> + 'd,
        line: Line,
        pull: Pull,
        trigger: Trigger,
    ) -> Result<Self, Error> {
        into_ref!(pin);

        let mux = mux_for(pin.port(), pin.pin(), line).ok_or(Error::NoRoute)?;
        claim(line)?;

        let pin = Input::new(pin, pull);

        let lines = Lines::new();
        lines.disable(line);
        lines.set_mux(line, mux);
        lines.set_trigger(line, trigger);
        lines.clear(line.mask());
        lines.enable(line);

        debug!("gpio irq line {} mux {}", line.index(), mux);

        Ok(Self { pin, line })
    }

    #[inline]
    pub fn line(&self) -> Line {
        self.line
    }

    /// Events counted on the line by [`InterruptHandler`].
    #[inline]
    pub fn events(&self) -> &'static EventCounter {
        self.line.events()
    }

    pub fn set_trigger(&mut self, trigger: Trigger) {
        Lines::new().set_trigger(self.line, trigger);
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        Lines::new().is_enabled(self.line)
    }

    /// Line state as seen by the trigger logic.
    #[inline]
    pub fn line_state(&self) -> bool {
        Lines::new().state(self.line)
    }

    /// Clear a pending request of this line.
    #[inline]
    pub fn clear_pending(&mut self) {
        Lines::new().clear(self.line.mask());
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        Lines::new().pending() & self.line.mask() != 0
    }

    #[inline]
    pub fn is_high(&self) -> bool {
        self.pin.is_high()
    }

    #[inline]
    pub fn is_low(&self) -> bool {
        self.pin.is_low()
    }
}

impl<'d> Drop for IrqInput<'d> {
    fn drop(&mut self) {
        let lines = Lines::new();
        lines.disable(self.line);
        lines.clear(self.line.mask());
        release(self.line);
    }
}

/// GPIO_IRQ interrupt handler.
///
/// Counts each pending line into [`Line::events`] and clears the request at
/// GPIO_IRQ and EPIC.
pub struct InterruptHandler {}

impl typelevel::Handler<typelevel::GPIO_IRQ> for InterruptHandler {
    unsafe fn on_interrupt() {
        on_interrupt(Lines::new(), Controller(pac::EPIC));
    }
}

pub(crate) trait SealedInstance {}

/// GPIO_IRQ peripheral.
#[allow(private_bounds)]
pub trait Instance: Peripheral<P = Self> + SealedInstance + crate::pm::ClockPeripheral + 'static {
    /// EPIC line of the peripheral.
    type Interrupt: typelevel::Interrupt;
}

foreach_interrupt!(
    (GPIO_IRQ, $irq:ident) => {
        impl SealedInstance for peripherals::GPIO_IRQ {}
        impl Instance for peripherals::GPIO_IRQ {
            type Interrupt = crate::interrupt::typelevel::$irq;
        }
    };
);

/// Unmask the GPIO_IRQ line at EPIC, with [`InterruptHandler`] bound to it.
///
/// Counted events show up in [`Line::events`] once global interrupts are enabled.
pub fn enable_interrupt<T: Instance>(
    _peri: impl Peripheral<P = T>,
    _irq: impl typelevel::Binding<typelevel::GPIO_IRQ, InterruptHandler>,
) {
    unmask(Controller(pac::EPIC));
}

// GPIO_IRQ is the OR of all pending lines. Level sensitive, so a line raised
// while another one is being serviced keeps the request asserted.
fn unmask(epic: Controller) {
    let irq = pac::Interrupt::GPIO_IRQ.number();
    epic.unpend(irq);
    epic.enable_level(irq);
}

/// Clear `line` at GPIO_IRQ and EPIC, for hand written `GPIO_IRQ` handlers.
///
/// Returns whether the line was pending.
pub fn acknowledge(line: Line) -> bool {
    acknowledge_in(Lines::new(), Controller(pac::EPIC), line)
}

fn acknowledge_in(lines: Lines, epic: Controller, line: Line) -> bool {
    let pending = lines.pending() & line.mask() != 0;
    lines.clear(line.mask()); // W1C
    epic.unpend(pac::Interrupt::GPIO_IRQ.number());
    pending
}

#[inline]
pub(crate) fn on_interrupt(lines: Lines, epic: Controller) -> u32 {
    let pending = lines.pending();
    for line in BitIter(pending) {
        LINE_EVENTS[line as usize].signal();
    }
    lines.clear(pending); // W1C
    epic.unpend(pac::Interrupt::GPIO_IRQ.number());
    pending
}

impl<'d> embedded_hal::digital::ErrorType for IrqInput<'d> {
    type Error = core::convert::Infallible;
}

impl<'d> embedded_hal::digital::InputPin for IrqInput<'d> {
    #[inline]
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok((*self).is_high())
    }

    #[inline]
    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok((*self).is_low())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(mem: &mut [u32; 12]) -> Lines {
        Lines::from_regs(unsafe { pac::gpio_irq::GpioIrq::from_ptr(mem.as_mut_ptr() as _) })
    }

    #[test]
    fn direct_and_shifted_routes() {
        // P1_15: pin 7 of the upper half of port 1
        assert_eq!(mux_for(1, 15, Line::Line7), Some(3));
        assert_eq!(mux_for(1, 15, Line::Line3), Some(8));
        assert_eq!(mux_for(1, 15, Line::Line0), None);

        assert_eq!(mux_for(0, 0, Line::Line0), Some(0));
        assert_eq!(mux_for(0, 4, Line::Line0), Some(5));
        assert_eq!(mux_for(2, 7, Line::Line7), Some(4));
        assert_eq!(mux_for(2, 3, Line::Line7), Some(9));
    }

    #[test]
    fn missing_pins_have_no_route() {
        assert_eq!(mux_for(2, 8, Line::Line0), None);
        assert_eq!(mux_for(3, 0, Line::Line0), None);
    }

    #[test]
    fn every_pin_reaches_exactly_two_lines() {
        for (port, pins) in [(0u8, 16u8), (1, 16), (2, 8)] {
            for pin in 0..pins {
                let routed = (0..8)
                    .filter_map(Line::from_index)
                    .filter(|&line| mux_for(port, pin, line).is_some())
                    .count();
                assert_eq!(routed, 2, "P{}_{}", port, pin);
                for line in lines_for(pin) {
                    assert!(mux_for(port, pin, line).is_some());
                }
            }
        }
    }

    #[test]
    fn mux_field_is_per_line() {
        let mut mem = [0u32; 12];
        let lines = block(&mut mem);
        lines.set_mux(Line::Line3, 8);
        lines.set_mux(Line::Line7, 3);
        assert_eq!(lines.mux(Line::Line3), 8);
        assert_eq!(lines.mux(Line::Line0), 0);
        assert_eq!(mem[0], 8 << 12 | 3 << 28);
    }

    #[test]
    fn falling_edge_trigger_writes() {
        let mut mem = [0u32; 12];
        let lines = block(&mut mem);
        lines.set_trigger(Line::Line3, Trigger::FallingEdge);
        assert_eq!(mem[4], 1 << 3); // EDGE
        assert_eq!(mem[5], 0); // LEVEL
        assert_eq!(mem[6], 0); // LEVEL_SET
        assert_eq!(mem[7], 1 << 3); // LEVEL_CLEAR
        assert_eq!(mem[8], 0); // ANY_EDGE_SET
        assert_eq!(mem[9], 1 << 3); // ANY_EDGE_CLEAR
    }

    #[test]
    fn level_and_any_edge_trigger_writes() {
        let mut mem = [0u32; 12];
        let lines = block(&mut mem);
        lines.set_trigger(Line::Line1, Trigger::High);
        assert_eq!(mem[5], 1 << 1);
        assert_eq!(mem[6], 1 << 1);

        let mut mem = [0u32; 12];
        let lines = block(&mut mem);
        lines.set_trigger(Line::Line6, Trigger::AnyEdge);
        assert_eq!(mem[4], 1 << 6);
        assert_eq!(mem[8], 1 << 6);
        assert_eq!(mem[6] | mem[7], 0);
    }

    #[test]
    fn handler_counts_and_clears_pending_lines() {
        let mut irq = [0u32; 12];
        let mut epic_mem = [0u32; 8];
        irq[1] = 1 << 3 | 1 << 5;
        let lines = block(&mut irq);
        let epic = Controller(unsafe { pac::epic::Epic::from_ptr(epic_mem.as_mut_ptr() as _) });

        assert_eq!(on_interrupt(lines, epic), 1 << 3 | 1 << 5);
        assert_eq!(Line::Line3.events().take(), 1);
        assert_eq!(Line::Line5.events().take(), 1);
        assert_eq!(Line::Line4.events().pending(), 0);
        assert_eq!(irq[10], 1 << 3 | 1 << 5);
        assert_eq!(epic_mem[6], 1 << 5);
    }

    #[test]
    fn binding_to_gpio_irq_is_accepted() {
        struct Irqs;
        unsafe impl typelevel::Binding<typelevel::GPIO_IRQ, InterruptHandler> for Irqs {}

        // type checked only, EPIC lives at its hardware address
        let _enable = |p: peripherals::GPIO_IRQ| enable_interrupt(p, Irqs);
    }

    #[test]
    fn gpio_irq_is_unmasked_level_sensitive() {
        let mut epic_mem = [0u32; 8];
        let epic = Controller(unsafe { pac::epic::Epic::from_ptr(epic_mem.as_mut_ptr() as _) });

        unmask(epic);
        assert_eq!(epic_mem[2], 1 << 5); // MASK_LEVEL_SET
        assert_eq!(epic_mem[0], 0); // MASK_EDGE_SET
        assert_eq!(epic_mem[6], 1 << 5);
    }

    #[test]
    fn line_left_pending_keeps_request_visible() {
        let mut irq = [0u32; 12];
        let mut epic_mem = [0u32; 8];
        irq[1] = 1 << 1 | 1 << 6;
        let lines = block(&mut irq);
        let epic = Controller(unsafe { pac::epic::Epic::from_ptr(epic_mem.as_mut_ptr() as _) });
        unmask(epic);

        // line 6 is raised after the handler sampled INTERRUPT
        irq[1] = 1 << 1;
        on_interrupt(lines, epic);
        irq[1] = 1 << 6;
        // a level sensitive request is still seen and serviced on the next entry
        assert!(epic.is_enabled(5));
        assert_eq!(on_interrupt(lines, epic), 1 << 6);
        assert_eq!(Line::Line1.events().take(), 1);
        assert_eq!(Line::Line6.events().take(), 1);
    }

    #[test]
    fn acknowledge_clears_one_line() {
        let mut irq = [0u32; 12];
        let mut epic_mem = [0u32; 8];
        irq[1] = 1 << 3;
        let lines = block(&mut irq);
        let epic = Controller(unsafe { pac::epic::Epic::from_ptr(epic_mem.as_mut_ptr() as _) });

        assert!(acknowledge_in(lines, epic, Line::Line3));
        assert_eq!(irq[10], 1 << 3);
        assert_eq!(epic_mem[6], 1 << 5);

        assert!(!acknowledge_in(lines, epic, Line::Line2));
        assert_eq!(irq[10], 1 << 2);
    }

    #[test]
    fn unroutable_pin_is_rejected_before_touching_hardware() {
        let button = unsafe { peripherals::P1_15::steal() };
        assert!(matches!(
            IrqInput::new(button, Line::Line0, Pull::None, Trigger::FallingEdge),
            Err(Error::NoRoute)
        ));
    }

    #[test]
    fn busy_line_is_rejected_before_touching_hardware() {
        claim(Line::Line1).unwrap();
        let pin = unsafe { peripherals::P0_1::steal() };
        assert!(matches!(
            IrqInput::new(pin, Line::Line1, Pull::None, Trigger::RisingEdge),
            Err(Error::LineInUse)
        ));
        release(Line::Line1);
    }

    #[test]
    fn line_cannot_be_claimed_twice() {
        assert_eq!(claim(Line::Line2), Ok(()));
        assert_eq!(claim(Line::Line2), Err(Error::LineInUse));
        release(Line::Line2);
        assert_eq!(claim(Line::Line2), Ok(()));
        release(Line::Line2);
    }
}
