//! Handoff of events from interrupt context to the main loop.
//!
//! [`Flag`] is the minimal single-bit handoff: set by a handler, acted on and
//! cleared by the main loop. Events arriving while the flag is already set are
//! merged into one. [`EventCounter`] keeps a count instead, so none are lost.
//!
//! The MIK32 core (rv32imc) has no atomic read-modify-write instructions. `Flag`
//! only uses atomic loads and stores; `EventCounter` increments inside a
//! critical section.

use core::cell::Cell;
use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::StatefulOutputPin;

/// Single-producer, single-consumer event flag.
///
/// Only the interrupt handler calls [`signal`](Self::signal), only the main
/// loop calls [`handle`](Self::handle) or [`clear`](Self::clear).
pub struct Flag {
    set: AtomicBool,
}

impl Flag {
    pub const fn new() -> Self {
        Self {
            set: AtomicBool::new(false),
        }
    }

    /// Mark the event as happened. Called from interrupt context.
    #[inline]
    pub fn signal(&self) {
        self.set.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.set.load(Ordering::Acquire)
    }

    #[inline]
    pub fn clear(&self) {
        self.set.store(false, Ordering::Release);
    }

    /// Run `f` if the flag is set, then clear it.
    ///
    /// The flag stays set while `f` runs, so signals arriving during `f` are
    /// absorbed by the clear that follows. Returns whether `f` ran.
    #[inline]
    pub fn handle(&self, f: impl FnOnce()) -> bool {
        if !self.is_set() {
            return false;
        }
        f();
        self.clear();
        true
    }
}

impl Default for Flag {
    fn default() -> Self {
        Self::new()
    }
}

/// Saturating event counter, incremented by an interrupt handler and drained by
/// the main loop.
pub struct EventCounter {
    count: Mutex<CriticalSectionRawMutex, Cell<u32>>,
}

impl EventCounter {
    pub const fn new() -> Self {
        Self {
            count: Mutex::new(Cell::new(0)),
        }
    }

    /// Record one event.
    #[inline]
    pub fn signal(&self) {
        self.count.lock(|c| c.set(c.get().saturating_add(1)));
    }

    /// Events recorded since the last [`take`](Self::take).
    #[inline]
    pub fn pending(&self) -> u32 {
        self.count.lock(|c| c.get())
    }

    /// Return the number of recorded events and reset the count.
    #[inline]
    pub fn take(&self) -> u32 {
        self.count.lock(|c| c.replace(0))
    }
}

impl Default for EventCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Toggles an output once per flagged event, then ignores the input for a fixed
/// window to suppress contact bounce.
pub struct DebouncedToggle<O, D> {
    output: O,
    delay: D,
    window_ms: u32,
}

impl<O: StatefulOutputPin, D: DelayNs> DebouncedToggle<O, D> {
    pub fn new(output: O, delay: D, window_ms: u32) -> Self {
        Self {
            output,
            delay,
            window_ms,
        }
    }

    /// Service `flag` once. Returns whether the output was toggled.
    pub fn poll(&mut self, flag: &Flag) -> Result<bool, O::Error> {
        if !flag.is_set() {
            return Ok(false);
        }
        self.output.toggle()?;
        self.delay.delay_ms(self.window_ms);
        flag.clear();
        Ok(true)
    }

    /// Drain `counter`, toggling the output once per recorded event. Returns the
    /// number of toggles.
    pub fn poll_counter(&mut self, counter: &EventCounter) -> Result<u32, O::Error> {
        let events = counter.take();
        for _ in 0..events {
            self.output.toggle()?;
            self.delay.delay_ms(self.window_ms);
        }
        Ok(events)
    }

    pub fn output(&mut self) -> &mut O {
        &mut self.output
    }

    pub fn release(self) -> (O, D) {
        (self.output, self.delay)
    }
}

#[cfg(test)]
mod tests {
    use core::convert::Infallible;

    use embedded_hal::digital::{ErrorType, OutputPin};

    use super::*;

    #[derive(Default)]
    struct Led {
        high: bool,
        toggles: u32,
    }

    impl ErrorType for Led {
        type Error = Infallible;
    }

    impl OutputPin for Led {
        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = true;
            self.toggles += 1;
            Ok(())
        }

        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            self.toggles += 1;
            Ok(())
        }
    }

    impl StatefulOutputPin for Led {
        fn is_set_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.high)
        }

        fn is_set_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.high)
        }
    }

    /// Delay that replays `bounces` interrupt signals while it waits.
    struct BouncyDelay<'a> {
        flag: &'a Flag,
        bounces: u32,
        waited_ms: u32,
    }

    impl DelayNs for BouncyDelay<'_> {
        fn delay_ns(&mut self, _ns: u32) {}

        fn delay_ms(&mut self, ms: u32) {
            for _ in 0..self.bounces {
                self.flag.signal();
            }
            self.waited_ms += ms;
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    #[test]
    fn flag_starts_clear() {
        static FLAG: Flag = Flag::new();
        assert!(!FLAG.is_set());
        assert!(!FLAG.handle(|| panic!("must not act on a clear flag")));
    }

    #[test]
    fn handle_acts_before_clearing() {
        let flag = Flag::new();
        flag.signal();
        assert!(flag.is_set());

        let mut seen_set = false;
        assert!(flag.handle(|| seen_set = flag.is_set()));
        assert!(seen_set);
        assert!(!flag.is_set());
    }

    #[test]
    fn repeated_signals_collapse_into_one() {
        let flag = Flag::new();
        flag.signal();
        flag.signal();
        let mut runs = 0;
        flag.handle(|| runs += 1);
        flag.handle(|| runs += 1);
        assert_eq!(runs, 1);
    }

    #[test]
    fn counter_keeps_every_event() {
        let counter = EventCounter::new();
        for _ in 0..5 {
            counter.signal();
        }
        assert_eq!(counter.pending(), 5);
        assert_eq!(counter.take(), 5);
        assert_eq!(counter.take(), 0);
    }

    #[test]
    fn debounce_toggles_once_per_window() {
        let flag = Flag::new();
        let delay = BouncyDelay {
            flag: &flag,
            bounces: 7,
            waited_ms: 0,
        };
        let mut toggle = DebouncedToggle::new(Led::default(), delay, 20);

        flag.signal();
        assert_eq!(toggle.poll(&flag), Ok(true));
        // bounces during the window were absorbed
        assert!(!flag.is_set());
        assert_eq!(toggle.poll(&flag), Ok(false));

        let (led, delay) = toggle.release();
        assert_eq!(led.toggles, 1);
        assert!(led.high);
        assert_eq!(delay.waited_ms, 20);
    }

    #[test]
    fn idle_poll_leaves_output_alone() {
        let flag = Flag::new();
        let mut toggle = DebouncedToggle::new(Led::default(), NoDelay, 20);
        assert_eq!(toggle.poll(&flag), Ok(false));
        assert_eq!(toggle.output().toggles, 0);
    }

    #[test]
    fn counter_drives_one_toggle_per_event() {
        let counter = EventCounter::new();
        counter.signal();
        counter.signal();
        counter.signal();
        let mut toggle = DebouncedToggle::new(Led::default(), NoDelay, 0);
        assert_eq!(toggle.poll_counter(&counter), Ok(3));
        assert_eq!(toggle.output().toggles, 3);
        assert!(toggle.output().high);
        assert_eq!(counter.pending(), 0);
    }
}
