//! Blocking delays.
//!
//! Cycle counted delays come from `riscv::delay::McycleDelay`, built from
//! [`crate::pm::clocks`]`().ahb`.

use embedded_hal::delay::DelayNs;
use fugit::HertzU32 as Hertz;

use crate::pac;

/// Busy-wait `iterations` loop passes, regardless of clock frequency.
#[inline(never)]
pub fn spin(iterations: u32) {
    for _ in 0..iterations {
        #[allow(unused_unsafe)]
        unsafe {
            riscv::asm::nop();
        }
    }
}

#[inline]
const fn ticks(freq: Hertz, ns: u64) -> u64 {
    (freq.raw() as u64 * ns).div_ceil(1_000_000_000)
}

/// Delay implementation using the `mtime` register.
///
/// The machine timer counts core clock cycles divided by `MTIMER.DIV + 1`.
#[derive(Debug, Clone, Copy)]
pub struct MtimerDelay {
    _private: (),
}

impl MtimerDelay {
    /// Start the machine timer from the core clock.
    pub fn new(_mtimer: crate::peripherals::MTIMER) -> Self {
        let r = pac::MTIMER;
        r.div().write_value(0);
        r.ctrl().modify(|w| *w = (*w & !0b10) | 0b01);
        Self { _private: () }
    }

    fn frequency(r: pac::mtimer::Mtimer) -> Hertz {
        crate::pm::clocks().ahb / (r.div().read() + 1)
    }

    fn wait_ticks(r: pac::mtimer::Mtimer, ticks: u64) {
        let target = now(r) + ticks;
        while now(r) < target {}
    }
}

/// 64-bit `mtime`, consistent across a carry into the high word.
fn now(r: pac::mtimer::Mtimer) -> u64 {
    loop {
        let hi = r.mtimeh().read();
        let lo = r.mtime().read();
        if r.mtimeh().read() == hi {
            return ((hi as u64) << 32) | lo as u64;
        }
    }
}

impl DelayNs for MtimerDelay {
    fn delay_ns(&mut self, ns: u32) {
        let r = pac::MTIMER;
        Self::wait_ticks(r, ticks(Self::frequency(r), ns as u64));
    }

    fn delay_us(&mut self, us: u32) {
        let r = pac::MTIMER;
        Self::wait_ticks(r, ticks(Self::frequency(r), us as u64 * 1_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        let r = pac::MTIMER;
        Self::wait_ticks(r, ticks(Self::frequency(r), ms as u64 * 1_000_000));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_round_up() {
        let f = Hertz::from_raw(32_000_000);
        assert_eq!(ticks(f, 1_000), 32);
        assert_eq!(ticks(f, 1), 1);
        assert_eq!(ticks(f, 0), 0);
        assert_eq!(ticks(f, 1_000_000_000), 32_000_000);
        assert_eq!(ticks(Hertz::from_raw(32_768), 1_000_000), 33);
    }

    #[test]
    fn mtime_reads_both_words() {
        let mut mem = [0u32; 4];
        mem[2] = 0x8000_0001;
        mem[3] = 2;
        let r = unsafe { pac::mtimer::Mtimer::from_ptr(mem.as_mut_ptr() as _) };
        assert_eq!(now(r), 0x2_8000_0001);
    }
}
