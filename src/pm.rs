//! Power manager: bus clocks, clock source and peripheral clock gates.

use core::ptr::addr_of;

use fugit::HertzU32 as Hertz;

use crate::pac;
pub use crate::pac::pm::vals::AhbSrc;
use crate::pac::PM;

pub const CLK_32M: Hertz = Hertz::from_raw(32_000_000);
pub const CLK_32K: Hertz = Hertz::from_raw(32_768);

// Power on default, HSI32M undivided
static mut CLOCKS: Clocks = Clocks {
    ahb: CLK_32M,
    apb_m: CLK_32M,
    apb_p: CLK_32M,
};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Clocks {
    /// CPU and AHB bus
    pub ahb: Hertz,
    /// APB_M: PM, EPIC, PAD_CONFIG, WU, RTC
    pub apb_m: Hertz,
    /// APB_P: GPIO, GPIO_IRQ, UART, SPI, I2C, timers
    pub apb_p: Hertz,
}

impl Clocks {
    pub const fn from_config(config: &Config) -> Self {
        let src = source_frequency(config.ahb_src).raw();
        let ahb = src / (config.ahb_div as u32 + 1);
        Clocks {
            ahb: Hertz::from_raw(ahb),
            apb_m: Hertz::from_raw(ahb / (config.apb_m_div as u32 + 1)),
            apb_p: Hertz::from_raw(ahb / (config.apb_p_div as u32 + 1)),
        }
    }
}

pub const fn source_frequency(src: AhbSrc) -> Hertz {
    match src {
        AhbSrc::OSC32M | AhbSrc::HSI32M => CLK_32M,
        AhbSrc::OSC32K | AhbSrc::LSI32K => CLK_32K,
    }
}

/// Bus clock configuration.
///
/// The default runs from the internal HSI32M, which is always on after reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// AHB clock source.
    ///
    /// `init` switches the mux without checking the source. OSC32M and OSC32K
    /// are external crystals and must be running before they are selected,
    /// otherwise the bus stops.
    pub ahb_src: AhbSrc,
    /// raw divider, divides by value + 1
    pub ahb_div: u8,
    /// raw divider of AHB, divides by value + 1
    pub apb_m_div: u8,
    /// raw divider of AHB, divides by value + 1
    pub apb_p_div: u8,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ahb_src: AhbSrc::HSI32M,
            ahb_div: 0,
            apb_m_div: 0,
            apb_p_div: 0,
        }
    }
}

pub(crate) unsafe fn init(config: &Config) {
    apply(PM, config);

    unsafe {
        CLOCKS = Clocks::from_config(config);
    }

    debug!("AHB clock: {}Hz", clocks().ahb.raw());
}

fn apply(pm: pac::pm::Pm, config: &Config) {
    // dividers first, so the bus never runs faster than configured
    pm.div_ahb().write_value(config.ahb_div as u32);
    pm.div_apb_m().write_value(config.apb_m_div as u32);
    pm.div_apb_p().write_value(config.apb_p_div as u32);
    pm.ahb_clk_mux().modify(|w| w.set_src(config.ahb_src));
}

#[inline]
pub fn clocks() -> &'static Clocks {
    unsafe { &*addr_of!(CLOCKS) }
}

/// Bus a clock gate lives on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bus {
    Ahb,
    ApbM,
    ApbP,
}

fn set_gates(pm: pac::pm::Pm, bus: Bus, mask: u32) {
    let reg = match bus {
        Bus::Ahb => pm.clk_ahb_set(),
        Bus::ApbM => pm.clk_apb_m_set(),
        Bus::ApbP => pm.clk_apb_p_set(),
    };
    reg.modify(|w| *w |= mask);
}

fn clear_gates(pm: pac::pm::Pm, bus: Bus, mask: u32) {
    let reg = match bus {
        Bus::Ahb => pm.clk_ahb_clear(),
        Bus::ApbM => pm.clk_apb_m_clear(),
        Bus::ApbP => pm.clk_apb_p_clear(),
    };
    reg.write_value(mask);
}

/// Enable clocks by raw gate mask.
pub fn enable_gates(bus: Bus, mask: u32) {
    set_gates(PM, bus, mask);
}

/// Disable clocks by raw gate mask.
pub fn disable_gates(bus: Bus, mask: u32) {
    clear_gates(PM, bus, mask);
}

pub(crate) trait SealedClockPeripheral {
    const BUS: Bus;
    const GATE: u32;
}

/// A peripheral with a clock gate in the power manager.
#[allow(private_bounds)]
pub trait ClockPeripheral: SealedClockPeripheral + 'static {
    fn enable() {
        enable_gates(Self::BUS, 1 << Self::GATE);
    }

    fn disable() {
        disable_gates(Self::BUS, 1 << Self::GATE);
    }

    /// Bus clock feeding the peripheral.
    fn frequency() -> Hertz {
        match Self::BUS {
            Bus::Ahb => clocks().ahb,
            Bus::ApbM => clocks().apb_m,
            Bus::ApbP => clocks().apb_p,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_runs_everything_at_32mhz() {
        let clocks = Clocks::from_config(&Config::default());
        assert_eq!(clocks.ahb, CLK_32M);
        assert_eq!(clocks.apb_m, CLK_32M);
        assert_eq!(clocks.apb_p, CLK_32M);
    }

    #[test]
    fn default_source_needs_no_external_crystal() {
        let mut mem = [0u32; 16];
        mem[9] = AhbSrc::OSC32M as u32;
        let pm = unsafe { pac::pm::Pm::from_ptr(mem.as_mut_ptr() as _) };
        apply(pm, &Config::default());
        assert_eq!(Config::default().ahb_src, AhbSrc::HSI32M);
        assert_eq!(mem[9] & 0b11, AhbSrc::HSI32M as u32);
    }

    #[test]
    fn dividers_divide_by_value_plus_one() {
        let config = Config {
            ahb_src: AhbSrc::OSC32M,
            ahb_div: 1,
            apb_m_div: 0,
            apb_p_div: 3,
        };
        let clocks = Clocks::from_config(&config);
        assert_eq!(clocks.ahb.raw(), 16_000_000);
        assert_eq!(clocks.apb_m.raw(), 16_000_000);
        assert_eq!(clocks.apb_p.raw(), 4_000_000);
    }

    #[test]
    fn low_speed_sources() {
        let config = Config {
            ahb_src: AhbSrc::LSI32K,
            ..Default::default()
        };
        assert_eq!(Clocks::from_config(&config).ahb, CLK_32K);
    }

    #[test]
    fn apply_writes_dividers_and_source() {
        let mut mem = [0u32; 16];
        let pm = unsafe { pac::pm::Pm::from_ptr(mem.as_mut_ptr() as _) };
        let config = Config {
            ahb_src: AhbSrc::OSC32M,
            ahb_div: 2,
            apb_m_div: 1,
            apb_p_div: 4,
        };
        apply(pm, &config);
        assert_eq!(mem[0], 2);
        assert_eq!(mem[1], 1);
        assert_eq!(mem[2], 4);
        assert_eq!(mem[9] & 0b11, AhbSrc::OSC32M as u32);
    }

    #[test]
    fn gates_accumulate() {
        let mut mem = [0u32; 16];
        let pm = unsafe { pac::pm::Pm::from_ptr(mem.as_mut_ptr() as _) };
        set_gates(pm, Bus::ApbP, 1 << 12);
        set_gates(pm, Bus::ApbP, 1 << 13);
        set_gates(pm, Bus::ApbM, 1 << 3);
        assert_eq!(mem[7], (1 << 12) | (1 << 13));
        assert_eq!(mem[5], 1 << 3);

        clear_gates(pm, Bus::ApbP, 1 << 13);
        assert_eq!(mem[8], 1 << 13);
    }
}
