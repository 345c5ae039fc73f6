//! Power manager: bus dividers, clock gating and AHB clock source.

use crate::pac::common::*;

#[derive(Copy, Clone, Eq, PartialEq)]
pub struct Pm {
    ptr: *mut u8,
}
unsafe impl Send for Pm {}
unsafe impl Sync for Pm {}
impl Pm {
    #[inline(always)]
    pub const unsafe fn from_ptr(ptr: *mut ()) -> Self {
        Self { ptr: ptr as _ }
    }
    #[inline(always)]
    pub const fn as_ptr(&self) -> *mut () {
        self.ptr as _
    }
    /// AHB divider, divides by value + 1.
    #[inline(always)]
    pub const fn div_ahb(self) -> Reg<u32, RW> {
        unsafe { Reg::from_ptr(self.ptr.add(0x00usize) as _) }
    }
    #[inline(always)]
    pub const fn div_apb_m(self) -> Reg<u32, RW> {
        unsafe { Reg::from_ptr(self.ptr.add(0x04usize) as _) }
    }
    #[inline(always)]
    pub const fn div_apb_p(self) -> Reg<u32, RW> {
        unsafe { Reg::from_ptr(self.ptr.add(0x08usize) as _) }
    }
    #[inline(always)]
    pub const fn clk_ahb_set(self) -> Reg<u32, RW> {
        unsafe { Reg::from_ptr(self.ptr.add(0x0cusize) as _) }
    }
    #[inline(always)]
    pub const fn clk_ahb_clear(self) -> Reg<u32, RW> {
        unsafe { Reg::from_ptr(self.ptr.add(0x10usize) as _) }
    }
    #[inline(always)]
    pub const fn clk_apb_m_set(self) -> Reg<u32, RW> {
        unsafe { Reg::from_ptr(self.ptr.add(0x14usize) as _) }
    }
    #[inline(always)]
    pub const fn clk_apb_m_clear(self) -> Reg<u32, RW> {
        unsafe { Reg::from_ptr(self.ptr.add(0x18usize) as _) }
    }
    #[inline(always)]
    pub const fn clk_apb_p_set(self) -> Reg<u32, RW> {
        unsafe { Reg::from_ptr(self.ptr.add(0x1cusize) as _) }
    }
    #[inline(always)]
    pub const fn clk_apb_p_clear(self) -> Reg<u32, RW> {
        unsafe { Reg::from_ptr(self.ptr.add(0x20usize) as _) }
    }
    #[inline(always)]
    pub const fn ahb_clk_mux(self) -> Reg<regs::AhbClkMux, RW> {
        unsafe { Reg::from_ptr(self.ptr.add(0x24usize) as _) }
    }
}

pub mod regs {
    #[repr(transparent)]
    #[derive(Copy, Clone, Eq, PartialEq, Default)]
    pub struct AhbClkMux(pub u32);
    impl AhbClkMux {
        #[inline(always)]
        pub const fn src(&self) -> super::vals::AhbSrc {
            super::vals::AhbSrc::from_bits((self.0 & 0b11) as u8)
        }
        #[inline(always)]
        pub fn set_src(&mut self, val: super::vals::AhbSrc) {
            self.0 = (self.0 & !0b11) | (val.to_bits() as u32);
        }
    }
}

pub mod vals {
    #[repr(u8)]
    #[derive(Copy, Clone, Eq, PartialEq, Debug)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub enum AhbSrc {
        /// External 32 MHz oscillator.
        OSC32M = 0x00,
        /// Internal 32 MHz RC oscillator.
        HSI32M = 0x01,
        /// External 32.768 kHz oscillator.
        OSC32K = 0x02,
        /// Internal 32 kHz RC oscillator.
        LSI32K = 0x03,
    }
    impl AhbSrc {
        #[inline(always)]
        pub const fn from_bits(val: u8) -> AhbSrc {
            match val & 0b11 {
                0x00 => AhbSrc::OSC32M,
                0x01 => AhbSrc::HSI32M,
                0x02 => AhbSrc::OSC32K,
                _ => AhbSrc::LSI32K,
            }
        }
        #[inline(always)]
        pub const fn to_bits(self) -> u8 {
            self as u8
        }
    }
}
