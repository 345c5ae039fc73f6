//! Pad configuration: function select, drive strength and pull per pin.

use crate::pac::common::*;

#[derive(Copy, Clone, Eq, PartialEq)]
pub struct PadConfig {
    ptr: *mut u8,
}
unsafe impl Send for PadConfig {}
unsafe impl Sync for PadConfig {}
impl PadConfig {
    #[inline(always)]
    pub const unsafe fn from_ptr(ptr: *mut ()) -> Self {
        Self { ptr: ptr as _ }
    }
    #[inline(always)]
    pub const fn as_ptr(&self) -> *mut () {
        self.ptr as _
    }
    /// Register group of one port, 0 to 2.
    #[inline(always)]
    pub const fn port(self, n: usize) -> Port {
        assert!(n < 3usize);
        unsafe { Port::from_ptr(self.ptr.add(n * 12usize) as _) }
    }
}

/// PORT_n_CFG / PORT_n_DS / PORT_n_PUPD.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct Port {
    ptr: *mut u8,
}
unsafe impl Send for Port {}
unsafe impl Sync for Port {}
impl Port {
    #[inline(always)]
    pub const unsafe fn from_ptr(ptr: *mut ()) -> Self {
        Self { ptr: ptr as _ }
    }
    #[inline(always)]
    pub const fn as_ptr(&self) -> *mut () {
        self.ptr as _
    }
    /// Pad function.
    #[inline(always)]
    pub const fn cfg(self) -> Reg<regs::Field2, RW> {
        unsafe { Reg::from_ptr(self.ptr.add(0x00usize) as _) }
    }
    /// Drive strength.
    #[inline(always)]
    pub const fn ds(self) -> Reg<regs::Field2, RW> {
        unsafe { Reg::from_ptr(self.ptr.add(0x04usize) as _) }
    }
    /// Pull up / pull down.
    #[inline(always)]
    pub const fn pupd(self) -> Reg<regs::Field2, RW> {
        unsafe { Reg::from_ptr(self.ptr.add(0x08usize) as _) }
    }
}

pub mod regs {
    /// 16 fields of 2 bits, one per pin.
    #[repr(transparent)]
    #[derive(Copy, Clone, Eq, PartialEq, Default)]
    pub struct Field2(pub u32);
    impl Field2 {
        #[inline(always)]
        pub const fn pin(&self, n: usize) -> u8 {
            assert!(n < 16usize);
            ((self.0 >> (n * 2)) & 0b11) as u8
        }
        #[inline(always)]
        pub fn set_pin(&mut self, n: usize, val: u8) {
            assert!(n < 16usize);
            let offs = n * 2;
            self.0 = (self.0 & !(0b11 << offs)) | (((val as u32) & 0b11) << offs);
        }
    }
}
