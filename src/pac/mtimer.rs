//! SCR1 machine timer.

use crate::pac::common::*;

#[derive(Copy, Clone, Eq, PartialEq)]
pub struct Mtimer {
    ptr: *mut u8,
}
unsafe impl Send for Mtimer {}
unsafe impl Sync for Mtimer {}
impl Mtimer {
    #[inline(always)]
    pub const unsafe fn from_ptr(ptr: *mut ()) -> Self {
        Self { ptr: ptr as _ }
    }
    #[inline(always)]
    pub const fn as_ptr(&self) -> *mut () {
        self.ptr as _
    }
    /// Bit 0 enables counting, bit 1 selects the RTC clock source.
    #[inline(always)]
    pub const fn ctrl(self) -> Reg<u32, RW> {
        unsafe { Reg::from_ptr(self.ptr.add(0x00usize) as _) }
    }
    /// Core clock divider for the timer, divides by value + 1.
    #[inline(always)]
    pub const fn div(self) -> Reg<u32, RW> {
        unsafe { Reg::from_ptr(self.ptr.add(0x04usize) as _) }
    }
    #[inline(always)]
    pub const fn mtime(self) -> Reg<u32, RW> {
        unsafe { Reg::from_ptr(self.ptr.add(0x08usize) as _) }
    }
    #[inline(always)]
    pub const fn mtimeh(self) -> Reg<u32, RW> {
        unsafe { Reg::from_ptr(self.ptr.add(0x0cusize) as _) }
    }
}
