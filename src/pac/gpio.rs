//! GPIO port, 16 pins on ports 0 and 1, 8 pins on port 2.

use crate::pac::common::*;

/// GPIO port register block.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct Gpio {
    ptr: *mut u8,
}
unsafe impl Send for Gpio {}
unsafe impl Sync for Gpio {}
impl Gpio {
    #[inline(always)]
    pub const unsafe fn from_ptr(ptr: *mut ()) -> Self {
        Self { ptr: ptr as _ }
    }
    #[inline(always)]
    pub const fn as_ptr(&self) -> *mut () {
        self.ptr as _
    }
    /// Write 1 to drive the pin high. Reads back the pin input state (STATE).
    #[inline(always)]
    pub const fn set(self) -> Reg<u32, RW> {
        unsafe { Reg::from_ptr(self.ptr.add(0x00usize) as _) }
    }
    /// Write 1 to drive the pin low.
    #[inline(always)]
    pub const fn clear(self) -> Reg<u32, W> {
        unsafe { Reg::from_ptr(self.ptr.add(0x04usize) as _) }
    }
    /// Write 1 to make the pin an output. Reads back the direction mask, 1 = output.
    #[inline(always)]
    pub const fn direction_out(self) -> Reg<u32, RW> {
        unsafe { Reg::from_ptr(self.ptr.add(0x08usize) as _) }
    }
    /// Write 1 to make the pin an input.
    #[inline(always)]
    pub const fn direction_in(self) -> Reg<u32, RW> {
        unsafe { Reg::from_ptr(self.ptr.add(0x0cusize) as _) }
    }
    /// Output latch.
    #[inline(always)]
    pub const fn output(self) -> Reg<u32, RW> {
        unsafe { Reg::from_ptr(self.ptr.add(0x10usize) as _) }
    }
    #[inline(always)]
    pub const fn context(self) -> Reg<u32, RW> {
        unsafe { Reg::from_ptr(self.ptr.add(0x14usize) as _) }
    }
}
