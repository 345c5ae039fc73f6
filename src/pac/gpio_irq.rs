//! GPIO interrupt line block, 8 lines shared by all ports.

use crate::pac::common::*;

#[derive(Copy, Clone, Eq, PartialEq)]
pub struct GpioIrq {
    ptr: *mut u8,
}
unsafe impl Send for GpioIrq {}
unsafe impl Sync for GpioIrq {}
impl GpioIrq {
    #[inline(always)]
    pub const unsafe fn from_ptr(ptr: *mut ()) -> Self {
        Self { ptr: ptr as _ }
    }
    #[inline(always)]
    pub const fn as_ptr(&self) -> *mut () {
        self.ptr as _
    }
    /// Pin selection for each line, 4 bits per line.
    #[inline(always)]
    pub const fn line_mux(self) -> Reg<regs::LineMux, RW> {
        unsafe { Reg::from_ptr(self.ptr.add(0x00usize) as _) }
    }
    /// Pending lines.
    #[inline(always)]
    pub const fn interrupt(self) -> Reg<u32, R> {
        unsafe { Reg::from_ptr(self.ptr.add(0x04usize) as _) }
    }
    #[inline(always)]
    pub const fn enable_set(self) -> Reg<u32, RW> {
        unsafe { Reg::from_ptr(self.ptr.add(0x08usize) as _) }
    }
    #[inline(always)]
    pub const fn enable_clear(self) -> Reg<u32, RW> {
        unsafe { Reg::from_ptr(self.ptr.add(0x0cusize) as _) }
    }
    /// Write 1 to select edge trigger.
    #[inline(always)]
    pub const fn edge(self) -> Reg<u32, W> {
        unsafe { Reg::from_ptr(self.ptr.add(0x10usize) as _) }
    }
    /// Write 1 to select level trigger.
    #[inline(always)]
    pub const fn level(self) -> Reg<u32, W> {
        unsafe { Reg::from_ptr(self.ptr.add(0x14usize) as _) }
    }
    /// Write 1 for high level / rising edge.
    #[inline(always)]
    pub const fn level_set(self) -> Reg<u32, W> {
        unsafe { Reg::from_ptr(self.ptr.add(0x18usize) as _) }
    }
    /// Write 1 for low level / falling edge.
    #[inline(always)]
    pub const fn level_clear(self) -> Reg<u32, W> {
        unsafe { Reg::from_ptr(self.ptr.add(0x1cusize) as _) }
    }
    #[inline(always)]
    pub const fn any_edge_set(self) -> Reg<u32, W> {
        unsafe { Reg::from_ptr(self.ptr.add(0x20usize) as _) }
    }
    #[inline(always)]
    pub const fn any_edge_clear(self) -> Reg<u32, W> {
        unsafe { Reg::from_ptr(self.ptr.add(0x24usize) as _) }
    }
    /// Write 1 to clear a pending line (W1C).
    #[inline(always)]
    pub const fn clear(self) -> Reg<u32, W> {
        unsafe { Reg::from_ptr(self.ptr.add(0x28usize) as _) }
    }
    #[inline(always)]
    pub const fn state(self) -> Reg<u32, R> {
        unsafe { Reg::from_ptr(self.ptr.add(0x2cusize) as _) }
    }
}

pub mod regs {
    /// LINE_MUX, one 4-bit selector per line.
    #[repr(transparent)]
    #[derive(Copy, Clone, Eq, PartialEq, Default)]
    pub struct LineMux(pub u32);
    impl LineMux {
        #[inline(always)]
        pub const fn mux(&self, line: usize) -> u8 {
            assert!(line < 8usize);
            ((self.0 >> (line * 4)) & 0x0f) as u8
        }
        #[inline(always)]
        pub fn set_mux(&mut self, line: usize, val: u8) {
            assert!(line < 8usize);
            let offs = line * 4;
            self.0 = (self.0 & !(0x0f << offs)) | (((val as u32) & 0x0f) << offs);
        }
    }
}
