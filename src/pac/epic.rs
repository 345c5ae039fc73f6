//! EPIC, external peripheral interrupt controller.

use crate::pac::common::*;

#[derive(Copy, Clone, Eq, PartialEq)]
pub struct Epic {
    ptr: *mut u8,
}
unsafe impl Send for Epic {}
unsafe impl Sync for Epic {}
impl Epic {
    #[inline(always)]
    pub const unsafe fn from_ptr(ptr: *mut ()) -> Self {
        Self { ptr: ptr as _ }
    }
    #[inline(always)]
    pub const fn as_ptr(&self) -> *mut () {
        self.ptr as _
    }
    /// Write 1 to unmask a line as edge sensitive. Reads back the edge mask.
    #[inline(always)]
    pub const fn mask_edge_set(self) -> Reg<u32, RW> {
        unsafe { Reg::from_ptr(self.ptr.add(0x00usize) as _) }
    }
    #[inline(always)]
    pub const fn mask_edge_clear(self) -> Reg<u32, RW> {
        unsafe { Reg::from_ptr(self.ptr.add(0x04usize) as _) }
    }
    /// Write 1 to unmask a line as level sensitive. Reads back the level mask.
    #[inline(always)]
    pub const fn mask_level_set(self) -> Reg<u32, RW> {
        unsafe { Reg::from_ptr(self.ptr.add(0x08usize) as _) }
    }
    #[inline(always)]
    pub const fn mask_level_clear(self) -> Reg<u32, RW> {
        unsafe { Reg::from_ptr(self.ptr.add(0x0cusize) as _) }
    }
    /// Pending requests before masking.
    #[inline(always)]
    pub const fn raw_status(self) -> Reg<u32, R> {
        unsafe { Reg::from_ptr(self.ptr.add(0x10usize) as _) }
    }
    /// Pending requests after masking.
    #[inline(always)]
    pub const fn status(self) -> Reg<u32, R> {
        unsafe { Reg::from_ptr(self.ptr.add(0x14usize) as _) }
    }
    /// Write 1 to clear a pending edge request.
    #[inline(always)]
    pub const fn clear(self) -> Reg<u32, W> {
        unsafe { Reg::from_ptr(self.ptr.add(0x18usize) as _) }
    }
    /// Write 1 to raise a request from software.
    #[inline(always)]
    pub const fn set(self) -> Reg<u32, W> {
        unsafe { Reg::from_ptr(self.ptr.add(0x1cusize) as _) }
    }
}
