use core::sync::atomic::{compiler_fence, Ordering};

use crate::pac;
use crate::pac::{InterruptNumber, EPIC};

/// Generate a standard `mod interrupt` for a HAL.
#[macro_export]
macro_rules! interrupt_mod {
    ($($irqs:ident),* $(,)?) => {
        /// Interrupt definitions.
        pub mod interrupt {
            pub use $crate::internal::interrupt::{disable_global, enable_global, InterruptExt};
            pub use crate::pac::Interrupt::*;
            pub use crate::pac::Interrupt;

            /// Type-level interrupt infrastructure.
            ///
            /// This module contains one *type* per interrupt. This is used for checking at compile time that
            /// the interrupts are correctly bound to HAL drivers.
            ///
            /// As an end user, you shouldn't need to use this module directly. Use the [`crate::bind_interrupts!`] macro
            /// to bind interrupts, and the [`crate::interrupt`] module to manually register interrupt handlers and manipulate
            /// interrupts directly (pending/unpending, enabling/disabling, etc...)
            pub mod typelevel {
                use super::InterruptExt;

                mod sealed {
                    pub trait Interrupt {}
                }

                /// Type-level interrupt.
                ///
                /// This trait is implemented for all typelevel interrupt types in this module.
                pub trait Interrupt: sealed::Interrupt {

                    /// Interrupt enum variant.
                    ///
                    /// This allows going from typelevel interrupts (one type per interrupt) to
                    /// non-typelevel interrupts (a single `Interrupt` enum type, with one variant per interrupt).
                    const IRQ: super::Interrupt;

                    /// Unmask the interrupt at EPIC as edge sensitive.
                    #[inline]
                    unsafe fn enable() {
                        Self::IRQ.enable()
                    }

                    /// Mask the interrupt at EPIC.
                    #[inline]
                    fn disable() {
                        Self::IRQ.disable()
                    }

                    /// Check if interrupt is enabled.
                    #[inline]
                    fn is_enabled() -> bool {
                        Self::IRQ.is_enabled()
                    }

                    /// Check if interrupt is pending.
                    #[inline]
                    fn is_pending() -> bool {
                        Self::IRQ.is_pending()
                    }

                    /// Set interrupt pending.
                    #[inline]
                    fn pend() {
                        Self::IRQ.pend()
                    }

                    /// Unset interrupt pending.
                    #[inline]
                    fn unpend() {
                        Self::IRQ.unpend()
                    }
                }

                $(
                    #[allow(non_camel_case_types)]
                    #[doc=stringify!($irqs)]
                    #[doc=" typelevel interrupt."]
                    pub enum $irqs {}
                    impl sealed::Interrupt for $irqs{}
                    impl Interrupt for $irqs {
                        const IRQ: super::Interrupt = super::Interrupt::$irqs;
                    }
                )*

                /// Interrupt handler trait.
                ///
                /// Drivers that need to handle interrupts implement this trait.
                /// The user must ensure `on_interrupt()` is called every time the interrupt fires.
                /// Drivers must use use [`Binding`] to assert at compile time that the user has done so.
                pub trait Handler<I: Interrupt> {
                    /// Interrupt handler function.
                    ///
                    /// Must be called every time the `I` interrupt fires, synchronously from
                    /// the interrupt handler context.
                    ///
                    /// # Safety
                    ///
                    /// This function must ONLY be called from the interrupt handler for `I`.
                    unsafe fn on_interrupt();
                }

                /// Compile-time assertion that an interrupt has been bound to a handler.
                ///
                /// For the vast majority of cases, you should use the `bind_interrupts!`
                /// macro instead of writing `unsafe impl`s of this trait.
                ///
                /// # Safety
                ///
                /// By implementing this trait, you are asserting that you have arranged for `H::on_interrupt()`
                /// to be called every time the `I` interrupt fires.
                ///
                /// This allows drivers to check bindings at compile-time.
                pub unsafe trait Binding<I: Interrupt, H: Handler<I>> {}
            }
        }
    };
}

/// EPIC line operations on a register block.
#[derive(Copy, Clone)]
pub(crate) struct Controller(pub pac::epic::Epic);

impl Controller {
    #[inline]
    pub fn enable_edge(self, line: u16) {
        self.0.mask_edge_set().write_value(1 << line);
    }

    #[inline]
    pub fn enable_level(self, line: u16) {
        self.0.mask_level_set().write_value(1 << line);
    }

    #[inline]
    pub fn disable(self, line: u16) {
        self.0.mask_edge_clear().write_value(1 << line);
        self.0.mask_level_clear().write_value(1 << line);
    }

    #[inline]
    pub fn is_enabled(self, line: u16) -> bool {
        (self.0.mask_edge_set().read() | self.0.mask_level_set().read()) & (1 << line) != 0
    }

    #[inline]
    pub fn is_pending(self, line: u16) -> bool {
        self.0.raw_status().read() & (1 << line) != 0
    }

    #[inline]
    pub fn pend(self, line: u16) {
        self.0.set().write_value(1 << line);
    }

    #[inline]
    pub fn unpend(self, line: u16) {
        self.0.clear().write_value(1 << line);
    }

    /// Unmasked requests, one bit per line.
    #[inline]
    pub fn pending_lines(self) -> u32 {
        self.0.status().read()
    }
}

/// Represents an interrupt type that can be configured by the HAL to handle
/// interrupts.
pub unsafe trait InterruptExt: InterruptNumber + Copy {
    /// Unmask the interrupt as edge sensitive.
    ///
    /// Edge requests are latched by EPIC and must be cleared with [`unpend`](Self::unpend).
    #[inline]
    unsafe fn enable(self) {
        compiler_fence(Ordering::SeqCst);
        Controller(EPIC).enable_edge(self.number());
    }

    /// Unmask the interrupt as level sensitive.
    #[inline]
    unsafe fn enable_level(self) {
        compiler_fence(Ordering::SeqCst);
        Controller(EPIC).enable_level(self.number());
    }

    /// Mask the interrupt.
    #[inline]
    fn disable(self) {
        Controller(EPIC).disable(self.number());
    }

    /// Check if interrupt is enabled.
    #[inline]
    fn is_enabled(self) -> bool {
        Controller(EPIC).is_enabled(self.number())
    }

    /// Check if interrupt is pending.
    #[inline]
    fn is_pending(self) -> bool {
        Controller(EPIC).is_pending(self.number())
    }

    /// Set interrupt pending.
    #[inline]
    fn pend(self) {
        Controller(EPIC).pend(self.number());
    }

    /// Unset interrupt pending.
    #[inline]
    fn unpend(self) {
        Controller(EPIC).unpend(self.number());
    }
}

unsafe impl<T: InterruptNumber + Copy> InterruptExt for T {}

/// Enable machine external interrupts and the global interrupt flag.
///
/// # Safety
///
/// Handlers of every unmasked EPIC line may run as soon as this returns.
#[inline]
pub unsafe fn enable_global() {
    compiler_fence(Ordering::SeqCst);
    riscv::register::mie::set_mext();
    riscv::interrupt::enable();
}

/// Clear the global interrupt flag.
#[inline]
pub fn disable_global() {
    unsafe { riscv::interrupt::disable() };
    compiler_fence(Ordering::SeqCst);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(mem: &mut [u32; 8]) -> Controller {
        Controller(unsafe { pac::epic::Epic::from_ptr(mem.as_mut_ptr() as _) })
    }

    #[test]
    fn edge_enable_writes_line_bit() {
        let mut mem = [0u32; 8];
        let epic = controller(&mut mem);
        epic.enable_edge(pac::Interrupt::GPIO_IRQ.number());
        assert!(epic.is_enabled(5));
        assert!(!epic.is_enabled(6));
        assert_eq!(mem[0], 1 << 5);
        assert_eq!(mem[2], 0);
    }

    #[test]
    fn disable_clears_both_masks() {
        let mut mem = [0u32; 8];
        let epic = controller(&mut mem);
        epic.disable(5);
        assert_eq!(mem[1], 1 << 5);
        assert_eq!(mem[3], 1 << 5);
    }

    #[test]
    fn pend_and_unpend_hit_set_and_clear() {
        let mut mem = [0u32; 8];
        let epic = controller(&mut mem);
        epic.pend(2);
        epic.unpend(5);
        assert_eq!(mem[7], 1 << 2);
        assert_eq!(mem[6], 1 << 5);
    }

    #[test]
    fn pending_reads_status() {
        let mut mem = [0u32; 8];
        mem[4] = 1 << 5;
        mem[5] = 1 << 5 | 1 << 1;
        let epic = controller(&mut mem);
        assert!(epic.is_pending(5));
        assert!(!epic.is_pending(1));
        assert_eq!(epic.pending_lines(), 1 << 5 | 1 << 1);
    }
}
