//! The runtime support for the MCU.
//!
//! All EPIC lines arrive as one machine external interrupt. Each pending line is
//! dispatched to the handler symbol of the same name, `DefaultHandler` unless bound.

use crate::internal::interrupt::Controller;
use crate::internal::BitIter;
use crate::pac;

#[no_mangle]
unsafe extern "C" fn MachineExternal() {
    let epic = Controller(pac::EPIC);

    for line in BitIter(epic.pending_lines()) {
        let handler = crate::_generated::EPIC_VECTORS[line as usize];
        handler();
    }
}
