//! CPU initialization
//!
//! The protected-mode switch touches I/O ports, the GDT register and CR0.
//! Those go through [`PortIo`] and [`Cpu`] so the ordering can be checked
//! on the host.

pub mod a20;
pub mod gdt;
pub mod mode_transition;

pub use gdt::{GdtEntry, FLAT_GDT, KERNEL_CODE_SELECTOR, KERNEL_DATA_SELECTOR};
pub use mode_transition::enter_payload;

use crate::kernel_if::Handoff;

/// Byte-wide x86 port I/O
#[cfg_attr(test, mockall::automock)]
pub trait PortIo {
    fn read_port(&mut self, port: u16) -> u8;
    fn write_port(&mut self, port: u16, value: u8);
}

/// Privileged operations of the real-to-protected mode switch
pub trait Cpu: PortIo {
    /// `cli`
    fn disable_interrupts(&mut self);

    /// `lgdt` with the given table
    fn load_gdt(&mut self, gdt: &'static [GdtEntry]);

    /// Set CR0.PE and far jump straight into the 32-bit code segment, with no
    /// instruction in between. Then reload the data segments from the flat
    /// data selector, switch to `stack_top` and jump to `handoff.entry` with
    /// EAX = TBDS address and EBX = TBDS length.
    fn enter_protected_and_jump(&mut self, handoff: &Handoff, stack_top: u32) -> !;
}
