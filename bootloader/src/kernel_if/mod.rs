//! Kernel interface
//!
//! What the payload receives: the TBDS block and, at entry, the registers
//! described on [`Handoff`].

pub mod boot_info_builder;

pub use boot_info_builder::{boot_device_descriptor, build_descriptor_block, LOADER_STAGE_ID};

/// Register contract at the payload entry point.
///
/// The CPU is in 32-bit protected mode with flat 4 GiB code (0x08) and data
/// (0x10) segments and interrupts disabled. `EAX` holds `tbds_address`,
/// `EBX` holds `tbds_length`, `EDI` holds `entry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handoff {
    pub tbds_address: u32,
    pub tbds_length: u32,
    pub entry: u32,
}
