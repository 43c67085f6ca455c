//! TB Bootloader Library
//!
//! Stage-2 control flow for the two-stage BIOS loader: chunked payload
//! loading, the TBDS hardware descriptor block, and the switch from real
//! mode to 32-bit flat protected mode. Hardware access goes through the
//! [`firmware::Firmware`] and [`cpu_init::Cpu`] traits so the whole flow
//! also runs on the host under test.

#![cfg_attr(not(test), no_std)]

/// Build-time disk and memory layout
pub mod layout;

/// Error types and the crate-wide `Result`
pub mod error;

/// Boot configuration, state machine, context and top-level flow
pub mod boot_stage;

/// Firmware abstraction: print, chunked LBA reads, halt
pub mod firmware;

/// BIOS interrupt bindings and the INT 13h disk address packet
pub mod bios;

/// A20 gate, flat GDT and the protected-mode transition
pub mod cpu_init;

/// TBDS construction and the payload handoff
pub mod kernel_if;

/// Fatal-path reporting
pub mod diagnostics;

/// 16550 UART
pub mod drivers;

/// `log` backend over the serial port
pub mod logger;

/// Bare-metal implementations of the CPU and port-I/O traits
#[cfg(all(target_arch = "x86", target_os = "none"))]
pub mod arch;

pub use boot_stage::{BootConfig, BootContext, BootPhase, BootState};
pub use error::{BootError, Result};
pub use firmware::{DiskError, DiskReadRequest, Firmware, FirmwareEnvironment};
pub use kernel_if::Handoff;

/// Loader version, recorded in the firmware descriptor
pub const VERSION: &str = layout::BUILD_VERSION;
