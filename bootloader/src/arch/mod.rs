//! Architecture layer
//!
//! Real implementations of [`crate::cpu_init::PortIo`] and
//! [`crate::cpu_init::Cpu`] for the 16-bit boot target.

pub mod cpu;

pub use self::cpu::X86Cpu;
