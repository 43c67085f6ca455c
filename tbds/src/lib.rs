//! TBDS - tagged hardware descriptor block
//!
//! The boot loader hands the kernel a single self-describing record: a fixed
//! 20-byte header followed by descriptors packed back to back. Every
//! descriptor starts with an 8-byte header naming its type and payload length,
//! so a reader can skip types it does not understand.
//!
//! ```text
//! +--------------------+---------+-----------+---------+-----------+ ...
//! | TbdsHeader (20)    | desc hdr| payload   | desc hdr| payload   |
//! +--------------------+---------+-----------+---------+-----------+ ...
//! ```
//!
//! All fields are little-endian. The crate has three parts: the wire codecs
//! ([`header`], [`descriptor`]), the producer side ([`builder`]) and the
//! consumer side ([`reader`]).

#![cfg_attr(not(test), no_std)]

pub mod builder;
pub mod descriptor;
pub mod error;
pub mod header;
pub mod reader;

pub use builder::TbdsBuilder;
pub use descriptor::{
    BootDevice, BootDeviceFlags, ConsoleInfo, DescriptorHeader, DescriptorType,
    DESCRIPTOR_HEADER_LEN,
};
pub use error::{Result, TbdsError};
pub use header::{TbdsHeader, HEADER_LEN, TBDS_MAGIC, TBDS_VERSION};
pub use reader::{Descriptor, Descriptors, Tbds};
