//! Incremental descriptor block builder
//!
//! The builder writes straight into the memory the kernel will read, so it
//! never holds a second copy of the block. After every append the header's
//! count and total length are bumped in place; they are never recomputed from
//! the descriptors.

use crate::descriptor::{BootDevice, ConsoleInfo, DescriptorHeader, DescriptorType, DESCRIPTOR_HEADER_LEN};
use crate::error::{Result, TbdsError};
use crate::header::{self, TbdsHeader, HEADER_LEN};

pub struct TbdsBuilder<'a> {
    block: &'a mut [u8],
    cursor: usize,
}

impl<'a> TbdsBuilder<'a> {
    /// Zero `block` and write an empty header at its start
    pub fn new(block: &'a mut [u8]) -> Result<Self> {
        if block.len() < HEADER_LEN {
            return Err(TbdsError::BufferTooSmall {
                capacity: block.len(),
            });
        }

        block.fill(0);
        block[..HEADER_LEN].copy_from_slice(&TbdsHeader::empty().encode());

        Ok(Self {
            block,
            cursor: HEADER_LEN,
        })
    }

    /// Append one descriptor right after the previous one
    pub fn append(&mut self, kind: DescriptorType, flags: u16, payload: &[u8]) -> Result<()> {
        let length = u16::try_from(payload.len())
            .map_err(|_| TbdsError::DescriptorTooLarge { len: payload.len() })?;

        let count = header::read_descriptor_count(self.block)
            .checked_add(1)
            .ok_or(TbdsError::TooManyDescriptors)?;

        let needed = DESCRIPTOR_HEADER_LEN + payload.len();
        let available = self.block.len() - self.cursor;
        if needed > available {
            return Err(TbdsError::OutOfSpace { needed, available });
        }

        let descriptor = DescriptorHeader::new(kind, flags, length);
        let payload_start = self.cursor + DESCRIPTOR_HEADER_LEN;
        self.block[self.cursor..payload_start].copy_from_slice(&descriptor.encode());
        self.block[payload_start..payload_start + payload.len()].copy_from_slice(payload);
        self.cursor += needed;

        let total = header::read_total_length(self.block) + needed as u32;
        header::write_total_length(self.block, total);
        header::write_descriptor_count(self.block, count);

        log::trace!(
            "tbds: appended {} descriptor ({} bytes), total {} bytes",
            kind.name(),
            payload.len(),
            total
        );
        Ok(())
    }

    pub fn append_boot_device(&mut self, device: &BootDevice) -> Result<()> {
        self.append(DescriptorType::BootDevice, 0, &device.encode())
    }

    pub fn append_console(&mut self, console: &ConsoleInfo) -> Result<()> {
        self.append(DescriptorType::Console, 0, &console.encode())
    }

    /// The identification string is stored as-is, without a terminator
    pub fn append_firmware(&mut self, ident: &str) -> Result<()> {
        self.append(DescriptorType::Firmware, 0, ident.as_bytes())
    }

    /// Total length as recorded in the header
    pub fn total_length(&self) -> u32 {
        header::read_total_length(self.block)
    }

    pub fn descriptor_count(&self) -> u16 {
        header::read_descriptor_count(self.block)
    }

    /// Offset of the next free byte
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The populated part of the block
    pub fn as_bytes(&self) -> &[u8] {
        &self.block[..self.cursor]
    }
}
