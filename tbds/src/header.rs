//! Block header

use crate::error::{Result, TbdsError};

/// "TBDS" read as a little-endian u32
pub const TBDS_MAGIC: u32 = u32::from_le_bytes(*b"TBDS");

/// Layout version written by this crate. Readers decide what to do with
/// versions they do not know.
pub const TBDS_VERSION: u16 = 1;

/// Encoded header size in bytes
pub const HEADER_LEN: usize = 20;

const MAGIC_OFFSET: usize = 0;
const TOTAL_LENGTH_OFFSET: usize = 4;
const VERSION_OFFSET: usize = 8;
const COUNT_OFFSET: usize = 10;
const RESERVED0_OFFSET: usize = 12;
const RESERVED1_OFFSET: usize = 16;

/// Decoded block header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct TbdsHeader {
    pub magic: u32,
    /// Header plus every descriptor (header and payload), in bytes
    pub total_length: u32,
    pub version: u16,
    pub descriptor_count: u16,
    pub reserved: [u32; 2],
}

static_assertions::assert_eq_size!(TbdsHeader, [u8; HEADER_LEN]);

impl TbdsHeader {
    /// Header of a block with no descriptors yet
    pub const fn empty() -> Self {
        Self {
            magic: TBDS_MAGIC,
            total_length: HEADER_LEN as u32,
            version: TBDS_VERSION,
            descriptor_count: 0,
            reserved: [0; 2],
        }
    }

    pub fn encode(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[MAGIC_OFFSET..MAGIC_OFFSET + 4].copy_from_slice(&self.magic.to_le_bytes());
        out[TOTAL_LENGTH_OFFSET..TOTAL_LENGTH_OFFSET + 4]
            .copy_from_slice(&self.total_length.to_le_bytes());
        out[VERSION_OFFSET..VERSION_OFFSET + 2].copy_from_slice(&self.version.to_le_bytes());
        out[COUNT_OFFSET..COUNT_OFFSET + 2]
            .copy_from_slice(&self.descriptor_count.to_le_bytes());
        out[RESERVED0_OFFSET..RESERVED0_OFFSET + 4]
            .copy_from_slice(&self.reserved[0].to_le_bytes());
        out[RESERVED1_OFFSET..RESERVED1_OFFSET + 4]
            .copy_from_slice(&self.reserved[1].to_le_bytes());
        out
    }

    /// Decode without validating the magic
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(TbdsError::Truncated { offset: bytes.len() });
        }

        Ok(Self {
            magic: read_u32(bytes, MAGIC_OFFSET),
            total_length: read_u32(bytes, TOTAL_LENGTH_OFFSET),
            version: read_u16(bytes, VERSION_OFFSET),
            descriptor_count: read_u16(bytes, COUNT_OFFSET),
            reserved: [
                read_u32(bytes, RESERVED0_OFFSET),
                read_u32(bytes, RESERVED1_OFFSET),
            ],
        })
    }

    pub fn is_valid(&self) -> bool {
        self.magic == TBDS_MAGIC && self.total_length as usize >= HEADER_LEN
    }
}

// The builder patches these two fields in place after every append.

pub(crate) fn write_total_length(block: &mut [u8], total_length: u32) {
    block[TOTAL_LENGTH_OFFSET..TOTAL_LENGTH_OFFSET + 4].copy_from_slice(&total_length.to_le_bytes());
}

pub(crate) fn write_descriptor_count(block: &mut [u8], count: u16) {
    block[COUNT_OFFSET..COUNT_OFFSET + 2].copy_from_slice(&count.to_le_bytes());
}

pub(crate) fn read_total_length(block: &[u8]) -> u32 {
    read_u32(block, TOTAL_LENGTH_OFFSET)
}

pub(crate) fn read_descriptor_count(block: &[u8]) -> u16 {
    read_u16(block, COUNT_OFFSET)
}

pub(crate) fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}

pub(crate) fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}
