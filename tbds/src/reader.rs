//! Read-only view for the kernel side
//!
//! Consumers must scan by type and skip what they do not recognise. The
//! version field is exposed but not checked here.

use crate::descriptor::{BootDevice, ConsoleInfo, DescriptorHeader, DescriptorType, DESCRIPTOR_HEADER_LEN};
use crate::error::{Result, TbdsError};
use crate::header::{TbdsHeader, HEADER_LEN, TBDS_MAGIC};

/// A validated descriptor block
#[derive(Debug, Clone, Copy)]
pub struct Tbds<'a> {
    header: TbdsHeader,
    body: &'a [u8],
}

impl<'a> Tbds<'a> {
    /// Check the magic and the recorded length, then walk every descriptor
    /// once so that iteration afterwards cannot fail.
    pub fn parse(bytes: &'a [u8]) -> Result<Self> {
        let header = TbdsHeader::decode(bytes)?;
        if header.magic != TBDS_MAGIC {
            return Err(TbdsError::BadMagic(header.magic));
        }

        let total = header.total_length as usize;
        if total < HEADER_LEN || total > bytes.len() {
            return Err(TbdsError::Truncated { offset: bytes.len() });
        }

        let block = Self {
            header,
            body: &bytes[..total],
        };

        let mut offset = HEADER_LEN;
        let mut seen = 0usize;
        while offset < total {
            let descriptor = DescriptorHeader::decode(&block.body[offset..])
                .map_err(|_| TbdsError::Truncated { offset })?;
            let end = offset + descriptor.encoded_len();
            if end > total {
                return Err(TbdsError::Truncated { offset });
            }
            offset = end;
            seen += 1;
        }

        if seen != header.descriptor_count as usize {
            return Err(TbdsError::CountMismatch {
                recorded: header.descriptor_count,
                actual: seen,
            });
        }

        Ok(block)
    }

    pub fn header(&self) -> &TbdsHeader {
        &self.header
    }

    pub fn version(&self) -> u16 {
        self.header.version
    }

    pub fn total_length(&self) -> u32 {
        self.header.total_length
    }

    pub fn descriptors(&self) -> Descriptors<'a> {
        Descriptors {
            body: self.body,
            offset: HEADER_LEN,
        }
    }

    /// First descriptor of the given type, wherever it sits in the block
    pub fn find(&self, kind: DescriptorType) -> Option<Descriptor<'a>> {
        self.descriptors().find(|descriptor| descriptor.kind == kind)
    }

    pub fn boot_device(&self) -> Option<BootDevice> {
        self.find(DescriptorType::BootDevice)
            .and_then(|descriptor| BootDevice::decode(descriptor.payload).ok())
    }

    pub fn console(&self) -> Option<ConsoleInfo> {
        self.find(DescriptorType::Console)
            .and_then(|descriptor| ConsoleInfo::decode(descriptor.payload).ok())
    }

    /// Firmware identification, exactly as many bytes as the descriptor declares
    pub fn firmware(&self) -> Option<&'a [u8]> {
        self.find(DescriptorType::Firmware)
            .map(|descriptor| descriptor.payload)
    }
}

/// One descriptor borrowed from the block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor<'a> {
    pub kind: DescriptorType,
    pub flags: u16,
    pub payload: &'a [u8],
}

pub struct Descriptors<'a> {
    body: &'a [u8],
    offset: usize,
}

impl<'a> Iterator for Descriptors<'a> {
    type Item = Descriptor<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.body.len() {
            return None;
        }

        let header = DescriptorHeader::decode(&self.body[self.offset..]).ok()?;
        let start = self.offset + DESCRIPTOR_HEADER_LEN;
        let end = start + header.length as usize;
        let payload = self.body.get(start..end)?;
        self.offset = end;

        Some(Descriptor {
            kind: header.kind,
            flags: header.flags,
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TbdsBuilder;

    #[test]
    fn test_parse_empty_block() {
        let mut block = [0u8; 32];
        TbdsBuilder::new(&mut block).unwrap();

        let tbds = Tbds::parse(&block).unwrap();
        assert_eq!(tbds.total_length(), 20);
        assert_eq!(tbds.descriptors().count(), 0);
    }

    #[test]
    fn test_parse_bad_magic() {
        let block = [0u8; 32];
        assert_eq!(Tbds::parse(&block).err(), Some(TbdsError::BadMagic(0)));
    }

    #[test]
    fn test_unknown_descriptor_is_skipped_by_find() {
        let mut block = [0u8; 64];
        let mut builder = TbdsBuilder::new(&mut block).unwrap();
        builder.append(DescriptorType::Unknown(0x40), 0, &[1, 2, 3]).unwrap();
        builder.append_firmware("PC-BIOS").unwrap();
        let len = builder.cursor();

        let tbds = Tbds::parse(&block[..len]).unwrap();
        assert_eq!(tbds.descriptors().count(), 2);
        assert_eq!(tbds.firmware(), Some(&b"PC-BIOS"[..]));
        assert!(tbds.console().is_none());
    }

    #[test]
    fn test_parse_detects_count_mismatch() {
        let mut block = [0u8; 64];
        let mut builder = TbdsBuilder::new(&mut block).unwrap();
        builder.append_firmware("X").unwrap();
        block[10] = 2;

        assert_eq!(
            Tbds::parse(&block).err(),
            Some(TbdsError::CountMismatch {
                recorded: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_parse_more_descriptors_than_count_can_hold() {
        // 65,536 empty descriptors, the header still claiming 65,535
        let descriptors = u16::MAX as usize + 1;
        let total = HEADER_LEN + descriptors * DESCRIPTOR_HEADER_LEN;
        let mut block = vec![0u8; total];
        let mut header = TbdsHeader::empty();
        header.total_length = total as u32;
        header.descriptor_count = u16::MAX;
        block[..HEADER_LEN].copy_from_slice(&header.encode());
        for chunk in block[HEADER_LEN..].chunks_exact_mut(DESCRIPTOR_HEADER_LEN) {
            chunk.copy_from_slice(&DescriptorHeader::new(DescriptorType::Unknown(7), 0, 0).encode());
        }

        assert_eq!(
            Tbds::parse(&block).err(),
            Some(TbdsError::CountMismatch {
                recorded: u16::MAX,
                actual: descriptors
            })
        );
    }

    #[test]
    fn test_parse_detects_overlong_descriptor() {
        let mut block = [0u8; 64];
        let mut builder = TbdsBuilder::new(&mut block).unwrap();
        builder.append_firmware("ABCD").unwrap();
        // claim a longer payload than the recorded total covers
        block[24] = 40;

        assert_eq!(
            Tbds::parse(&block).err(),
            Some(TbdsError::Truncated { offset: 20 })
        );
    }
}
