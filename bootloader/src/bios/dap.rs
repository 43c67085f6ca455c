// INT 13h extended read packet

use static_assertions::assert_eq_size;

use crate::firmware::DiskReadRequest;
use crate::layout;

/// Disk address packet for INT 13h AH=42h, pointed to by DS:SI
#[repr(C, packed)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskAddressPacket {
    /// Size of this packet, always 0x10
    packet_size: u8,
    zero: u8,
    sectors: u16,
    offset: u16,
    segment: u16,
    lba: u64,
}

assert_eq_size!(DiskAddressPacket, [u8; 16]);

impl DiskAddressPacket {
    pub const SIZE: u8 = 0x10;

    /// Packet for a read into linear address `destination`, which must be
    /// below 1 MiB. The segment takes all but the low nibble.
    pub const fn new(lba: u64, sectors: u16, destination: u32) -> Self {
        Self {
            packet_size: Self::SIZE,
            zero: 0,
            sectors,
            offset: (destination & 0xF) as u16,
            segment: (destination >> 4) as u16,
            lba,
        }
    }

    pub const fn from_request(request: &DiskReadRequest) -> Self {
        Self::new(request.lba as u64, request.sector_count, request.destination)
    }

    pub fn segment(&self) -> u16 {
        self.segment
    }

    pub fn offset(&self) -> u16 {
        self.offset
    }

    pub fn sectors(&self) -> u16 {
        self.sectors
    }

    pub fn lba(&self) -> u64 {
        self.lba
    }

    /// Linear address the firmware writes to
    #[cfg(test)]
    pub fn linear_destination(&self) -> u32 {
        ((self.segment as u32) << 4) + self.offset as u32
    }

    #[cfg(test)]
    pub fn to_bytes(&self) -> [u8; 16] {
        let mut out = [0u8; 16];
        out[0] = self.packet_size;
        out[1] = self.zero;
        out[2..4].copy_from_slice(&self.sectors().to_le_bytes());
        out[4..6].copy_from_slice(&self.offset().to_le_bytes());
        out[6..8].copy_from_slice(&self.segment().to_le_bytes());
        out[8..16].copy_from_slice(&self.lba().to_le_bytes());
        out
    }
}

/// The packet Stage-0 hands the firmware to load Stage-2
pub static STAGE2_PACKET: DiskAddressPacket = DiskAddressPacket::new(
    layout::STAGE2_LBA as u64,
    layout::STAGE2_SECTORS,
    layout::STAGE2_ADDR,
);
