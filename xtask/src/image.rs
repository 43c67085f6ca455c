//! Disk image assembly
//!
//! Sector 0 is Stage-0 with the boot signature, Stage-2 follows at its LBA,
//! the payload at its own. Every region is zero-padded to its full size.

use anyhow::{bail, ensure, Result};
use tb_bootloader::layout::{self, BOOT_SIGNATURE, BOOT_SIGNATURE_OFFSET};

pub const SECTOR: usize = layout::SECTOR_SIZE as usize;

/// Region boundaries on the boot device, in sectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageLayout {
    pub stage2_lba: u32,
    pub stage2_sectors: u32,
    pub payload_lba: u32,
    pub payload_sectors: u32,
}

impl ImageLayout {
    /// The layout the loader was compiled with
    pub fn from_build() -> Self {
        Self {
            stage2_lba: layout::STAGE2_LBA,
            stage2_sectors: layout::STAGE2_SECTORS as u32,
            payload_lba: layout::PAYLOAD_LBA,
            payload_sectors: layout::PAYLOAD_SECTORS,
        }
    }

    pub fn total_sectors(&self) -> u32 {
        self.payload_lba + self.payload_sectors
    }
}

/// Stage-0 as a full boot sector. Accepts up to 510 bytes of code, or a
/// 512-byte image that already ends in the signature.
pub fn pad_boot_sector(code: &[u8]) -> Result<[u8; 512]> {
    let mut sector = [0u8; 512];

    if code.len() == SECTOR {
        ensure!(
            code[BOOT_SIGNATURE_OFFSET..] == BOOT_SIGNATURE,
            "Stage-0 is 512 bytes but does not end in 0x55 0xAA"
        );
        sector.copy_from_slice(code);
        return Ok(sector);
    }

    if code.len() > BOOT_SIGNATURE_OFFSET {
        bail!(
            "Stage-0 is {} bytes, at most {} fit before the signature",
            code.len(),
            BOOT_SIGNATURE_OFFSET
        );
    }

    sector[..code.len()].copy_from_slice(code);
    sector[BOOT_SIGNATURE_OFFSET..].copy_from_slice(&BOOT_SIGNATURE);
    Ok(sector)
}

/// Zero-pad `data` to exactly `sectors` sectors
pub fn pad_region(name: &str, data: &[u8], sectors: u32) -> Result<Vec<u8>> {
    let size = sectors as usize * SECTOR;
    ensure!(
        data.len() <= size,
        "{} is {} bytes, its region holds {} ({} sectors)",
        name,
        data.len(),
        size,
        sectors
    );

    let mut region = data.to_vec();
    region.resize(size, 0);
    Ok(region)
}

pub fn assemble(stage0: &[u8], stage2: &[u8], payload: &[u8], layout: &ImageLayout) -> Result<Vec<u8>> {
    ensure!(layout.stage2_lba >= 1, "Stage-2 cannot overlap the boot sector");
    ensure!(
        layout.payload_lba >= layout.stage2_lba + layout.stage2_sectors,
        "payload region overlaps Stage-2"
    );

    let mut image = vec![0u8; layout.total_sectors() as usize * SECTOR];

    image[..SECTOR].copy_from_slice(&pad_boot_sector(stage0)?);
    place(&mut image, layout.stage2_lba, &pad_region("Stage-2", stage2, layout.stage2_sectors)?);
    place(&mut image, layout.payload_lba, &pad_region("payload", payload, layout.payload_sectors)?);

    Ok(image)
}

fn place(image: &mut [u8], lba: u32, region: &[u8]) {
    let start = lba as usize * SECTOR;
    image[start..start + region.len()].copy_from_slice(region);
}
