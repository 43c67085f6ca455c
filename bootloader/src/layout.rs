//! Disk and memory layout
//!
//! Sector counts and the firmware transfer limit come from `build.rs`
//! (`TBBOOT_*` environment variables); everything else is fixed. The loader
//! trusts these constants and never discovers region boundaries at runtime,
//! so every relationship between them is checked here at compile time.

use static_assertions::{const_assert, const_assert_eq};

include!(concat!(env!("OUT_DIR"), "/boot_layout.rs"));

pub const SECTOR_SIZE: u32 = 512;

/// Boot signature at offset 510 of sector 0, little-endian
pub const BOOT_SIGNATURE: [u8; 2] = [0x55, 0xAA];
pub const BOOT_SIGNATURE_OFFSET: usize = 510;

/// Where firmware loads sector 0; also the top of the real-mode stack
pub const STAGE0_ADDR: u32 = 0x7C00;

/// Stage-0 stores the firmware's DL here for Stage-2
pub const BOOT_DRIVE_ADDR: u32 = 0x0500;

pub const STAGE2_LBA: u32 = 1;
pub const STAGE2_ADDR: u32 = 0x7E00;
pub const STAGE2_SIZE: u32 = STAGE2_SECTORS as u32 * SECTOR_SIZE;

pub const PAYLOAD_LBA: u32 = STAGE2_LBA + STAGE2_SECTORS as u32;
pub const PAYLOAD_ADDR: u32 = 0x1_0000;
pub const PAYLOAD_ENTRY: u32 = PAYLOAD_ADDR;
pub const PAYLOAD_SIZE: u32 = PAYLOAD_SECTORS * SECTOR_SIZE;

pub const TBDS_ADDR: u32 = 0x1000;
pub const TBDS_CAPACITY: usize = 4096;

/// Protected-mode stack, grows down from the top
pub const PROTECTED_STACK_TOP: u32 = 0x9_0000;
pub const PROTECTED_STACK_SIZE: u32 = 0x1_0000;

/// Many BIOSes refuse a read that crosses a multiple of this
pub const DMA_BOUNDARY: u32 = 0x1_0000;

/// Highest address reachable through a real-mode segment:offset pair
pub const REAL_MODE_LIMIT: u32 = 0x10_0000;

// Stage-2 directly follows Stage-0 in memory and on disk.
const_assert_eq!(STAGE2_ADDR, STAGE0_ADDR + SECTOR_SIZE);
const_assert_eq!(STAGE2_LBA, 1);

// The far jump into 32-bit code uses a 16-bit offset from a zero-based
// segment, so every Stage-2 label must lie below 64 KiB.
const_assert!(STAGE2_ADDR + STAGE2_SIZE <= 0x1_0000);
const_assert!(STAGE2_ADDR + STAGE2_SIZE <= PAYLOAD_ADDR);

// Stage-0 loads Stage-2 with a single firmware transfer.
const_assert!(STAGE2_SECTORS <= MAX_SECTORS_PER_TRANSFER);
const_assert!(MAX_SECTORS_PER_TRANSFER > 0);

// One transfer plus a sub-paragraph offset must stay inside one segment.
const_assert!(MAX_SECTORS_PER_TRANSFER as u32 * SECTOR_SIZE + 0xF <= 0xFFFF);

// No chunk may cross a 64 KiB physical line: the transfer size divides
// 64 KiB and the payload starts on a transfer-size boundary.
const_assert_eq!(DMA_BOUNDARY % (MAX_SECTORS_PER_TRANSFER as u32 * SECTOR_SIZE), 0);
const_assert_eq!(PAYLOAD_ADDR % (MAX_SECTORS_PER_TRANSFER as u32 * SECTOR_SIZE), 0);

const_assert!(PAYLOAD_SECTORS > 0);
const_assert!(PAYLOAD_ADDR + PAYLOAD_SIZE <= PROTECTED_STACK_TOP - PROTECTED_STACK_SIZE);
const_assert!(PROTECTED_STACK_TOP <= REAL_MODE_LIMIT);

// TBDS sits above the boot-drive byte and under the real-mode stack.
const_assert!(BOOT_DRIVE_ADDR < TBDS_ADDR);
const_assert!(TBDS_ADDR + TBDS_CAPACITY as u32 <= STAGE0_ADDR - 0x1000);
const_assert!(TBDS_CAPACITY >= tbds::HEADER_LEN);
