//! BIOS layer
//!
//! `bios_calls` issues the real-mode interrupts; the decoding of what they
//! return lives here so it can be tested off target.

use core::ptr;

use tbds::ConsoleInfo;

use crate::firmware::{EddInterfaces, EddSupport};

pub mod dap;

#[cfg(all(target_arch = "x86", target_os = "none"))]
pub mod bios_calls;

#[cfg(all(target_arch = "x86", target_os = "none"))]
pub use bios_calls::Bios;
pub use dap::{DiskAddressPacket, STAGE2_PACKET};

/// BIOS data area: I/O base of COM1, 0 when absent
pub const BDA_COM1_BASE: u32 = 0x400;
/// BIOS data area: text rows minus one (EGA and later)
pub const BDA_TEXT_ROWS: u32 = 0x484;
/// BIOS data area: character cell height in scan lines
pub const BDA_CHAR_HEIGHT: u32 = 0x485;

/// Little-endian word from the BIOS data area. BDA words sit at odd
/// addresses (0x485), so this reads two bytes instead of one `u16`.
///
/// # Safety
///
/// `addr` and `addr + 1` must be readable.
pub unsafe fn read_bda_word(addr: *const u8) -> u16 {
    unsafe { u16::from_le_bytes([ptr::read_volatile(addr), ptr::read_volatile(addr.add(1))]) }
}

/// Interpret INT 13h AH=41h. Extensions are present only when carry is
/// clear and BX came back byte-swapped.
pub fn decode_edd_check(carry: bool, ax: u16, bx: u16, cx: u16) -> Option<EddSupport> {
    if carry || bx != 0xAA55 {
        return None;
    }

    Some(EddSupport {
        version: (ax >> 8) as u8,
        interfaces: EddInterfaces::from_bits_truncate(cx),
    })
}

/// Build the console descriptor from INT 10h AH=0Fh (mode in AL, columns
/// in AH) and the BIOS data area.
pub fn decode_console(ax: u16, rows_minus_one: u8, char_height: u16, serial: bool) -> ConsoleInfo {
    let mode = (ax & 0x7F) as u8;
    let columns = (ax >> 8) as u16;
    let text = matches!(mode, 0..=3 | 7);

    // pre-EGA BIOSes leave the rows byte at zero
    let rows = if text {
        if rows_minus_one == 0 { 25 } else { rows_minus_one as u16 + 1 }
    } else {
        0
    };

    ConsoleInfo {
        text,
        graphical: !text,
        serial,
        columns: if text { columns } else { 0 },
        rows,
        cell_width: 0,
        cell_height: if text { char_height } else { 0 },
    }
}
