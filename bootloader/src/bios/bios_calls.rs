//! BIOS interrupt wrappers
//!
//! Only valid in real mode, so only Stage-2 before the mode switch (and the
//! panic path) may call these. DS, ES and SS are zero, as set by Stage-0.

use core::arch::asm;
use core::ptr;

use crate::bios::{decode_console, decode_edd_check, read_bda_word, DiskAddressPacket};
use crate::bios::{BDA_CHAR_HEIGHT, BDA_COM1_BASE, BDA_TEXT_ROWS};
use crate::firmware::{DiskError, DiskReadRequest, DiskResult, EddSupport, Firmware, FirmwareEnvironment};

/// The PC BIOS as seen from Stage-2
pub struct Bios;

impl Bios {
    /// INT 10h AH=0Eh, teletype output on page 0
    pub fn teletype(byte: u8) {
        unsafe {
            asm!(
                "int 0x10",
                inout("ax") 0x0E00u16 | byte as u16 => _,
                in("bx") 0x0007u16,
            );
        }
    }

    /// INT 13h AH=41h, extensions presence check
    pub fn edd_check(drive: u8) -> Option<EddSupport> {
        let mut ax: u16 = 0x4100;
        let mut bx: u16 = 0x55AA;
        let cx: u16;
        let carry: u32;

        unsafe {
            asm!(
                "int 0x13",
                "sbb {carry:e}, {carry:e}",
                carry = out(reg) carry,
                inout("ax") ax,
                inout("bx") bx,
                out("cx") cx,
                inout("dx") drive as u16 => _,
            );
        }

        decode_edd_check(carry != 0, ax, bx, cx)
    }

    /// INT 10h AH=0Fh, current video mode; AL = mode, AH = columns
    fn video_mode() -> u16 {
        let ax: u16;
        unsafe {
            asm!(
                "int 0x10",
                inout("ax") 0x0F00u16 => ax,
                out("bx") _,
            );
        }
        ax
    }
}

impl Firmware for Bios {
    fn print(&mut self, message: &str) {
        for byte in message.bytes() {
            Self::teletype(byte);
        }
    }

    /// INT 13h AH=42h through a packet on the stack
    fn read_sectors(&mut self, request: &DiskReadRequest) -> DiskResult<()> {
        let packet = DiskAddressPacket::from_request(request);
        let packet_addr = &packet as *const DiskAddressPacket as u16;
        let mut ax: u16 = 0x4200;
        let carry: u32;

        // SI is reserved by LLVM on x86, so it is saved around the call
        unsafe {
            asm!(
                "push si",
                "mov si, {packet:x}",
                "int 0x13",
                "sbb {carry:e}, {carry:e}",
                "pop si",
                packet = in(reg) packet_addr,
                carry = lateout(reg) carry,
                inout("ax") ax,
                in("dl") request.drive,
            );
        }

        if carry != 0 {
            let status = (ax >> 8) as u8;
            return Err(if status == 0 {
                DiskError::ReadFailed
            } else {
                DiskError::from_code(status)
            });
        }
        Ok(())
    }

    fn halt(&mut self) -> ! {
        loop {
            unsafe {
                asm!("cli", "hlt", options(nomem, nostack));
            }
        }
    }

    fn probe(&mut self, drive: u8) -> FirmwareEnvironment {
        let (com1, rows_minus_one, char_height) = unsafe {
            (
                read_bda_word(BDA_COM1_BASE as *const u8),
                ptr::read_volatile(BDA_TEXT_ROWS as *const u8),
                read_bda_word(BDA_CHAR_HEIGHT as *const u8),
            )
        };
        let serial_present = com1 != 0;

        FirmwareEnvironment {
            edd: Self::edd_check(drive),
            console: decode_console(Self::video_mode(), rows_minus_one, char_height, serial_present),
            serial_present,
        }
    }
}
