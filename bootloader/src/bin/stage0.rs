//! Stage-0 boot sector
//!
//! Loaded by firmware at 0x7C00 with the boot drive in DL. Normalises the
//! segments, puts the stack under itself, reads Stage-2 with one extended
//! read and far-jumps to it. A failed read prints one line and halts.
//! Code and data must fit in 510 bytes; the linker script places the
//! signature.

#![no_std]
#![no_main]

use core::arch::{asm, global_asm};
use core::panic::PanicInfo;

use tb_bootloader::bios::STAGE2_PACKET;
use tb_bootloader::layout::{BOOT_DRIVE_ADDR, STAGE0_ADDR, STAGE2_ADDR};

global_asm!(
    ".section .boot, \"awx\"",
    ".global _start",
    ".code16",
    "_start:",
    "    cli",
    "    xor ax, ax",
    "    mov ds, ax",
    "    mov es, ax",
    "    mov ss, ax",
    "    mov sp, {stack}",
    // some BIOSes enter at 07C0:0000; force CS = 0
    "    .byte 0xEA",
    "    .word 2f",
    "    .word 0",
    "2:",
    "    sti",
    "    cld",
    "    mov byte ptr [{drive_addr}], dl",
    "    mov si, offset {packet}",
    "    mov ah, 0x42",
    "    int 0x13",
    "    jc 3f",
    "    mov dl, byte ptr [{drive_addr}]",
    "    .byte 0xEA",
    "    .word {stage2}",
    "    .word 0",
    "3:",
    "    mov si, offset stage0_read_error",
    "4:",
    "    lodsb",
    "    test al, al",
    "    jz 5f",
    "    mov ah, 0x0E",
    "    mov bx, 0x0007",
    "    int 0x10",
    "    jmp 4b",
    "5:",
    "    cli",
    "    hlt",
    "    jmp 5b",
    "stage0_read_error:",
    "    .asciz \"Stage-0: disk read error\\r\\n\"",
    stack = const STAGE0_ADDR,
    drive_addr = const BOOT_DRIVE_ADDR,
    stage2 = const STAGE2_ADDR,
    packet = sym STAGE2_PACKET,
);

#[panic_handler]
fn panic(_info: &PanicInfo) -> ! {
    loop {
        unsafe { asm!("cli", "hlt", options(nomem, nostack)) }
    }
}
