//! Stage-2 loader
//!
//! Entered by Stage-0's far jump to 0x7E00 in real mode, DS = ES = SS = 0.
//! Loads the payload, builds the TBDS block and hands over in 32-bit
//! protected mode. Never returns.

#![no_std]
#![no_main]

use core::panic::PanicInfo;
use core::ptr;
use core::slice;

use tb_bootloader::arch::X86Cpu;
use tb_bootloader::bios::Bios;
use tb_bootloader::boot_stage::{boot_flow, BootConfig, BootContext};
use tb_bootloader::{diagnostics, layout, logger};

#[unsafe(no_mangle)]
#[unsafe(link_section = ".start")]
pub extern "C" fn _start() -> ! {
    let boot_drive = unsafe { ptr::read_volatile(layout::BOOT_DRIVE_ADDR as *const u8) };

    logger::init();
    log::info!("TB Boot Stage-2 v{}", tb_bootloader::VERSION);

    let mut ctx = BootContext::new(BootConfig::DEFAULT, boot_drive);

    // Fixed low-memory window reserved for the descriptor block; nothing
    // else in Stage-2 aliases it.
    let tbds = unsafe {
        slice::from_raw_parts_mut(ctx.config.tbds_address as *mut u8, ctx.config.tbds_capacity)
    };

    boot_flow::run(&mut ctx, &mut Bios, &mut X86Cpu, tbds)
}

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    let location = info.location().map(|l| (l.file(), l.line()));
    diagnostics::halt_on_panic(&mut Bios, "Stage-2", location)
}
