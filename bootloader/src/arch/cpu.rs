// x86 real mode to protected mode primitives

use core::arch::asm;

use x86::dtables::{lgdt, DescriptorTablePointer};

use crate::cpu_init::{Cpu, GdtEntry, PortIo, KERNEL_CODE_SELECTOR, KERNEL_DATA_SELECTOR};
use crate::kernel_if::Handoff;

const CR0_PE: u32 = 1;

/// The boot processor. Zero-sized; every method acts on the real CPU.
#[derive(Debug, Clone, Copy, Default)]
pub struct X86Cpu;

impl PortIo for X86Cpu {
    fn read_port(&mut self, port: u16) -> u8 {
        unsafe { x86::io::inb(port) }
    }

    fn write_port(&mut self, port: u16, value: u8) {
        unsafe { x86::io::outb(port, value) }
    }
}

impl Cpu for X86Cpu {
    fn disable_interrupts(&mut self) {
        unsafe { x86::irq::disable() }
    }

    fn load_gdt(&mut self, gdt: &'static [GdtEntry]) {
        let pointer = DescriptorTablePointer::new_from_slice(gdt);
        unsafe { lgdt(&pointer) }
    }

    fn enter_protected_and_jump(&mut self, handoff: &Handoff, stack_top: u32) -> ! {
        // Stage-2 is linked below 64 KiB, so the 16-bit offset of the far
        // jump reaches the 32-bit label.
        unsafe {
            asm!(
                "mov %cr0, %edx",
                "or ${pe}, %edx",
                "mov %edx, %cr0",
                "ljmp ${code}, $2f",
                "2:",
                ".code32",
                "mov ${data}, %dx",
                "mov %dx, %ds",
                "mov %dx, %es",
                "mov %dx, %fs",
                "mov %dx, %gs",
                "mov %dx, %ss",
                "mov %ecx, %esp",
                "jmp *%edi",
                ".code16",
                pe = const CR0_PE,
                code = const KERNEL_CODE_SELECTOR,
                data = const KERNEL_DATA_SELECTOR,
                in("eax") handoff.tbds_address,
                in("ebx") handoff.tbds_length,
                in("ecx") stack_top,
                in("edi") handoff.entry,
                options(att_syntax, noreturn),
            );
        }
    }
}
