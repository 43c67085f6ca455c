//! Test doubles for the firmware and CPU seams

#![allow(dead_code)]

use std::panic::{self, AssertUnwindSafe};

use tb_bootloader::cpu_init::{Cpu, GdtEntry, PortIo};
use tb_bootloader::firmware::{DiskError, DiskReadRequest, DiskResult, Firmware, FirmwareEnvironment};
use tb_bootloader::{BootContext, Handoff};

/// Panic payload of `FakeFirmware::halt`
#[derive(Debug)]
pub struct Halted;

/// Panic payload of `FakeCpu::enter_protected_and_jump`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Jumped {
    pub handoff: Handoff,
    pub stack_top: u32,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Halted,
    Jumped(Jumped),
}

/// Firmware that records every call and can fail one chosen read
#[derive(Default)]
pub struct FakeFirmware {
    pub reads: Vec<DiskReadRequest>,
    pub prints: Vec<String>,
    /// 1-based index of the read that fails, and with what status
    pub fail_read: Option<(usize, DiskError)>,
    pub environment: FirmwareEnvironment,
}

impl FakeFirmware {
    pub fn failing_read(index: usize, status: DiskError) -> Self {
        Self {
            fail_read: Some((index, status)),
            ..Self::default()
        }
    }

    pub fn sectors_read(&self) -> u32 {
        self.reads.iter().map(|r| r.sector_count as u32).sum()
    }
}

impl Firmware for FakeFirmware {
    fn print(&mut self, message: &str) {
        self.prints.push(message.to_owned());
    }

    fn read_sectors(&mut self, request: &DiskReadRequest) -> DiskResult<()> {
        self.reads.push(*request);
        match self.fail_read {
            Some((index, status)) if index == self.reads.len() => Err(status),
            _ => Ok(()),
        }
    }

    fn halt(&mut self) -> ! {
        panic::panic_any(Halted)
    }

    fn probe(&mut self, _drive: u8) -> FirmwareEnvironment {
        self.environment
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuEvent {
    ReadPort(u16),
    WritePort(u16, u8),
    DisableInterrupts,
    LoadGdt(usize),
    EnableProtection,
    FarJump,
}

/// CPU that logs privileged operations and models port 0x92
#[derive(Default)]
pub struct FakeCpu {
    pub events: Vec<CpuEvent>,
    pub port92: u8,
}

impl PortIo for FakeCpu {
    fn read_port(&mut self, port: u16) -> u8 {
        self.events.push(CpuEvent::ReadPort(port));
        if port == 0x92 { self.port92 } else { 0xFF }
    }

    fn write_port(&mut self, port: u16, value: u8) {
        self.events.push(CpuEvent::WritePort(port, value));
        if port == 0x92 {
            self.port92 = value;
        }
    }
}

impl Cpu for FakeCpu {
    fn disable_interrupts(&mut self) {
        self.events.push(CpuEvent::DisableInterrupts);
    }

    fn load_gdt(&mut self, gdt: &'static [GdtEntry]) {
        self.events.push(CpuEvent::LoadGdt(gdt.len()));
    }

    fn enter_protected_and_jump(&mut self, handoff: &Handoff, stack_top: u32) -> ! {
        self.events.push(CpuEvent::EnableProtection);
        self.events.push(CpuEvent::FarJump);
        panic::panic_any(Jumped {
            handoff: *handoff,
            stack_top,
        })
    }
}

/// Run Stage-2 and report how it ended
pub fn run_stage2(ctx: &mut BootContext, fw: &mut FakeFirmware, cpu: &mut FakeCpu, tbds: &mut [u8]) -> Outcome {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        tb_bootloader::boot_stage::boot_flow::run(ctx, fw, cpu, tbds)
    }));

    let payload = match result {
        Ok(_) => unreachable!("Stage-2 returned"),
        Err(payload) => payload,
    };

    if payload.is::<Halted>() {
        Outcome::Halted
    } else if let Some(jump) = payload.downcast_ref::<Jumped>() {
        Outcome::Jumped(*jump)
    } else {
        panic::resume_unwind(payload)
    }
}
