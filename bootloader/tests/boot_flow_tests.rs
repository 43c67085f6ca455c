//! Stage-2 Boot Flow Tests
//!
//! Drive the whole Stage-2 sequence against recording fakes: chunked loads,
//! the fatal read path, descriptor contents and the mode-switch order.

mod common;

use common::{run_stage2, CpuEvent, FakeCpu, FakeFirmware, Jumped, Outcome};
use proptest::prelude::*;
use tb_bootloader::boot_stage::boot_flow;
use tb_bootloader::cpu_init::{a20::FAST_A20_PORT, FLAT_GDT};
use tb_bootloader::firmware::{DiskError, EddInterfaces, EddSupport, FirmwareEnvironment, ReadPlan};
use tb_bootloader::layout::{DMA_BOUNDARY, SECTOR_SIZE, TBDS_CAPACITY};
use tb_bootloader::{BootConfig, BootContext, BootPhase};
use tbds::{BootDeviceFlags, ConsoleInfo, Tbds};

fn config(payload_sectors: u32, max_transfer: u16) -> BootConfig {
    BootConfig {
        payload_sectors,
        max_sectors_per_transfer: max_transfer,
        ..BootConfig::DEFAULT
    }
}

fn bios_environment() -> FirmwareEnvironment {
    FirmwareEnvironment {
        edd: Some(EddSupport {
            version: 0x30,
            interfaces: EddInterfaces::PACKET_ACCESS,
        }),
        console: ConsoleInfo {
            text: true,
            graphical: false,
            serial: true,
            columns: 80,
            rows: 25,
            cell_width: 0,
            cell_height: 16,
        },
        serial_present: true,
    }
}

#[test]
fn test_32_sectors_in_chunks_of_8() {
    let config = config(32, 8);
    let mut ctx = BootContext::new(config, 0x80);
    let mut fw = FakeFirmware::default();
    let mut cpu = FakeCpu::default();
    let mut tbds = vec![0u8; TBDS_CAPACITY];

    let outcome = run_stage2(&mut ctx, &mut fw, &mut cpu, &mut tbds);

    let chunks: Vec<u16> = fw.reads.iter().map(|r| r.sector_count).collect();
    assert_eq!(chunks, vec![8, 8, 8, 8]);
    for (i, read) in fw.reads.iter().enumerate() {
        assert_eq!(read.destination, config.payload_address + i as u32 * 4096);
        assert_eq!(read.lba, config.payload_lba + i as u32 * 8);
        assert_eq!(read.drive, 0x80);
    }
    assert_eq!(ctx.progress.remaining, 0);
    assert!(fw.prints.is_empty());

    let parsed = Tbds::parse(&tbds).unwrap();
    assert_eq!(
        outcome,
        Outcome::Jumped(Jumped {
            handoff: tb_bootloader::Handoff {
                tbds_address: config.tbds_address,
                tbds_length: parsed.total_length(),
                entry: config.payload_entry,
            },
            stack_top: config.stack_top,
        })
    );
    assert_eq!(ctx.phase(), BootPhase::PayloadEntered);
}

#[test]
fn test_second_read_failure_halts_with_one_diagnostic() {
    let mut ctx = BootContext::new(config(32, 8), 0x80);
    let mut fw = FakeFirmware::failing_read(2, DiskError::SectorNotFound);
    let mut cpu = FakeCpu::default();
    let mut tbds = vec![0xCCu8; TBDS_CAPACITY];

    let outcome = run_stage2(&mut ctx, &mut fw, &mut cpu, &mut tbds);

    assert_eq!(outcome, Outcome::Halted);
    assert_eq!(fw.reads.len(), 2);
    assert_eq!(fw.prints, vec!["Stage-2: disk read error\r\n".to_string()]);
    // nothing after the failed read ran
    assert!(tbds.iter().all(|&b| b == 0xCC));
    assert!(cpu.events.is_empty());
    assert_eq!(ctx.phase(), BootPhase::Halted);
    assert_eq!(ctx.progress.remaining, 24);
    assert_eq!(ctx.tbds_length, 0);
}

#[test]
fn test_first_read_failure_halts() {
    let mut ctx = BootContext::new(config(4, 8), 0x80);
    let mut fw = FakeFirmware::failing_read(1, DiskError::TimeoutError);
    let mut cpu = FakeCpu::default();
    let mut tbds = vec![0u8; TBDS_CAPACITY];

    assert_eq!(run_stage2(&mut ctx, &mut fw, &mut cpu, &mut tbds), Outcome::Halted);
    assert_eq!(fw.reads.len(), 1);
    assert_eq!(fw.prints.len(), 1);
}

#[test]
fn test_mode_switch_order() {
    let mut ctx = BootContext::new(config(1, 8), 0x80);
    let mut fw = FakeFirmware::default();
    let mut cpu = FakeCpu::default();
    let mut tbds = vec![0u8; TBDS_CAPACITY];

    run_stage2(&mut ctx, &mut fw, &mut cpu, &mut tbds);

    assert_eq!(
        cpu.events,
        vec![
            CpuEvent::ReadPort(FAST_A20_PORT),
            CpuEvent::WritePort(FAST_A20_PORT, 0x02),
            CpuEvent::DisableInterrupts,
            CpuEvent::LoadGdt(FLAT_GDT.len()),
            CpuEvent::EnableProtection,
            CpuEvent::FarJump,
        ]
    );
    assert_eq!(ctx.phase(), BootPhase::PayloadEntered);
}

#[test]
fn test_a20_already_open_is_left_alone() {
    let mut ctx = BootContext::new(config(1, 8), 0x80);
    let mut fw = FakeFirmware::default();
    let mut cpu = FakeCpu {
        port92: 0x02,
        ..FakeCpu::default()
    };
    let mut tbds = vec![0u8; TBDS_CAPACITY];

    run_stage2(&mut ctx, &mut fw, &mut cpu, &mut tbds);

    assert!(!cpu
        .events
        .iter()
        .any(|e| matches!(e, CpuEvent::WritePort(FAST_A20_PORT, _))));
    assert_eq!(cpu.port92, 0x02);
}

#[test]
fn test_descriptors_reflect_probe() {
    let config = config(16, 8);
    let mut ctx = BootContext::new(config, 0x80);
    let mut fw = FakeFirmware {
        environment: bios_environment(),
        ..FakeFirmware::default()
    };
    let mut tbds = vec![0u8; TBDS_CAPACITY];

    let handoff = boot_flow::prepare(&mut ctx, &mut fw, &mut tbds).unwrap();
    let parsed = Tbds::parse(&tbds).unwrap();

    let device = parsed.boot_device().unwrap();
    assert_eq!(device.drive, 0x80);
    assert_eq!(device.loader_stage, 2);
    assert_eq!(
        device.flags,
        BootDeviceFlags::LBA_EXTENSIONS | BootDeviceFlags::FIXED_DISK
    );
    assert_eq!(device.stage2_lba, config.stage2_lba);
    assert_eq!(device.payload_lba, config.payload_lba);
    assert_eq!(device.payload_sectors, 16);
    assert_eq!(parsed.console(), Some(bios_environment().console));
    assert_eq!(parsed.firmware(), Some(&b"PC-BIOS EDD 3.0"[..]));
    assert_eq!(handoff.tbds_length, 20 + (8 + 16) + (8 + 12) + (8 + 15));
}

#[test]
fn test_descriptor_block_is_reproducible() {
    let build = |fill: u8| {
        let mut ctx = BootContext::new(config(16, 8), 0x80);
        let mut fw = FakeFirmware {
            environment: bios_environment(),
            ..FakeFirmware::default()
        };
        let mut tbds = vec![fill; TBDS_CAPACITY];
        boot_flow::prepare(&mut ctx, &mut fw, &mut tbds).unwrap();
        tbds
    };

    assert_eq!(build(0x00), build(0xA5));
}

#[test]
fn test_zero_transfer_limit_halts_before_reading() {
    let mut ctx = BootContext::new(config(16, 0), 0x80);
    let mut fw = FakeFirmware::default();
    let mut cpu = FakeCpu::default();
    let mut tbds = vec![0u8; TBDS_CAPACITY];

    assert_eq!(run_stage2(&mut ctx, &mut fw, &mut cpu, &mut tbds), Outcome::Halted);
    assert!(fw.reads.is_empty());
    assert_eq!(fw.prints, vec!["Stage-2: bad boot configuration\r\n".to_string()]);
}

#[test]
fn test_transfer_limit_that_would_cross_64k_halts() {
    let mut ctx = BootContext::new(config(256, 127), 0x80);
    let mut fw = FakeFirmware::default();
    let mut cpu = FakeCpu::default();
    let mut tbds = vec![0u8; TBDS_CAPACITY];

    assert_eq!(run_stage2(&mut ctx, &mut fw, &mut cpu, &mut tbds), Outcome::Halted);
    assert!(fw.reads.is_empty());
    assert_eq!(fw.prints, vec!["Stage-2: bad boot configuration\r\n".to_string()]);
}

#[test]
fn test_tbds_region_too_small_halts_before_mode_switch() {
    let mut ctx = BootContext::new(config(8, 8), 0x80);
    let mut fw = FakeFirmware::default();
    let mut cpu = FakeCpu::default();
    let mut tbds = vec![0u8; 32];

    assert_eq!(run_stage2(&mut ctx, &mut fw, &mut cpu, &mut tbds), Outcome::Halted);
    assert_eq!(fw.prints, vec!["Stage-2: descriptor block error\r\n".to_string()]);
    assert!(cpu.events.is_empty());
}

proptest! {
    #[test]
    fn prop_chunked_reads_cover_payload(
        sectors in 1u32..=1920,
        max in prop::sample::select(vec![1u16, 2, 4, 8, 16, 32, 64]),
    ) {
        let config = config(sectors, max);
        let mut ctx = BootContext::new(config, 0x80);
        let mut fw = FakeFirmware::default();
        let mut tbds = vec![0u8; TBDS_CAPACITY];

        boot_flow::prepare(&mut ctx, &mut fw, &mut tbds).unwrap();

        prop_assert_eq!(fw.reads.len() as u32, sectors.div_ceil(max as u32));
        prop_assert_eq!(fw.sectors_read(), sectors);
        prop_assert!(fw.reads.iter().all(|r| r.sector_count >= 1 && r.sector_count <= max));
        prop_assert_eq!(ctx.progress.remaining, 0);
        for read in &fw.reads {
            let last = read.destination + read.sector_count as u32 * SECTOR_SIZE - 1;
            prop_assert_eq!(read.destination / DMA_BOUNDARY, last / DMA_BOUNDARY);
        }

        let planned: Vec<_> = ReadPlan::for_payload(&config, 0x80).collect();
        prop_assert_eq!(planned, fw.reads);
    }
}
