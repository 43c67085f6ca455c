//! Mode Transition Implementation
//!
//! Real mode to 32-bit flat protected mode, then into the payload. Every
//! hardware step is followed by the matching boot-state advance, except the
//! last: setting CR0.PE and the far jump are one primitive, so the final two
//! phases are recorded just before it.

use core::convert::Infallible;

use crate::boot_stage::{BootContext, BootPhase};
use crate::cpu_init::{a20, Cpu, FLAT_GDT};
use crate::error::Result;
use crate::kernel_if::Handoff;

/// Switch to protected mode and jump to the payload.
///
/// Must run after the descriptor block is built. Returns only if called in
/// the wrong phase, before any hardware state has been touched.
pub fn enter_payload<C: Cpu + ?Sized>(
    ctx: &mut BootContext,
    cpu: &mut C,
    handoff: &Handoff,
) -> Result<Infallible> {
    ctx.state.expect(BootPhase::DescriptorBuilt)?;

    a20::enable(cpu);
    ctx.state.advance(BootPhase::ExtendedAddressingEnabled)?;

    // no interrupt may observe a half-switched CPU from here on
    cpu.disable_interrupts();
    cpu.load_gdt(&FLAT_GDT);
    ctx.state.advance(BootPhase::FlatSegmentsInstalled)?;

    ctx.state.advance(BootPhase::ExtendedModeActive)?;
    ctx.state.advance(BootPhase::PayloadEntered)?;
    log::info!(
        "entering payload at {:#x}, TBDS {:#x} ({} bytes)",
        handoff.entry,
        handoff.tbds_address,
        handoff.tbds_length
    );

    // nothing may run between CR0.PE and the far jump
    cpu.enter_protected_and_jump(handoff, ctx.config.stack_top)
}
