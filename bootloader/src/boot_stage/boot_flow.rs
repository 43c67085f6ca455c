//! Stage-2 boot flow
//!
//! Load the payload, build the TBDS block, switch modes, jump. The order is
//! fixed: the payload and TBDS regions share low memory with the loader, so
//! each step must finish before the next one writes anything.

use crate::boot_stage::BootContext;
use crate::cpu_init::{enter_payload, Cpu};
use crate::diagnostics;
use crate::error::Result;
use crate::firmware::{load_payload, Firmware};
use crate::kernel_if::{build_descriptor_block, Handoff};

/// Everything up to, but not including, the mode switch
pub fn prepare<F: Firmware + ?Sized>(
    ctx: &mut BootContext,
    fw: &mut F,
    tbds: &mut [u8],
) -> Result<Handoff> {
    ctx.config.validate()?;

    ctx.environment = fw.probe(ctx.boot_drive);
    log::info!(
        "boot drive {:#04x}, firmware {}",
        ctx.boot_drive,
        ctx.environment.ident().as_str()
    );

    load_payload(ctx, fw)?;
    let tbds_length = build_descriptor_block(ctx, tbds)?;

    Ok(Handoff {
        tbds_address: ctx.config.tbds_address,
        tbds_length,
        entry: ctx.config.payload_entry,
    })
}

/// Run Stage-2 to completion. Ends in the payload or in a halt.
pub fn run<F, C>(ctx: &mut BootContext, fw: &mut F, cpu: &mut C, tbds: &mut [u8]) -> !
where
    F: Firmware + ?Sized,
    C: Cpu + ?Sized,
{
    let handoff = match prepare(ctx, fw, tbds) {
        Ok(handoff) => handoff,
        Err(error) => diagnostics::halt_with(ctx, fw, &error),
    };

    let Err(error) = enter_payload(ctx, cpu, &handoff);
    diagnostics::halt_with(ctx, fw, &error)
}
