//! Boot Information Builder
//!
//! Fills the TBDS block with the three descriptors the payload expects,
//! always in the same order: boot device, console, firmware.

use tbds::{BootDevice, BootDeviceFlags, TbdsBuilder};

use crate::boot_stage::{BootContext, BootPhase};
use crate::error::Result;

/// `loader_stage` value of the boot-device descriptor
pub const LOADER_STAGE_ID: u8 = 2;

/// Boot-device descriptor for the current context
pub fn boot_device_descriptor(ctx: &BootContext) -> BootDevice {
    let mut flags = BootDeviceFlags::empty();
    if ctx.environment.lba_extensions() {
        flags |= BootDeviceFlags::LBA_EXTENSIONS;
    }
    if ctx.boot_drive & 0x80 != 0 {
        flags |= BootDeviceFlags::FIXED_DISK;
    }

    BootDevice {
        drive: ctx.boot_drive,
        loader_stage: LOADER_STAGE_ID,
        flags,
        stage2_lba: ctx.config.stage2_lba,
        payload_lba: ctx.config.payload_lba,
        payload_sectors: ctx.config.payload_sectors,
    }
}

/// Build the TBDS block in `block` and return its total length.
///
/// The block is zeroed first, so the result depends only on the context.
pub fn build_descriptor_block(ctx: &mut BootContext, block: &mut [u8]) -> Result<u32> {
    ctx.state.expect(BootPhase::PayloadLoaded)?;

    let device = boot_device_descriptor(ctx);
    let ident = ctx.environment.ident();

    let mut builder = TbdsBuilder::new(block)?;
    builder.append_boot_device(&device)?;
    builder.append_console(&ctx.environment.console)?;
    builder.append_firmware(ident.as_str())?;

    let length = builder.total_length();
    log::info!(
        "TBDS built: {} descriptors, {} bytes",
        builder.descriptor_count(),
        length
    );

    ctx.tbds_length = length;
    ctx.state.advance(BootPhase::DescriptorBuilt)?;
    Ok(length)
}
