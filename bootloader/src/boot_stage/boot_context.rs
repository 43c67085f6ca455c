//! Boot context
//!
//! The single mutable state of Stage-2. Built once on entry and passed by
//! reference to every step, in place of fixed-address globals.

use crate::boot_stage::{BootConfig, BootPhase, BootState};
use crate::firmware::{FirmwareEnvironment, LoadProgress};

#[derive(Debug, Clone)]
pub struct BootContext {
    pub config: BootConfig,
    /// Drive number firmware handed Stage-0 in DL
    pub boot_drive: u8,
    pub state: BootState,
    pub progress: LoadProgress,
    pub environment: FirmwareEnvironment,
    /// Total length of the TBDS block once built, 0 before
    pub tbds_length: u32,
}

impl BootContext {
    /// Context for a freshly started Stage-2; Stage-0 has already run.
    pub fn new(config: BootConfig, boot_drive: u8) -> Self {
        Self {
            config,
            boot_drive,
            state: BootState::at(BootPhase::Stage2Loaded),
            progress: LoadProgress::for_payload(&config),
            environment: FirmwareEnvironment::default(),
            tbds_length: 0,
        }
    }

    pub fn phase(&self) -> BootPhase {
        self.state.phase()
    }
}
