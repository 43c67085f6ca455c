// Boot state tracking
//
// The sequence is strictly forward and single-shot. HALTED can be entered
// from any phase that has not already finished.

use crate::error::{BootError, Result};

#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootPhase {
    Reset = 0,
    Stage0Running = 1,
    Stage2Loaded = 2,
    PayloadLoaded = 3,
    DescriptorBuilt = 4,
    ExtendedAddressingEnabled = 5,
    FlatSegmentsInstalled = 6,
    ExtendedModeActive = 7,
    PayloadEntered = 8,
    Halted = 0xFF,
}

impl BootPhase {
    /// The only phase that may follow this one on the success path
    pub const fn successor(self) -> Option<BootPhase> {
        match self {
            Self::Reset => Some(Self::Stage0Running),
            Self::Stage0Running => Some(Self::Stage2Loaded),
            Self::Stage2Loaded => Some(Self::PayloadLoaded),
            Self::PayloadLoaded => Some(Self::DescriptorBuilt),
            Self::DescriptorBuilt => Some(Self::ExtendedAddressingEnabled),
            Self::ExtendedAddressingEnabled => Some(Self::FlatSegmentsInstalled),
            Self::FlatSegmentsInstalled => Some(Self::ExtendedModeActive),
            Self::ExtendedModeActive => Some(Self::PayloadEntered),
            Self::PayloadEntered | Self::Halted => None,
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::PayloadEntered | Self::Halted)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Reset => "RESET",
            Self::Stage0Running => "STAGE0_RUNNING",
            Self::Stage2Loaded => "STAGE2_LOADED",
            Self::PayloadLoaded => "PAYLOAD_LOADED",
            Self::DescriptorBuilt => "DESCRIPTOR_BUILT",
            Self::ExtendedAddressingEnabled => "EXTENDED_ADDRESSING_ENABLED",
            Self::FlatSegmentsInstalled => "FLAT_SEGMENTS_INSTALLED",
            Self::ExtendedModeActive => "EXTENDED_MODE_ACTIVE",
            Self::PayloadEntered => "PAYLOAD_ENTERED",
            Self::Halted => "HALTED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootState {
    phase: BootPhase,
}

impl BootState {
    pub const fn new() -> Self {
        Self::at(BootPhase::Reset)
    }

    pub const fn at(phase: BootPhase) -> Self {
        Self { phase }
    }

    pub fn phase(&self) -> BootPhase {
        self.phase
    }

    pub fn is_halted(&self) -> bool {
        self.phase == BootPhase::Halted
    }

    /// Move to `next`, which must be the immediate successor
    pub fn advance(&mut self, next: BootPhase) -> Result {
        if self.phase.successor() != Some(next) {
            return Err(BootError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }

        log::debug!("boot phase {} -> {}", self.phase.name(), next.name());
        self.phase = next;
        Ok(())
    }

    /// Fail unless the current phase is `phase`
    pub fn expect(&self, phase: BootPhase) -> Result {
        if self.phase != phase {
            return Err(BootError::InvalidTransition {
                from: self.phase,
                to: phase,
            });
        }
        Ok(())
    }

    pub fn halt(&mut self) -> Result {
        if self.phase.is_terminal() {
            return Err(BootError::InvalidTransition {
                from: self.phase,
                to: BootPhase::Halted,
            });
        }

        self.phase = BootPhase::Halted;
        Ok(())
    }
}

impl Default for BootState {
    fn default() -> Self {
        Self::new()
    }
}
