//! Boot orchestration
//!
//! `BootContext` carries everything Stage-2 mutates; `boot_flow` threads it
//! through loading, descriptor construction and the mode switch.

pub mod boot_config;
pub mod boot_context;
pub mod boot_flow;
pub mod boot_state;

pub use boot_config::BootConfig;
pub use boot_context::BootContext;
pub use boot_state::{BootPhase, BootState};
