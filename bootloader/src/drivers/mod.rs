//! Device drivers

pub mod uart;

pub use uart::{SerialPort, COM1};
