//! Hardware Abstraction Layer
//!
//! This module defines the two capabilities the driver needs from the
//! platform, keeping every register-level detail outside the crate.
//!
//! # Modules
//!
//! - [`line`]: the RS485 line (sample, drive, direction control)
//! - [`timer`]: the periodic tick alarm at three times the bit rate
//!
//! # Delay Integration
//!
//! The blocking caller API uses `embedded_hal::delay::DelayNs` directly.
//! Pass any delay implementation from your HAL (e.g., `esp_hal::delay::Delay`).

pub mod line;
pub mod timer;

// Re-export commonly used types
pub use line::{BusLine, GpioLine, NoReceiverEnable};
pub use timer::TickTimer;
