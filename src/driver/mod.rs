//! Core bus driver components
//!
//! This module contains the essential building blocks for configuring and
//! operating the bus.
//!
//! # Overview
//!
//! - [`config`]: Configuration types and builder patterns
//! - [`error`]: Error types and result aliases
//! - [`checksum`]: The bus checksum (seed 0xAA, end-around carry)
//! - [`bus`]: The transceiver state machines and tick handler
//!
//! # Usage
//!
//! ```ignore
//! use galaxybus::{BusConfig, GalaxyBus};
//!
//! let config = BusConfig::slave(0x05);
//! let mut bus = GalaxyBus::new(line, timer, config)?;
//! bus.start()?;
//! ```

// Submodules
pub mod bus;
pub mod checksum;
pub mod config;
pub mod error;

// Re-exports for convenience
pub use bus::GalaxyBus;
pub use config::{BusConfig, Role, State, Timing};
pub use error::{ConfigError, ConfigResult, Error, FrameError, FrameResult, Result};
