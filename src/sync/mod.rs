//! ISR/task handoff
//!
//! The tick handler and caller tasks meet here.
//!
//! # Modules
//!
//! - [`flags`]: the three-bit event set (RX_IDLE, TX_IDLE, RX_READY)
//! - [`primitives`]: the critical-section cell everything is built on
//! - [`shared`]: [`SharedBus`], the blocking caller interface

pub mod flags;
pub mod primitives;
pub mod shared;

// Re-export commonly used types
pub use flags::{EventFlags, RX_IDLE, RX_READY, TX_IDLE};
pub use primitives::CriticalSectionCell;
pub use shared::SharedBus;
