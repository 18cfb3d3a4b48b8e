//! Galaxy RS485 Bus Driver
//!
//! A `no_std`, no-alloc software implementation of the half-duplex RS485
//! bus used by the Galaxy alarm panel family.
//!
//! There is no hardware UART in the loop: the driver frames 8-N-1 bytes at
//! 9600 baud by sampling and driving a data pin from a periodic timer
//! interrupt at three times the bit rate. On top of that bit clock it
//! implements the bus checksum (seed 0xAA, end-around carry), destination
//! address filtering, end-of-message detection by idle gap, and RS485
//! direction turnaround via the transceiver's driver-enable pin. Both bus
//! roles are supported: a master sends as soon as the line falls quiet,
//! a slave answers only after a frame addressed to it completes.
//!
//! # Architecture
//!
//! The driver is organized into three layers:
//!
//! 1. **Driver** ([`driver`]): the interleaved receive/transmit state
//!    machines, one tick at a time
//! 2. **HAL** ([`hal`]): the [`BusLine`] and [`TickTimer`] capabilities;
//!    register-level implementations live outside this crate
//! 3. **Sync** ([`sync`]): the ISR/task handoff — event set, sequence
//!    counter, and the blocking [`SharedBus`] caller interface
//!
//! # Features
//!
//! - `defmt`: Enable defmt formatting for driver types and init logging
//!
//! # Example
//!
//! ```ignore
//! use galaxybus::{BusConfig, GalaxyBus, GpioLine};
//!
//! galaxybus::galaxybus_static!(BUS, GpioLine<Tx, Rx, De>, AlarmTimer);
//!
//! let line = GpioLine::new(tx_pin, rx_pin, de_pin);
//! let mut bus = GalaxyBus::new(line, timer, BusConfig::master())?;
//! bus.start()?;
//! BUS.attach(bus);
//!
//! // From the timer interrupt, at 28 800 Hz:
//! //     BUS.tick();
//!
//! let mut reply = [0u8; 64];
//! match BUS.poll(0x05, &mut reply, &mut delay) {
//!     Ok(0) => { /* no answer */ }
//!     Ok(n) => { /* reply[..n] */ }
//!     Err(e) => { /* line error */ }
//! }
//! ```
//!
//! # Concurrency model
//!
//! The timer interrupt is the sole mutator of the state machines; callers
//! interact through [`SharedBus`], which brackets every access in a
//! critical section and waits outside it. Frame loss under a slow caller
//! is detected (never silently dropped) via a wrapping sequence counter.

#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
// Clippy lint levels live here; thresholds and config are in Cargo.toml.
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::similar_names,
    clippy::must_use_candidate,
    clippy::cast_possible_truncation,
    clippy::cast_lossless,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::items_after_statements
)]

// =============================================================================
// Modules
// =============================================================================

pub mod constants;
pub mod driver;
pub mod hal;
pub mod sync;

// =============================================================================
// Re-exports
// =============================================================================

pub use driver::bus::GalaxyBus;
pub use driver::checksum;
pub use driver::config::{BusConfig, Role, State, Timing};
pub use driver::error::{
    ConfigError, ConfigResult, Error, FrameError, FrameResult, Result,
};
pub use hal::line::{BusLine, GpioLine, NoReceiverEnable};
pub use hal::timer::TickTimer;
pub use sync::{EventFlags, SharedBus};

// =============================================================================
// Macro Helpers
// =============================================================================

/// Declare a static, ISR-safe bus slot.
///
/// Expands to an empty [`SharedBus`] static; attach a started
/// [`GalaxyBus`] at runtime once the pins and timer exist.
///
/// # Examples
///
/// ```ignore
/// galaxybus::galaxybus_static!(BUS, GpioLine<Tx, Rx, De>, AlarmTimer);
///
/// BUS.attach(bus);
/// BUS.tick(); // from the timer interrupt
/// ```
#[macro_export]
macro_rules! galaxybus_static {
    ($name:ident, $line:ty, $timer:ty) => {
        static $name: $crate::sync::SharedBus<$line, $timer> =
            $crate::sync::SharedBus::new();
    };
}
