//! Centralized Constants
//!
//! This module provides a single source of truth for the magic numbers used
//! throughout the bus driver.
//!
//! # Organization
//!
//! Constants are grouped by category:
//! - **Wire format**: frame cap, addresses, command bytes
//! - **Bit clock**: baud rate and oversampling
//! - **Timing defaults**: idle padding and the end-of-message gap
//! - **Caller timeouts**: blocking submit/drain windows

// =============================================================================
// Wire Format
// =============================================================================

/// Maximum frame size on the wire, payload plus the trailing checksum byte.
pub const MAX_FRAME: usize = 64;

/// Well-known bus address of the master.
pub const MASTER_ADDRESS: u8 = 0x11;

/// Destination address accepted by every device.
pub const BROADCAST_ADDRESS: u8 = 0xFF;

/// A local address of [`BROADCAST_ADDRESS`] receives every frame.
pub const PROMISCUOUS_ADDRESS: u8 = BROADCAST_ADDRESS;

/// Simple poll command byte, sent by [`poll`](crate::sync::SharedBus::poll).
pub const SIMPLE_POLL: u8 = 0x06;

// =============================================================================
// Bit Clock
// =============================================================================

/// Wire baud rate. Changing this is a recompile-level decision.
pub const BAUD: u32 = 9600;

/// Timer ticks per bit. Three is the lowest divisor that still gives mid-bit
/// sampling tolerance while keeping the tick handler cheap.
pub const TICKS_PER_BIT: u32 = 3;

/// Periodic alarm rate armed by [`start`](crate::GalaxyBus::start):
/// 28 800 Hz at 9600 baud.
pub const TICK_HZ: u32 = BAUD * TICKS_PER_BIT;

// =============================================================================
// Timing Defaults (bit times)
// =============================================================================

/// Default idle-high padding before the first start bit.
pub const DEFAULT_TX_PRE: u8 = 2;

/// Default idle-high padding after the last stop bit.
pub const DEFAULT_TX_POST: u8 = 2;

/// Default inter-message idle time that delimits end-of-message.
pub const DEFAULT_GAP: u8 = 10;

// =============================================================================
// Caller Timeouts
// =============================================================================

/// How long a blocking transmit waits for the transmitter to go idle.
pub const TX_TIMEOUT_MS: u32 = 100;

/// How long a blocking receive waits for the receiver to go idle.
pub const RX_TIMEOUT_MS: u32 = 10;

/// How long [`poll`](crate::sync::SharedBus::poll) waits for the polled
/// device to answer.
pub const POLL_TIMEOUT_MS: u32 = 100;

/// Sleep granularity of the blocking waits.
pub const WAIT_POLL_US: u32 = 250;
