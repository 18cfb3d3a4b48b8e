//! Configuration types for the Galaxy bus driver

use crate::constants::{
    DEFAULT_GAP, DEFAULT_TX_POST, DEFAULT_TX_PRE, MASTER_ADDRESS, PROMISCUOUS_ADDRESS,
};
use crate::driver::error::ConfigError;

/// Bus role
///
/// The master initiates every exchange; slaves answer only when a frame
/// addressed to them has completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Role {
    /// Polls devices; outbound frames go out as soon as the line is idle
    #[default]
    Master,
    /// Responds when addressed; outbound frames wait for the next poll
    Slave,
}

/// Driver lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Constructed, tick timer not armed
    #[default]
    Initialized,
    /// Tick timer armed, state machines live
    Running,
    /// Tick timer disarmed after a run
    Stopped,
}

/// Line timing, in bit times
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    /// Idle-high padding before the first start bit
    pub tx_pre: u8,
    /// Idle-high padding after the last stop bit
    pub tx_post: u8,
    /// Inter-message idle time that delimits end-of-message
    pub gap: u8,
}

impl Timing {
    /// Default timing: 2 bits of padding either side, 10-bit gap.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tx_pre: DEFAULT_TX_PRE,
            tx_post: DEFAULT_TX_POST,
            gap: DEFAULT_GAP,
        }
    }

    /// Override the nonzero fields, keeping the rest.
    ///
    /// A zero argument means "leave unchanged", matching the original bus
    /// firmware's `set_timing` convention.
    pub fn override_nonzero(&mut self, pre: u8, post: u8, gap: u8) {
        if pre != 0 {
            self.tx_pre = pre;
        }
        if post != 0 {
            self.tx_post = post;
        }
        if gap != 0 {
            self.gap = gap;
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::new()
    }
}

/// Bus configuration
///
/// Built with the `master`/`slave` constructors plus `with_*` methods:
///
/// ```
/// use galaxybus::{BusConfig, Timing};
///
/// let config = BusConfig::slave(0x05).with_timing(Timing {
///     tx_pre: 4,
///     tx_post: 4,
///     gap: 10,
/// });
/// assert_eq!(config.address, 0x05);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    /// Our bus address; 0xFF receives every frame
    pub address: u8,
    /// Master or slave behaviour
    pub role: Role,
    /// Line timing
    pub timing: Timing,
}

impl BusConfig {
    /// Master configuration with the well-known master address 0x11.
    #[must_use]
    pub const fn master() -> Self {
        Self {
            address: MASTER_ADDRESS,
            role: Role::Master,
            timing: Timing::new(),
        }
    }

    /// Slave configuration answering on `address`.
    #[must_use]
    pub const fn slave(address: u8) -> Self {
        Self {
            address,
            role: Role::Slave,
            timing: Timing::new(),
        }
    }

    /// Configuration from a raw address byte: zero selects the master role,
    /// anything else a slave on that address. This mirrors the original
    /// firmware's init argument.
    #[must_use]
    pub const fn from_address(address: u8) -> Self {
        if address == 0 {
            Self::master()
        } else {
            Self::slave(address)
        }
    }

    /// Replace the line timing.
    #[must_use]
    pub const fn with_timing(mut self, timing: Timing) -> Self {
        self.timing = timing;
        self
    }

    /// Replace the local address (0xFF makes the receiver promiscuous).
    #[must_use]
    pub const fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// True if the receiver keeps frames regardless of their destination.
    #[must_use]
    pub const fn is_promiscuous(&self) -> bool {
        self.address == PROMISCUOUS_ADDRESS
    }

    /// Validate the configuration.
    ///
    /// The gap must be nonzero (it is the only end-of-message delimiter) and
    /// slave address 0x00 is reserved for "no address" on the wire.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.timing.gap == 0 {
            return Err(ConfigError::InvalidTiming);
        }
        if matches!(self.role, Role::Slave) && self.address == 0 {
            return Err(ConfigError::InvalidAddress);
        }
        Ok(())
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self::master()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
