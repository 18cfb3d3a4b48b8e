//! Error types for the Galaxy bus driver
//!
//! Errors are organized by domain for better diagnostics:
//! - [`ConfigError`]: Initialization and configuration failures
//! - [`FrameError`]: Data-path failures, surfaced by `transmit`/`receive`
//!
//! The unified [`Error`] enum wraps both domains. [`FrameError`] also
//! carries the bus protocol's categorical negative integer codes, preserved
//! for callers that speak the original wire-level convention.

// =============================================================================
// Configuration Errors
// =============================================================================

/// Configuration and initialization errors
///
/// These errors occur while constructing or starting the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Timing configuration is unusable (the end-of-message gap must be nonzero)
    InvalidTiming,
    /// Slave address 0x00 is reserved
    InvalidAddress,
    /// The tick timer is already armed
    AlreadyRunning,
    /// The tick timer could not be armed
    Timer,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::InvalidTiming => "invalid timing configuration",
            ConfigError::InvalidAddress => "invalid bus address",
            ConfigError::AlreadyRunning => "already running",
            ConfigError::Timer => "tick timer error",
        }
    }
}

// =============================================================================
// Frame Errors
// =============================================================================

/// Data-path errors
///
/// These errors occur while submitting or draining frames. Receive framing
/// errors are latched into the frame being assembled and surfaced exactly
/// once when the caller drains that frame; the driver keeps receiving
/// subsequent frames normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// One or more frames were lost between poll intervals
    Missed,
    /// Message exceeds the 64-byte frame limit
    TooBig,
    /// Start bit was not low at the sample point
    StartBit,
    /// Stop bit was not high with a nonzero byte
    StopBit,
    /// Trailing checksum byte mismatch
    Checksum,
    /// Stop bit low with a zero byte (line break)
    Break,
    /// Transmitter could not be acquired within the timeout
    Busy,
}

impl core::fmt::Display for FrameError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FrameError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            FrameError::Missed => "frame missed",
            FrameError::TooBig => "frame too big",
            FrameError::StartBit => "start bit error",
            FrameError::StopBit => "stop bit error",
            FrameError::Checksum => "checksum mismatch",
            FrameError::Break => "line break",
            FrameError::Busy => "transmitter busy",
        }
    }

    /// The protocol's categorical negative integer code for this error.
    ///
    /// These values are fixed at the external interface boundary; new
    /// variants must never renumber them.
    #[must_use]
    pub const fn code(&self) -> i8 {
        match self {
            FrameError::Missed => -1,
            FrameError::TooBig => -2,
            FrameError::StartBit => -3,
            FrameError::StopBit => -4,
            FrameError::Checksum => -5,
            FrameError::Break => -6,
            FrameError::Busy => -7,
        }
    }

    /// Inverse of [`code`](Self::code); `None` for values outside the table.
    #[must_use]
    pub const fn from_code(code: i8) -> Option<Self> {
        match code {
            -1 => Some(FrameError::Missed),
            -2 => Some(FrameError::TooBig),
            -3 => Some(FrameError::StartBit),
            -4 => Some(FrameError::StopBit),
            -5 => Some(FrameError::Checksum),
            -6 => Some(FrameError::Break),
            -7 => Some(FrameError::Busy),
            _ => None,
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps both domain errors for unified error handling.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match result {
///     Err(Error::Config(ConfigError::InvalidTiming)) => { /* ... */ }
///     Err(Error::Frame(FrameError::Checksum)) => { /* ... */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration error
    Config(ConfigError),
    /// Data-path error
    Frame(FrameError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Config(e) => write!(f, "config: {}", e.as_str()),
            Error::Frame(e) => write!(f, "frame: {}", e.as_str()),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<FrameError> for Error {
    fn from(e: FrameError) -> Self {
        Error::Frame(e)
    }
}

/// Result type alias for bus operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

/// Result type alias for data-path operations
pub type FrameResult<T> = core::result::Result<T, FrameError>;

// =============================================================================
// Unit Tests
// =============================================================================
