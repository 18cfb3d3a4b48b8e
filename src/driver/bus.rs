//! Galaxy bus core
//!
//! This module provides the main bus driver that integrates the bit clock,
//! the receive and transmit state machines, and the line direction control
//! into a complete half-duplex transceiver.
//!
//! # Tick discipline
//!
//! One periodic alarm at three times the bit rate drives everything. Each
//! tick advances either the receive or the transmit state machine; the two
//! are never active at once. The sub-bit counter divides ticks into bits:
//! it counts down from 2 between sampling points, so byte bits are handled
//! every third tick, while the idle line is scanned on every tick to catch
//! a start edge within a third of a bit.
//!
//! # Caller handoff
//!
//! The tick handler is the only writer of the receive machinery; callers
//! drain completed frames through [`receive`](GalaxyBus::receive), guarded
//! by the wrapping sequence counter. The transmit buffer is the only
//! caller-written region, protected by the `txhold` flag which the tick
//! handler honours by deferring the frame start one tick at a time.

use crate::constants::{BROADCAST_ADDRESS, MAX_FRAME, PROMISCUOUS_ADDRESS, TICK_HZ, TICKS_PER_BIT};
use crate::driver::checksum;
use crate::driver::config::{BusConfig, Role, State};
use crate::driver::error::{ConfigError, ConfigResult, FrameError, FrameResult};
use crate::hal::line::BusLine;
use crate::hal::timer::TickTimer;
use crate::sync::flags::{EventFlags, RX_IDLE, RX_READY, TX_IDLE};

/// Line direction. The two state machines share one tick, so the driver is
/// in exactly one of these at any instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Rx,
    Tx,
}

/// Galaxy RS485 bus driver
///
/// Owns the physical line and the tick timer. Construct with
/// [`new`](Self::new), arm with [`start`](Self::start), then call
/// [`tick`](Self::tick) from the periodic timer interrupt. Callers submit
/// with [`try_transmit`](Self::try_transmit) and drain with
/// [`receive`](Self::receive); the blocking wrappers live on
/// [`SharedBus`](crate::sync::SharedBus).
///
/// # Example
/// ```ignore
/// let line = GpioLine::new(tx_pin, rx_pin, de_pin);
/// let mut bus = GalaxyBus::new(line, timer, BusConfig::master())?;
/// bus.start()?;
/// ```
pub struct GalaxyBus<L: BusLine, T: TickTimer> {
    line: L,
    timer: T,
    config: BusConfig,
    state: State,
    mode: Mode,
    flags: EventFlags,

    // Bit clock, shared by both directions
    subbit: u8,
    bit: u8,
    shift: u8,

    // Receive machinery (tick handler is the only writer)
    rxdata: [u8; MAX_FRAME],
    rxpos: u8,
    rxsum: u8,
    rxgap: u16,
    rxerr: Option<FrameError>,
    rxignore: bool,

    // Completed frame slot
    rxlen: u8,
    rxreport: Option<FrameError>,
    rxseq: u8,
    rxdue: u8,

    // Transmit machinery (buffer and length are caller-written)
    txdata: [u8; MAX_FRAME],
    txlen: u8,
    txpos: u8,
    txgap: u8,
    txdue: bool,
    txhold: bool,
}

impl<L: BusLine, T: TickTimer> GalaxyBus<L, T> {
    /// Create a bus instance over `line`, clocked by `timer`.
    ///
    /// Validates the configuration; the timer is not armed until
    /// [`start`](Self::start).
    pub fn new(line: L, timer: T, config: BusConfig) -> ConfigResult<Self> {
        config.validate()?;

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "galaxybus: new, address {=u8:x}, role {}",
            config.address,
            config.role
        );

        Ok(Self {
            line,
            timer,
            config,
            state: State::Initialized,
            mode: Mode::Rx,
            flags: EventFlags::new(),
            subbit: 0,
            bit: 0,
            shift: 0,
            rxdata: [0; MAX_FRAME],
            rxpos: 0,
            rxsum: 0,
            rxgap: 0,
            rxerr: None,
            rxignore: false,
            rxlen: 0,
            rxreport: None,
            rxseq: 0,
            rxdue: 0,
            txdata: [0; MAX_FRAME],
            txlen: 0,
            txpos: 0,
            txgap: 0,
            txdue: false,
            txhold: false,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Current lifecycle state.
    #[inline(always)]
    pub fn state(&self) -> State {
        self.state
    }

    /// Active configuration.
    #[inline(always)]
    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Snapshot of the event set.
    #[inline(always)]
    pub fn events(&self) -> EventFlags {
        self.flags
    }

    /// True while no rx frame is being assembled.
    #[inline(always)]
    pub fn rx_idle(&self) -> bool {
        self.flags.contains(RX_IDLE)
    }

    /// True while no tx frame is pending or in flight.
    #[inline(always)]
    pub fn tx_idle(&self) -> bool {
        self.flags.contains(TX_IDLE)
    }

    /// True while the driver owns the line.
    #[inline(always)]
    pub fn is_transmitting(&self) -> bool {
        self.mode == Mode::Tx
    }

    /// True if at least one completed frame is waiting to be drained.
    #[inline(always)]
    pub fn ready(&self) -> bool {
        self.rxseq != self.rxdue
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Override the nonzero timing fields, keeping the rest.
    pub fn set_timing(&mut self, pre: u8, post: u8, gap: u8) {
        self.config.timing.override_nonzero(pre, post, gap);
    }

    /// Arm the tick timer and enter receive mode.
    ///
    /// The line is released to the receiver and both idle events are
    /// raised, so a caller may submit immediately.
    pub fn start(&mut self) -> ConfigResult<()> {
        if self.state == State::Running {
            return Err(ConfigError::AlreadyRunning);
        }

        self.line.release_driver();
        self.mode = Mode::Rx;
        self.subbit = 0;
        self.bit = 0;
        self.rxgap = 0;
        self.reset_frame();
        self.flags.set(RX_IDLE | TX_IDLE);

        self.timer.start(TICK_HZ).map_err(|_| ConfigError::Timer)?;
        self.state = State::Running;

        #[cfg(feature = "defmt")]
        defmt::info!("galaxybus: started, tick {=u32} Hz", TICK_HZ);

        Ok(())
    }

    /// Disarm the tick timer.
    pub fn stop(&mut self) {
        self.timer.stop();
        self.state = State::Stopped;

        #[cfg(feature = "defmt")]
        defmt::info!("galaxybus: stopped");
    }

    /// Tear the instance apart, returning the line and timer.
    ///
    /// Stops the timer first if the bus is still running.
    pub fn release(mut self) -> (L, T) {
        if self.state == State::Running {
            self.stop();
        }
        (self.line, self.timer)
    }

    // =========================================================================
    // Caller data path
    // =========================================================================

    /// Submit a frame for transmission without blocking.
    ///
    /// Fails with [`FrameError::TooBig`] if the payload plus checksum would
    /// exceed the frame cap, and with [`FrameError::Busy`] if a previous
    /// frame is still pending or in flight. On success the payload is
    /// copied, the checksum appended, and — for a master — the frame is
    /// marked due so it goes out at the next quiet point on the line. A
    /// slave's frame stays queued until a frame addressed to it completes.
    ///
    /// Returns the payload length.
    pub fn try_transmit(&mut self, payload: &[u8]) -> FrameResult<usize> {
        if payload.len() >= MAX_FRAME {
            return Err(FrameError::TooBig);
        }
        if !self.flags.contains(TX_IDLE) {
            return Err(FrameError::Busy);
        }

        self.txhold = true;
        self.flags.clear(TX_IDLE);

        self.txdata[..payload.len()].copy_from_slice(payload);
        self.txdata[payload.len()] = checksum::of(payload);
        self.txlen = payload.len() as u8 + 1;
        self.txpos = 0;
        if self.config.role == Role::Master {
            self.txdue = true;
        }

        self.txhold = false;
        Ok(payload.len())
    }

    /// Drain the most recently completed frame into `buf`.
    ///
    /// Returns `Ok(0)` when nothing is ready. Detects frames lost since the
    /// last drain ([`FrameError::Missed`]); surfaces the frame's latched
    /// error, if any, exactly once. The delivered length excludes the
    /// trailing checksum byte.
    pub fn receive(&mut self, buf: &mut [u8]) -> FrameResult<usize> {
        if self.rxdue == self.rxseq {
            return Ok(0);
        }

        self.rxdue = self.rxdue.wrapping_add(1);
        if self.rxdue != self.rxseq {
            // More than one frame completed since the last drain; the slot
            // only holds the newest.
            return Err(FrameError::Missed);
        }
        self.flags.clear(RX_READY);

        if self.rxlen == 0 {
            return Ok(0);
        }
        if let Some(err) = self.rxreport {
            return Err(err);
        }

        let len = self.rxlen as usize - 1;
        if len > buf.len() {
            return Err(FrameError::TooBig);
        }
        buf[..len].copy_from_slice(&self.rxdata[..len]);

        if self.rxdue != self.rxseq {
            // The slot was overwritten while we copied
            return Err(FrameError::Missed);
        }
        Ok(len)
    }

    // =========================================================================
    // Tick handler
    // =========================================================================

    /// Advance the state machines by one timer tick.
    ///
    /// Call from the periodic timer interrupt at
    /// [`TICK_HZ`](crate::constants::TICK_HZ). Never blocks.
    pub fn tick(&mut self) {
        if self.state != State::Running {
            return;
        }
        self.line.clock_toggle();
        match self.mode {
            Mode::Rx => self.rx_tick(),
            Mode::Tx => self.tx_tick(),
        }
    }

    // =========================================================================
    // Receive state machine
    // =========================================================================

    fn rx_tick(&mut self) {
        let level = self.line.read();

        if self.bit == 0 {
            // Between bytes. Scan every tick so a start edge is caught
            // within a third of a bit.
            if !level {
                if self.rxpos == 0 {
                    // First byte of a new frame
                    self.flags.clear(RX_IDLE);
                }
                // Sample one tick from now, inside the start bit
                self.subbit = 1;
                self.bit = 10;
            } else if self.rxgap > 0 {
                self.rxgap -= 1;
                if self.rxgap == 0 {
                    self.finish_frame();
                }
            } else if self.txdue {
                self.enter_tx();
            }
            return;
        }

        if self.subbit > 0 {
            self.subbit -= 1;
            return;
        }

        // Sampling point
        self.subbit = 2;
        self.bit -= 1;
        match self.bit {
            9 => {
                if level {
                    // The edge vanished before the sample point
                    self.record_error(FrameError::StartBit);
                    self.bit = 0;
                    self.subbit = 0;
                    if self.rxgap == 0 {
                        self.rxgap = self.gap_ticks();
                    }
                }
            }
            1..=8 => {
                // LSB first
                self.shift >>= 1;
                if level {
                    self.shift |= 0x80;
                }
            }
            _ => {
                if !level {
                    self.record_error(if self.shift == 0 {
                        FrameError::Break
                    } else {
                        FrameError::StopBit
                    });
                }
                // The byte is kept even on a bad stop bit
                self.byte_done();
                // The next start bit may be adjacent; resume scanning at
                // once
                self.subbit = 0;
            }
        }
    }

    /// Frame bookkeeping is cleaned at end-of-message, so a byte landing at
    /// any later point starts from a known state.
    fn reset_frame(&mut self) {
        self.rxpos = 0;
        self.rxsum = checksum::SEED;
        self.rxerr = None;
        self.rxignore = false;
    }

    /// A full byte (good or bad) sits in the shift register.
    fn byte_done(&mut self) {
        let byte = self.shift;
        self.rxgap = self.gap_ticks();

        let pos = self.rxpos as usize;
        if pos == 0 && byte == 0 && self.rxerr.is_none() {
            // Leading zero before the real first byte: resynchronization.
            // A zero byte carrying a framing error is a break, not padding,
            // and must reach the caller.
            return;
        }
        if pos == 0
            && byte != self.config.address
            && byte != BROADCAST_ADDRESS
            && self.config.address != PROMISCUOUS_ADDRESS
        {
            self.rxignore = true;
        }
        if self.rxignore {
            // Framing continues so the gap detector still finds
            // end-of-message, but nothing is kept
            return;
        }
        if pos == MAX_FRAME {
            self.record_error(FrameError::TooBig);
            return;
        }

        // The last byte is the sender's checksum, so fold bytes into the
        // running sum one byte behind the buffer
        if pos > 0 {
            self.rxsum = checksum::update(self.rxsum, self.rxdata[pos - 1]);
        }
        self.rxdata[pos] = byte;
        self.rxpos += 1;
    }

    /// The inter-message gap elapsed: the frame is complete.
    ///
    /// Nothing is delivered for an ignored frame, and a frame that never
    /// produced a byte (a glitch, or the quiet stretch after our own
    /// transmission) just resets the bookkeeping.
    fn finish_frame(&mut self) {
        if !self.rxignore && self.rxpos > 0 {
            if self.rxerr.is_none() {
                let sent = self.rxdata[self.rxpos as usize - 1];
                if self.rxsum != sent {
                    self.rxerr = Some(FrameError::Checksum);
                }
            }

            self.rxlen = self.rxpos;
            self.rxreport = self.rxerr;
            self.rxseq = self.rxseq.wrapping_add(1);
            self.flags.set(RX_READY);

            // A slave answers only once a frame addressed to it completes
            if self.config.role == Role::Slave && !self.flags.contains(TX_IDLE) {
                self.txdue = true;
            }
        }
        self.reset_frame();
        self.flags.set(RX_IDLE);

        if self.txdue {
            self.enter_tx();
        }
    }

    fn record_error(&mut self, err: FrameError) {
        // First error in a frame wins; checksum only ever fills an empty
        // slot at end-of-message
        if self.rxerr.is_none() {
            self.rxerr = Some(err);
        }
    }

    fn gap_ticks(&self) -> u16 {
        u16::from(self.config.timing.gap) * TICKS_PER_BIT as u16
    }

    // =========================================================================
    // Transmit state machine
    // =========================================================================

    fn tx_tick(&mut self) {
        if self.subbit > 0 {
            self.subbit -= 1;
            return;
        }
        self.subbit = 2;

        if self.bit > 0 {
            self.bit -= 1;
            if self.bit > 0 {
                // LSB first
                self.line.drive(self.shift & 1 != 0);
                self.shift >>= 1;
            } else {
                self.line.drive(true);
                if self.txpos >= self.txlen {
                    // Last stop bit of the frame: pad out the trailer
                    self.txgap = self.config.timing.tx_post;
                }
            }
            return;
        }

        // Bit boundary between bytes
        if self.txgap > 0 {
            self.txgap -= 1;
            return;
        }
        if self.txpos >= self.txlen {
            self.finish_tx();
            return;
        }
        if self.txpos == 0 && self.txhold {
            // The caller is still filling the buffer: look again next tick
            self.subbit = 0;
            return;
        }

        // Load the next byte and put its start bit on the wire
        self.shift = self.txdata[self.txpos as usize];
        self.txpos += 1;
        self.bit = 9;
        self.line.drive(false);
    }

    /// Claim the line and pad out `txpre` before the first start bit.
    fn enter_tx(&mut self) {
        self.mode = Mode::Tx;
        self.txdue = false;
        self.txpos = 0;
        self.subbit = 0;
        self.bit = 0;
        self.txgap = self.config.timing.tx_pre;
        self.line.enable_driver();
        self.line.drive(true);
    }

    /// The post-gap elapsed: hand the line back to the receiver.
    fn finish_tx(&mut self) {
        self.txlen = 0;
        self.txpos = 0;
        self.flags.set(TX_IDLE);
        self.enter_rx();
    }

    fn enter_rx(&mut self) {
        self.line.release_driver();
        self.mode = Mode::Rx;
        self.subbit = 0;
        self.bit = 0;
        // Our own frame must be followed by a full inter-message gap before
        // the next one starts, or receivers cannot delimit them. Counting
        // it through the normal gap machinery also keeps any reply that
        // arrives early from being lost.
        self.rxgap = self.gap_ticks();
    }

    // =========================================================================
    // Test hooks
    // =========================================================================

    #[cfg(test)]
    fn set_txhold(&mut self, hold: bool) {
        self.txhold = hold;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
