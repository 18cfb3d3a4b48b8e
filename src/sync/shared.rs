//! ISR-safe bus wrapper using critical sections
//!
//! [`SharedBus`] is the caller-facing handoff layer: the timer interrupt
//! ticks the bus through it, and tasks submit and drain frames through the
//! blocking [`transmit`](SharedBus::transmit) /
//! [`receive`](SharedBus::receive) operations. All access goes through
//! `critical_section::with()`, so a tick never observes a half-updated
//! instance; the waits themselves happen outside the critical section,
//! polling with a caller-supplied delay.

use embedded_hal::delay::DelayNs;

use crate::constants::{
    POLL_TIMEOUT_MS, RX_TIMEOUT_MS, SIMPLE_POLL, TX_TIMEOUT_MS, WAIT_POLL_US,
};
use crate::driver::bus::GalaxyBus;
use crate::driver::error::{FrameError, FrameResult};
use crate::hal::line::BusLine;
use crate::hal::timer::TickTimer;
use crate::sync::primitives::CriticalSectionCell;

/// ISR-safe wrapper around a [`GalaxyBus`].
///
/// Const-constructible empty, so it can live in a `static`; the bus itself
/// is attached at runtime once the pins and timer exist.
///
/// # Example
///
/// ```ignore
/// galaxybus::galaxybus_static!(BUS, MyLine, MyTimer);
///
/// fn main() {
///     let mut bus = GalaxyBus::new(line, timer, BusConfig::master()).unwrap();
///     bus.start().unwrap();
///     BUS.attach(bus);
///
///     let mut reply = [0u8; 64];
///     let got = BUS.poll(0x05, &mut reply, &mut delay).unwrap();
/// }
///
/// fn timer_isr() {
///     BUS.tick();
/// }
/// ```
pub struct SharedBus<L: BusLine, T: TickTimer> {
    inner: CriticalSectionCell<Option<GalaxyBus<L, T>>>,
}

impl<L: BusLine, T: TickTimer> SharedBus<L, T> {
    /// Create an empty shared slot (const, suitable for static
    /// initialization).
    pub const fn new() -> Self {
        Self {
            inner: CriticalSectionCell::new(None),
        }
    }

    /// Install a bus instance, returning the previous one if any.
    pub fn attach(&self, bus: GalaxyBus<L, T>) -> Option<GalaxyBus<L, T>> {
        self.inner.with(|slot| slot.replace(bus))
    }

    /// Remove the bus instance, e.g. to stop and reclaim the pins.
    pub fn detach(&self) -> Option<GalaxyBus<L, T>> {
        self.inner.with(|slot| slot.take())
    }

    /// Execute a closure with exclusive access to the attached bus.
    ///
    /// Interrupts are disabled for the duration of the closure. Returns
    /// `None` when no bus is attached.
    #[inline]
    pub fn with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut GalaxyBus<L, T>) -> R,
    {
        self.inner.with(|slot| slot.as_mut().map(f))
    }

    /// Advance the state machines by one tick. Call from the periodic
    /// timer interrupt.
    #[inline]
    pub fn tick(&self) {
        self.with(|bus| bus.tick());
    }

    /// True if a completed frame is waiting to be drained.
    pub fn ready(&self) -> bool {
        self.with(|bus| bus.ready()).unwrap_or(false)
    }

    /// Submit a frame, waiting for the transmitter to go idle.
    ///
    /// Retries for up to 100 ms while a previous frame drains, then gives
    /// up with [`FrameError::Busy`]. Oversize payloads fail immediately.
    /// Returns the payload length on success.
    pub fn transmit<D: DelayNs>(&self, payload: &[u8], delay: &mut D) -> FrameResult<usize> {
        let mut waited_us = 0u32;
        loop {
            match self.with(|bus| bus.try_transmit(payload)) {
                None => return Err(FrameError::Busy),
                Some(Err(FrameError::Busy)) => {}
                Some(result) => return result,
            }
            if waited_us >= TX_TIMEOUT_MS * 1000 {
                return Err(FrameError::Busy);
            }
            delay.delay_us(WAIT_POLL_US);
            waited_us += WAIT_POLL_US;
        }
    }

    /// Drain the next completed frame into `buf`.
    ///
    /// Waits up to 10 ms for the receiver to go idle so a frame is never
    /// read mid-assembly, then returns whatever the bus has: the delivered
    /// length, `0` when nothing is ready, or the frame's latched error.
    pub fn receive<D: DelayNs>(&self, buf: &mut [u8], delay: &mut D) -> FrameResult<usize> {
        let mut waited_us = 0u32;
        while !self.with(|bus| bus.rx_idle()).unwrap_or(false) {
            if waited_us >= RX_TIMEOUT_MS * 1000 {
                return Ok(0);
            }
            delay.delay_us(WAIT_POLL_US);
            waited_us += WAIT_POLL_US;
        }
        self.with(|bus| bus.receive(buf)).unwrap_or(Ok(0))
    }

    /// Poll a device: send the simple-poll command and drain its answer.
    ///
    /// Master-side convenience mirroring the original firmware's poll
    /// helper. Waits up to 100 ms for the response frame; returns `Ok(0)`
    /// if the device stays silent.
    pub fn poll<D: DelayNs>(
        &self,
        address: u8,
        response: &mut [u8],
        delay: &mut D,
    ) -> FrameResult<usize> {
        self.transmit(&[address, SIMPLE_POLL], delay)?;

        let mut waited_us = 0u32;
        while !self.ready() {
            if waited_us >= POLL_TIMEOUT_MS * 1000 {
                return Ok(0);
            }
            delay.delay_us(WAIT_POLL_US);
            waited_us += WAIT_POLL_US;
        }
        self.receive(response, delay)
    }
}

impl<L: BusLine, T: TickTimer> Default for SharedBus<L, T> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
