//! Tick timer abstraction
//!
//! The whole driver is clocked by one periodic alarm at three times the bit
//! rate (see [`TICK_HZ`](crate::constants::TICK_HZ)). Arming that alarm and
//! attaching the interrupt handler is platform work, so the driver only
//! asks for the [`TickTimer`] capability; implementations for target
//! hardware live outside this crate.
//!
//! A typical implementation programs a hardware timer alarm to
//! `base_clock / divider / 9600 / 3` and calls
//! [`SharedBus::tick`](crate::sync::SharedBus::tick) from its interrupt
//! handler.

/// Periodic alarm the driver arms on [`start`](crate::GalaxyBus::start) and
/// disarms on [`stop`](crate::GalaxyBus::stop).
pub trait TickTimer {
    /// Platform error for a failed arm.
    type Error;

    /// Arm the periodic alarm at `hz` ticks per second.
    fn start(&mut self, hz: u32) -> Result<(), Self::Error>;

    /// Disarm the alarm. Must be idempotent.
    fn stop(&mut self);
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TICK_HZ;

    struct CountingTimer {
        armed_at: Option<u32>,
        stops: u32,
    }

    impl TickTimer for CountingTimer {
        type Error = ();

        fn start(&mut self, hz: u32) -> Result<(), ()> {
            self.armed_at = Some(hz);
            Ok(())
        }

        fn stop(&mut self) {
            self.stops += 1;
        }
    }

    #[test]
    fn trait_is_object_safe_enough_for_a_plain_impl() {
        let mut timer = CountingTimer {
            armed_at: None,
            stops: 0,
        };
        timer.start(TICK_HZ).unwrap();
        timer.stop();
        timer.stop();

        assert_eq!(timer.armed_at, Some(28_800));
        assert_eq!(timer.stops, 2);
    }
}
