//! Bus line abstraction
//!
//! The driver never touches GPIO registers. It sees the RS485 transceiver
//! through the [`BusLine`] capability: sample the receive level, drive the
//! transmit level, and flip the transceiver between its receive and drive
//! directions. [`GpioLine`] adapts `embedded-hal` digital pins for the
//! common wiring with separate tx/rx pins; one-wire tristate wiring (tx and
//! rx on the same physical pin) is expressed by implementing [`BusLine`]
//! directly and reconfiguring the pin direction in
//! [`enable_driver`](BusLine::enable_driver) /
//! [`release_driver`](BusLine::release_driver).

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

/// Capability the tick handler needs from the physical line.
///
/// Every method is called from interrupt context at three times the bit
/// rate, so implementations must be a handful of register accesses at most.
pub trait BusLine {
    /// Sampled receive level. True is the idle (mark) level.
    fn read(&mut self) -> bool;

    /// Drive the transmit level. Only called while the driver is enabled.
    fn drive(&mut self, level: bool);

    /// Assert driver-enable and take over the line.
    ///
    /// For one-wire tristate wiring, reconfigure the shared data pin as an
    /// output here. A distinct receiver-enable pin follows driver-enable
    /// (both high while transmitting).
    fn enable_driver(&mut self);

    /// Release driver-enable and return the line to the receiver.
    fn release_driver(&mut self);

    /// Optional scope clock, toggled once per tick. Handy when bringing up
    /// a board; the default does nothing.
    fn clock_toggle(&mut self) {}
}

/// Placeholder for an absent receiver-enable pin.
///
/// Stands in for the RE generic of [`GpioLine`] when the transceiver's
/// receiver-enable is tied to driver-enable in hardware.
#[derive(Debug, Default)]
pub struct NoReceiverEnable;

impl ErrorType for NoReceiverEnable {
    type Error = Infallible;
}

impl OutputPin for NoReceiverEnable {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// [`BusLine`] over `embedded-hal` digital pins, for wiring with separate
/// tx and rx pins.
///
/// Pin errors are discarded; use infallible pin types (every mainstream HAL
/// provides them) or wrap fallible ones before handing them in.
pub struct GpioLine<TX, RX, DE, RE = NoReceiverEnable> {
    tx: TX,
    rx: RX,
    de: DE,
    re: RE,
}

impl<TX, RX, DE> GpioLine<TX, RX, DE>
where
    TX: OutputPin,
    RX: InputPin,
    DE: OutputPin,
{
    /// Line with driver-enable only (receiver-enable tied in hardware).
    pub fn new(tx: TX, rx: RX, mut de: DE) -> Self {
        // Receive direction until the driver asks otherwise
        de.set_low().ok();
        Self {
            tx,
            rx,
            de,
            re: NoReceiverEnable,
        }
    }
}

impl<TX, RX, DE, RE> GpioLine<TX, RX, DE, RE>
where
    TX: OutputPin,
    RX: InputPin,
    DE: OutputPin,
    RE: OutputPin,
{
    /// Line with a distinct receiver-enable pin.
    ///
    /// RE is driven as the complement-in-time of DE: low (receiver on)
    /// whenever the bus is listening, high while this node transmits.
    pub fn with_receiver_enable(tx: TX, rx: RX, mut de: DE, mut re: RE) -> Self {
        de.set_low().ok();
        re.set_low().ok();
        Self { tx, rx, de, re }
    }

    /// Tear the line apart again, returning the pins.
    pub fn release(self) -> (TX, RX, DE, RE) {
        (self.tx, self.rx, self.de, self.re)
    }
}

impl<TX, RX, DE, RE> BusLine for GpioLine<TX, RX, DE, RE>
where
    TX: OutputPin,
    RX: InputPin,
    DE: OutputPin,
    RE: OutputPin,
{
    fn read(&mut self) -> bool {
        self.rx.is_high().unwrap_or(true)
    }

    fn drive(&mut self, level: bool) {
        if level {
            self.tx.set_high().ok();
        } else {
            self.tx.set_low().ok();
        }
    }

    fn enable_driver(&mut self) {
        self.re.set_high().ok();
        self.de.set_high().ok();
    }

    fn release_driver(&mut self) {
        self.de.set_low().ok();
        self.re.set_low().ok();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::digital::{
        Mock as PinMock, State as PinState, Transaction as PinTransaction,
    };

    #[test]
    fn new_enters_receive_direction() {
        let tx = PinMock::new(&[]);
        let rx = PinMock::new(&[]);
        let de = PinMock::new(&[PinTransaction::set(PinState::Low)]);

        let line = GpioLine::new(tx, rx, de);

        let (mut tx, mut rx, mut de, _) = line.release();
        tx.done();
        rx.done();
        de.done();
    }

    #[test]
    fn read_reports_pin_level() {
        let tx = PinMock::new(&[]);
        let rx = PinMock::new(&[
            PinTransaction::get(PinState::High),
            PinTransaction::get(PinState::Low),
        ]);
        let de = PinMock::new(&[PinTransaction::set(PinState::Low)]);

        let mut line = GpioLine::new(tx, rx, de);
        assert!(line.read());
        assert!(!line.read());

        let (mut tx, mut rx, mut de, _) = line.release();
        tx.done();
        rx.done();
        de.done();
    }

    #[test]
    fn drive_sets_tx_pin() {
        let tx = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);
        let rx = PinMock::new(&[]);
        let de = PinMock::new(&[PinTransaction::set(PinState::Low)]);

        let mut line = GpioLine::new(tx, rx, de);
        line.drive(false);
        line.drive(true);

        let (mut tx, mut rx, mut de, _) = line.release();
        tx.done();
        rx.done();
        de.done();
    }

    #[test]
    fn direction_switch_follows_de_then_re_order() {
        let tx = PinMock::new(&[]);
        let rx = PinMock::new(&[]);
        let de = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
        ]);
        let re = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
        ]);

        let mut line = GpioLine::with_receiver_enable(tx, rx, de, re);
        line.enable_driver();
        line.release_driver();

        let (mut tx, mut rx, mut de, mut re) = line.release();
        tx.done();
        rx.done();
        de.done();
        re.done();
    }
}
