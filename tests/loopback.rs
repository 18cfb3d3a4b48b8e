//! Loopback: the transmit waveform of an instance, replayed into its own
//! receiver, reproduces the payload byte-exact.

use std::cell::RefCell;
use std::rc::Rc;

use galaxybus::{BusConfig, BusLine, GalaxyBus, TickTimer};

#[derive(Default)]
struct LoopState {
    driving: bool,
    level: bool,
    recording: Vec<bool>,
    replay: Vec<bool>,
    cursor: usize,
}

/// Records the driven waveform one entry per tick while the driver is
/// enabled, and feeds a replay buffer to the receiver afterwards.
#[derive(Clone, Default)]
struct LoopbackLine(Rc<RefCell<LoopState>>);

impl LoopbackLine {
    /// Wire the recorded transmit waveform into the receive path.
    fn connect_tx_to_rx(&self) {
        let mut s = self.0.borrow_mut();
        // Ticks that already ran saw the idle level
        let cursor = s.cursor;
        if s.replay.len() < cursor {
            s.replay.resize(cursor, true);
        }
        let recording = s.recording.clone();
        s.replay.extend(recording);
    }

    fn recorded_ticks(&self) -> usize {
        self.0.borrow().recording.len()
    }
}

impl BusLine for LoopbackLine {
    fn read(&mut self) -> bool {
        let mut s = self.0.borrow_mut();
        let i = s.cursor;
        s.cursor += 1;
        s.replay.get(i).copied().unwrap_or(true)
    }

    fn drive(&mut self, level: bool) {
        self.0.borrow_mut().level = level;
    }

    fn enable_driver(&mut self) {
        self.0.borrow_mut().driving = true;
    }

    fn release_driver(&mut self) {
        self.0.borrow_mut().driving = false;
    }

    fn clock_toggle(&mut self) {
        let mut s = self.0.borrow_mut();
        if s.driving {
            let level = s.level;
            s.recording.push(level);
        }
    }
}

struct NoopTimer;

impl TickTimer for NoopTimer {
    type Error = ();

    fn start(&mut self, _hz: u32) -> Result<(), ()> {
        Ok(())
    }

    fn stop(&mut self) {}
}

/// A master with the promiscuous local address: transmits unprompted and
/// keeps every frame, so it can hear itself.
fn loopback_bus(line: LoopbackLine) -> GalaxyBus<LoopbackLine, NoopTimer> {
    let config = BusConfig::master().with_address(0xFF);
    let mut bus = GalaxyBus::new(line, NoopTimer, config).unwrap();
    bus.start().unwrap();
    bus
}

fn roundtrip(payload: &[u8]) -> Result<Vec<u8>, galaxybus::FrameError> {
    let line = LoopbackLine::default();
    let mut bus = loopback_bus(line.clone());

    assert_eq!(bus.try_transmit(payload).unwrap(), payload.len());
    // Enough ticks for the pre-gap, every byte, and the post-gap
    for _ in 0..(payload.len() + 2) * 40 + 200 {
        bus.tick();
    }
    assert!(bus.tx_idle(), "transmit never finished");
    assert!(!bus.is_transmitting());

    line.connect_tx_to_rx();
    for _ in 0..line.recorded_ticks() + 200 {
        bus.tick();
    }

    assert!(bus.ready(), "nothing was received back");
    let mut buf = [0u8; 64];
    let n = bus.receive(&mut buf)?;
    Ok(buf[..n].to_vec())
}

#[test]
fn payload_survives_the_wire_byte_exact() {
    let payload = [0x0F, 0x00, 0x42, 0x81, 0xFF];
    assert_eq!(roundtrip(&payload).unwrap(), payload);
}

#[test]
fn single_byte_payload_roundtrip() {
    assert_eq!(roundtrip(&[0x23]).unwrap(), vec![0x23]);
}

#[test]
fn empty_frame_roundtrip_delivers_zero_bytes() {
    // An empty payload still goes out as one byte, the seed checksum
    assert_eq!(roundtrip(&[]).unwrap(), Vec::<u8>::new());
}

#[test]
fn max_frame_roundtrip() {
    let mut payload = [0u8; 63];
    for (i, b) in payload.iter_mut().enumerate() {
        *b = i as u8 ^ 0xA5;
    }
    assert_eq!(roundtrip(&payload).unwrap(), payload);
}
