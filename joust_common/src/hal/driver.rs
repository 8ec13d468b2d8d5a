//! Hardware interface traits and error types.
//!
//! This module defines:
//! - `Actuators`, `Sensors`, `CommandBus`, `Console`, `ReloadEmitter` - the
//!   one-shot hardware calls the core consumes
//! - `Hardware` - the full backend a driver provides
//! - `HalError` - error type for driver construction
//! - `burst_counter()` - single-writer pulse-burst counter shared between an
//!   interrupt-side producer and the dispatch loop

use super::types::{DigitalPin, Indicators, MotorSide, ServoChannel};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use thiserror::Error;

/// Error types for HAL operations.
#[derive(Debug, Clone, Error)]
pub enum HalError {
    /// Driver initialization failed
    #[error("Initialization failed: {0}")]
    InitFailed(String),

    /// Hardware communication error
    #[error("Hardware communication error: {0}")]
    CommunicationError(String),

    /// Driver not found
    #[error("Driver not found: {0}")]
    DriverNotFound(String),
}

/// Fire-and-forget actuator writes. No feedback.
pub trait Actuators {
    /// Set a servo pulse width in microseconds.
    fn set_servo_pulse_width(&mut self, channel: ServoChannel, width_us: u16);

    /// Set a drive motor's signed speed (positive = counter-clockwise).
    fn set_motor_drive(&mut self, side: MotorSide, speed: i16);

    /// Set the launcher wheel duty (0 = off).
    fn set_launcher_duty(&mut self, duty: u8);

    /// Switch indicator LEDs on or off.
    fn set_indicator(&mut self, indicator: Indicators, on: bool);
}

/// Polled sensor reads.
pub trait Sensors {
    /// Raw analog sample from `channel`.
    fn read_analog(&mut self, channel: u8) -> u16;

    /// Logic level of a digital input.
    fn digital_pin(&mut self, pin: DigitalPin) -> bool;
}

/// Byte-level half-duplex command bus (referee box link).
pub trait CommandBus {
    /// True when a byte can be clocked out.
    fn tx_ready(&mut self) -> bool;

    /// Drive the slave-select line (`true` = selected).
    fn select(&mut self, active: bool);

    /// Clock out one byte; the reply byte becomes available via `receive`.
    fn send(&mut self, byte: u8);

    /// True when a received byte is waiting ("data ready" flag).
    fn data_ready(&mut self) -> bool;

    /// Take the received byte, clearing the data-ready flag.
    fn receive(&mut self) -> u8;
}

/// Serial console keystrokes.
pub trait Console {
    /// Next pending keystroke, if any.
    fn poll_key(&mut self) -> Option<u8>;
}

/// IR reload-request emitter driven by a pulse interrupt.
pub trait ReloadEmitter {
    /// Start a burst of `pulses` IR pulses.
    fn start_burst(&mut self, pulses: u32);

    /// Stop emitting and disable the pulse interrupt.
    fn stop_emitter(&mut self);

    /// Total bursts completed since power-on (interrupt-owned counter).
    fn bursts_completed(&self) -> u32;
}

/// Complete hardware backend.
pub trait Hardware: Actuators + Sensors + CommandBus + Console + ReloadEmitter {
    /// Backend identifier (e.g., "simulation").
    fn name(&self) -> &'static str;
}

/// Factory function type for creating backend instances.
pub type DriverFactory = fn() -> Box<dyn Hardware>;

// ─── Boxed backends ─────────────────────────────────────────────────

impl<T: Actuators + ?Sized> Actuators for Box<T> {
    fn set_servo_pulse_width(&mut self, channel: ServoChannel, width_us: u16) {
        (**self).set_servo_pulse_width(channel, width_us);
    }
    fn set_motor_drive(&mut self, side: MotorSide, speed: i16) {
        (**self).set_motor_drive(side, speed);
    }
    fn set_launcher_duty(&mut self, duty: u8) {
        (**self).set_launcher_duty(duty);
    }
    fn set_indicator(&mut self, indicator: Indicators, on: bool) {
        (**self).set_indicator(indicator, on);
    }
}

impl<T: Sensors + ?Sized> Sensors for Box<T> {
    fn read_analog(&mut self, channel: u8) -> u16 {
        (**self).read_analog(channel)
    }
    fn digital_pin(&mut self, pin: DigitalPin) -> bool {
        (**self).digital_pin(pin)
    }
}

impl<T: CommandBus + ?Sized> CommandBus for Box<T> {
    fn tx_ready(&mut self) -> bool {
        (**self).tx_ready()
    }
    fn select(&mut self, active: bool) {
        (**self).select(active);
    }
    fn send(&mut self, byte: u8) {
        (**self).send(byte);
    }
    fn data_ready(&mut self) -> bool {
        (**self).data_ready()
    }
    fn receive(&mut self) -> u8 {
        (**self).receive()
    }
}

impl<T: Console + ?Sized> Console for Box<T> {
    fn poll_key(&mut self) -> Option<u8> {
        (**self).poll_key()
    }
}

impl<T: ReloadEmitter + ?Sized> ReloadEmitter for Box<T> {
    fn start_burst(&mut self, pulses: u32) {
        (**self).start_burst(pulses);
    }
    fn stop_emitter(&mut self) {
        (**self).stop_emitter();
    }
    fn bursts_completed(&self) -> u32 {
        (**self).bursts_completed()
    }
}

impl<T: Hardware + ?Sized> Hardware for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }
}

// ─── Single-writer burst counter ────────────────────────────────────

/// Writer half of a burst counter. Not `Clone`: exactly one producer.
#[derive(Debug)]
pub struct BurstRecorder(Arc<AtomicU32>);

/// Reader half of a burst counter.
#[derive(Debug, Clone)]
pub struct BurstReader(Arc<AtomicU32>);

/// Create a burst counter pair.
pub fn burst_counter() -> (BurstRecorder, BurstReader) {
    let cell = Arc::new(AtomicU32::new(0));
    (BurstRecorder(Arc::clone(&cell)), BurstReader(cell))
}

impl BurstRecorder {
    /// Record one completed burst.
    #[inline]
    pub fn record(&self) {
        self.0.fetch_add(1, Ordering::Release);
    }
}

impl BurstReader {
    #[inline]
    pub fn get(&self) -> u32 {
        self.0.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hal_error_display() {
        let err = HalError::InitFailed("test error".to_string());
        assert!(err.to_string().contains("test error"));

        let err = HalError::DriverNotFound("simulation".to_string());
        assert!(err.to_string().contains("simulation"));
    }

    #[test]
    fn burst_counter_reader_sees_writer() {
        let (rec, rd) = burst_counter();
        assert_eq!(rd.get(), 0);
        rec.record();
        rec.record();
        assert_eq!(rd.get(), 2);
        assert_eq!(rd.clone().get(), 2);
    }

    #[test]
    fn burst_counter_across_threads() {
        let (rec, rd) = burst_counter();
        let handle = std::thread::spawn(move || {
            for _ in 0..100 {
                rec.record();
            }
        });
        handle.join().unwrap();
        assert_eq!(rd.get(), 100);
    }
}
