//! Tape color checker.
//!
//! The raw tape sensor is smoothed (`9/10 raw + 1/10 previous`, integer
//! arithmetic), classified into a sticky color, and confirmed by a long
//! run-length debounce before `RightTape` is posted to Orientation.

use joust_common::event::{Event, EventKind, ServiceId};
use joust_common::hal::types::{TapeColor, analog};
use tracing::debug;

use super::{CheckerIo, EventChecker};

/// Consecutive polls of one color needed to confirm it.
pub const CONFIRM_POLLS: u16 = 400;

/// Run-length ceiling.
pub const RUN_CAP: u16 = 1000;

/// Smoothing, sticky classification and run-length debounce.
#[derive(Debug, Clone, Default)]
pub struct TapeDebouncer {
    smoothed: u32,
    color: TapeColor,
    run: u16,
}

impl TapeDebouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current sticky color (possibly unconfirmed).
    pub fn color(&self) -> TapeColor {
        self.color
    }

    /// Consecutive polls the current color has been held.
    pub fn run(&self) -> u16 {
        self.run
    }

    pub fn smoothed(&self) -> u32 {
        self.smoothed
    }

    /// Feed one raw sample. Returns the color on the poll that confirms it.
    pub fn update(&mut self, raw: u16) -> Option<TapeColor> {
        self.smoothed = 9 * u32::from(raw) / 10 + self.smoothed / 10;
        let s = self.smoothed;

        // Each band is only tested while the color is something else.
        let mut changed = false;
        for (color, hit) in [
            (TapeColor::White, s < 220),
            (TapeColor::Red, s > 260 && s < 315),
            (TapeColor::Green, s > 350 && s < 440),
            (TapeColor::Black, s > 460),
        ] {
            if self.color != color && hit {
                self.color = color;
                changed = true;
            }
        }

        self.run = if changed {
            1
        } else {
            self.run.saturating_add(1).min(RUN_CAP)
        };
        (self.run == CONFIRM_POLLS).then_some(self.color)
    }
}

/// Polls the right tape sensor.
#[derive(Default)]
pub struct TapeChecker {
    debouncer: TapeDebouncer,
}

impl TapeChecker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventChecker for TapeChecker {
    fn name(&self) -> &'static str {
        "tape"
    }

    fn check(&mut self, io: &mut CheckerIo<'_>) -> bool {
        let raw = io.hal().read_analog(analog::TAPE_RIGHT);
        match self.debouncer.update(raw) {
            Some(color) => {
                debug!(?color, smoothed = self.debouncer.smoothed(), "Tape color confirmed");
                io.post(
                    ServiceId::Orientation,
                    Event::new(EventKind::RightTape, color as u16),
                )
            }
            None => false,
        }
    }
}
