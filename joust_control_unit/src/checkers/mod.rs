//! Event checkers.
//!
//! Each checker is polled once per dispatch cycle, before the queue is
//! drained. Debounce and hysteresis state lives in a plain struct owned by
//! the checker, so the detection logic can be exercised without hardware.

pub mod bus_flag;
pub mod ir;
pub mod keystroke;
pub mod tape;

use joust_common::event::{Event, ServiceId};
use joust_common::hal::driver::Hardware;
use tracing::warn;

use crate::context::MatchContext;
use crate::framework::queue::EventQueue;

/// What a checker can reach during a poll.
pub struct CheckerIo<'a> {
    queue: &'a mut EventQueue,
    board: &'a MatchContext,
    hal: &'a mut dyn Hardware,
}

impl<'a> CheckerIo<'a> {
    pub(crate) fn new(
        queue: &'a mut EventQueue,
        board: &'a MatchContext,
        hal: &'a mut dyn Hardware,
    ) -> Self {
        Self { queue, board, hal }
    }

    /// Post a synthesized event. Returns `false` if the queue is full.
    pub fn post(&mut self, target: ServiceId, event: Event) -> bool {
        let ok = self.queue.push(target, event);
        if !ok {
            warn!(to = target.name(), kind = ?event.kind, "Event queue full, checker event dropped");
        }
        ok
    }

    #[inline]
    pub fn board(&self) -> &MatchContext {
        self.board
    }

    #[inline]
    pub fn hal(&mut self) -> &mut (dyn Hardware + 'a) {
        &mut *self.hal
    }
}

/// A polled event source.
pub trait EventChecker {
    /// Name used in log output.
    fn name(&self) -> &'static str;

    /// Sample inputs once. Returns `true` if an event was posted.
    fn check(&mut self, io: &mut CheckerIo<'_>) -> bool;
}
