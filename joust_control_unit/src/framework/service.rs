//! Service contract.
//!
//! A service is a run-to-completion state machine addressed by a fixed
//! [`ServiceId`]. The dispatcher hands it one event at a time together with a
//! [`Ctx`] giving it everything it may touch: posting, its timers, the
//! read-only match context, and the hardware.

use joust_common::event::{Event, EventKind, ServiceId, TimerId};
use joust_common::hal::driver::Hardware;
use tracing::{debug, warn};

use super::queue::EventQueue;
use super::timer::TimerService;
use crate::context::{MatchContext, ServiceStatus};
use crate::error::ServiceFault;

/// A framework service.
pub trait Service {
    fn id(&self) -> ServiceId;

    /// One-time setup. The dispatcher posts `Init` to the service afterwards.
    fn init(&mut self, ctx: &mut Ctx<'_>) -> Result<(), ServiceFault>;

    /// Handle one event. Must not block.
    fn run(&mut self, event: Event, ctx: &mut Ctx<'_>) -> Result<(), ServiceFault>;

    /// Snapshot published to the match context after `init` and every `run`.
    fn status(&self) -> ServiceStatus;
}

/// Handle a running service uses to reach the framework.
pub struct Ctx<'a> {
    me: ServiceId,
    queue: &'a mut EventQueue,
    timers: &'a mut TimerService,
    board: &'a MatchContext,
    hal: &'a mut dyn Hardware,
}

impl<'a> Ctx<'a> {
    pub(crate) fn new(
        me: ServiceId,
        queue: &'a mut EventQueue,
        timers: &'a mut TimerService,
        board: &'a MatchContext,
        hal: &'a mut dyn Hardware,
    ) -> Self {
        Self {
            me,
            queue,
            timers,
            board,
            hal,
        }
    }

    /// The running service.
    #[inline]
    pub fn me(&self) -> ServiceId {
        self.me
    }

    /// Append an event for `target`. Returns `false` if the queue is full.
    pub fn post(&mut self, target: ServiceId, event: Event) -> bool {
        let ok = self.queue.push(target, event);
        if !ok {
            warn!(
                from = self.me.name(),
                to = target.name(),
                kind = ?event.kind,
                "Event queue full, event dropped"
            );
        }
        ok
    }

    /// Post a zero-payload event.
    #[inline]
    pub fn signal(&mut self, target: ServiceId, kind: EventKind) -> bool {
        self.post(target, Event::signal(kind))
    }

    /// (Re)arm `id`, bound to the running service.
    pub fn init_timer(&mut self, id: TimerId, ticks: u32) {
        self.init_timer_for(self.me, id, ticks);
    }

    /// (Re)arm `id`, bound to `owner`.
    pub fn init_timer_for(&mut self, owner: ServiceId, id: TimerId, ticks: u32) {
        debug!(by = self.me.name(), owner = owner.name(), ?id, ticks, "Timer armed");
        self.timers.init(id, ticks, owner);
    }

    pub fn start_timer(&mut self, id: TimerId) {
        self.timers.start(id);
    }

    pub fn stop_timer(&mut self, id: TimerId) {
        self.timers.stop(id);
    }

    pub fn timer_running(&self, id: TimerId) -> bool {
        self.timers.is_running(id)
    }

    /// Read-only match context.
    #[inline]
    pub fn board(&self) -> &MatchContext {
        self.board
    }

    /// Hardware.
    #[inline]
    pub fn hal(&mut self) -> &mut (dyn Hardware + 'a) {
        &mut *self.hal
    }
}
