//! Dispatcher: one cycle is timers → side latch → checkers → drain.
//!
//! The drain pops at most the number of events queued when it starts, so an
//! event a service posts during its own `run` is delivered on a later pass.
//! While a service runs it is taken out of its slot; nothing can call back
//! into it until it returns.

use joust_common::consts::DEFAULT_QUEUE_CAPACITY;
use joust_common::event::{Event, EventKind, SERVICE_COUNT, ServiceId};
use joust_common::hal::driver::Hardware;
use joust_common::hal::types::DigitalPin;
use tracing::{debug, trace, warn};

use super::queue::{Envelope, EventQueue};
use super::service::{Ctx, Service};
use super::timer::TimerService;
use crate::checkers::{CheckerIo, EventChecker};
use crate::context::MatchContext;
use crate::error::FrameworkError;

// ─── Statistics ─────────────────────────────────────────────────────

/// Running dispatcher counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Completed `run_cycle` calls.
    pub cycles: u64,
    /// Events handed to a service's `run`.
    pub dispatched: u64,
    /// Timeouts posted by the timer service.
    pub timeouts: u64,
    /// Events posted by checkers.
    pub checker_events: u64,
    /// Events addressed to a service that is not registered.
    pub unrouted: u64,
}

/// What one `run_cycle` did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub timeouts: usize,
    pub checker_events: usize,
    pub dispatched: usize,
}

// ─── Framework ──────────────────────────────────────────────────────

/// The assembled event framework.
pub struct Framework<H: Hardware = Box<dyn Hardware>> {
    hal: H,
    queue: EventQueue,
    timers: TimerService,
    board: MatchContext,
    services: [Option<Box<dyn Service>>; SERVICE_COUNT],
    checkers: Vec<Box<dyn EventChecker>>,
    stats: DispatchStats,
}

impl<H: Hardware> Framework<H> {
    /// Empty framework with a queue of `queue_capacity` events.
    pub fn new(hal: H, queue_capacity: usize) -> Self {
        Self {
            hal,
            queue: EventQueue::new(queue_capacity),
            timers: TimerService::new(),
            board: MatchContext::new(),
            services: std::array::from_fn(|_| None),
            checkers: Vec::new(),
            stats: DispatchStats::default(),
        }
    }

    /// Empty framework with the default queue depth.
    pub fn with_default_queue(hal: H) -> Self {
        Self::new(hal, DEFAULT_QUEUE_CAPACITY)
    }

    /// Install `service` in the slot named by its id.
    pub fn register(&mut self, service: Box<dyn Service>) -> Result<(), FrameworkError> {
        let id = service.id();
        let slot = &mut self.services[id.index()];
        if slot.is_some() {
            return Err(FrameworkError::DuplicateService(id));
        }
        debug!(service = id.name(), "Service registered");
        *slot = Some(service);
        Ok(())
    }

    /// Append a checker; checkers are polled in the order added.
    pub fn add_checker(&mut self, checker: Box<dyn EventChecker>) {
        debug!(checker = checker.name(), "Event checker added");
        self.checkers.push(checker);
    }

    pub fn is_registered(&self, id: ServiceId) -> bool {
        self.services[id.index()].is_some()
    }

    /// Run every registered service's `init` in priority order, then post `Init` to it.
    pub fn init(&mut self) -> Result<(), FrameworkError> {
        for id in ServiceId::ALL {
            let Some(mut service) = self.services[id.index()].take() else {
                continue;
            };
            let mut ctx = Ctx::new(
                id,
                &mut self.queue,
                &mut self.timers,
                &self.board,
                &mut self.hal,
            );
            let result = service.init(&mut ctx);
            self.board.record(id, service.status());
            self.services[id.index()] = Some(service);
            result.map_err(|fault| FrameworkError::InitFailed {
                service: id,
                detail: fault.0,
            })?;
            self.post(id, Event::signal(EventKind::Init));
        }
        Ok(())
    }

    /// Enqueue `event` for `target`. Returns `false` if the queue is full.
    pub fn post(&mut self, target: ServiceId, event: Event) -> bool {
        let ok = self.queue.push(target, event);
        if !ok {
            warn!(to = target.name(), kind = ?event.kind, "Event queue full, event dropped");
        }
        ok
    }

    /// Advance the timers by `elapsed` ticks and post a `Timeout` for each expiry.
    pub fn tick(&mut self, elapsed: u32) -> usize {
        let mut posted = 0;
        for (id, owner) in self.timers.tick(elapsed) {
            trace!(?id, owner = owner.name(), "Timer expired");
            if self.post(owner, Event::timeout(id)) {
                posted += 1;
            }
        }
        self.stats.timeouts += posted as u64;
        posted
    }

    /// Sample the side switch, then poll every checker once.
    pub fn poll_checkers(&mut self) -> usize {
        let side_switch = self.hal.digital_pin(DigitalPin::SideSelect);
        self.board.observe_side(side_switch);

        let mut posted = 0;
        let mut io = CheckerIo::new(&mut self.queue, &self.board, &mut self.hal);
        for checker in self.checkers.iter_mut() {
            if checker.check(&mut io) {
                trace!(checker = checker.name(), "Checker posted");
                posted += 1;
            }
        }
        self.stats.checker_events += posted as u64;
        posted
    }

    /// Deliver the events queued right now, in FIFO order.
    ///
    /// A fault stops the drain; events behind it stay queued.
    pub fn drain(&mut self) -> Result<usize, FrameworkError> {
        let pending = self.queue.len();
        let mut dispatched = 0;
        for _ in 0..pending {
            let Some(Envelope { target, event }) = self.queue.pop() else {
                break;
            };
            let Some(mut service) = self.services[target.index()].take() else {
                self.stats.unrouted += 1;
                warn!(to = target.name(), kind = ?event.kind, "No service registered, event dropped");
                continue;
            };
            trace!(to = target.name(), kind = ?event.kind, param = event.param, "Dispatch");
            let mut ctx = Ctx::new(
                target,
                &mut self.queue,
                &mut self.timers,
                &self.board,
                &mut self.hal,
            );
            let result = service.run(event, &mut ctx);
            self.board.record(target, service.status());
            self.services[target.index()] = Some(service);
            dispatched += 1;
            self.stats.dispatched += 1;
            result.map_err(|fault| FrameworkError::InternalFault {
                service: target,
                detail: fault.0,
            })?;
        }
        Ok(dispatched)
    }

    /// One full dispatch cycle.
    pub fn run_cycle(&mut self, elapsed: u32) -> Result<CycleReport, FrameworkError> {
        let timeouts = self.tick(elapsed);
        let checker_events = self.poll_checkers();
        let dispatched = self.drain()?;
        self.stats.cycles += 1;
        Ok(CycleReport {
            timeouts,
            checker_events,
            dispatched,
        })
    }

    // ── Accessors ──

    pub fn hal(&self) -> &H {
        &self.hal
    }

    pub fn hal_mut(&mut self) -> &mut H {
        &mut self.hal
    }

    pub fn board(&self) -> &MatchContext {
        &self.board
    }

    pub fn timers(&self) -> &TimerService {
        &self.timers
    }

    pub fn queue(&self) -> &EventQueue {
        &self.queue
    }

    /// Events waiting for the next drain.
    pub fn pending(&self) -> impl Iterator<Item = &Envelope> {
        self.queue.iter()
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }
}

#[cfg(test)]
impl<H: Hardware> Framework<H> {
    /// Publish a status as if `status.owner()` had run.
    pub(crate) fn publish(&mut self, status: crate::context::ServiceStatus) {
        self.board.record(status.owner(), status);
    }
}
