//! Cycle runner: paces the dispatch loop and feeds it timer ticks.
//!
//! A ticker thread is the only writer of the tick mailbox; the loop swaps
//! the accumulated count out once per cycle and hands it to
//! [`Framework::run_cycle`]. A fault returned by the framework is the
//! top-level error: it is logged and the loop halts.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use joust_common::config::ConfigError;
use joust_common::hal::driver::{HalError, Hardware};
use tracing::{debug, error, info};

use crate::checkers::bus_flag::BusFlagChecker;
use crate::checkers::ir::{IrBands, IrChecker};
use crate::checkers::keystroke::KeystrokeChecker;
use crate::checkers::tape::TapeChecker;
use crate::config::JoustConfig;
use crate::error::FrameworkError;
use crate::framework::{CycleReport, Framework};
use crate::state::{
    AimService, CommandService, DriveService, FireService, LanceService, MatchController,
    OrientationService, ReloadService,
};

// ─── Error Type ─────────────────────────────────────────────────────

/// Anything that stops the control unit.
#[derive(Debug)]
pub enum CycleError {
    /// Dispatcher or service fault.
    Framework(FrameworkError),
    /// Hardware backend failure.
    Hal(HalError),
    /// Bad configuration.
    Config(ConfigError),
    /// Ticker thread could not be started.
    Spawn(String),
}

impl std::fmt::Display for CycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Framework(e) => write!(f, "framework error: {e}"),
            Self::Hal(e) => write!(f, "HAL error: {e}"),
            Self::Config(e) => write!(f, "config error: {e}"),
            Self::Spawn(msg) => write!(f, "ticker thread: {msg}"),
        }
    }
}

impl std::error::Error for CycleError {}

impl From<FrameworkError> for CycleError {
    fn from(e: FrameworkError) -> Self {
        Self::Framework(e)
    }
}

impl From<HalError> for CycleError {
    fn from(e: HalError) -> Self {
        Self::Hal(e)
    }
}

impl From<ConfigError> for CycleError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ─── Tick Mailbox ───────────────────────────────────────────────────

/// Ticks accumulated since the loop last looked.
#[derive(Debug, Clone, Default)]
pub struct TickCounter(Arc<AtomicU32>);

impl TickCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `n` ticks (ticker side).
    #[inline]
    pub fn add(&self, n: u32) {
        self.0.fetch_add(n, Ordering::Release);
    }

    /// Take every accumulated tick, leaving zero (loop side).
    #[inline]
    pub fn take(&self) -> u32 {
        self.0.swap(0, Ordering::Acquire)
    }

    /// Ticks waiting, without consuming them.
    pub fn pending(&self) -> u32 {
        self.0.load(Ordering::Acquire)
    }
}

/// Start a thread adding one tick to `counter` every `period` until `running` clears.
pub fn spawn_ticker(
    counter: TickCounter,
    period: Duration,
    running: Arc<AtomicBool>,
) -> Result<JoinHandle<()>, CycleError> {
    thread::Builder::new()
        .name("joust-tick".into())
        .spawn(move || {
            let mut next = Instant::now() + period;
            while running.load(Ordering::Relaxed) {
                let now = Instant::now();
                if let Some(wait) = next.checked_duration_since(now) {
                    thread::sleep(wait);
                }
                counter.add(1);
                next += period;
            }
        })
        .map_err(|e| CycleError::Spawn(e.to_string()))
}

// ─── Cycle Statistics ───────────────────────────────────────────────

/// Per-cycle timing and dispatch counters. O(1) update, no allocation.
#[derive(Debug, Clone)]
pub struct CycleStats {
    /// Total cycles executed.
    pub cycle_count: u64,
    /// Last cycle duration [ns].
    pub last_cycle_ns: i64,
    /// Minimum cycle duration [ns].
    pub min_cycle_ns: i64,
    /// Maximum cycle duration [ns].
    pub max_cycle_ns: i64,
    /// Running sum for average computation.
    pub sum_cycle_ns: i64,
    /// Cycles that took longer than the period.
    pub overruns: u64,
    /// Events handed to services.
    pub events_dispatched: u64,
    /// Timer ticks consumed.
    pub ticks: u64,
    /// Events the queue has refused so far.
    pub overflows: u64,
}

impl CycleStats {
    pub const fn new() -> Self {
        Self {
            cycle_count: 0,
            last_cycle_ns: 0,
            min_cycle_ns: i64::MAX,
            max_cycle_ns: 0,
            sum_cycle_ns: 0,
            overruns: 0,
            events_dispatched: 0,
            ticks: 0,
            overflows: 0,
        }
    }

    /// Record one cycle.
    #[inline]
    pub fn record(&mut self, duration_ns: i64, ticks: u32, report: &CycleReport) {
        self.cycle_count += 1;
        self.last_cycle_ns = duration_ns;
        self.min_cycle_ns = self.min_cycle_ns.min(duration_ns);
        self.max_cycle_ns = self.max_cycle_ns.max(duration_ns);
        self.sum_cycle_ns += duration_ns;
        self.events_dispatched += report.dispatched as u64;
        self.ticks += u64::from(ticks);
    }

    /// Average cycle time [ns] (0 if no cycles).
    #[inline]
    pub fn avg_cycle_ns(&self) -> i64 {
        if self.cycle_count == 0 {
            0
        } else {
            self.sum_cycle_ns / self.cycle_count as i64
        }
    }
}

impl Default for CycleStats {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Assembly ───────────────────────────────────────────────────────

/// Register every service and checker on `hal` and run their `init`.
pub fn build_framework<H: Hardware>(hal: H, config: &JoustConfig) -> Result<Framework<H>, CycleError> {
    let mut fw = Framework::new(hal, config.framework.queue_capacity);

    fw.register(Box::new(MatchController::new()))?;
    fw.register(Box::new(CommandService::new(
        config.command_bus.mode,
        config.command_bus.poll_ticks,
    )))?;
    fw.register(Box::new(AimService::new()))?;
    fw.register(Box::new(FireService::new()))?;
    fw.register(Box::new(LanceService::new()))?;
    fw.register(Box::new(OrientationService::new()))?;
    fw.register(Box::new(ReloadService::new()))?;
    fw.register(Box::new(DriveService::new()))?;

    fw.add_checker(Box::new(KeystrokeChecker));
    fw.add_checker(Box::new(BusFlagChecker));
    fw.add_checker(Box::new(IrChecker::new(IrBands::from(&config.ir))));
    fw.add_checker(Box::new(TapeChecker::new()));

    fw.init()?;
    Ok(fw)
}

// ─── Runner ─────────────────────────────────────────────────────────

/// Paced dispatch loop.
pub struct CycleRunner<H: Hardware = Box<dyn Hardware>> {
    framework: Framework<H>,
    ticks: TickCounter,
    cycle_time: Duration,
    max_cycles: Option<u64>,
    stats: CycleStats,
}

impl<H: Hardware> CycleRunner<H> {
    pub fn new(framework: Framework<H>, ticks: TickCounter, cycle_time_us: u32) -> Self {
        Self {
            framework,
            ticks,
            cycle_time: Duration::from_micros(u64::from(cycle_time_us)),
            max_cycles: None,
            stats: CycleStats::new(),
        }
    }

    /// Stop after `limit` cycles (`None` runs until cancelled).
    pub fn with_cycle_limit(mut self, limit: Option<u64>) -> Self {
        self.max_cycles = limit;
        self
    }

    /// Run one cycle with whatever ticks have accumulated.
    pub fn step(&mut self) -> Result<CycleReport, CycleError> {
        let start = Instant::now();
        let ticks = self.ticks.take();
        let report = self.framework.run_cycle(ticks)?;
        let duration_ns = start.elapsed().as_nanos() as i64;
        self.stats.record(duration_ns, ticks, &report);
        self.stats.overflows = self.framework.queue().overflows();
        if start.elapsed() > self.cycle_time {
            self.stats.overruns += 1;
        }
        Ok(report)
    }

    /// Loop until `running` clears, the cycle limit is reached, or a fault surfaces.
    pub fn run(&mut self, running: &AtomicBool) -> Result<(), CycleError> {
        info!(
            cycle_us = self.cycle_time.as_micros() as u64,
            limit = ?self.max_cycles,
            hal = self.framework.hal().name(),
            "Dispatch loop started"
        );
        while running.load(Ordering::Relaxed) {
            if self
                .max_cycles
                .is_some_and(|limit| self.stats.cycle_count >= limit)
            {
                break;
            }
            let cycle_start = Instant::now();
            if let Err(e) = self.step() {
                error!(error = %e, cycles = self.stats.cycle_count, "Dispatch halted");
                return Err(e);
            }
            if let Some(remaining) = self.cycle_time.checked_sub(cycle_start.elapsed()) {
                thread::sleep(remaining);
            }
        }
        let fw = self.framework.stats();
        info!(
            cycles = self.stats.cycle_count,
            dispatched = self.stats.events_dispatched,
            avg_ns = self.stats.avg_cycle_ns(),
            max_ns = self.stats.max_cycle_ns,
            overruns = self.stats.overruns,
            queue_overflows = self.stats.overflows,
            queue_high_water = self.framework.queue().high_water(),
            unrouted = fw.unrouted,
            "Dispatch loop stopped"
        );
        debug!(round = self.framework.board().round(), side = ?self.framework.board().side(), "Final match state");
        Ok(())
    }

    pub fn framework(&self) -> &Framework<H> {
        &self.framework
    }

    pub fn framework_mut(&mut self) -> &mut Framework<H> {
        &mut self.framework
    }

    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
