//! Common re-exports: `use joust_common::prelude::*;`.

use std::time::Duration;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, SharedConfig};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{BOT_FREQ, CYCLE_TIME_US, GOAL_FREQ, MAX_BALLS, ONE_SEC, TICK_US};

// ─── Events ─────────────────────────────────────────────────────────
pub use crate::event::{Event, EventKind, ServiceId, TimerId};

// ─── Referee Protocol ───────────────────────────────────────────────
pub use crate::command::{MatchCommand, QueryMode, Side};

// ─── Hardware ───────────────────────────────────────────────────────
pub use crate::hal::driver::{Hardware, HalError};
pub use crate::hal::types::{Indicators, MotorSide, ServoChannel, TapeColor};

/// Default dispatch cycle as Duration.
pub const DEFAULT_CYCLE_TIME: Duration = Duration::from_micros(CYCLE_TIME_US as u64);

/// Default tick period as Duration.
pub const TICK_PERIOD: Duration = Duration::from_micros(TICK_US as u64);
