//! Control unit configuration.
//!
//! Every section and field has a default: an empty file, or no file at all,
//! yields a runnable robot.
//!
//! ```toml
//! [shared]
//! log_level = "info"
//! service_name = "joust-knight"
//!
//! [framework]
//! tick_us = 1024
//! cycle_time_us = 1000
//! queue_capacity = 32
//!
//! [command_bus]
//! mode = "status"
//! poll_ticks = 3
//!
//! [ir]
//! bot_band = [240, 320]
//! goal_band = [425, 515]
//! ```

use std::path::Path;

use joust_common::command::QueryMode;
use joust_common::config::{ConfigError, ConfigLoader, SharedConfig};
use joust_common::consts::{CYCLE_TIME_US, DEFAULT_QUEUE_CAPACITY, MAX_QUEUE_DEPTH, TICK_US};
use serde::{Deserialize, Serialize};

use crate::state::command::DEFAULT_POLL_TICKS;

// ─── Sections ───────────────────────────────────────────────────────

/// `[framework]`: timing and queue sizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameworkConfig {
    /// Timer tick resolution [µs].
    pub tick_us: u32,
    /// Dispatch loop period [µs].
    pub cycle_time_us: u32,
    /// Event queue depth.
    pub queue_capacity: usize,
}

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self {
            tick_us: TICK_US,
            cycle_time_us: CYCLE_TIME_US,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

/// `[command_bus]`: referee polling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandBusConfig {
    pub mode: QueryMode,
    /// Poll period [ticks].
    pub poll_ticks: u32,
}

impl Default for CommandBusConfig {
    fn default() -> Self {
        Self {
            mode: QueryMode::Status,
            poll_ticks: DEFAULT_POLL_TICKS,
        }
    }
}

/// `[ir]`: raw detector bands, inclusive `[low, high]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IrConfig {
    pub bot_band: [u16; 2],
    pub goal_band: [u16; 2],
}

impl Default for IrConfig {
    fn default() -> Self {
        Self {
            bot_band: [240, 320],
            goal_band: [425, 515],
        }
    }
}

// ─── Root ───────────────────────────────────────────────────────────

/// Full control unit configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JoustConfig {
    pub shared: SharedConfig,
    pub framework: FrameworkConfig,
    pub command_bus: CommandBusConfig,
    pub ir: IrConfig,
}

impl JoustConfig {
    /// Load and validate `path`.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let config = Self::load(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;

        let fw = &self.framework;
        if fw.tick_us == 0 {
            return invalid("framework.tick_us must be > 0");
        }
        if fw.cycle_time_us == 0 {
            return invalid("framework.cycle_time_us must be > 0");
        }
        if !(1..=MAX_QUEUE_DEPTH).contains(&fw.queue_capacity) {
            return invalid(format!(
                "framework.queue_capacity {} outside 1..={MAX_QUEUE_DEPTH}",
                fw.queue_capacity
            ));
        }

        if self.command_bus.poll_ticks == 0 {
            return invalid("command_bus.poll_ticks must be > 0");
        }

        let [bot_lo, bot_hi] = self.ir.bot_band;
        let [goal_lo, goal_hi] = self.ir.goal_band;
        if bot_lo > bot_hi {
            return invalid(format!("ir.bot_band inverted: [{bot_lo}, {bot_hi}]"));
        }
        if goal_lo > goal_hi {
            return invalid(format!("ir.goal_band inverted: [{goal_lo}, {goal_hi}]"));
        }
        if bot_lo <= goal_hi && goal_lo <= bot_hi {
            return invalid("ir.bot_band and ir.goal_band overlap");
        }
        Ok(())
    }
}

fn invalid(msg: impl Into<String>) -> Result<(), ConfigError> {
    Err(ConfigError::ValidationError(msg.into()))
}
