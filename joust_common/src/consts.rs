//! System-wide constants for the joust workspace.
//!
//! Single source of truth for tick timing and framework limits.
//! Imported by all crates; no duplication permitted.

use static_assertions::const_assert;

/// Timer tick resolution in microseconds (1.024 ms hardware tick).
pub const TICK_US: u32 = 1024;

/// Number of timer ticks in one second at [`TICK_US`] resolution.
pub const ONE_SEC: u32 = 976;

/// Default dispatch loop pacing in microseconds.
pub const CYCLE_TIME_US: u32 = 1000;

/// Hard upper bound for the event queue (storage is pre-allocated).
pub const MAX_QUEUE_DEPTH: usize = 64;

/// Default event queue depth.
pub const DEFAULT_QUEUE_CAPACITY: usize = 32;

/// Beacon frequency carried by the opposing knight [Hz].
pub const BOT_FREQ: u16 = 1250;

/// Beacon frequency carried by the goal [Hz].
pub const GOAL_FREQ: u16 = 2083;

/// Projectile magazine size.
pub const MAX_BALLS: u16 = 5;

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/joust/joust.toml";

const_assert!(DEFAULT_QUEUE_CAPACITY <= MAX_QUEUE_DEPTH);
const_assert!(ONE_SEC * TICK_US <= 1_000_000);

/// Convert a duration in milliseconds to timer ticks (rounded down, min 1).
#[inline]
pub const fn ms_to_ticks(ms: u32) -> u32 {
    let ticks = (ms as u64 * 1000 / TICK_US as u64) as u32;
    if ticks == 0 { 1 } else { ticks }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constants_are_consistent() {
        assert!(DEFAULT_QUEUE_CAPACITY > 0);
        assert!(MAX_BALLS > 0);
        assert!(GOAL_FREQ > BOT_FREQ);
    }

    #[test]
    fn one_second_matches_tick_rate() {
        assert_eq!(ms_to_ticks(1000), ONE_SEC);
    }

    #[test]
    fn sub_tick_duration_rounds_up_to_one() {
        assert_eq!(ms_to_ticks(0), 1);
        assert_eq!(ms_to_ticks(1), 1);
    }
}
