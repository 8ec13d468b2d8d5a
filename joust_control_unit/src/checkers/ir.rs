//! IR beacon alignment checker.
//!
//! Two detectors are classified independently into a beacon frequency via
//! fixed raw bands, then combined against the frequency Aim is armed for.
//! An event is posted only when the combined state differs from the last
//! one posted.

use joust_common::consts::{BOT_FREQ, GOAL_FREQ};
use joust_common::event::{Event, EventKind, ServiceId};
use joust_common::hal::types::analog;
use tracing::debug;

use super::{CheckerIo, EventChecker};
use crate::config::IrConfig;

/// Raw detector value bands per beacon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IrBands {
    pub bot: (u16, u16),
    pub goal: (u16, u16),
}

impl Default for IrBands {
    fn default() -> Self {
        Self {
            bot: (240, 320),
            goal: (425, 515),
        }
    }
}

impl From<&IrConfig> for IrBands {
    fn from(cfg: &IrConfig) -> Self {
        Self {
            bot: (cfg.bot_band[0], cfg.bot_band[1]),
            goal: (cfg.goal_band[0], cfg.goal_band[1]),
        }
    }
}

impl IrBands {
    /// Beacon frequency a raw reading falls in, if any. Bands are inclusive.
    pub fn classify(&self, raw: u16) -> Option<u16> {
        if (self.bot.0..=self.bot.1).contains(&raw) {
            Some(BOT_FREQ)
        } else if (self.goal.0..=self.goal.1).contains(&raw) {
            Some(GOAL_FREQ)
        } else {
            None
        }
    }
}

/// Combined view of both detectors relative to the armed target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sighting {
    #[default]
    None,
    LeftOnly,
    RightOnly,
    Both,
}

impl Sighting {
    /// Combine two classified detectors.
    pub fn combine(left: Option<u16>, right: Option<u16>, target: u16) -> Self {
        if target == 0 {
            return Self::None;
        }
        let want = Some(target);
        if left == want && right == want {
            Self::Both
        } else if left == want {
            Self::LeftOnly
        } else if right == want {
            Self::RightOnly
        } else {
            Self::None
        }
    }

    /// Event reporting this sighting.
    pub fn event(self, target: u16) -> Event {
        match self {
            Self::Both => Event::new(EventKind::SenseBoth, target),
            Self::LeftOnly => Event::new(EventKind::LeftOnly, target),
            Self::RightOnly => Event::new(EventKind::RightOnly, target),
            Self::None => Event::new(EventKind::SenseNone, 0),
        }
    }
}

/// Edge detector over combined sightings.
#[derive(Debug, Clone, Default)]
pub struct IrTracker {
    bands: IrBands,
    last_posted: Sighting,
}

impl IrTracker {
    pub fn new(bands: IrBands) -> Self {
        Self {
            bands,
            last_posted: Sighting::None,
        }
    }

    /// Feed one pair of raw samples. Returns the event to post on a change.
    pub fn update(&mut self, left_raw: u16, right_raw: u16, target: u16) -> Option<Event> {
        let sighting = Sighting::combine(
            self.bands.classify(left_raw),
            self.bands.classify(right_raw),
            target,
        );
        if sighting == self.last_posted {
            return None;
        }
        self.last_posted = sighting;
        Some(sighting.event(target))
    }

    pub fn last_posted(&self) -> Sighting {
        self.last_posted
    }
}

/// Polls both IR detectors for the Aim service.
pub struct IrChecker {
    tracker: IrTracker,
}

impl IrChecker {
    pub fn new(bands: IrBands) -> Self {
        Self {
            tracker: IrTracker::new(bands),
        }
    }
}

impl EventChecker for IrChecker {
    fn name(&self) -> &'static str {
        "ir"
    }

    fn check(&mut self, io: &mut CheckerIo<'_>) -> bool {
        let target = io.board().aim_target();
        let left = io.hal().read_analog(analog::IR_LEFT);
        let right = io.hal().read_analog(analog::IR_RIGHT);
        match self.tracker.update(left, right, target) {
            Some(event) => {
                debug!(left, right, target, sighting = ?self.tracker.last_posted(), "IR sighting changed");
                io.post(ServiceId::Aim, event)
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOT_RAW: u16 = 280;
    const GOAL_RAW: u16 = 470;
    const DARK: u16 = 50;

    #[test]
    fn classify_band_edges_inclusive() {
        let b = IrBands::default();
        assert_eq!(b.classify(240), Some(BOT_FREQ));
        assert_eq!(b.classify(320), Some(BOT_FREQ));
        assert_eq!(b.classify(321), None);
        assert_eq!(b.classify(425), Some(GOAL_FREQ));
        assert_eq!(b.classify(515), Some(GOAL_FREQ));
        assert_eq!(b.classify(0), None);
    }

    #[test]
    fn combine_relative_to_target() {
        let bot = Some(BOT_FREQ);
        let goal = Some(GOAL_FREQ);
        assert_eq!(Sighting::combine(bot, bot, BOT_FREQ), Sighting::Both);
        assert_eq!(Sighting::combine(bot, goal, BOT_FREQ), Sighting::LeftOnly);
        assert_eq!(Sighting::combine(goal, bot, BOT_FREQ), Sighting::RightOnly);
        assert_eq!(Sighting::combine(bot, bot, GOAL_FREQ), Sighting::None);
        assert_eq!(Sighting::combine(None, None, BOT_FREQ), Sighting::None);
    }

    #[test]
    fn disarmed_target_never_matches() {
        assert_eq!(Sighting::combine(None, None, 0), Sighting::None);
        assert_eq!(
            Sighting::combine(Some(BOT_FREQ), Some(BOT_FREQ), 0),
            Sighting::None
        );
    }

    #[test]
    fn posts_only_on_change() {
        let mut t = IrTracker::default();
        assert_eq!(t.update(DARK, DARK, BOT_FREQ), None, "initial None is not a change");

        let ev = t.update(BOT_RAW, DARK, BOT_FREQ).unwrap();
        assert_eq!(ev, Event::new(EventKind::LeftOnly, BOT_FREQ));
        assert_eq!(t.update(BOT_RAW, DARK, BOT_FREQ), None);
        assert_eq!(t.update(BOT_RAW, DARK, BOT_FREQ), None);

        let ev = t.update(BOT_RAW, BOT_RAW, BOT_FREQ).unwrap();
        assert_eq!(ev, Event::new(EventKind::SenseBoth, BOT_FREQ));

        let ev = t.update(DARK, GOAL_RAW, BOT_FREQ).unwrap();
        assert_eq!(ev, Event::new(EventKind::SenseNone, 0));
        assert_eq!(t.update(GOAL_RAW, GOAL_RAW, BOT_FREQ), None);
    }

    #[test]
    fn retarget_reclassifies() {
        let mut t = IrTracker::default();
        assert_eq!(t.update(GOAL_RAW, GOAL_RAW, BOT_FREQ), None);
        let ev = t.update(GOAL_RAW, GOAL_RAW, GOAL_FREQ).unwrap();
        assert_eq!(ev, Event::new(EventKind::SenseBoth, GOAL_FREQ));
    }
}
