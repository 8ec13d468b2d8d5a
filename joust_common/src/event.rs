//! Framework event vocabulary.
//!
//! All enums use `#[repr(u8)]` and are `Copy`: events are value types copied
//! into the queue and out again. `ServiceId` discriminants are the fixed
//! service priority order (0 = highest); `TimerId` discriminants define the
//! delivery order of timers expiring on the same tick.

use serde::{Deserialize, Serialize};
use static_assertions::const_assert;

// ─── Event Kinds ────────────────────────────────────────────────────

/// Closed, framework-wide set of event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventKind {
    /// No event / no error.
    NoEvent = 0,
    /// Delivered to each service once, after its `init`.
    Init = 1,
    /// Timer expiry; `param` is the expiring [`TimerId`].
    Timeout = 2,
    /// Referee command changed; `param` is the command byte.
    NewCommandReceived = 3,
    /// Command bus has a received byte waiting.
    FlagSet = 4,
    /// Switch the command bus to status polling.
    QueryStatus = 5,
    /// Switch the command bus to score polling.
    QueryScore = 6,
    /// Arm the aim subsystem; `param` is the target beacon frequency.
    StartAlign = 7,
    /// Disarm the aim subsystem; `param` 1 selects the retracted rest position.
    StopAligning = 8,
    /// Both IR sensors see the target; `param` is the frequency.
    SenseBoth = 9,
    /// Only the left IR sensor sees the target.
    LeftOnly = 10,
    /// Only the right IR sensor sees the target.
    RightOnly = 11,
    /// Neither IR sensor sees the target.
    SenseNone = 12,
    /// Fire projectiles; `param` is the count.
    ShootBall = 13,
    /// Spin up the launcher wheels.
    StartShootingMotors = 14,
    /// Spin down the launcher wheels.
    StopShootingMotors = 15,
    /// Magazine refilled / request a refill.
    ReloadBalls = 16,
    /// Deploy the lance.
    DeployLance = 17,
    /// Retarget the tape tracker; `param` is a tape color code.
    UpdateTargetColor = 18,
    /// Confirmed tape color under the right tape sensor; `param` is the color code.
    RightTape = 19,
    /// Move the turret to a rest position; `param` is the pulse width [µs].
    ParkTurret = 20,
}

// ─── Event ──────────────────────────────────────────────────────────

/// A framework event: kind plus a kind-dependent integer payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    pub kind: EventKind,
    pub param: u16,
}

impl Event {
    pub const NONE: Self = Self::new(EventKind::NoEvent, 0);

    #[inline]
    pub const fn new(kind: EventKind, param: u16) -> Self {
        Self { kind, param }
    }

    /// Event with a zero payload.
    #[inline]
    pub const fn signal(kind: EventKind) -> Self {
        Self::new(kind, 0)
    }

    /// Timeout event for `timer`.
    #[inline]
    pub const fn timeout(timer: TimerId) -> Self {
        Self::new(EventKind::Timeout, timer as u16)
    }

    #[inline]
    pub const fn is(&self, kind: EventKind) -> bool {
        self.kind as u8 == kind as u8
    }

    /// The expiring timer, if this is a `Timeout` with a valid timer id.
    #[inline]
    pub fn timer(&self) -> Option<TimerId> {
        if self.is(EventKind::Timeout) {
            u8::try_from(self.param).ok().and_then(TimerId::from_u8)
        } else {
            None
        }
    }

    /// True for a `Timeout` of exactly `timer`.
    #[inline]
    pub fn is_timeout(&self, timer: TimerId) -> bool {
        self.timer() == Some(timer)
    }
}

impl Default for Event {
    fn default() -> Self {
        Self::NONE
    }
}

// ─── Services ───────────────────────────────────────────────────────

/// Statically enumerated services; discriminant = priority (0 highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum ServiceId {
    /// Match controller ("Bot"): rounds, phases, orchestration.
    Match = 0,
    /// Referee command ingestion over the command bus.
    Command = 1,
    /// IR beacon alignment.
    Aim = 2,
    /// Projectile launcher.
    Fire = 3,
    /// Lance deploy/retract.
    Lance = 4,
    /// Tape-based orientation and homing.
    Orientation = 5,
    /// IR reload-request emitter.
    Reload = 6,
    /// Timed drive moves.
    Drive = 7,
}

/// Number of services.
pub const SERVICE_COUNT: usize = 8;

impl ServiceId {
    /// All services in priority order.
    pub const ALL: [Self; SERVICE_COUNT] = [
        Self::Match,
        Self::Command,
        Self::Aim,
        Self::Fire,
        Self::Lance,
        Self::Orientation,
        Self::Reload,
        Self::Drive,
    ];

    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Match),
            1 => Some(Self::Command),
            2 => Some(Self::Aim),
            3 => Some(Self::Fire),
            4 => Some(Self::Lance),
            5 => Some(Self::Orientation),
            6 => Some(Self::Reload),
            7 => Some(Self::Drive),
            _ => None,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Short name used in log output.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::Command => "command",
            Self::Aim => "aim",
            Self::Fire => "fire",
            Self::Lance => "lance",
            Self::Orientation => "orientation",
            Self::Reload => "reload",
            Self::Drive => "drive",
        }
    }
}

// ─── Timers ─────────────────────────────────────────────────────────

/// Process-wide timer identifiers. One timer instance exists per id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum TimerId {
    /// Command bus poll period.
    CommandPoll = 0,
    /// Aim scan-servo sweep step.
    AimSweep = 1,
    /// Resume forward search after the round-3 volley.
    AimSearch = 2,
    /// Feeder push duration.
    ShootFeed = 3,
    /// Pause between feeder retract and the next push.
    FeederRearm = 4,
    /// Lance deploy / retract hold.
    Lance = 5,
    /// Match controller bot-search retry.
    MatchSearch = 6,
    /// 25 s stop-moving failsafe.
    StopMoving = 7,
    /// Green-to-red tape retarget delay.
    Tape = 8,
    /// Tape-detected pause (bench injected).
    Pause = 9,
    /// Reload-pulse burst period.
    Reload = 10,
    /// Timed drive move.
    DriveStop = 11,
}

/// Number of timers.
pub const TIMER_COUNT: usize = 12;

const_assert!(TIMER_COUNT <= u8::MAX as usize);
const_assert!(SERVICE_COUNT <= u8::MAX as usize);

impl TimerId {
    /// All timers in ascending id order.
    pub const ALL: [Self; TIMER_COUNT] = [
        Self::CommandPoll,
        Self::AimSweep,
        Self::AimSearch,
        Self::ShootFeed,
        Self::FeederRearm,
        Self::Lance,
        Self::MatchSearch,
        Self::StopMoving,
        Self::Tape,
        Self::Pause,
        Self::Reload,
        Self::DriveStop,
    ];

    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::CommandPoll),
            1 => Some(Self::AimSweep),
            2 => Some(Self::AimSearch),
            3 => Some(Self::ShootFeed),
            4 => Some(Self::FeederRearm),
            5 => Some(Self::Lance),
            6 => Some(Self::MatchSearch),
            7 => Some(Self::StopMoving),
            8 => Some(Self::Tape),
            9 => Some(Self::Pause),
            10 => Some(Self::Reload),
            11 => Some(Self::DriveStop),
            _ => None,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
