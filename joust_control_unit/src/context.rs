//! Match context: the one shared status board.
//!
//! Each service publishes a [`ServiceStatus`] snapshot after every `init` and
//! `run`; the dispatcher records it here. A slot accepts only its owner's
//! variant, so every published value has exactly one writer. Services read
//! other services' state through the read-only accessors.
//!
//! The side switch latch is owned by the dispatcher and sampled once per
//! cycle: the side is dark until the switch is first seen high, then red for
//! the rest of the run.

use joust_common::command::{MatchCommand, QueryMode, Side, StatusByte};
use joust_common::event::{SERVICE_COUNT, ServiceId};
use joust_common::hal::types::TapeColor;
use tracing::{info, warn};

use crate::state::aim::AimPhase;
use crate::state::lance::LancePhase;
use crate::state::match_ctl::MatchPhase;

// ─── Published snapshots ────────────────────────────────────────────

/// State a service exposes to the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceStatus {
    Match {
        round: u8,
        phase: MatchPhase,
    },
    Command {
        mode: QueryMode,
        last_command: Option<MatchCommand>,
        reload_requested: bool,
    },
    Aim {
        phase: AimPhase,
        target: u16,
        servo_us: u16,
    },
    Fire {
        remaining: u16,
        launcher_on: bool,
    },
    Lance {
        phase: LancePhase,
    },
    Orientation {
        target: TapeColor,
        awaiting_tape: bool,
    },
    Reload {
        signalling: bool,
        bursts_sent: u32,
    },
    Drive {
        moves_completed: u32,
    },
}

impl ServiceStatus {
    /// The only service allowed to publish this variant.
    pub const fn owner(&self) -> ServiceId {
        match self {
            Self::Match { .. } => ServiceId::Match,
            Self::Command { .. } => ServiceId::Command,
            Self::Aim { .. } => ServiceId::Aim,
            Self::Fire { .. } => ServiceId::Fire,
            Self::Lance { .. } => ServiceId::Lance,
            Self::Orientation { .. } => ServiceId::Orientation,
            Self::Reload { .. } => ServiceId::Reload,
            Self::Drive { .. } => ServiceId::Drive,
        }
    }
}

// ─── Side latch ─────────────────────────────────────────────────────

/// Sticky side selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SideLatch {
    latched: bool,
}

impl SideLatch {
    /// Feed one sample of the side switch. Returns `true` on the sample that latches.
    pub fn observe(&mut self, switch_high: bool) -> bool {
        if switch_high && !self.latched {
            self.latched = true;
            return true;
        }
        false
    }

    #[inline]
    pub fn side(&self) -> Side {
        if self.latched { Side::Red } else { Side::Dark }
    }
}

// ─── Board ──────────────────────────────────────────────────────────

/// Shared match status.
#[derive(Debug, Default)]
pub struct MatchContext {
    side: SideLatch,
    slots: [Option<ServiceStatus>; SERVICE_COUNT],
    rejected: u64,
}

impl MatchContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `status` published by `writer`. Rejects a variant `writer` does not own.
    pub fn record(&mut self, writer: ServiceId, status: ServiceStatus) -> bool {
        if status.owner() != writer {
            self.rejected += 1;
            warn!(
                writer = writer.name(),
                owner = status.owner().name(),
                "Status record rejected: slot owned by another service"
            );
            return false;
        }
        self.slots[writer.index()] = Some(status);
        true
    }

    /// Sample the side switch.
    pub(crate) fn observe_side(&mut self, switch_high: bool) {
        if self.side.observe(switch_high) {
            info!("Side switch latched: red knight");
        }
    }

    /// Last snapshot published by `id`.
    pub fn status(&self, id: ServiceId) -> Option<ServiceStatus> {
        self.slots[id.index()]
    }

    /// Records refused for wrong ownership.
    pub fn rejected(&self) -> u64 {
        self.rejected
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side.side()
    }

    /// Reload-request bit for our side in the referee status byte.
    #[inline]
    pub fn reload_mask(&self) -> StatusByte {
        self.side().reload_mask()
    }

    /// Current round (0 before the first start).
    pub fn round(&self) -> u8 {
        match self.status(ServiceId::Match) {
            Some(ServiceStatus::Match { round, .. }) => round,
            _ => 0,
        }
    }

    pub fn match_phase(&self) -> MatchPhase {
        match self.status(ServiceId::Match) {
            Some(ServiceStatus::Match { phase, .. }) => phase,
            _ => MatchPhase::Recess,
        }
    }

    pub fn aim_phase(&self) -> AimPhase {
        match self.status(ServiceId::Aim) {
            Some(ServiceStatus::Aim { phase, .. }) => phase,
            _ => AimPhase::Deactivated,
        }
    }

    /// Beacon frequency Aim is armed for (0 when deactivated).
    pub fn aim_target(&self) -> u16 {
        match self.status(ServiceId::Aim) {
            Some(ServiceStatus::Aim { target, .. }) => target,
            _ => 0,
        }
    }

    pub fn balls_remaining(&self) -> u16 {
        match self.status(ServiceId::Fire) {
            Some(ServiceStatus::Fire { remaining, .. }) => remaining,
            _ => 0,
        }
    }

    /// Referee is requesting a reload for our side.
    pub fn reload_requested(&self) -> bool {
        matches!(
            self.status(ServiceId::Command),
            Some(ServiceStatus::Command { reload_requested: true, .. })
        )
    }

    pub fn tape_target(&self) -> TapeColor {
        match self.status(ServiceId::Orientation) {
            Some(ServiceStatus::Orientation { target, .. }) => target,
            _ => TapeColor::White,
        }
    }

    pub fn lance_phase(&self) -> LancePhase {
        match self.status(ServiceId::Lance) {
            Some(ServiceStatus::Lance { phase }) => phase,
            _ => LancePhase::Retracted,
        }
    }
}
