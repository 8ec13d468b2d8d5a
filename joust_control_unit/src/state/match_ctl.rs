//! Match controller: round sequencing.
//!
//! Two phases: `Recess` between rounds and `PasDArmes` while a round is on.
//! `End`, `Wait` and the search timeout are handled in every phase before
//! the per-phase table is consulted.
//!
//! Odd rounds charge the opponent (drive forward, aim at the bot beacon);
//! even rounds shoot from where the robot stands. At recess after an odd
//! round the turret retargets the goal, and after round 2 the magazine is
//! reloaded.

use joust_common::command::MatchCommand;
use joust_common::consts::{BOT_FREQ, GOAL_FREQ, MAX_BALLS, ONE_SEC};
use joust_common::event::{Event, EventKind, ServiceId, TimerId};
use joust_common::hal::types::{Indicators, TapeColor};
use tracing::{debug, info};

use super::aim::{AimPhase, TURRET_INIT_US, TURRET_MAX_US};
use super::drive;
use crate::context::ServiceStatus;
use crate::error::ServiceFault;
use crate::framework::service::{Ctx, Service};

/// Failsafe after which Orientation takes over the drive [ticks].
pub const STOP_MOVING_TICKS: u32 = 25 * ONE_SEC;
/// Search delay after an even-round volley while already aligned [ticks].
pub const SEARCH_ALIGNED_TICKS: u32 = 5 * ONE_SEC;
/// Search delay after an even-round volley fired blind [ticks].
pub const SEARCH_BLIND_TICKS: u32 = 6 * ONE_SEC;

/// Round phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchPhase {
    #[default]
    Recess,
    PasDArmes,
}

/// Match controller service.
#[derive(Debug, Default)]
pub struct MatchController {
    round: u8,
    phase: MatchPhase,
}

impl MatchController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn round(&self) -> u8 {
        self.round
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    fn enter(&mut self, next: MatchPhase) {
        if self.phase != next {
            debug!(from = ?self.phase, to = ?next, round = self.round, "Match phase");
            self.phase = next;
        }
    }

    /// Cancel every round timer that would move the robot later on.
    fn halt(&mut self, ctx: &mut Ctx<'_>) {
        ctx.stop_timer(TimerId::MatchSearch);
        ctx.stop_timer(TimerId::StopMoving);
        drive::stop(ctx.hal());
    }

    fn end(&mut self, ctx: &mut Ctx<'_>) {
        info!(round = self.round, "Match ended");
        self.halt(ctx);
        ctx.hal().set_indicator(Indicators::MATCH, false);
        self.enter(MatchPhase::Recess);
        ctx.signal(ServiceId::Aim, EventKind::StopAligning);
        ctx.signal(ServiceId::Fire, EventKind::StopShootingMotors);
    }

    fn wait(&mut self, ctx: &mut Ctx<'_>) {
        info!("Waiting for match start");
        self.round = 0;
        self.halt(ctx);
        ctx.hal().set_indicator(Indicators::MATCH, false);
        self.enter(MatchPhase::Recess);
        ctx.signal(ServiceId::Fire, EventKind::StartShootingMotors);
        ctx.post(ServiceId::Aim, Event::new(EventKind::ParkTurret, TURRET_MAX_US));
    }

    /// Bot-search timeout: back off and look for the opponent again.
    fn search(&mut self, ctx: &mut Ctx<'_>) {
        debug!(round = self.round, "Search timeout, backing off");
        drive::reverse(ctx.hal());
        ctx.post(ServiceId::Aim, Event::new(EventKind::StartAlign, BOT_FREQ));
    }

    fn start_round(&mut self, ctx: &mut Ctx<'_>) {
        if self.round == 0 {
            ctx.hal().set_indicator(Indicators::MATCH, true);
        }
        ctx.hal().set_indicator(Indicators::RECESS, false);
        self.round = self.round.saturating_add(1);
        info!(round = self.round, "Round started");
        self.enter(MatchPhase::PasDArmes);
        ctx.post(
            ServiceId::Orientation,
            Event::new(EventKind::UpdateTargetColor, TapeColor::Green as u16),
        );

        match self.round {
            1 | 3 => {
                ctx.signal(ServiceId::Fire, EventKind::StartShootingMotors);
                ctx.init_timer_for(ServiceId::Orientation, TimerId::StopMoving, STOP_MOVING_TICKS);
                ctx.post(ServiceId::Aim, Event::new(EventKind::StartAlign, BOT_FREQ));
                drive::forward(ctx.hal());
            }
            2 | 4 => {
                ctx.init_timer_for(ServiceId::Orientation, TimerId::StopMoving, STOP_MOVING_TICKS);
                let volley = Event::new(EventKind::ShootBall, MAX_BALLS);
                if ctx.board().aim_phase() == AimPhase::Aligned {
                    ctx.post(ServiceId::Fire, volley);
                    ctx.init_timer(TimerId::MatchSearch, SEARCH_ALIGNED_TICKS);
                } else {
                    ctx.post(ServiceId::Aim, Event::new(EventKind::StopAligning, 1));
                    ctx.post(ServiceId::Fire, volley);
                    ctx.init_timer(TimerId::MatchSearch, SEARCH_BLIND_TICKS);
                }
            }
            _ => {}
        }
    }

    fn recess(&mut self, ctx: &mut Ctx<'_>) {
        info!(round = self.round, "Recess");
        ctx.hal().set_indicator(Indicators::RECESS, true);
        match self.round {
            1 | 3 => {
                ctx.post(ServiceId::Aim, Event::new(EventKind::StartAlign, GOAL_FREQ));
                ctx.signal(ServiceId::Fire, EventKind::StartShootingMotors);
            }
            2 => {
                ctx.post(ServiceId::Aim, Event::new(EventKind::ParkTurret, TURRET_INIT_US));
                ctx.signal(ServiceId::Fire, EventKind::StopShootingMotors);
                ctx.signal(ServiceId::Fire, EventKind::ReloadBalls);
                ctx.signal(ServiceId::Reload, EventKind::ReloadBalls);
                ctx.signal(ServiceId::Aim, EventKind::StopAligning);
            }
            _ => {}
        }
        self.enter(MatchPhase::Recess);
    }
}

impl Service for MatchController {
    fn id(&self) -> ServiceId {
        ServiceId::Match
    }

    fn init(&mut self, _ctx: &mut Ctx<'_>) -> Result<(), ServiceFault> {
        *self = Self::default();
        Ok(())
    }

    fn run(&mut self, event: Event, ctx: &mut Ctx<'_>) -> Result<(), ServiceFault> {
        match event.kind {
            EventKind::NewCommandReceived => {
                let Some(command) = MatchCommand::from_param(event.param) else {
                    debug!(param = event.param, "Unknown match command ignored");
                    return Ok(());
                };
                match (self.phase, command) {
                    (_, MatchCommand::End) => self.end(ctx),
                    (_, MatchCommand::Wait) => self.wait(ctx),
                    (MatchPhase::Recess, cmd) if cmd.starts_round() => self.start_round(ctx),
                    (MatchPhase::PasDArmes, MatchCommand::Recess) => self.recess(ctx),
                    _ => {}
                }
            }
            EventKind::Timeout => self.search(ctx),
            _ => {}
        }
        Ok(())
    }

    fn status(&self) -> ServiceStatus {
        ServiceStatus::Match {
            round: self.round,
            phase: self.phase,
        }
    }
}
