//! Command ingestion: polls the referee box over the command bus.
//!
//! Every poll period one byte is clocked out: the query byte opens a frame,
//! fillers clock the remaining bytes in. Each received byte (signalled by
//! `FlagSet`) re-arms the poll timer; the fourth closes the frame. The byte
//! at the mode's read position carries command 1 and the reload request,
//! the byte after it command 2. A command is forwarded to the Match
//! controller only when it differs from the last one seen in its slot.

use joust_common::command::{FILLER, FRAME_LEN, MatchCommand, NOTHING, QueryMode, StatusByte};
use joust_common::event::{Event, EventKind, ServiceId, TimerId};
use tracing::{debug, info, trace};

use crate::context::ServiceStatus;
use crate::error::ServiceFault;
use crate::framework::service::{Ctx, Service};

/// Default poll period [ticks].
pub const DEFAULT_POLL_TICKS: u32 = 3;

/// Command bus service.
#[derive(Debug)]
pub struct CommandService {
    mode: QueryMode,
    poll_ticks: u32,
    /// Bytes clocked in the current frame (0 = idle).
    index: u8,
    /// Last command seen per slot; `NOTHING` forces the next one through.
    last: [u8; 2],
    last_command: Option<MatchCommand>,
    reload_requested: bool,
}

impl Default for CommandService {
    fn default() -> Self {
        Self::new(QueryMode::Status, DEFAULT_POLL_TICKS)
    }
}

impl CommandService {
    pub fn new(mode: QueryMode, poll_ticks: u32) -> Self {
        Self {
            mode,
            poll_ticks: poll_ticks.max(1),
            index: 0,
            last: [NOTHING; 2],
            last_command: None,
            reload_requested: false,
        }
    }

    pub fn mode(&self) -> QueryMode {
        self.mode
    }

    /// Change the query and restart framing from the next poll.
    fn switch_mode(&mut self, mode: QueryMode, ctx: &mut Ctx<'_>) {
        info!(?mode, "Command bus query mode");
        self.mode = mode;
        self.index = 0;
        self.last = [NOTHING; 2];
        ctx.hal().select(false);
    }

    fn clock_out(&mut self, ctx: &mut Ctx<'_>) {
        if !ctx.hal().tx_ready() {
            trace!("Command bus busy, poll retried");
            ctx.init_timer(TimerId::CommandPoll, self.poll_ticks);
            return;
        }
        self.index += 1;
        if self.index == 1 {
            ctx.hal().select(true);
            ctx.hal().send(self.mode.query_byte());
        } else {
            ctx.hal().send(FILLER);
        }
    }

    fn clock_in(&mut self, ctx: &mut Ctx<'_>) {
        if !ctx.hal().data_ready() {
            return;
        }
        let byte = ctx.hal().receive();
        let read_from = self.mode.read_from();
        let slot = match self.index {
            i if i < read_from => None,
            i if i == read_from => {
                self.reload_requested = StatusByte::from_bits_truncate(byte)
                    .intersects(ctx.board().reload_mask());
                Some(0)
            }
            _ => Some(1),
        };
        if let Some(slot) = slot {
            self.forward(slot, StatusByte::command(byte), ctx);
        }

        ctx.init_timer(TimerId::CommandPoll, self.poll_ticks);
        if self.index >= FRAME_LEN {
            self.index = 0;
            ctx.hal().select(false);
        }
    }

    fn forward(&mut self, slot: usize, command: u8, ctx: &mut Ctx<'_>) {
        if self.last[slot] == command {
            return;
        }
        self.last[slot] = command;
        self.last_command = MatchCommand::from_u8(command);
        debug!(slot, command, parsed = ?self.last_command, "New referee command");
        ctx.post(
            ServiceId::Match,
            Event::new(EventKind::NewCommandReceived, u16::from(command)),
        );
    }
}

impl Service for CommandService {
    fn id(&self) -> ServiceId {
        ServiceId::Command
    }

    fn init(&mut self, ctx: &mut Ctx<'_>) -> Result<(), ServiceFault> {
        *self = Self::new(self.mode, self.poll_ticks);
        ctx.hal().select(false);
        ctx.init_timer(TimerId::CommandPoll, self.poll_ticks);
        Ok(())
    }

    fn run(&mut self, event: Event, ctx: &mut Ctx<'_>) -> Result<(), ServiceFault> {
        match event.kind {
            EventKind::QueryStatus => self.switch_mode(QueryMode::Status, ctx),
            EventKind::QueryScore => self.switch_mode(QueryMode::Score, ctx),
            EventKind::Timeout if event.is_timeout(TimerId::CommandPoll) => self.clock_out(ctx),
            EventKind::FlagSet => self.clock_in(ctx),
            _ => {}
        }
        Ok(())
    }

    fn status(&self) -> ServiceStatus {
        ServiceStatus::Command {
            mode: self.mode,
            last_command: self.last_command,
            reload_requested: self.reload_requested,
        }
    }
}
