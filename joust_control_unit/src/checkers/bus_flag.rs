//! Command bus receive flag.

use joust_common::event::{Event, EventKind, ServiceId};

use super::{CheckerIo, EventChecker};

/// Posts `FlagSet` to the Command service while a received byte is waiting.
#[derive(Debug, Default)]
pub struct BusFlagChecker;

impl EventChecker for BusFlagChecker {
    fn name(&self) -> &'static str {
        "bus_flag"
    }

    fn check(&mut self, io: &mut CheckerIo<'_>) -> bool {
        if io.hal().data_ready() {
            return io.post(ServiceId::Command, Event::signal(EventKind::FlagSet));
        }
        false
    }
}
