//! Timer service.
//!
//! One countdown per [`TimerId`]. `init` (re)arms a timer and binds it to a
//! service; re-arming replaces the previous period, so a stale deadline can
//! never fire. `tick` decrements every running timer and returns the
//! expirations in delivery order: earlier deadline first, ties by ascending
//! timer id. An expired timer stays idle until re-armed.

use heapless::Vec as FixedVec;
use joust_common::event::{ServiceId, TIMER_COUNT, TimerId};

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    remaining: u32,
    running: bool,
    owner: Option<ServiceId>,
}

/// Expirations produced by one `tick` call.
pub type Expirations = FixedVec<(TimerId, ServiceId), TIMER_COUNT>;

/// Countdown timers, one per id.
#[derive(Debug, Default)]
pub struct TimerService {
    slots: [Slot; TIMER_COUNT],
}

impl TimerService {
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)arm `id` for `ticks` (minimum 1) and bind it to `owner`.
    pub fn init(&mut self, id: TimerId, ticks: u32, owner: ServiceId) {
        self.slots[id.index()] = Slot {
            remaining: ticks.max(1),
            running: true,
            owner: Some(owner),
        };
    }

    /// Resume a stopped timer without resetting it. No effect on an expired timer.
    pub fn start(&mut self, id: TimerId) {
        let slot = &mut self.slots[id.index()];
        if slot.remaining > 0 && slot.owner.is_some() {
            slot.running = true;
        }
    }

    /// Freeze a timer, keeping its remaining count and binding.
    pub fn stop(&mut self, id: TimerId) {
        self.slots[id.index()].running = false;
    }

    #[inline]
    pub fn is_running(&self, id: TimerId) -> bool {
        self.slots[id.index()].running
    }

    #[inline]
    pub fn remaining(&self, id: TimerId) -> u32 {
        self.slots[id.index()].remaining
    }

    /// Service the timer's expiry is delivered to.
    #[inline]
    pub fn owner(&self, id: TimerId) -> Option<ServiceId> {
        self.slots[id.index()].owner
    }

    /// Advance every running timer by `elapsed` ticks.
    pub fn tick(&mut self, elapsed: u32) -> Expirations {
        let mut due: FixedVec<(u32, TimerId, ServiceId), TIMER_COUNT> = FixedVec::new();
        if elapsed == 0 {
            return Expirations::new();
        }
        for id in TimerId::ALL {
            let slot = &mut self.slots[id.index()];
            if !slot.running {
                continue;
            }
            if slot.remaining <= elapsed {
                let deadline = slot.remaining;
                slot.remaining = 0;
                slot.running = false;
                if let Some(owner) = slot.owner {
                    // At most one entry per timer id.
                    let _ = due.push((deadline, id, owner));
                }
            } else {
                slot.remaining -= elapsed;
            }
        }
        due.sort_unstable_by_key(|&(deadline, id, _)| (deadline, id));
        due.iter().map(|&(_, id, owner)| (id, owner)).collect()
    }
}
