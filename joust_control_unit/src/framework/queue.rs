//! Bounded FIFO of addressed events.
//!
//! Storage is a fixed `heapless::Deque` sized for [`MAX_QUEUE_DEPTH`]; the
//! configured capacity caps how much of it is used. A full queue rejects the
//! push and counts an overflow.

use heapless::Deque;
use joust_common::consts::MAX_QUEUE_DEPTH;
use joust_common::event::{Event, ServiceId};
use static_assertions::const_assert;

const_assert!(MAX_QUEUE_DEPTH >= 8);

/// One queued event and the service it is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope {
    pub target: ServiceId,
    pub event: Event,
}

/// Shared event queue.
#[derive(Debug)]
pub struct EventQueue {
    buf: Deque<Envelope, MAX_QUEUE_DEPTH>,
    capacity: usize,
    /// Rejected pushes since creation.
    overflows: u64,
    /// Deepest fill level seen.
    high_water: usize,
}

impl EventQueue {
    /// Queue holding at most `capacity` events (clamped to `1..=MAX_QUEUE_DEPTH`).
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: Deque::new(),
            capacity: capacity.clamp(1, MAX_QUEUE_DEPTH),
            overflows: 0,
            high_water: 0,
        }
    }

    /// Append at the tail. Returns `false` and drops the event if full.
    pub fn push(&mut self, target: ServiceId, event: Event) -> bool {
        if self.buf.len() >= self.capacity {
            self.overflows += 1;
            return false;
        }
        // Capacity never exceeds the backing storage.
        if self.buf.push_back(Envelope { target, event }).is_err() {
            self.overflows += 1;
            return false;
        }
        self.high_water = self.high_water.max(self.buf.len());
        true
    }

    /// Remove the head.
    #[inline]
    pub fn pop(&mut self) -> Option<Envelope> {
        self.buf.pop_front()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn overflows(&self) -> u64 {
        self.overflows
    }

    #[inline]
    pub fn high_water(&self) -> usize {
        self.high_water
    }

    /// Queued envelopes, head first.
    pub fn iter(&self) -> impl Iterator<Item = &Envelope> {
        self.buf.iter()
    }
}
