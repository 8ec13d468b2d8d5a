//! Simulated referee box on the command bus.
//!
//! Each selected transfer clocks one byte out and shifts the next byte of a
//! scripted 4-byte response frame in. Deselecting restarts the frame.

use joust_common::command::FRAME_LEN;
use std::collections::VecDeque;

const SENT_HISTORY: usize = 64;

/// Referee-box responder.
#[derive(Debug)]
pub struct SimReferee {
    frame: [u8; FRAME_LEN as usize],
    position: usize,
    transfers: u8,
    selected: bool,
    rx: Option<u8>,
    tx_ready: bool,
    sent: VecDeque<u8>,
    frames_completed: u64,
}

impl Default for SimReferee {
    fn default() -> Self {
        Self {
            frame: [0; FRAME_LEN as usize],
            position: 0,
            transfers: 0,
            selected: false,
            rx: None,
            tx_ready: true,
            sent: VecDeque::with_capacity(SENT_HISTORY),
            frames_completed: 0,
        }
    }
}

impl SimReferee {
    /// Responder answering with an all-zero frame (command WAIT).
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole response frame.
    pub fn set_frame(&mut self, frame: [u8; FRAME_LEN as usize]) {
        self.frame = frame;
    }

    /// Set the status byte (last byte of the frame).
    pub fn set_status(&mut self, status: u8) {
        self.frame[FRAME_LEN as usize - 1] = status;
    }

    /// Make the transmitter busy or ready.
    pub fn set_tx_ready(&mut self, ready: bool) {
        self.tx_ready = ready;
    }

    /// Most recent bytes sent by the robot, oldest first.
    pub fn sent(&self) -> impl Iterator<Item = u8> + '_ {
        self.sent.iter().copied()
    }

    /// Number of frames closed by a deselect after four transfers.
    pub fn frames_completed(&self) -> u64 {
        self.frames_completed
    }

    /// True while the slave-select line is active.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub(crate) fn tx_ready(&self) -> bool {
        self.tx_ready
    }

    pub(crate) fn select(&mut self, active: bool) {
        if !active {
            if self.selected && self.transfers >= FRAME_LEN {
                self.frames_completed += 1;
            }
            self.position = 0;
            self.transfers = 0;
        } else if !self.selected {
            self.position = 0;
            self.transfers = 0;
        }
        self.selected = active;
    }

    pub(crate) fn transfer(&mut self, byte: u8) {
        if self.sent.len() == SENT_HISTORY {
            self.sent.pop_front();
        }
        self.sent.push_back(byte);
        if self.selected {
            self.rx = Some(self.frame[self.position]);
            self.position = (self.position + 1) % FRAME_LEN as usize;
            self.transfers = self.transfers.saturating_add(1);
        }
    }

    pub(crate) fn data_ready(&self) -> bool {
        self.rx.is_some()
    }

    pub(crate) fn take(&mut self) -> u8 {
        self.rx.take().unwrap_or(0)
    }
}
