//! Stdin keystroke source.
//!
//! A reader thread forwards every byte typed on stdin into a channel the
//! simulated console drains once per dispatch cycle.

use joust_common::hal::driver::HalError;
use std::io::Read;
use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Handle to the background stdin reader.
pub struct StdinConsole {
    handle: JoinHandle<()>,
}

impl StdinConsole {
    /// Spawn the reader thread and return it with the keystroke receiver.
    ///
    /// # Errors
    /// `HalError::InitFailed` if the thread cannot be spawned.
    pub fn spawn() -> Result<(Self, Receiver<u8>), HalError> {
        let (tx, rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("joust-console".into())
            .spawn(move || {
                let stdin = std::io::stdin();
                for byte in stdin.lock().bytes() {
                    match byte {
                        Ok(b'\n' | b'\r') => {}
                        Ok(b) => {
                            if tx.send(b).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            warn!("Console read failed: {e}");
                            break;
                        }
                    }
                }
                debug!("Console reader finished");
            })
            .map_err(|e| HalError::InitFailed(format!("console thread: {e}")))?;
        Ok((Self { handle }, rx))
    }

    /// True once stdin has closed.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
