//! Cooperative event framework.
//!
//! One bounded FIFO of addressed events, one countdown per timer id, a fixed
//! table of services indexed by [`ServiceId`](joust_common::event::ServiceId)
//! and a list of polled event checkers. Everything runs on the calling
//! thread; a service runs to completion before the next event is popped.

pub mod dispatch;
pub mod queue;
pub mod service;
pub mod timer;

pub use dispatch::{CycleReport, DispatchStats, Framework};
pub use queue::{Envelope, EventQueue};
pub use service::{Ctx, Service};
pub use timer::TimerService;
