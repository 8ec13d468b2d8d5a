//! # Joust Control Unit Library
//!
//! Autonomous knight for a robot jousting match. A cooperative event
//! framework routes events between eight run-to-completion services and
//! drives them from software timers and polled event checkers.
//!
//! ## Layers
//!
//! 1. **framework**: event queue, timer service, dispatcher
//! 2. **checkers**: edge detectors turning sensor samples into events
//! 3. **state**: the services (Match, Command, Aim, Fire, Lance,
//!    Orientation, Reload, Drive)
//! 4. **cycle**: paced loop and tick source around the dispatcher
//!
//! ## No Shared Mutable Globals
//!
//! Services publish a status snapshot after every dispatch into the
//! dispatcher-owned [`context::MatchContext`]; other services read it,
//! never each other's fields.

pub mod checkers;
pub mod config;
pub mod context;
pub mod cycle;
pub mod error;
pub mod framework;
pub mod state;
