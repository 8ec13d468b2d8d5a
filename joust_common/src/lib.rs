//! Joust Common Library
//!
//! Shared vocabulary for every crate in the joust workspace: the framework
//! event type, service and timer identifiers, referee command bytes, the
//! hardware interface traits implemented by `joust_hal` drivers, and TOML
//! configuration loading.
//!
//! # Module Structure
//!
//! - [`event`] - `Event`, `EventKind`, `ServiceId`, `TimerId`
//! - [`command`] - Referee (JSR) command bytes and status-byte flags
//! - [`hal`] - Actuator / sensor / bus traits and hardware value types
//! - [`config`] - Configuration loading traits and types
//! - [`consts`] - Tick rate and framework limits
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use joust_common::prelude::*;
//!
//! let ev = Event::new(EventKind::StartAlign, BOT_FREQ);
//! assert_eq!(ev.param, 1250);
//! ```

pub mod command;
pub mod config;
pub mod consts;
pub mod event;
pub mod hal;
pub mod prelude;
