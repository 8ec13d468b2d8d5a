//! # Joust HAL Library
//!
//! Hardware backends for the joust control unit. Backends implement the
//! `Hardware` trait from `joust_common::hal::driver` and are created by name
//! through a [`DriverRegistry`].
//!
//! # Module Structure
//!
//! - [`driver_registry`] - Driver factory registration
//! - [`drivers`] - Backend implementations (simulation, stdin console)
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                   joust_control_unit                      │
//! │        Framework ──► &mut dyn Hardware (one-shot calls)   │
//! └──────────────────────────────┬────────────────────────────┘
//!                                │
//!                 ┌──────────────▼─────────────┐
//!                 │  DriverRegistry::create()  │
//!                 └──────────────┬─────────────┘
//!                                │
//!           ┌────────────────────▼────────────────────┐
//!           │ SimulatedRobot (+ StdinConsole keys)    │
//!           └─────────────────────────────────────────┘
//! ```

#![deny(missing_docs)]

pub mod driver_registry;
pub mod drivers;

pub use crate::driver_registry::DriverRegistry;
