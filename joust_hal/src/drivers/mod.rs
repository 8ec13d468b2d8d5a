//! Hardware backend implementations.
//!
//! - [`simulation`] - Software robot for bench runs and tests
//! - [`console`] - Stdin keystroke source feeding a simulated console
//!
//! New backends implement `joust_common::hal::driver::Hardware` and are
//! added to [`register_all_drivers`].

pub mod console;
pub mod simulation;

use crate::driver_registry::DriverRegistry;
use tracing::warn;

/// Register every built-in backend.
pub fn register_all_drivers(registry: &mut DriverRegistry) {
    if let Err(e) = registry.register("simulation", simulation::create_driver) {
        warn!("Skipping simulation driver: {e}");
    }
}
