//! Driver registry for hardware backends.
//!
//! Constructed at startup, populated via `register()`, and queried by name.
//! No global state.

use joust_common::hal::driver::{DriverFactory, HalError, Hardware};
use std::collections::HashMap;

/// Registry of available hardware backends.
pub struct DriverRegistry {
    factories: HashMap<&'static str, DriverFactory>,
}

impl DriverRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry pre-populated with every built-in backend.
    pub fn with_builtin() -> Self {
        let mut reg = Self::new();
        crate::drivers::register_all_drivers(&mut reg);
        reg
    }

    /// Register a backend factory.
    ///
    /// # Errors
    /// `HalError::InitFailed` if a backend with the same name is already registered.
    pub fn register(&mut self, name: &'static str, factory: DriverFactory) -> Result<(), HalError> {
        if self.factories.contains_key(name) {
            return Err(HalError::InitFailed(format!(
                "driver '{name}' is already registered"
            )));
        }
        self.factories.insert(name, factory);
        Ok(())
    }

    /// Create a backend instance by name.
    ///
    /// # Errors
    /// `HalError::DriverNotFound` if no backend with the given name is registered.
    pub fn create(&self, name: &str) -> Result<Box<dyn Hardware>, HalError> {
        let factory = self
            .factories
            .get(name)
            .copied()
            .ok_or_else(|| HalError::DriverNotFound(name.to_string()))?;
        Ok(factory())
    }

    /// All registered backend names, sorted.
    pub fn list_drivers(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::new()
    }
}
