//! Hardware abstraction layer interfaces.
//!
//! The core treats every actuator write, sensor read and bus transfer as a
//! synchronous, non-blocking one-shot call through the traits in
//! [`driver`]. Concrete backends live in `joust_hal`.

pub mod driver;
pub mod types;
