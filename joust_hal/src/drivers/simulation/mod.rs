//! Software robot for bench runs and tests.

mod driver;
mod io;
mod referee;

pub use driver::SimulatedRobot;
pub use io::IoSimulator;
pub use referee::SimReferee;

use joust_common::hal::driver::Hardware;

/// Factory function to create a simulated robot.
pub fn create_driver() -> Box<dyn Hardware> {
    Box::new(SimulatedRobot::new())
}
