//! Service state machines.
//!
//! | Service       | Module        | Drives                              |
//! |---------------|---------------|-------------------------------------|
//! | Match         | `match_ctl`   | rounds, indicators, orchestration   |
//! | Command       | `command`     | referee bus polling                 |
//! | Aim           | `aim`         | turret sweep and beacon alignment   |
//! | Fire          | `fire`        | feeder servo and launcher wheels    |
//! | Lance         | `lance`       | lance servo                         |
//! | Orientation   | `orientation` | tape homing moves                   |
//! | Reload        | `reload`      | IR reload request bursts            |
//! | Drive         | `drive`       | timed straight moves                |

pub mod aim;
pub mod command;
pub mod drive;
pub mod fire;
pub mod lance;
pub mod match_ctl;
pub mod orientation;
pub mod reload;

pub use aim::{AimPhase, AimService};
pub use command::CommandService;
pub use drive::DriveService;
pub use fire::FireService;
pub use lance::{LancePhase, LanceService};
pub use match_ctl::{MatchController, MatchPhase};
pub use orientation::OrientationService;
pub use reload::ReloadService;
