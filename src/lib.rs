pub mod autopilot;
pub mod config;
pub mod dynamics;
mod gnc_mod;
pub mod io;
pub mod noise;
pub mod orbital;
pub mod physics;
pub mod planet;
pub mod sim;
pub mod vehicle;

// The gnc module: expose gnc_mod as `gnc` publicly
pub mod gnc {
    pub use crate::gnc_mod::*;
}

pub use autopilot::{Autopilot, AutopilotError};
pub use config::{ConfigError, SimConfig};
pub use sim::{ControlPanel, ManualInput, Simulation, Telemetry};
