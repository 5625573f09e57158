pub mod event;
pub mod integrator;
pub mod landing;
pub mod panel;
pub mod runner;
pub mod scenario;
pub mod telemetry;

pub use event::{EventKind, EventLog, FlightEvent};
pub use landing::FlightState;
pub use panel::{ControlPanel, FrameDriver, ManualInput};
pub use runner::{Debris, Simulation};
pub use scenario::{CustomScenario, Scenario, ScenarioError, CUSTOM_SCENARIO, SCENARIO_NAMES};
pub use telemetry::Telemetry;
