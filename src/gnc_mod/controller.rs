use crate::sim::Simulation;

/// Trait for flight programs driven once per simulation tick.
///
/// Implement this to plug a custom autopilot into [`Simulation::step`].
/// A controller acts through the simulation's actuation API and may append
/// human-readable lines to the message log.
pub trait Controller {
    /// Run one control step against the current state.
    fn control(&mut self, sim: &mut Simulation, log: &mut Vec<String>);

    /// False once the program has been unloaded or never loaded.
    fn is_ready(&self) -> bool {
        true
    }

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}
