use nalgebra::Vector3;

use super::scenario::CustomScenario;

// ---------------------------------------------------------------------------
// GUI exchange: control panel, manual input, frame pacing
// ---------------------------------------------------------------------------

pub const MIN_UPDATES_PER_FRAME: f64 = 0.25;
pub const MAX_UPDATES_PER_FRAME: f64 = 2048.0;

/// Settings the display side hands to the simulation once per tick.
///
/// The simulation consumes `scenario_changed`, may set `paused` (landing,
/// script `PAUSE()`), and appends to `message_log`.
#[derive(Debug, Clone)]
pub struct ControlPanel {
    pub selected_scenario: usize,
    pub scenario_changed: bool,
    pub custom_scenario: CustomScenario,
    pub paused: bool,
    pub updates_per_frame: f64,
    pub autopilot_active: bool,
    pub lock_manual_controls: bool,
    pub message_log: Vec<String>,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            selected_scenario: 0,
            scenario_changed: false,
            custom_scenario: CustomScenario::default(),
            paused: false,
            updates_per_frame: 1.0,
            autopilot_active: false,
            lock_manual_controls: false,
            message_log: Vec::new(),
        }
    }
}

impl ControlPanel {
    /// Request a switch to `id` at the start of the next tick.
    pub fn select_scenario(&mut self, id: usize) {
        self.selected_scenario = id;
        self.scenario_changed = true;
    }

    pub fn speed_up(&mut self) {
        self.updates_per_frame =
            (self.updates_per_frame * 2.0).clamp(MIN_UPDATES_PER_FRAME, MAX_UPDATES_PER_FRAME);
    }

    pub fn slow_down(&mut self) {
        self.updates_per_frame =
            (self.updates_per_frame * 0.5).clamp(MIN_UPDATES_PER_FRAME, MAX_UPDATES_PER_FRAME);
    }
}

/// Pilot input sampled for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManualInput {
    /// Requested rotation axis, body frame. Zero means no RCS command.
    pub rcs_axis: Vector3<f64>,
    pub throttle_up: bool,
    pub throttle_down: bool,
    pub deploy_parachute: bool,
}

impl Default for ManualInput {
    fn default() -> Self {
        Self {
            rcs_axis: Vector3::zeros(),
            throttle_up: false,
            throttle_down: false,
            deploy_parachute: false,
        }
    }
}

/// Main engine throttle change per tick while a throttle key is held.
pub const THROTTLE_STEP: f64 = 0.01;

/// Turns a fractional ticks-per-frame rate into whole ticks.
#[derive(Debug, Clone, Default)]
pub struct FrameDriver {
    pending: f64,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of simulation ticks to run for this displayed frame.
    pub fn ticks_for_frame(&mut self, updates_per_frame: f64) -> usize {
        self.pending += updates_per_frame.clamp(MIN_UPDATES_PER_FRAME, MAX_UPDATES_PER_FRAME);
        let whole = self.pending.floor();
        self.pending -= whole;
        whole as usize
    }
}
