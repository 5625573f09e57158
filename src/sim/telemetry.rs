use nalgebra::Vector3;

use super::landing::{descent_rate, ground_speed, FlightState};
use super::runner::Simulation;
use crate::orbital;
use crate::physics::gravity_force;
use crate::vehicle::ParachuteStatus;

// ---------------------------------------------------------------------------
// Telemetry snapshot
// ---------------------------------------------------------------------------

/// Read-only view of the simulation for displays and scripts.
///
/// Speeds are km/s, distances km, forces kN.
#[derive(Debug, Clone, PartialEq)]
pub struct Telemetry {
    pub time: f64,
    pub timestep: f64,
    pub scenario_id: usize,
    pub paused: bool,
    pub landed: bool,
    pub crashed: bool,
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub altitude: f64,
    pub speed: f64,
    pub surface_speed: f64,
    pub ground_speed: f64,
    pub descent_rate: f64,
    pub delta_v: f64,
    pub max_delta_v: f64,
    pub max_thrust: f64,
    pub weight: f64,
    pub mass: f64,
    pub fuel_level: f64,
    pub me_throttle: f64,
    pub rcs_throttle: f64,
    pub parachute: ParachuteStatus,
    pub periapsis_alt: f64,
    pub apoapsis_alt: f64,
    pub me_manual_control: bool,
    pub rcs_manual_control: bool,
}

impl Default for Telemetry {
    fn default() -> Self {
        Self {
            time: 0.0,
            timestep: 0.0,
            scenario_id: 0,
            paused: false,
            landed: false,
            crashed: false,
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
            altitude: 0.0,
            speed: 0.0,
            surface_speed: 0.0,
            ground_speed: 0.0,
            descent_rate: 0.0,
            delta_v: 0.0,
            max_delta_v: 0.0,
            max_thrust: 0.0,
            weight: 0.0,
            mass: 0.0,
            fuel_level: 0.0,
            me_throttle: 0.0,
            rcs_throttle: 0.0,
            parachute: ParachuteStatus::Stowed,
            periapsis_alt: 0.0,
            apoapsis_alt: 0.0,
            me_manual_control: false,
            rcs_manual_control: false,
        }
    }
}

impl Telemetry {
    pub fn capture(sim: &Simulation) -> Self {
        let planet = &sim.planet;
        let lander = &sim.lander;
        let body = &lander.body;
        let radius = planet.radius();

        Self {
            time: sim.time,
            timestep: sim.timestep,
            scenario_id: sim.scenario_id,
            paused: sim.paused,
            landed: sim.state == FlightState::Landed,
            crashed: sim.state == FlightState::Crashed,
            position: body.pos,
            velocity: body.vel,
            altitude: planet.altitude(&body.pos, lander.base_offset()),
            speed: body.vel.norm(),
            surface_speed: (body.vel - planet.surface_velocity_at(&body.pos)).norm(),
            ground_speed: ground_speed(planet, body),
            descent_rate: descent_rate(planet, body),
            delta_v: lander.delta_v(),
            max_delta_v: lander.max_delta_v(),
            max_thrust: lander.max_thrust(),
            weight: gravity_force(&planet.body, body).norm(),
            mass: body.mass,
            fuel_level: lander.attrs.fuel_level,
            me_throttle: lander.attrs.me_throttle,
            rcs_throttle: lander.attrs.rcs_throttle,
            parachute: lander.attrs.parachute,
            periapsis_alt: orbital::periapsis_radius(&planet.body, body) - radius,
            apoapsis_alt: orbital::apoapsis_radius(&planet.body, body) - radius,
            me_manual_control: sim.me_manual_control,
            rcs_manual_control: sim.rcs_manual_control,
        }
    }
}
