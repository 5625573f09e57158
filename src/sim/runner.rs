use log::{debug, info, warn};
use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::integrator;
use super::landing::{descent_rate, ground_speed, is_soft_landing, FlightState};
use super::panel::{ControlPanel, FrameDriver, ManualInput, THROTTLE_STEP};
use super::scenario::{AttitudeRule, CustomScenario, Scenario, ScenarioError};
use crate::autopilot::{Command, Reference};
use crate::config::{DebrisConfig, LandingConfig, SimConfig};
use crate::dynamics::Body;
use crate::gnc::{Controller, FlightComputer};
use crate::physics::{drag_force, gravity_force};
use crate::planet::{Planet, Terrain};
use crate::vehicle::{Lander, LanderVisual, ParachuteStatus};

const SUN_MASS: f64 = 1.989e30;
/// The sun sits far out along +X, in planet radii.
const SUN_DISTANCE: f64 = 500.0;

/// A pooled fragment thrown off in a crash.
#[derive(Debug, Clone)]
pub struct Debris {
    pub body: Body,
    pub active: bool,
}

// ---------------------------------------------------------------------------
// Simulation context
// ---------------------------------------------------------------------------

/// The whole simulated world and its clock.
pub struct Simulation {
    pub time: f64,
    pub timestep: f64,
    pub paused: bool,
    pub state: FlightState,
    pub scenario_id: usize,
    pub planet: Planet,
    pub lander: Lander,
    /// Static light source, for display.
    pub sun: Body,
    pub debris: Vec<Debris>,
    pub flight_computer: FlightComputer,
    pub me_manual_control: bool,
    pub rcs_manual_control: bool,
    landing: LandingConfig,
    debris_cfg: DebrisConfig,
    rng: StdRng,
}

impl Simulation {
    /// Build the world from `config` and start scenario 0.
    pub fn new(config: &SimConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        let radius = config.planet.radius;
        let terrain = Terrain::new(radius, &config.terrain, seed);
        let planet = Planet::new(&config.planet, terrain);

        let debris_mass = config.debris.mass;
        let debris = (0..config.debris.count)
            .map(|_| Debris {
                body: Body::new(Vector3::zeros(), debris_mass, debris_mass * 1e-6),
                active: false,
            })
            .collect();

        let mut sim = Self {
            time: 0.0,
            timestep: config.timestep,
            paused: false,
            state: FlightState::Flying,
            scenario_id: 0,
            planet,
            lander: Lander::new(&config.lander),
            sun: Body::new(Vector3::new(SUN_DISTANCE * radius, 0.0, 0.0), SUN_MASS, 1.0),
            debris,
            flight_computer: FlightComputer::new(),
            me_manual_control: false,
            rcs_manual_control: false,
            landing: config.landing.clone(),
            debris_cfg: config.debris.clone(),
            rng: StdRng::seed_from_u64(seed ^ 0xD3B2_15A7),
        };
        if let Ok(scenario) = Scenario::preset(0, radius, &CustomScenario::default()) {
            sim.start(scenario);
        }
        sim
    }

    /// Reset everything and start scenario `id`.
    pub fn set_scenario(&mut self, id: usize, custom: &CustomScenario) -> Result<(), ScenarioError> {
        let scenario = Scenario::preset(id, self.planet.radius(), custom)?;
        self.start(scenario);
        Ok(())
    }

    fn start(&mut self, scenario: Scenario) {
        debug!("Switching to scenario {} ({})", scenario.id, scenario.name);

        self.lander.reset_attributes();
        self.time = 0.0;
        self.state = FlightState::Flying;
        self.scenario_id = scenario.id;
        self.me_manual_control = false;
        self.rcs_manual_control = false;
        self.flight_computer.reset();

        for d in self.debris.iter_mut() {
            d.active = false;
            integrator::reset(&mut d.body);
        }

        self.planet.reset();

        let body = &mut self.lander.body;
        body.pos = scenario.position;
        body.vel = scenario.velocity;
        body.omega = Vector3::zeros();
        body.clear_loads();
        match scenario.attitude {
            AttitudeRule::Retrograde => body.orient_towards(&-scenario.velocity),
            AttitudeRule::RadialOut => body.orient_towards(&(scenario.position - self.planet.body.pos)),
            AttitudeRule::Keep => {}
        }
        integrator::reset(body);
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Advance the world by one fixed timestep.
    ///
    /// Order: scenario switch, pause gate, ground contact, force setup,
    /// controls (autopilot, then manual input), engines, integration, clock.
    pub fn step<'c>(
        &mut self,
        panel: &mut ControlPanel,
        input: &ManualInput,
        controller: Option<&mut (dyn Controller + 'c)>,
    ) {
        if panel.scenario_changed {
            panel.scenario_changed = false;
            if let Err(e) = self.set_scenario(panel.selected_scenario, &panel.custom_scenario) {
                warn!("{}", e);
                panel.message_log.push(format!("[INFO] {}", e));
            }
        }
        self.paused = panel.paused;
        if self.paused {
            return;
        }

        self.check_contact();

        let dt = self.timestep;
        self.apply_environment_loads();

        self.lander.attrs.rcs_throttle = 0.0;
        if self.state != FlightState::Crashed {
            if panel.autopilot_active {
                if let Some(ctrl) = controller {
                    if ctrl.is_ready() {
                        ctrl.control(self, &mut panel.message_log);
                    }
                }
            }
            if !panel.lock_manual_controls {
                self.apply_manual_input(input);
            }
            self.lander.fire_engines(dt);
        }

        integrator::advance(&mut self.planet.body, dt);
        integrator::advance(&mut self.lander.body, dt);
        for d in self.debris.iter_mut().filter(|d| d.active) {
            d.body.clear_loads();
            d.body.net_force = gravity_force(&self.planet.body, &d.body);
            integrator::advance(&mut d.body, dt);
        }

        self.time += dt;
        panel.paused = self.paused;
    }

    /// Gravity and drag on the lander, replacing last tick's loads.
    fn apply_environment_loads(&mut self) {
        let pos = self.lander.body.pos;
        let wind = self.planet.wind_velocity_at(&pos, self.time);
        let density = self.planet.density_at(&pos);

        let gravity = gravity_force(&self.planet.body, &self.lander.body);
        let drag = drag_force(
            &self.lander.body.vel,
            &wind,
            density,
            self.planet.drag_coefficient,
            self.lander.attrs.frontal_area,
        );

        let body = &mut self.lander.body;
        body.clear_loads();
        body.net_force += gravity + drag;
    }

    // -----------------------------------------------------------------------
    // Ground contact
    // -----------------------------------------------------------------------

    /// Resolve contact with the terrain. Returns true when touching.
    pub fn check_contact(&mut self) -> bool {
        let pos = self.lander.body.pos;
        let contact = self.planet.contact_distance(&pos, self.lander.base_offset());
        if (pos - self.planet.body.pos).norm() > contact {
            return false;
        }

        self.lander.body.pos = self.planet.body.pos + self.planet.radial(&pos) * contact;
        integrator::reset(&mut self.lander.body);

        // A wreck back on the ground comes to rest with the surface.
        if self.state == FlightState::Crashed {
            self.lander.body.vel = self.planet.surface_velocity_at(&self.lander.body.pos);
            return true;
        }

        let dr = descent_rate(&self.planet, &self.lander.body);
        let gs = ground_speed(&self.planet, &self.lander.body);
        if is_soft_landing(dr, gs, &self.landing) {
            info!("Touchdown at t={:.2}s: descent {:.5} km/s, ground {:.5} km/s", self.time, dr, gs);
            self.state = FlightState::Landed;
            self.paused = true;
            self.lander.cut_parachute();
        } else {
            info!("Crash at t={:.2}s: descent {:.5} km/s, ground {:.5} km/s", self.time, dr, gs);
            self.crash(dr);
        }
        true
    }

    fn crash(&mut self, dr: f64) {
        self.state = FlightState::Crashed;
        self.lander.visual = LanderVisual::Crashed;

        let up = self.planet.radial(&self.lander.body.pos);
        let body = &mut self.lander.body;
        body.vel += up * dr * self.landing.crash_kick;
        body.omega = Vector3::new(self.landing.crash_spin, 0.0, 0.0);
        integrator::reset(body);

        let origin = body.pos;
        let base_vel = body.vel;
        for i in 0..self.debris.len() {
            let scatter = self.debris_cfg.scatter * dr * random_unit(&mut self.rng);
            let spin = self.debris_cfg.spin * random_unit(&mut self.rng);
            let d = &mut self.debris[i];
            d.body.pos = origin;
            d.body.vel = base_vel + scatter;
            d.body.omega = spin;
            d.body.quat = self.lander.body.quat;
            d.body.clear_loads();
            integrator::reset(&mut d.body);
            d.active = true;
        }
    }

    // -----------------------------------------------------------------------
    // Actuation
    // -----------------------------------------------------------------------

    fn apply_manual_input(&mut self, input: &ManualInput) {
        self.rcs_manual_control = false;
        if input.rcs_axis.norm() > 1e-8 {
            self.lander.setup_rcs(input.rcs_axis, 1.0);
            self.rcs_manual_control = true;
        }

        self.me_manual_control = false;
        if input.throttle_up {
            self.lander.setup_main_engine(self.lander.attrs.me_throttle + THROTTLE_STEP);
            self.me_manual_control = true;
        }
        if input.throttle_down {
            self.lander.setup_main_engine(self.lander.attrs.me_throttle - THROTTLE_STEP);
            self.me_manual_control = true;
        }

        if input.deploy_parachute && self.lander.attrs.parachute == ParachuteStatus::Stowed {
            self.deploy_parachute();
        }
    }

    pub fn deploy_parachute(&mut self) {
        let surface = self.planet.surface_velocity_at(&self.lander.body.pos);
        let speed = (self.lander.body.vel - surface).norm();
        self.lander.deploy_parachute(speed);
    }

    /// World-frame direction for an attitude hold.
    pub fn reference_direction(&self, reference: Reference) -> Vector3<f64> {
        let body = &self.lander.body;
        let r = body.pos - self.planet.body.pos;
        let v_surf = body.vel - self.planet.surface_velocity_at(&body.pos);
        match reference {
            Reference::Prograde => body.vel,
            Reference::Retrograde => -body.vel,
            Reference::Normal => body.vel.cross(&r),
            Reference::Antinormal => -body.vel.cross(&r),
            Reference::Radial => r,
            Reference::Antiradial => -r,
            Reference::SurfacePrograde => v_surf,
            Reference::SurfaceRetrograde => -v_surf,
        }
    }

    /// Apply one queued autopilot request.
    pub fn apply_command(&mut self, cmd: Command, log: &mut Vec<String>) {
        let dt = self.timestep;
        match cmd {
            Command::MaintainAttitude => self.flight_computer.stabilize(&mut self.lander, dt),
            Command::Hold(reference) => {
                let target = self.reference_direction(reference);
                self.flight_computer.hold(&mut self.lander, &target, dt);
            }
            Command::SetMainEngineThrottle(x) => self.lander.setup_main_engine(x),
            Command::MaintainSurfaceVelocity(target) => {
                let surface = self.planet.surface_velocity_at(&self.lander.body.pos);
                self.flight_computer
                    .hold_surface_velocity(&mut self.lander, &surface, target, dt);
            }
            Command::DeployParachute => self.deploy_parachute(),
            Command::Info(msg) => log.push(format!("[{:.6}] {}", self.time, msg)),
            Command::Pause => self.paused = true,
        }
    }

    /// Run as many ticks as the frame driver grants for one displayed frame.
    pub fn run_frame<'c>(
        &mut self,
        panel: &mut ControlPanel,
        input: &ManualInput,
        driver: &mut FrameDriver,
        mut controller: Option<&mut (dyn Controller + 'c)>,
    ) -> usize {
        let ticks = driver.ticks_for_frame(panel.updates_per_frame);
        for _ in 0..ticks {
            self.step(panel, input, controller.as_deref_mut());
        }
        ticks
    }
}

/// Uniformly random direction in the positive octant.
fn random_unit(rng: &mut StdRng) -> Vector3<f64> {
    let v = Vector3::new(rng.gen::<f64>(), rng.gen::<f64>(), rng.gen::<f64>());
    if v.norm() < 1e-12 {
        return Vector3::new(1.0, 1.0, 1.0).normalize();
    }
    v.normalize()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
