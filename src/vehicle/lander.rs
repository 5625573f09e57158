use nalgebra::Vector3;

use crate::config::LanderConfig;
use crate::dynamics::Body;

// ---------------------------------------------------------------------------
// Lander attributes
// ---------------------------------------------------------------------------

/// Scalar moment of inertia per kg, assuming a body radius of about 1 m.
const INERTIA_PER_KG: f64 = 1e-6; // km^2
/// RCS thrusters sit about 1 m from the centre of mass.
const RCS_LEVER_ARM: f64 = 1e-3; // km

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParachuteStatus {
    Stowed,
    Deployed,
    Destroyed,
}

impl ParachuteStatus {
    pub fn as_f64(self) -> f64 {
        match self {
            ParachuteStatus::Stowed => 0.0,
            ParachuteStatus::Deployed => 1.0,
            ParachuteStatus::Destroyed => 2.0,
        }
    }
}

/// Which model the renderer should draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanderVisual {
    Intact,
    Crashed,
}

/// Engine, fuel and parachute state of the lander.
#[derive(Debug, Clone)]
pub struct LanderAttributes {
    pub dry_mass: f64,         // kg
    pub fuel_level: f64,       // 0 empty .. 1 full
    pub fuel_density: f64,
    pub fuel_capacity: f64,
    pub me_max_fuel_rate: f64, // kg/s
    pub me_exhaust_vel: f64,   // km/s
    pub me_throttle: f64,      // 0..1
    pub rcs_max_fuel_rate: f64,
    pub rcs_exhaust_vel: f64,
    pub rcs_throttle: f64,     // -1..1
    pub rcs_axis: Vector3<f64>, // body frame
    pub frontal_area: f64,     // km^2
    pub parachute: ParachuteStatus,
}

impl LanderAttributes {
    pub fn from_config(cfg: &LanderConfig) -> Self {
        Self {
            dry_mass: cfg.dry_mass,
            fuel_level: 1.0,
            fuel_density: cfg.fuel_density,
            fuel_capacity: cfg.fuel_capacity,
            me_max_fuel_rate: cfg.me_max_fuel_rate,
            me_exhaust_vel: cfg.me_exhaust_vel,
            me_throttle: 0.0,
            rcs_max_fuel_rate: cfg.rcs_max_fuel_rate,
            rcs_exhaust_vel: cfg.rcs_exhaust_vel,
            rcs_throttle: 0.0,
            rcs_axis: Vector3::y(),
            frontal_area: cfg.frontal_area,
            parachute: ParachuteStatus::Stowed,
        }
    }

    /// Fuel mass when the tank is full.
    pub fn full_fuel_mass(&self) -> f64 {
        self.fuel_capacity * self.fuel_density
    }
}

/// Generic numeric read access to the lander attributes, for consumers
/// (telemetry tables, display panels) that iterate over them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanderAttribute {
    DryMass,
    FuelLevel,
    FuelDensity,
    FuelCapacity,
    MeMaxFuelRate,
    MeExhaustVel,
    MeThrottle,
    RcsMaxFuelRate,
    RcsExhaustVel,
    RcsThrottle,
    FrontalArea,
    ParachuteStatus,
}

impl LanderAttribute {
    pub const ALL: [LanderAttribute; 12] = [
        LanderAttribute::DryMass,
        LanderAttribute::FuelLevel,
        LanderAttribute::FuelDensity,
        LanderAttribute::FuelCapacity,
        LanderAttribute::MeMaxFuelRate,
        LanderAttribute::MeExhaustVel,
        LanderAttribute::MeThrottle,
        LanderAttribute::RcsMaxFuelRate,
        LanderAttribute::RcsExhaustVel,
        LanderAttribute::RcsThrottle,
        LanderAttribute::FrontalArea,
        LanderAttribute::ParachuteStatus,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LanderAttribute::DryMass => "dry_mass",
            LanderAttribute::FuelLevel => "fuel_level",
            LanderAttribute::FuelDensity => "fuel_density",
            LanderAttribute::FuelCapacity => "fuel_capacity",
            LanderAttribute::MeMaxFuelRate => "me_max_fuel_rate",
            LanderAttribute::MeExhaustVel => "me_exhaust_vel",
            LanderAttribute::MeThrottle => "me_throttle",
            LanderAttribute::RcsMaxFuelRate => "rcs_max_fuel_rate",
            LanderAttribute::RcsExhaustVel => "rcs_exhaust_vel",
            LanderAttribute::RcsThrottle => "rcs_throttle",
            LanderAttribute::FrontalArea => "frontal_area",
            LanderAttribute::ParachuteStatus => "parachute_status",
        }
    }
}

// ---------------------------------------------------------------------------
// Lander
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Lander {
    pub body: Body,
    pub attrs: LanderAttributes,
    pub visual: LanderVisual,
    config: LanderConfig,
}

impl Lander {
    pub fn new(cfg: &LanderConfig) -> Self {
        let attrs = LanderAttributes::from_config(cfg);
        let mass = attrs.dry_mass + attrs.full_fuel_mass();
        let mut lander = Self {
            body: Body::new(Vector3::zeros(), mass, mass * INERTIA_PER_KG),
            attrs,
            visual: LanderVisual::Intact,
            config: cfg.clone(),
        };
        lander.reset_attributes();
        lander
    }

    /// Full tank, engines idle, parachute stowed, intact model.
    pub fn reset_attributes(&mut self) {
        self.attrs = LanderAttributes::from_config(&self.config);
        self.body.mass = self.attrs.dry_mass + self.attrs.fuel_level * self.attrs.full_fuel_mass();
        self.body.inertia = self.body.mass * INERTIA_PER_KG;
        self.visual = LanderVisual::Intact;
    }

    pub fn attribute(&self, which: LanderAttribute) -> f64 {
        let a = &self.attrs;
        match which {
            LanderAttribute::DryMass => a.dry_mass,
            LanderAttribute::FuelLevel => a.fuel_level,
            LanderAttribute::FuelDensity => a.fuel_density,
            LanderAttribute::FuelCapacity => a.fuel_capacity,
            LanderAttribute::MeMaxFuelRate => a.me_max_fuel_rate,
            LanderAttribute::MeExhaustVel => a.me_exhaust_vel,
            LanderAttribute::MeThrottle => a.me_throttle,
            LanderAttribute::RcsMaxFuelRate => a.rcs_max_fuel_rate,
            LanderAttribute::RcsExhaustVel => a.rcs_exhaust_vel,
            LanderAttribute::RcsThrottle => a.rcs_throttle,
            LanderAttribute::FrontalArea => a.frontal_area,
            LanderAttribute::ParachuteStatus => a.parachute.as_f64(),
        }
    }

    /// Distance from the base to the centre of mass, km.
    pub fn base_offset(&self) -> f64 {
        self.config.base_offset
    }

    /// Command the RCS to torque about `axis` (body frame).
    pub fn setup_rcs(&mut self, axis: Vector3<f64>, throttle: f64) {
        self.attrs.rcs_axis = axis;
        self.attrs.rcs_throttle = throttle.clamp(-1.0, 1.0);
    }

    pub fn setup_main_engine(&mut self, throttle: f64) {
        self.attrs.me_throttle = throttle.clamp(0.0, 1.0);
    }

    /// Convert the current engine commands into force and torque on the body
    /// and burn the corresponding fuel over `dt`. Does nothing once the tank
    /// is empty.
    pub fn fire_engines(&mut self, dt: f64) {
        let a = &mut self.attrs;
        if self.body.mass <= a.dry_mass {
            self.body.mass = a.dry_mass;
            return;
        }

        let rcs_thrust = a.rcs_throttle.abs() * a.rcs_max_fuel_rate * a.rcs_exhaust_vel;
        if a.rcs_axis.norm() > 1e-8 {
            self.body.net_torque += RCS_LEVER_ARM * rcs_thrust * a.rcs_axis.normalize();
        }

        let up = self.body.up();
        self.body.net_force += up * (a.me_throttle * a.me_max_fuel_rate * a.me_exhaust_vel);

        let burned = (a.me_throttle * a.me_max_fuel_rate + a.rcs_throttle.abs() * a.rcs_max_fuel_rate) * dt;
        self.body.mass = (self.body.mass - burned).max(a.dry_mass);
        self.body.inertia = self.body.mass * INERTIA_PER_KG;

        let full = a.full_fuel_mass();
        a.fuel_level = if full > 0.0 { (self.body.mass - a.dry_mass) / full } else { 0.0 };
    }

    /// Open the parachute, or lose it if `ground_speed` (ground-relative,
    /// km/s) exceeds what it can survive.
    pub fn deploy_parachute(&mut self, ground_speed: f64) {
        if self.attrs.parachute == ParachuteStatus::Destroyed {
            return;
        }
        if ground_speed > self.config.parachute_max_speed {
            self.cut_parachute();
            return;
        }
        self.attrs.parachute = ParachuteStatus::Deployed;
        self.attrs.frontal_area = self.config.frontal_area * self.config.parachute_area_factor;
    }

    pub fn cut_parachute(&mut self) {
        self.attrs.parachute = ParachuteStatus::Destroyed;
        self.attrs.frontal_area = self.config.frontal_area;
    }

    /// Remaining delta-v from the rocket equation, km/s.
    pub fn delta_v(&self) -> f64 {
        self.attrs.me_exhaust_vel * (self.body.mass / self.attrs.dry_mass).ln()
    }

    /// Delta-v with a full tank, km/s.
    pub fn max_delta_v(&self) -> f64 {
        let full = self.attrs.dry_mass + self.attrs.full_fuel_mass();
        self.attrs.me_exhaust_vel * (full / self.attrs.dry_mass).ln()
    }

    /// Main engine thrust at full throttle, kN.
    pub fn max_thrust(&self) -> f64 {
        self.attrs.me_exhaust_vel * self.attrs.me_max_fuel_rate
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
