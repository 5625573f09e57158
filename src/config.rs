//! Simulation configuration: planet, terrain, lander, landing tolerances.
//!
//! Every section has defaults matching the built-in Mars lander, so a TOML
//! file only needs to name the values it changes.

use std::f64::consts::PI;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::physics::Atmosphere;

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub timestep: f64,          // s
    pub updates_per_frame: f64, // physics ticks per displayed frame
    /// Seed for terrain/wind noise and debris scatter. `None` seeds from entropy.
    pub seed: Option<u64>,
    pub planet: PlanetConfig,
    pub terrain: TerrainConfig,
    pub lander: LanderConfig,
    pub landing: LandingConfig,
    pub debris: DebrisConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            timestep: 1.0 / 60.0,
            updates_per_frame: 1.0,
            seed: None,
            planet: PlanetConfig::default(),
            terrain: TerrainConfig::default(),
            lander: LanderConfig::default(),
            landing: LandingConfig::default(),
            debris: DebrisConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlanetConfig {
    pub radius: f64,           // km
    pub mass: f64,             // kg
    pub day: f64,              // s, sidereal rotation period
    pub drag_coefficient: f64, // Cd used for the lander
    pub atmosphere: Atmosphere,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            radius: 3386.0,
            mass: 6.42e23,
            day: 88_642.65,
            drag_coefficient: 1.0,
            atmosphere: Atmosphere::default(),
        }
    }
}

impl PlanetConfig {
    /// Spin rate about the planet's +Y axis, rad/s.
    pub fn spin_rate(&self) -> f64 {
        2.0 * PI / self.day
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    pub height_amplitude: f64, // km
    pub height_cell: f64,      // km
    pub height_octaves: u32,
    pub color_cell: f64,       // km
    pub wind_speed_amplitude: f64, // km/s
    pub wind_speed_cell: f64,  // s
    pub wind_direction_cell: f64, // s
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            height_amplitude: 0.2,
            height_cell: 2.0,
            height_octaves: 3,
            color_cell: 400.0,
            wind_speed_amplitude: 0.05, // 50 m/s
            wind_speed_cell: 10.0,
            wind_direction_cell: 100.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LanderConfig {
    pub dry_mass: f64,         // kg
    pub fuel_capacity: f64,    // volume units
    pub fuel_density: f64,     // kg per volume unit
    pub me_max_fuel_rate: f64, // kg/s
    pub me_exhaust_vel: f64,   // km/s
    pub rcs_max_fuel_rate: f64,
    pub rcs_exhaust_vel: f64,
    pub frontal_area: f64,     // km^2
    pub parachute_area_factor: f64,
    pub parachute_max_speed: f64, // km/s, ground-relative
    pub base_offset: f64,      // km, base to centre of mass
}

impl Default for LanderConfig {
    fn default() -> Self {
        Self {
            dry_mass: 150.0,
            fuel_capacity: 50.0,
            fuel_density: 1.0,
            me_max_fuel_rate: 0.5,
            me_exhaust_vel: 3.0,
            rcs_max_fuel_rate: 0.1,
            rcs_exhaust_vel: 2.0,
            frontal_area: PI * 0.001 * 0.001, // 1 m radius
            parachute_area_factor: 5.0,
            parachute_max_speed: 0.5,
            base_offset: 0.0007,
        }
    }
}

/// Touchdown tolerances and crash response.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LandingConfig {
    pub max_descent_rate: f64, // km/s
    pub max_ground_speed: f64, // km/s
    pub crash_kick: f64,       // fraction of descent rate returned outward
    pub crash_spin: f64,       // rad/s about body X
}

impl Default for LandingConfig {
    fn default() -> Self {
        Self {
            max_descent_rate: 0.001,
            max_ground_speed: 0.001,
            crash_kick: 1.05,
            crash_spin: 2.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DebrisConfig {
    pub count: usize,
    pub mass: f64,
    pub scatter: f64, // fraction of descent rate
    pub spin: f64,    // rad/s
}

impl Default for DebrisConfig {
    fn default() -> Self {
        Self {
            count: 3,
            mass: 1.0,
            scatter: 0.5,
            spin: 10.0,
        }
    }
}

impl SimConfig {
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = toml::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reject values that would break integrator or body invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("timestep", self.timestep),
            ("planet.radius", self.planet.radius),
            ("planet.mass", self.planet.mass),
            ("planet.day", self.planet.day),
            ("planet.atmosphere.scale_height", self.planet.atmosphere.scale_height),
            ("terrain.height_cell", self.terrain.height_cell),
            ("terrain.color_cell", self.terrain.color_cell),
            ("terrain.wind_speed_cell", self.terrain.wind_speed_cell),
            ("terrain.wind_direction_cell", self.terrain.wind_direction_cell),
            ("lander.dry_mass", self.lander.dry_mass),
            ("lander.frontal_area", self.lander.frontal_area),
            ("debris.mass", self.debris.mass),
        ];
        for (name, value) in positive {
            if !(value > 0.0) || !value.is_finite() {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }
        if self.lander.fuel_capacity < 0.0 || self.lander.fuel_density < 0.0 {
            return Err(ConfigError::Invalid("lander fuel must be non-negative".into()));
        }
        if !(0.25..=2048.0).contains(&self.updates_per_frame) {
            return Err(ConfigError::Invalid(format!(
                "updates_per_frame must be within [0.25, 2048], got {}",
                self.updates_per_frame
            )));
        }
        if self.landing.max_descent_rate < 0.0 || self.landing.max_ground_speed < 0.0 {
            return Err(ConfigError::Invalid("landing tolerances must be non-negative".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        SimConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = SimConfig::from_toml_str(
            r#"
            timestep = 0.02
            seed = 7

            [landing]
            max_descent_rate = 0.002

            [planet.atmosphere]
            scale_height = 12.5
            "#,
        )
        .unwrap();
        assert_eq!(cfg.timestep, 0.02);
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.landing.max_descent_rate, 0.002);
        assert_eq!(cfg.landing.max_ground_speed, 0.001);
        assert_eq!(cfg.planet.atmosphere.scale_height, 12.5);
        assert_eq!(cfg.planet.atmosphere.ceiling, 200.0);
        assert_eq!(cfg.lander.dry_mass, 150.0);
    }

    #[test]
    fn rejects_non_positive_timestep() {
        let err = SimConfig::from_toml_str("timestep = 0.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)), "got {err}");
    }

    #[test]
    fn rejects_bad_syntax() {
        let err = SimConfig::from_toml_str("timestep = = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[debris]\ncount = 5").unwrap();
        let cfg = SimConfig::load(file.path()).unwrap();
        assert_eq!(cfg.debris.count, 5);
    }

    #[test]
    fn bundled_mars_config_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/mars.toml");
        let cfg = SimConfig::load(path).unwrap();
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.planet.radius, SimConfig::default().planet.radius);
        assert_eq!(cfg.debris.count, 3);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SimConfig::load("/nonexistent/lander.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
