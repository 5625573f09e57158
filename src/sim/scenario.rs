use nalgebra::Vector3;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Scenario presets
// ---------------------------------------------------------------------------

pub const CUSTOM_SCENARIO: usize = 8;

pub const SCENARIO_NAMES: [&str; 9] = [
    "Circular orbit",
    "10 km descent",
    "Elliptical polar orbit",
    "Polar launch at escape velocity",
    "Atmosphere-clipping orbit",
    "200 km descent",
    "Areostationary orbit",
    "Inclined elliptical orbit",
    "Custom",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScenarioError {
    #[error("unknown scenario {0} (expected 0..=8)")]
    Unknown(usize),
}

/// How the lander is oriented when the scenario starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttitudeRule {
    /// Body +Y against the velocity.
    Retrograde,
    /// Body +Y away from the planet centre.
    RadialOut,
    /// Leave the current orientation alone.
    Keep,
}

/// User-supplied initial state for the custom scenario.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CustomScenario {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

impl Default for CustomScenario {
    fn default() -> Self {
        Self { position: Vector3::zeros(), velocity: Vector3::zeros() }
    }
}

/// Initial lander state for one run. The planet always starts at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scenario {
    pub id: usize,
    pub name: &'static str,
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub attitude: AttitudeRule,
}

impl Scenario {
    /// Look up preset `id` for a planet of the given radius (km).
    pub fn preset(id: usize, radius: f64, custom: &CustomScenario) -> Result<Self, ScenarioError> {
        use AttitudeRule::*;
        let r = radius;
        let (position, velocity, attitude) = match id {
            0 => (Vector3::new(1.2 * r, 0.0, 0.0), Vector3::new(0.0, 0.0, -3.247_087_4), Retrograde),
            1 => (Vector3::new(r + 10.0, 0.0, 0.0), Vector3::zeros(), RadialOut),
            2 => (Vector3::new(0.0, 1.2 * r, 0.0), Vector3::new(3.5, 0.0, 0.0), Retrograde),
            3 => (Vector3::new(0.0, r + 0.001, 0.0), Vector3::new(0.0, 5.027, 0.0), RadialOut),
            4 => (Vector3::new(0.0, 0.0, r + 100.0), Vector3::new(4.0, 0.0, 0.0), Retrograde),
            5 => (Vector3::new(r + 200.0, 0.0, 0.0), Vector3::zeros(), RadialOut),
            6 => (Vector3::new(20_426.976, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.447_866), Retrograde),
            7 => (Vector3::new(1.2 * r, 0.0, 0.0), Vector3::new(0.0, 2.5, -2.5), Retrograde),
            CUSTOM_SCENARIO => {
                // The origin is the planet centre; nudge off it.
                let position = if custom.position.norm() > 1e-8 {
                    custom.position
                } else {
                    Vector3::new(1.0, 1.0, 1.0)
                };
                (position, custom.velocity, Keep)
            }
            _ => return Err(ScenarioError::Unknown(id)),
        };
        Ok(Self { id, name: SCENARIO_NAMES[id], position, velocity, attitude })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const R: f64 = 3386.0;

    #[test]
    fn all_presets_resolve() {
        for id in 0..=CUSTOM_SCENARIO {
            let s = Scenario::preset(id, R, &CustomScenario::default()).unwrap();
            assert_eq!(s.id, id);
            assert_eq!(s.name, SCENARIO_NAMES[id]);
        }
    }

    #[test]
    fn unknown_id_is_an_error() {
        let err = Scenario::preset(9, R, &CustomScenario::default()).unwrap_err();
        assert_eq!(err, ScenarioError::Unknown(9));
        assert!(err.to_string().contains("0..=8"));
    }

    #[test]
    fn descent_presets_point_up() {
        let s = Scenario::preset(1, R, &CustomScenario::default()).unwrap();
        assert_eq!(s.position, Vector3::new(R + 10.0, 0.0, 0.0));
        assert_eq!(s.velocity, Vector3::zeros());
        assert_eq!(s.attitude, AttitudeRule::RadialOut);
    }

    #[test]
    fn custom_zero_position_is_nudged() {
        let custom = CustomScenario { position: Vector3::zeros(), velocity: Vector3::new(0.1, 0.0, 0.0) };
        let s = Scenario::preset(CUSTOM_SCENARIO, R, &custom).unwrap();
        assert_eq!(s.position, Vector3::new(1.0, 1.0, 1.0));
        assert_eq!(s.velocity, custom.velocity);
        assert_eq!(s.attitude, AttitudeRule::Keep);
    }

    #[test]
    fn custom_position_is_used() {
        let custom = CustomScenario { position: Vector3::new(0.0, 0.0, 5000.0), velocity: Vector3::zeros() };
        let s = Scenario::preset(CUSTOM_SCENARIO, R, &custom).unwrap();
        assert_eq!(s.position, custom.position);
    }
}
