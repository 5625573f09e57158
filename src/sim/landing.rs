use crate::config::LandingConfig;
use crate::dynamics::Body;
use crate::planet::Planet;

// ---------------------------------------------------------------------------
// Landing state machine helpers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightState {
    Flying,
    /// Touched down within tolerance. The simulation pauses.
    Landed,
    /// Hit the ground too hard. Controls are dead; debris keeps flying.
    Crashed,
}

impl FlightState {
    pub fn label(self) -> &'static str {
        match self {
            FlightState::Flying => "FLYING",
            FlightState::Landed => "LANDED",
            FlightState::Crashed => "CRASHED",
        }
    }
}

/// Speed toward the planet centre, km/s. Positive while descending.
pub fn descent_rate(planet: &Planet, body: &Body) -> f64 {
    -body.vel.dot(&planet.radial(&body.pos))
}

/// Horizontal speed relative to the rotating ground beneath, km/s.
pub fn ground_speed(planet: &Planet, body: &Body) -> f64 {
    let horizontal = body.vel + planet.radial(&body.pos) * descent_rate(planet, body);
    (horizontal - planet.surface_velocity_at(&body.pos)).norm()
}

/// Both components must be within tolerance; equality counts as soft.
pub fn is_soft_landing(descent_rate: f64, ground_speed: f64, tol: &LandingConfig) -> bool {
    descent_rate <= tol.max_descent_rate && ground_speed <= tol.max_ground_speed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::planet::Terrain;
    use nalgebra::Vector3;

    fn mars() -> Planet {
        let cfg = SimConfig::default();
        Planet::new(&cfg.planet, Terrain::new(cfg.planet.radius, &cfg.terrain, 5))
    }

    #[test]
    fn descent_rate_sign() {
        let p = mars();
        let mut b = Body::new(Vector3::new(3390.0, 0.0, 0.0), 200.0, 2e-4);
        b.vel = Vector3::new(-0.01, 0.0, 0.0);
        assert!((descent_rate(&p, &b) - 0.01).abs() < 1e-15);
        b.vel = Vector3::new(0.02, 0.0, 0.0);
        assert!(descent_rate(&p, &b) < 0.0, "climbing is negative descent");
    }

    #[test]
    fn ground_speed_ignores_vertical_motion() {
        let p = mars();
        let pos = Vector3::new(3390.0, 0.0, 0.0);
        let mut b = Body::new(pos, 200.0, 2e-4);
        // Co-rotating with the ground while falling straight down.
        b.vel = p.surface_velocity_at(&pos) + Vector3::new(-0.3, 0.0, 0.0);
        assert!(ground_speed(&p, &b) < 1e-12);
    }

    #[test]
    fn ground_speed_counts_planet_rotation() {
        let p = mars();
        let pos = Vector3::new(3390.0, 0.0, 0.0);
        let b = Body::new(pos, 200.0, 2e-4);
        // Inertially at rest over the equator: the ground slides underneath.
        let expected = p.surface_velocity_at(&pos).norm();
        assert!((ground_speed(&p, &b) - expected).abs() < 1e-15);
        assert!(expected > 0.2);
    }

    #[test]
    fn soft_landing_boundaries() {
        let tol = LandingConfig::default();
        assert!(is_soft_landing(0.001, 0.001, &tol), "exactly at tolerance is soft");
        assert!(is_soft_landing(-0.5, 0.0, &tol));
        assert!(!is_soft_landing(0.0011, 0.0, &tol));
        assert!(!is_soft_landing(0.0, 0.0011, &tol));
        assert!(!is_soft_landing(0.002, 0.002, &tol));
    }
}
