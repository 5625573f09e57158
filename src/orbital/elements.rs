use crate::dynamics::{Body, GRAVITY};

// ---------------------------------------------------------------------------
// Two-body orbit quantities of `secondary` about `primary`
// ---------------------------------------------------------------------------
//
// Display only: nothing here feeds back into the integrator. Velocities are
// taken relative to the primary.

/// Total orbital energy, kJ (kg*km^2/s^2): kinetic minus potential.
pub fn orbit_energy(primary: &Body, secondary: &Body) -> f64 {
    let r = (secondary.pos - primary.pos).norm();
    let v = (secondary.vel - primary.vel).norm();
    0.5 * secondary.mass * v * v - GRAVITY * primary.mass * secondary.mass / r
}

/// Orbital energy per unit mass of the secondary, km^2/s^2.
pub fn specific_energy(primary: &Body, secondary: &Body) -> f64 {
    orbit_energy(primary, secondary) / secondary.mass
}

/// Semi-major axis, km. Negative for hyperbolic trajectories, infinite for
/// a parabolic one.
pub fn semi_major_axis(primary: &Body, secondary: &Body) -> f64 {
    -GRAVITY * primary.mass * secondary.mass / (2.0 * orbit_energy(primary, secondary))
}

/// Magnitude of the specific angular momentum, km^2/s.
pub fn angular_momentum(primary: &Body, secondary: &Body) -> f64 {
    let r = secondary.pos - primary.pos;
    let v = secondary.vel - primary.vel;
    r.cross(&v).norm()
}

/// Eccentricity from energy and angular momentum. Valid for every conic.
pub fn eccentricity(primary: &Body, secondary: &Body) -> f64 {
    let mu = GRAVITY * primary.mass;
    let eps = specific_energy(primary, secondary);
    let h = angular_momentum(primary, secondary);
    (1.0 + 2.0 * eps * h * h / (mu * mu)).max(0.0).sqrt()
}

/// Closest approach distance from the primary's centre, km.
pub fn periapsis_radius(primary: &Body, secondary: &Body) -> f64 {
    let e = eccentricity(primary, secondary);
    if is_bound(primary, secondary) {
        semi_major_axis(primary, secondary) * (1.0 - e)
    } else {
        let mu = GRAVITY * primary.mass;
        let h = angular_momentum(primary, secondary);
        h * h / (mu * (1.0 + e))
    }
}

/// Farthest distance from the primary's centre, km. Infinite when unbound.
pub fn apoapsis_radius(primary: &Body, secondary: &Body) -> f64 {
    if !is_bound(primary, secondary) {
        return f64::INFINITY;
    }
    semi_major_axis(primary, secondary) * (1.0 + eccentricity(primary, secondary))
}

pub fn is_bound(primary: &Body, secondary: &Body) -> bool {
    orbit_energy(primary, secondary) < 0.0
}

/// Periapsis and apoapsis radii of a closed orbit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Apsides {
    pub periapsis: f64,
    pub apoapsis: f64,
}

/// `None` for escape trajectories, which have no apoapsis.
pub fn apsides(primary: &Body, secondary: &Body) -> Option<Apsides> {
    if !is_bound(primary, secondary) {
        return None;
    }
    Some(Apsides {
        periapsis: periapsis_radius(primary, secondary),
        apoapsis: apoapsis_radius(primary, secondary),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::gravity::circular_velocity;
    use nalgebra::Vector3;

    const MARS_MASS: f64 = 6.42e23;

    fn pair(pos: Vector3<f64>, vel: Vector3<f64>) -> (Body, Body) {
        let planet = Body::new(Vector3::zeros(), MARS_MASS, 1.0);
        let mut lander = Body::new(pos, 200.0, 2e-4);
        lander.vel = vel;
        (planet, lander)
    }

    #[test]
    fn circular_orbit() {
        let r = 4000.0;
        let v = circular_velocity(r, MARS_MASS);
        let (p, l) = pair(Vector3::new(r, 0.0, 0.0), Vector3::new(0.0, 0.0, -v));
        assert!(eccentricity(&p, &l) < 1e-7);
        assert!((semi_major_axis(&p, &l) - r).abs() < 1e-6);
        let aps = apsides(&p, &l).unwrap();
        assert!((aps.periapsis - r).abs() < 1e-3);
        assert!((aps.apoapsis - r).abs() < 1e-3);
    }

    #[test]
    fn ellipse_from_apoapsis() {
        // Released tangentially slower than circular: start point is apoapsis.
        let r = 5000.0;
        let v = 0.8 * circular_velocity(r, MARS_MASS);
        let (p, l) = pair(Vector3::new(0.0, r, 0.0), Vector3::new(v, 0.0, 0.0));
        let e = eccentricity(&p, &l);
        // e = 1 - (v/vc)^2 for a release at apoapsis.
        assert!((e - 0.36).abs() < 1e-9, "e = {}", e);
        assert!((apoapsis_radius(&p, &l) - r).abs() < 1e-6);
        assert!(periapsis_radius(&p, &l) < r);
    }

    #[test]
    fn energy_is_frame_relative() {
        let (mut p, mut l) = pair(Vector3::new(4000.0, 0.0, 0.0), Vector3::new(0.0, 1.0, 0.0));
        let e0 = orbit_energy(&p, &l);
        p.pos += Vector3::new(10.0, -5.0, 3.0);
        l.pos += Vector3::new(10.0, -5.0, 3.0);
        p.vel += Vector3::new(2.0, 2.0, 2.0);
        l.vel += Vector3::new(2.0, 2.0, 2.0);
        assert!((orbit_energy(&p, &l) - e0).abs() < 1e-9 * e0.abs());
        assert!((specific_energy(&p, &l) - e0 / 200.0).abs() < 1e-12 * e0.abs());
    }

    #[test]
    fn escape_trajectory_has_no_apoapsis() {
        let r = 3387.0;
        let v_esc = (2.0 * GRAVITY * MARS_MASS / r).sqrt();
        let (p, l) = pair(Vector3::new(r, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.2 * v_esc));
        assert!(!is_bound(&p, &l));
        assert!(eccentricity(&p, &l) > 1.0);
        assert!(apsides(&p, &l).is_none());
        assert_eq!(apoapsis_radius(&p, &l), f64::INFINITY);
        assert!((periapsis_radius(&p, &l) - r).abs() < 1e-6, "tangential start is periapsis");
    }

    #[test]
    fn radial_fall_is_degenerate_ellipse() {
        let (p, l) = pair(Vector3::new(3396.0, 0.0, 0.0), Vector3::zeros());
        assert!((eccentricity(&p, &l) - 1.0).abs() < 1e-12);
        assert!((apoapsis_radius(&p, &l) - 3396.0).abs() < 1e-6);
        assert!(periapsis_radius(&p, &l).abs() < 1e-6);
    }
}
