use nalgebra::Vector3;

use crate::dynamics::{Body, GRAVITY};

/// Newtonian gravity exerted by `primary` on `secondary` (world frame, kN).
///
/// Directed from the secondary toward the primary. The primary is treated
/// as a point mass. Coincident bodies are a caller error.
pub fn gravity_force(primary: &Body, secondary: &Body) -> Vector3<f64> {
    let sep = primary.pos - secondary.pos;
    let r2 = sep.norm_squared();
    sep.normalize() * (GRAVITY * primary.mass * secondary.mass / r2)
}

/// Gravitational parameter mu = G*M, km^3/s^2.
pub fn mu(mass: f64) -> f64 {
    GRAVITY * mass
}

/// Circular orbit speed at radius `r` about a body of mass `mass`.
pub fn circular_velocity(r: f64, mass: f64) -> f64 {
    (mu(mass) / r).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::UnitQuaternion;

    #[test]
    fn magnitude_matches_inverse_square() {
        let planet = Body::new(Vector3::zeros(), 6.42e23, 1.0);
        let lander = Body::new(Vector3::new(0.0, 4000.0, 0.0), 200.0, 2e-4);
        let f = gravity_force(&planet, &lander);
        let expected = GRAVITY * 6.42e23 * 200.0 / (4000.0 * 4000.0);
        assert!((f.norm() - expected).abs() / expected < 1e-12);
        assert!(f.y < 0.0, "gravity must pull toward the planet");
    }

    #[test]
    fn independent_of_orientation() {
        let planet = Body::new(Vector3::zeros(), 1e20, 1.0);
        let mut a = Body::new(Vector3::new(100.0, 20.0, -5.0), 10.0, 1.0);
        let f0 = gravity_force(&planet, &a);
        a.quat = UnitQuaternion::from_euler_angles(0.3, -1.2, 2.0);
        let f1 = gravity_force(&planet, &a);
        assert!((f0 - f1).norm() < 1e-18);
    }

    #[test]
    fn equal_and_opposite() {
        let a = Body::new(Vector3::new(1.0, 0.0, 0.0), 5.0, 1.0);
        let b = Body::new(Vector3::new(-2.0, 1.0, 0.0), 7.0, 1.0);
        let sum = gravity_force(&a, &b) + gravity_force(&b, &a);
        assert!(sum.norm() < 1e-30);
    }

    #[test]
    fn low_orbit_speed() {
        // ~3.55 km/s just above a Mars-sized body
        let v = circular_velocity(3386.0, 6.42e23);
        assert!(v > 3.5 && v < 3.6, "got {}", v);
    }
}
