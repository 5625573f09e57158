use nalgebra::UnitQuaternion;

use crate::dynamics::Body;

// ---------------------------------------------------------------------------
// Position Verlet with Euler bootstrap
// ---------------------------------------------------------------------------

/// Advance a body by `dt` using its accumulated force and torque.
///
/// The first step after construction or [`reset`] is explicit Euler, since
/// there is no previous position yet. Every later step is position Verlet
/// with a central-difference velocity. Angular state is always Euler: the
/// rate is updated from torque, then the orientation is rotated by `|w|*dt`
/// about `w` in the body frame.
pub fn advance(body: &mut Body, dt: f64) {
    if dt == 0.0 {
        return;
    }

    let start = body.pos;
    let accel = body.net_force / body.mass;
    let ang_accel = body.net_torque / body.inertia;

    if body.first_step {
        body.vel += accel * dt;
        body.pos += body.vel * dt;
    } else {
        let next = 2.0 * body.pos - body.prev_pos + accel * dt * dt;
        body.vel = (next - body.prev_pos) / (2.0 * dt);
        body.pos = next;
    }

    body.omega += ang_accel * dt;
    if body.omega.norm() > 1e-8 {
        let turn = UnitQuaternion::from_scaled_axis(body.omega * dt);
        body.quat = UnitQuaternion::new_normalize((body.quat * turn).into_inner());
    }

    body.prev_pos = start;
    body.first_step = false;
}

/// Force the next [`advance`] back onto the Euler branch.
///
/// Required whenever position or velocity is overwritten from outside the
/// integrator (teleport, scenario switch, ground contact snap).
pub fn reset(body: &mut Body) {
    body.first_step = true;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn falling_body() -> Body {
        let mut b = Body::new(Vector3::new(0.0, 10.0, 0.0), 2.0, 0.5);
        b.vel = Vector3::new(1.0, 0.0, 0.0);
        b.net_force = Vector3::new(0.0, -4.0, 0.0);
        b
    }

    #[test]
    fn zero_dt_is_noop() {
        let mut b = falling_body();
        b.omega = Vector3::new(0.1, 0.2, 0.3);
        b.net_torque = Vector3::new(1.0, 0.0, 0.0);
        let before = b.clone();
        advance(&mut b, 0.0);
        assert_eq!(b.pos, before.pos);
        assert_eq!(b.vel, before.vel);
        assert_eq!(b.quat, before.quat);
        assert_eq!(b.omega, before.omega);
        assert!(b.awaiting_first_step(), "no-op must not consume the Euler step");
    }

    #[test]
    fn first_step_is_euler() {
        let mut b = falling_body();
        let dt = 0.1;
        let accel = b.net_force / b.mass;
        let v_expected = b.vel + accel * dt;
        let x_expected = b.pos + v_expected * dt;
        advance(&mut b, dt);
        assert!((b.vel - v_expected).norm() < 1e-15);
        assert!((b.pos - x_expected).norm() < 1e-15);
    }

    #[test]
    fn reset_returns_to_euler() {
        let mut b = falling_body();
        let dt = 0.05;
        for _ in 0..10 {
            advance(&mut b, dt);
        }
        // Teleport with a new velocity; Verlet would use the stale prev_pos.
        b.pos = Vector3::new(5.0, 5.0, 5.0);
        b.vel = Vector3::new(0.0, 0.0, 2.0);
        reset(&mut b);

        let accel = b.net_force / b.mass;
        let v_euler = b.vel + accel * dt;
        let x_euler = b.pos + v_euler * dt;
        let x_verlet = 2.0 * b.pos - b.prev_pos + accel * dt * dt;

        advance(&mut b, dt);
        assert!((b.pos - x_euler).norm() < 1e-12, "expected Euler prediction");
        assert!((b.pos - x_verlet).norm() > 1e-3, "must differ from Verlet prediction");
    }

    #[test]
    fn verlet_tracks_constant_acceleration() {
        // Verlet is exact for constant acceleration once bootstrapped.
        let mut b = falling_body();
        let dt = 0.01;
        advance(&mut b, dt);
        let x1 = b.pos;
        let v1 = b.vel;
        let a = b.net_force / b.mass;
        for _ in 0..100 {
            advance(&mut b, dt);
        }
        let t = 100.0 * dt;
        // Parabola through the Euler bootstrap pair has slope v1 + a*dt/2 at x1.
        let expected = x1 + (v1 + 0.5 * a * dt) * t + 0.5 * a * t * t;
        assert!((b.pos - expected).norm() < 1e-9);
    }

    #[test]
    fn circular_orbit_stays_bounded() {
        // Unit-mu circular orbit, force recomputed each step.
        let mut b = Body::new(Vector3::new(1.0, 0.0, 0.0), 1.0, 1.0);
        b.vel = Vector3::new(0.0, 0.0, 1.0);
        let dt = 1e-3;
        for _ in 0..((2.0 * std::f64::consts::PI / dt) as usize) {
            let r = b.pos.norm();
            b.net_force = -b.pos / (r * r * r);
            advance(&mut b, dt);
        }
        assert!((b.pos.norm() - 1.0).abs() < 5e-3, "radius drifted to {}", b.pos.norm());
    }

    #[test]
    fn rotation_about_body_axis() {
        let mut b = Body::new(Vector3::zeros(), 1.0, 1.0);
        b.omega = Vector3::new(0.0, 0.0, std::f64::consts::FRAC_PI_2);
        advance(&mut b, 1.0);
        // Quarter turn about +Z takes +Y to -X.
        assert!((b.up() - Vector3::new(-1.0, 0.0, 0.0)).norm() < 1e-12);
        assert!((b.quat.quaternion().norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn tiny_spin_leaves_attitude() {
        let mut b = Body::new(Vector3::zeros(), 1.0, 1.0);
        b.omega = Vector3::new(1e-10, 0.0, 0.0);
        advance(&mut b, 1.0);
        assert_eq!(b.quat, UnitQuaternion::identity());
    }

    #[test]
    fn torque_spins_up() {
        let mut b = Body::new(Vector3::zeros(), 1.0, 2.0);
        b.net_torque = Vector3::new(4.0, 0.0, 0.0);
        advance(&mut b, 0.5);
        assert!((b.omega.x - 1.0).abs() < 1e-15);
    }
}
