use nalgebra::Vector3;

use super::pid::Pid;
use crate::vehicle::Lander;

// ---------------------------------------------------------------------------
// Flight computer: attitude and surface-velocity holds
// ---------------------------------------------------------------------------

/// Below this the attitude loops leave the RCS idle.
const ATTITUDE_DEADBAND: f64 = 1e-6;

/// Closed-loop primitives the autopilot can call once per tick.
///
/// Each primitive owns its PID memory, so calling a different primitive
/// does not disturb another one's integral. All of it is cleared on a
/// scenario switch.
#[derive(Debug, Clone)]
pub struct FlightComputer {
    stabilizer: Pid,
    hold_stabilizer: Pid,
    hold_controller: Pid,
    velocity: Pid,
}

impl Default for FlightComputer {
    fn default() -> Self {
        Self::new()
    }
}

impl FlightComputer {
    pub fn new() -> Self {
        Self {
            stabilizer: Pid::new(5.0, 0.0, 0.0),
            hold_stabilizer: Pid::new(5.0, 0.0, 0.0),
            hold_controller: Pid::new(5.0, 0.0, 0.0),
            velocity: Pid::new(1000.0, 100.0, 0.0),
        }
    }

    pub fn reset(&mut self) {
        self.stabilizer.reset();
        self.hold_stabilizer.reset();
        self.hold_controller.reset();
        self.velocity.reset();
    }

    /// Null the angular velocity with the RCS.
    pub fn stabilize(&mut self, lander: &mut Lander, dt: f64) {
        let omega = lander.body.omega;
        let error = omega.norm();
        if error < ATTITUDE_DEADBAND {
            return;
        }
        let out = self.stabilizer.update(error, dt);
        lander.setup_rcs(-omega, out);
    }

    /// Turn body +Y toward `target` (world frame) while damping rotation.
    pub fn hold(&mut self, lander: &mut Lander, target: &Vector3<f64>, dt: f64) {
        if target.norm() == 0.0 {
            return;
        }
        let target = target.normalize();
        let omega = lander.body.omega;

        let stab = self.hold_stabilizer.update(omega.norm(), dt);

        let misalignment = lander.body.up().cross(&target);
        let axis = lander.body.quat.inverse() * misalignment;
        let ctrl = self.hold_controller.update(misalignment.norm(), dt);

        let avg_output = (stab + ctrl) / 2.0;
        if avg_output < ATTITUDE_DEADBAND {
            return;
        }
        let avg_axis = (stab * -omega + ctrl * axis) / (stab + ctrl);
        lander.setup_rcs(avg_axis, avg_output);
    }

    /// Throttle the main engine so that the speed relative to the ground,
    /// `|v - surface_vel|`, tracks `target`. Assumes the lander is already
    /// pointed surface-retrograde.
    pub fn hold_surface_velocity(
        &mut self,
        lander: &mut Lander,
        surface_vel: &Vector3<f64>,
        target: f64,
        dt: f64,
    ) {
        let error = (lander.body.vel - surface_vel).norm() - target;
        let out = self.velocity.update(error, dt);
        lander.setup_main_engine(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LanderConfig;

    fn lander() -> Lander {
        Lander::new(&LanderConfig::default())
    }

    #[test]
    fn stabilize_opposes_spin() {
        let mut fc = FlightComputer::new();
        let mut l = lander();
        l.body.omega = Vector3::new(0.0, 0.0, 0.1);
        fc.stabilize(&mut l, 1.0 / 60.0);
        assert!((l.attrs.rcs_axis - Vector3::new(0.0, 0.0, -0.1)).norm() < 1e-15);
        assert!((l.attrs.rcs_throttle - 0.5).abs() < 1e-12);
    }

    #[test]
    fn stabilize_idles_when_still() {
        let mut fc = FlightComputer::new();
        let mut l = lander();
        l.body.omega = Vector3::new(1e-7, 0.0, 0.0);
        fc.stabilize(&mut l, 1.0 / 60.0);
        assert_eq!(l.attrs.rcs_throttle, 0.0);
    }

    #[test]
    fn hold_turns_toward_target() {
        let mut fc = FlightComputer::new();
        let mut l = lander();
        // Up is +Y; ask for +X. Rotation from +Y to +X is about -Z.
        fc.hold(&mut l, &Vector3::new(3.0, 0.0, 0.0), 0.1);
        let axis = l.attrs.rcs_axis.normalize();
        assert!((axis - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-12, "axis {:?}", axis);
        assert_eq!(l.attrs.rcs_throttle, 1.0, "2.5 saturates to full throttle");
    }

    #[test]
    fn hold_ignores_zero_target() {
        let mut fc = FlightComputer::new();
        let mut l = lander();
        l.body.omega = Vector3::new(0.3, 0.0, 0.0);
        fc.hold(&mut l, &Vector3::zeros(), 0.1);
        assert_eq!(l.attrs.rcs_throttle, 0.0);
    }

    #[test]
    fn hold_idles_when_aligned_and_still() {
        let mut fc = FlightComputer::new();
        let mut l = lander();
        fc.hold(&mut l, &Vector3::y(), 0.1);
        assert_eq!(l.attrs.rcs_throttle, 0.0);
        assert!(l.attrs.rcs_axis.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn hold_axis_is_body_frame() {
        let mut fc = FlightComputer::new();
        let mut l = lander();
        // Body +Y now points along world +Z.
        l.body.orient_towards(&Vector3::z());
        fc.hold(&mut l, &Vector3::x(), 0.1);
        // World misalignment axis z × x = +Y; mapped back into the body frame.
        let expected = l.body.quat.inverse() * Vector3::y();
        assert!((l.attrs.rcs_axis.normalize() - expected).norm() < 1e-12);
    }

    #[test]
    fn surface_velocity_hold_throttles_when_fast() {
        let mut fc = FlightComputer::new();
        let mut l = lander();
        l.body.vel = Vector3::new(-0.02, 0.0, 0.0);
        fc.hold_surface_velocity(&mut l, &Vector3::zeros(), 0.01, 0.1);
        assert_eq!(l.attrs.me_throttle, 1.0);

        fc.reset();
        l.body.vel = Vector3::new(-0.005, 0.0, 0.0);
        fc.hold_surface_velocity(&mut l, &Vector3::zeros(), 0.01, 0.1);
        assert_eq!(l.attrs.me_throttle, 0.0, "slower than target: engine off");
    }
}
