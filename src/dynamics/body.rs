use std::f64::consts::PI;

use nalgebra::{UnitQuaternion, Vector3};

// ---------------------------------------------------------------------------
// Rigid body: point mass with orientation
// ---------------------------------------------------------------------------

/// A simulated body (lander, planet, debris fragment, sun).
///
/// Frames: `pos`, `vel` and `net_force` are world frame. `quat` rotates body
/// coordinates into world coordinates. `omega` and `net_torque` are body
/// frame, so the orientation update composes on the right.
#[derive(Debug, Clone)]
pub struct Body {
    pub pos: Vector3<f64>,              // km
    pub vel: Vector3<f64>,              // km/s
    pub quat: UnitQuaternion<f64>,      // body -> world
    pub omega: Vector3<f64>,            // rad/s, body frame
    pub mass: f64,                      // kg
    pub inertia: f64,                   // kg*km^2, scalar moment
    pub net_force: Vector3<f64>,        // kN, world frame
    pub net_torque: Vector3<f64>,       // kN*km, body frame
    pub(crate) prev_pos: Vector3<f64>,
    pub(crate) first_step: bool,
}

impl Body {
    pub fn new(pos: Vector3<f64>, mass: f64, inertia: f64) -> Self {
        debug_assert!(mass > 0.0 && inertia > 0.0);
        Self {
            pos,
            vel: Vector3::zeros(),
            quat: UnitQuaternion::identity(),
            omega: Vector3::zeros(),
            mass,
            inertia,
            net_force: Vector3::zeros(),
            net_torque: Vector3::zeros(),
            prev_pos: pos,
            first_step: true,
        }
    }

    /// Body +Y axis in world frame (main engine thrust direction).
    pub fn up(&self) -> Vector3<f64> {
        self.quat * Vector3::y()
    }

    /// Zero accumulated force and torque (start of a tick).
    pub fn clear_loads(&mut self) {
        self.net_force = Vector3::zeros();
        self.net_torque = Vector3::zeros();
    }

    /// True when the next integration step will use the Euler bootstrap.
    pub fn awaiting_first_step(&self) -> bool {
        self.first_step
    }

    /// Align body +Y with `dir` (world frame). Zero-length `dir` is ignored.
    pub fn orient_towards(&mut self, dir: &Vector3<f64>) {
        if dir.norm() < 1e-8 {
            return;
        }
        let target = dir.normalize();
        self.quat = UnitQuaternion::rotation_between(&Vector3::y(), &target)
            // Antiparallel: any half turn about an axis perpendicular to +Y.
            .unwrap_or_else(|| UnitQuaternion::from_axis_angle(&Vector3::x_axis(), PI));
    }
}
