use nalgebra::Vector3;

/// Quadratic drag force (world frame, kN) on a body moving at `vel` through
/// air moving at `air_vel`.
///
/// F = -0.5 * rho * Cd * A * |v_rel|^2 * v_rel_hat. Returns exactly zero when
/// the relative speed is at or below 1e-8 km/s.
pub fn drag_force(
    vel: &Vector3<f64>,
    air_vel: &Vector3<f64>,
    density: f64,
    cd: f64,
    area: f64,
) -> Vector3<f64> {
    let rel = vel - air_vel;
    let speed = rel.norm();
    if speed <= 1e-8 {
        return Vector3::zeros();
    }
    let q_dyn = 0.5 * density * speed * speed;
    -(rel / speed) * (q_dyn * cd * area)
}
