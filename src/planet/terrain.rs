use nalgebra::{Unit, UnitQuaternion, Vector3};

use crate::config::TerrainConfig;
use crate::noise::{Noise1d, Noise3d};

// ---------------------------------------------------------------------------
// Procedural surface and wind fields
// ---------------------------------------------------------------------------

pub const BASE_COLOR: [f32; 3] = [0.63, 0.33, 0.22];
pub const ICE_COLOR: [f32; 3] = [0.9, 0.9, 0.9];

/// Polar caps start at this fraction of the radius along the spin axis.
const POLE_THRESHOLD: f64 = 0.8;
const COLOR_NOISE_WEIGHT: f64 = 1.0 / 20.0;
const NORMAL_NOISE_WEIGHT: f64 = 1.0 / 10.0;

/// Noise-backed fields defining the planet surface and the wind.
///
/// Each field owns an independent generator; the seeds are derived from a
/// single run seed so a whole planet is reproducible.
#[derive(Debug)]
pub struct Terrain {
    radius: f64,
    height_amplitude: f64,
    height_octaves: u32,
    wind_speed_amplitude: f64,
    height: Noise3d,
    color: Noise3d,
    normal: [Noise3d; 3],
    wind_speed: Noise1d,
    wind_x: Noise1d,
    wind_z: Noise1d,
}

impl Terrain {
    pub fn new(radius: f64, cfg: &TerrainConfig, seed: u64) -> Self {
        // Distinct odd multipliers keep the per-field streams apart.
        let sub = |k: u64| seed.wrapping_mul(0x9E37_79B9_7F4A_7C15).wrapping_add(k);
        Self {
            radius,
            height_amplitude: cfg.height_amplitude,
            height_octaves: cfg.height_octaves,
            wind_speed_amplitude: cfg.wind_speed_amplitude,
            height: Noise3d::new(cfg.height_cell, sub(1)),
            color: Noise3d::new(cfg.color_cell, sub(2)),
            normal: [
                Noise3d::new(cfg.color_cell, sub(3)),
                Noise3d::new(cfg.color_cell, sub(4)),
                Noise3d::new(cfg.color_cell, sub(5)),
            ],
            wind_speed: Noise1d::new(cfg.wind_speed_cell, sub(6)),
            wind_x: Noise1d::new(cfg.wind_direction_cell, sub(7)),
            wind_z: Noise1d::new(cfg.wind_direction_cell, sub(8)),
        }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Radial displacement of the surface from the nominal sphere, km.
    ///
    /// `direction` is world frame, from the planet centre. It is de-spun with
    /// `attitude` first so features stay fixed to the rotating planet.
    /// Bounded by the configured amplitude.
    pub fn surface_height(&self, attitude: &UnitQuaternion<f64>, direction: &Vector3<f64>) -> f64 {
        if direction.norm() < 1e-8 {
            return 0.0;
        }
        let local = (attitude.inverse() * direction).normalize() * self.radius;
        let n = self.height.value_octaves(&local, self.height_octaves);
        self.height_amplitude * n.clamp(-1.0, 1.0)
    }

    /// Display color of the surface in `direction` (planet frame), RGB in [0, 1].
    pub fn surface_color(&self, direction: &Vector3<f64>) -> [f32; 3] {
        if direction.norm() < 1e-8 {
            return BASE_COLOR;
        }
        let surface = direction.normalize() * self.radius;
        let mut color = BASE_COLOR;

        let threshold = POLE_THRESHOLD * self.radius;
        if surface.y.abs() >= threshold {
            let coef = (10.0 * (surface.y.abs() - threshold) / threshold).clamp(0.0, 1.0) as f32;
            for (c, ice) in color.iter_mut().zip(ICE_COLOR) {
                *c = (*c * (1.0 - coef) + ice * coef).clamp(0.0, 1.0);
            }
        }

        let shade = (COLOR_NOISE_WEIGHT * self.color.value(&surface)) as f32;
        for c in color.iter_mut() {
            *c = (*c + shade).clamp(0.0, 1.0);
        }
        color
    }

    /// Shading normal in `direction` (planet frame): the radial direction
    /// with per-axis noise added. Display only.
    pub fn surface_normal(&self, direction: &Vector3<f64>) -> Vector3<f64> {
        if direction.norm() < 1e-8 {
            return Vector3::y();
        }
        let radial = direction.normalize();
        let surface = radial * self.radius;
        let bump = Vector3::new(
            self.normal[0].value(&surface),
            self.normal[1].value(&surface),
            self.normal[2].value(&surface),
        );
        (radial + NORMAL_NOISE_WEIGHT * bump).normalize()
    }

    /// Rigid-rotation velocity of the ground under `rel_pos`.
    ///
    /// `rel_pos` is relative to the planet centre, `spin` is the planet's
    /// angular velocity in world frame.
    pub fn surface_velocity(&self, spin: &Vector3<f64>, rel_pos: &Vector3<f64>) -> Vector3<f64> {
        if rel_pos.norm() < 1e-8 {
            return Vector3::zeros();
        }
        spin.cross(&(rel_pos.normalize() * self.radius))
    }

    /// Air velocity at `rel_pos` and simulation time `time`: ground velocity
    /// plus a noise-driven wind lying in the local tangent plane.
    pub fn wind_velocity(&self, spin: &Vector3<f64>, rel_pos: &Vector3<f64>, time: f64) -> Vector3<f64> {
        let ground = self.surface_velocity(spin, rel_pos);
        if rel_pos.norm() < 1e-8 {
            return ground;
        }

        let speed = self.wind_speed_amplitude * self.wind_speed.value(time).abs();
        let dir = Vector3::new(self.wind_x.value(time), 0.0, self.wind_z.value(time));
        if dir.norm() < 1e-8 {
            return ground;
        }
        let mut wind = dir.normalize() * speed;

        // Wind is generated tangent at +Y; carry that plane onto the local one.
        let up = rel_pos.normalize();
        let axis = Vector3::y().cross(&up);
        if axis.norm() > 1e-8 {
            let angle = Vector3::y().dot(&up).clamp(-1.0, 1.0).acos();
            let rot = UnitQuaternion::from_axis_angle(&Unit::new_normalize(axis), angle);
            wind = rot * wind;
        }

        ground + wind
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn terrain() -> Terrain {
        Terrain::new(3386.0, &TerrainConfig::default(), 1234)
    }

    fn spin() -> Vector3<f64> {
        Vector3::new(0.0, 2.0 * std::f64::consts::PI / 88_642.65, 0.0)
    }

    #[test]
    fn height_is_small_and_repeatable() {
        let t = terrain();
        let q = UnitQuaternion::identity();
        for i in 0..50 {
            let a = i as f64 * 0.37;
            let dir = Vector3::new(a.cos(), (a * 0.5).sin(), a.sin());
            let h = t.surface_height(&q, &dir);
            assert!(h.abs() <= 0.2, "height {} exceeds amplitude", h);
            assert_eq!(h.to_bits(), t.surface_height(&q, &dir).to_bits());
        }
    }

    #[test]
    fn height_independent_of_direction_length() {
        let t = terrain();
        let q = UnitQuaternion::identity();
        let d = Vector3::new(0.3, 0.4, -0.2);
        let a = t.surface_height(&q, &d);
        let b = t.surface_height(&q, &(d * 5000.0));
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn height_follows_planet_rotation() {
        let t = terrain();
        let spun = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), 0.7);
        let fixed_point = Vector3::new(1.0, 0.2, 0.1);
        let before = t.surface_height(&UnitQuaternion::identity(), &fixed_point);
        // The same surface point, now carried round by the spin.
        let after = t.surface_height(&spun, &(spun * fixed_point));
        assert!((before - after).abs() < 1e-9);
    }

    #[test]
    fn zero_direction_height() {
        assert_eq!(terrain().surface_height(&UnitQuaternion::identity(), &Vector3::zeros()), 0.0);
    }

    #[test]
    fn poles_are_icy() {
        let t = terrain();
        let pole = t.surface_color(&Vector3::new(0.0, 1.0, 0.0));
        let equator = t.surface_color(&Vector3::new(1.0, 0.0, 0.0));
        assert!(pole[2] > equator[2] + 0.3, "pole {:?} vs equator {:?}", pole, equator);
        for c in pole.iter().chain(equator.iter()) {
            assert!((0.0..=1.0).contains(c));
        }
    }

    #[test]
    fn normal_is_unit_and_near_radial() {
        let t = terrain();
        let dir = Vector3::new(0.2, 0.9, -0.4);
        let n = t.surface_normal(&dir);
        assert!((n.norm() - 1.0).abs() < 1e-12);
        assert!(n.dot(&dir.normalize()) > 0.3);
    }

    #[test]
    fn equator_surface_speed() {
        let t = terrain();
        let v = t.surface_velocity(&spin(), &Vector3::new(3400.0, 0.0, 0.0));
        let expected = 2.0 * std::f64::consts::PI * 3386.0 / 88_642.65;
        assert!((v.norm() - expected).abs() < 1e-9);
        assert!(v.z < 0.0, "+Y spin moves the +X meridian toward -Z");
    }

    #[test]
    fn pole_does_not_move() {
        let v = terrain().surface_velocity(&spin(), &Vector3::new(0.0, 3386.0, 0.0));
        assert!(v.norm() < 1e-12);
    }

    #[test]
    fn wind_is_tangent() {
        let t = terrain();
        let pos = Vector3::new(1000.0, 2500.0, -1800.0);
        let up = pos.normalize();
        for k in 0..20 {
            let time = k as f64 * 7.3;
            let wind = t.wind_velocity(&Vector3::zeros(), &pos, time);
            assert!(wind.dot(&up).abs() < 1e-12, "wind has radial part at t={}", time);
            assert!(wind.norm() <= 0.05 + 1e-12);
        }
    }

    #[test]
    fn wind_includes_ground_motion() {
        let t = terrain();
        let pos = Vector3::new(3390.0, 0.0, 0.0);
        let still = t.wind_velocity(&Vector3::zeros(), &pos, 12.0);
        let spinning = t.wind_velocity(&spin(), &pos, 12.0);
        let diff = spinning - still;
        assert!((diff - t.surface_velocity(&spin(), &pos)).norm() < 1e-12);
    }
}
