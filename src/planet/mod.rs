pub mod terrain;

pub use terrain::Terrain;

use nalgebra::{UnitQuaternion, Vector3};

use crate::config::PlanetConfig;
use crate::dynamics::Body;
use crate::physics::Atmosphere;

// ---------------------------------------------------------------------------
// Planet: spinning body with a procedural surface and an atmosphere
// ---------------------------------------------------------------------------

/// Inertia is irrelevant for a body spun at constant rate; any positive
/// value works with zero applied torque.
const PLANET_INERTIA: f64 = 1.0;

#[derive(Debug)]
pub struct Planet {
    pub body: Body,
    pub terrain: Terrain,
    pub atmosphere: Atmosphere,
    pub drag_coefficient: f64,
    radius: f64,
    spin_rate: f64,
}

impl Planet {
    pub fn new(cfg: &PlanetConfig, terrain: Terrain) -> Self {
        let mut planet = Self {
            body: Body::new(Vector3::zeros(), cfg.mass, PLANET_INERTIA),
            terrain,
            atmosphere: cfg.atmosphere,
            drag_coefficient: cfg.drag_coefficient,
            radius: cfg.radius,
            spin_rate: cfg.spin_rate(),
        };
        planet.reset();
        planet
    }

    /// Back to the origin, identity attitude, nominal spin about +Y.
    pub fn reset(&mut self) {
        self.body.pos = Vector3::zeros();
        self.body.vel = Vector3::zeros();
        self.body.quat = UnitQuaternion::identity();
        self.body.omega = Vector3::new(0.0, self.spin_rate, 0.0);
        self.body.clear_loads();
        crate::sim::integrator::reset(&mut self.body);
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn mass(&self) -> f64 {
        self.body.mass
    }

    /// Angular velocity in world frame.
    pub fn spin_world(&self) -> Vector3<f64> {
        self.body.quat * self.body.omega
    }

    fn rel(&self, pos: &Vector3<f64>) -> Vector3<f64> {
        pos - self.body.pos
    }

    /// Terrain displacement below the world point `pos`.
    pub fn surface_height_at(&self, pos: &Vector3<f64>) -> f64 {
        self.terrain.surface_height(&self.body.quat, &self.rel(pos))
    }

    /// Centre distance at which a body resting on its base touches the ground.
    pub fn contact_distance(&self, pos: &Vector3<f64>, base_offset: f64) -> f64 {
        self.radius + self.surface_height_at(pos) + base_offset
    }

    /// Height above the local terrain, minus the base offset.
    pub fn altitude(&self, pos: &Vector3<f64>, base_offset: f64) -> f64 {
        self.rel(pos).norm() - self.contact_distance(pos, base_offset)
    }

    /// Atmospheric density at `pos`, using height above the nominal sphere.
    pub fn density_at(&self, pos: &Vector3<f64>) -> f64 {
        self.atmosphere.density(self.rel(pos).norm() - self.radius)
    }

    pub fn surface_velocity_at(&self, pos: &Vector3<f64>) -> Vector3<f64> {
        self.terrain.surface_velocity(&self.spin_world(), &self.rel(pos))
    }

    pub fn wind_velocity_at(&self, pos: &Vector3<f64>, time: f64) -> Vector3<f64> {
        self.terrain.wind_velocity(&self.spin_world(), &self.rel(pos), time)
    }

    /// Unit vector from the planet centre toward `pos`.
    pub fn radial(&self, pos: &Vector3<f64>) -> Vector3<f64> {
        let r = self.rel(pos);
        if r.norm() < 1e-8 {
            return Vector3::y();
        }
        r.normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SimConfig, TerrainConfig};

    fn mars() -> Planet {
        let cfg = SimConfig::default();
        let terrain = Terrain::new(cfg.planet.radius, &TerrainConfig::default(), 99);
        Planet::new(&cfg.planet, terrain)
    }

    #[test]
    fn spins_about_y() {
        let p = mars();
        let w = p.spin_world();
        assert!(w.x == 0.0 && w.z == 0.0);
        assert!((w.y - 2.0 * std::f64::consts::PI / 88_642.65).abs() < 1e-15);
    }

    #[test]
    fn altitude_accounts_for_terrain_and_base() {
        let p = mars();
        let pos = Vector3::new(3386.0 + 10.0, 0.0, 0.0);
        let h = p.surface_height_at(&pos);
        let alt = p.altitude(&pos, 0.0007);
        assert!((alt - (10.0 - h - 0.0007)).abs() < 1e-9);
    }

    #[test]
    fn density_uses_nominal_radius() {
        let p = mars();
        let d = p.density_at(&Vector3::new(0.0, 0.0, 3386.0 + 11.0));
        assert!((d / 0.017e9 - (-1.0_f64).exp()).abs() < 1e-12);
        assert_eq!(p.density_at(&Vector3::new(0.0, 0.0, 3386.0 + 250.0)), 0.0);
    }

    #[test]
    fn reset_restores_attitude() {
        let mut p = mars();
        for _ in 0..100 {
            crate::sim::integrator::advance(&mut p.body, 100.0);
        }
        assert!(p.body.quat.angle() > 0.0);
        p.reset();
        assert_eq!(p.body.quat.angle(), 0.0);
        assert!(p.body.awaiting_first_step());
    }
}
