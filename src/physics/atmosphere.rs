use serde::Deserialize;

// ---------------------------------------------------------------------------
// Single-layer exponential atmosphere
// ---------------------------------------------------------------------------

/// Exponential atmosphere: rho = rho0 * exp(-h / H), vacuum above `ceiling`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Atmosphere {
    pub surface_density: f64, // kg/km^3
    pub scale_height: f64,    // km
    pub ceiling: f64,         // km
}

impl Default for Atmosphere {
    fn default() -> Self {
        Self {
            surface_density: 0.017e9, // 0.017 kg/m^3
            scale_height: 11.0,
            ceiling: 200.0,
        }
    }
}

impl Atmosphere {
    /// Density at geometric altitude `altitude` (km above nominal radius).
    pub fn density(&self, altitude: f64) -> f64 {
        if altitude > self.ceiling {
            return 0.0;
        }
        self.surface_density * (-altitude / self.scale_height).exp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_value() {
        let a = Atmosphere::default();
        assert!((a.density(0.0) - 0.017e9).abs() < 1e-3);
    }

    #[test]
    fn one_scale_height() {
        let a = Atmosphere::default();
        let ratio = a.density(11.0) / a.density(0.0);
        assert!((ratio - (-1.0_f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn density_monotonically_decreases() {
        let a = Atmosphere::default();
        assert!(a.density(0.0) > a.density(10.0));
        assert!(a.density(10.0) > a.density(100.0));
        assert!(a.density(100.0) > 0.0);
    }

    #[test]
    fn vacuum_above_ceiling() {
        let a = Atmosphere::default();
        assert!(a.density(200.0) > 0.0);
        assert_eq!(a.density(200.001), 0.0);
    }
}
