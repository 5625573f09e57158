use std::cell::RefCell;
use std::collections::HashMap;

use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// ---------------------------------------------------------------------------
// Gradient noise (Perlin-style), lazily memoized lattice
// ---------------------------------------------------------------------------
//
// Gradients live on an integer lattice and are generated the first time a
// cell is touched. Once generated a gradient never changes for the lifetime
// of the generator, so repeated queries at the same coordinate are
// bit-identical. All octaves of one generator share the same lattice map.

fn random_component(rng: &mut StdRng) -> f64 {
    rng.gen_range(-1.0..=1.0)
}

/// One-dimensional gradient noise.
#[derive(Debug)]
pub struct Noise1d {
    /// Distance between adjacent lattice gradients.
    pub cell_size: f64,
    gradients: RefCell<HashMap<i64, f64>>,
    rng: RefCell<StdRng>,
}

impl Noise1d {
    pub fn new(cell_size: f64, seed: u64) -> Self {
        Self {
            cell_size,
            gradients: RefCell::new(HashMap::new()),
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Noise value at `pos`, roughly in [-1, 1].
    pub fn value(&self, pos: f64) -> f64 {
        self.value_at_scale(pos, self.cell_size)
    }

    /// Sum of `octaves` terms; each octave halves both cell size and amplitude.
    pub fn value_octaves(&self, pos: f64, octaves: u32) -> f64 {
        let mut cell = self.cell_size;
        let mut total = 0.0;
        for i in 0..octaves {
            total += self.value_at_scale(pos, cell) / 2f64.powi(i as i32);
            cell /= 2.0;
        }
        total
    }

    /// Number of lattice gradients generated so far.
    pub fn cached_cells(&self) -> usize {
        self.gradients.borrow().len()
    }

    fn value_at_scale(&self, pos: f64, cell: f64) -> f64 {
        let np = pos / cell;
        let c0 = np.floor() as i64;
        let c1 = c0 + 1;

        let g0 = self.gradient(c0);
        let g1 = self.gradient(c1);

        let d0 = np - c0 as f64;
        let d1 = np - c1 as f64;

        // Smoothstep weight 3t^2 - 2t^3
        let w0 = d0 * d0 * (3.0 - 2.0 * d0);
        let w1 = 1.0 - w0;

        (d0 * g0) * w1 + (d1 * g1) * w0
    }

    fn gradient(&self, cell: i64) -> f64 {
        let mut gradients = self.gradients.borrow_mut();
        *gradients
            .entry(cell)
            .or_insert_with(|| random_component(&mut self.rng.borrow_mut()))
    }
}

/// Three-dimensional gradient noise with trilinear corner weighting.
#[derive(Debug)]
pub struct Noise3d {
    pub cell_size: f64,
    gradients: RefCell<HashMap<[i64; 3], Vector3<f64>>>,
    rng: RefCell<StdRng>,
}

impl Noise3d {
    pub fn new(cell_size: f64, seed: u64) -> Self {
        Self {
            cell_size,
            gradients: RefCell::new(HashMap::new()),
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn value(&self, pos: &Vector3<f64>) -> f64 {
        self.value_at_scale(pos, self.cell_size)
    }

    pub fn value_octaves(&self, pos: &Vector3<f64>, octaves: u32) -> f64 {
        let mut cell = self.cell_size;
        let mut total = 0.0;
        for i in 0..octaves {
            total += self.value_at_scale(pos, cell) / 2f64.powi(i as i32);
            cell /= 2.0;
        }
        total
    }

    pub fn cached_cells(&self) -> usize {
        self.gradients.borrow().len()
    }

    fn value_at_scale(&self, pos: &Vector3<f64>, cell: f64) -> f64 {
        let np = pos / cell;
        let base = [
            np.x.floor() as i64,
            np.y.floor() as i64,
            np.z.floor() as i64,
        ];

        let mut total = 0.0;
        for corner in 0..8 {
            let c = [
                base[0] + (corner >> 2 & 1),
                base[1] + (corner >> 1 & 1),
                base[2] + (corner & 1),
            ];
            let dist = np - Vector3::new(c[0] as f64, c[1] as f64, c[2] as f64);
            let g = self.gradient(c);

            // Linear weights, not smoothstep: surface and color detail depend on it.
            let w = (1.0 - dist.x.abs()) * (1.0 - dist.y.abs()) * (1.0 - dist.z.abs());
            total += w * dist.dot(&g);
        }
        total
    }

    fn gradient(&self, cell: [i64; 3]) -> Vector3<f64> {
        let mut gradients = self.gradients.borrow_mut();
        *gradients.entry(cell).or_insert_with(|| {
            let mut rng = self.rng.borrow_mut();
            Vector3::new(
                random_component(&mut rng),
                random_component(&mut rng),
                random_component(&mut rng),
            )
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
