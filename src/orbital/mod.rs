pub mod elements;

pub use elements::{
    apoapsis_radius, apsides, eccentricity, orbit_energy, periapsis_radius, semi_major_axis,
    specific_energy, Apsides,
};
