pub mod body;

pub use body::Body;

/// Gravitational constant in km^3 / (kg * s^2).
pub const GRAVITY: f64 = 6.67e-20;
