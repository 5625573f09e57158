pub mod aerodynamics;
pub mod atmosphere;
pub mod gravity;

pub use aerodynamics::drag_force;
pub use atmosphere::Atmosphere;
pub use gravity::gravity_force;
