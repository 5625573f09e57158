pub mod attitude;
pub mod controller;
pub mod pid;

pub use attitude::FlightComputer;
pub use controller::Controller;
pub use pid::Pid;
