pub mod lander;

pub use lander::{Lander, LanderAttribute, LanderAttributes, LanderVisual, ParachuteStatus};
