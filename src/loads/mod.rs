//! Load types, registries and load combinations

mod combination;
mod concentrated;
mod registry;
mod udl;

pub use combination::LoadCombination;
pub use concentrated::{PointLoad, PointMass};
pub use registry::{LoadRegistry, MassRegistry};
pub use udl::Udl;
