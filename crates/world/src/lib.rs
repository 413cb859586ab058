mod geometry;
mod occupancy;
mod persist;
mod recipe;
mod station;

pub use geometry::*;
pub use occupancy::*;
pub use persist::*;
pub use recipe::*;
pub use station::*;
