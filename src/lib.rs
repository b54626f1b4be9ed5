pub mod config;
pub mod direction;
pub mod error;
pub mod grid;
pub mod logging;
pub mod ray;
pub mod raycast;
pub mod snapshot;
pub mod stepper;
pub mod tiles;

pub use error::{Error, Result};
pub use grid::{Aabb, Axis, Grid};
pub use ray::Ray;
pub use raycast::{traverse, traverse_with, CornerPolicy, ImpactEvent, Outcome, Traversal, TraversalOptions};
pub use stepper::AxisStop;
pub use tiles::TileAnomaly;
