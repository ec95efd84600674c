//! Math types shared by the Lumen crates.
//!
//! Vector algebra comes from glam; everything runs in double precision.

// Re-export glam for convenience
pub use glam::*;

mod interval;
mod ray;
pub use interval::Interval;
pub use ray::Ray;

/// A point in 3D space.
pub type Point3 = DVec3;

/// Linear RGB color, one f64 per channel.
pub type Color = DVec3;
