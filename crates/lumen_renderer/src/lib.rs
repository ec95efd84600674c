//! Lumen renderer - CPU path tracing
//!
//! A recursive Monte Carlo ray tracer for scenes made of spheres with
//! diffuse, metal, and glass materials.
//!
//! All randomness flows through an explicit `&mut dyn RngCore`, so a
//! seeded generator reproduces a render exactly.

mod camera;
mod error;
mod hittable;
mod material;
mod output;
mod renderer;
pub mod sampling;
pub mod scene;
mod sphere;

pub use camera::{Camera, CameraConfig};
pub use error::{RenderError, Result};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{reflect, refract, Dielectric, Lambertian, Material, Metal, ScatterResult};
pub use output::{color_to_rgb, linear_to_gamma, ImageBuffer, PixelSink, PpmWriter};
pub use renderer::{ray_color, SkyGradient, SHADOW_ACNE_EPSILON};
pub use scene::{Scene, SceneDescription, SceneError};
pub use sphere::Sphere;

/// Re-export common math types from lumen_math
pub use lumen_math::{Color, DVec3, Interval, Point3, Ray};
