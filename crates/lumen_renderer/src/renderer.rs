//! Core path tracing integrator.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with configurable depth
//! - A vertical sky gradient for rays that escape the scene

use crate::{Color, Hittable};
use lumen_math::{Interval, Ray};
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Lower bound for accepted hits; keeps scattered rays from
/// re-hitting the surface they left.
pub const SHADOW_ACNE_EPSILON: f64 = 0.001;

/// Background seen by rays that miss everything.
///
/// Blends from `horizon` (straight down) to `zenith` (straight up) based
/// on the ray's normalized vertical component.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyGradient {
    pub horizon: Color,
    pub zenith: Color,
}

impl Default for SkyGradient {
    fn default() -> Self {
        Self {
            horizon: Color::ONE,
            zenith: Color::new(0.2, 0.4, 0.8),
        }
    }
}

impl SkyGradient {
    /// Background color for a ray.
    pub fn color(&self, ray: &Ray) -> Color {
        let unit_direction = ray.direction().normalize_or_zero();
        let a = 0.5 * (unit_direction.y + 1.0);
        (1.0 - a) * self.horizon + a * self.zenith
    }
}

/// Compute the color seen by a ray.
///
/// Traces the ray through the scene, bouncing off surfaces and
/// attenuating by each material until the ray escapes, is absorbed, or
/// `depth` runs out.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    sky: &SkyGradient,
    rng: &mut dyn RngCore,
) -> Color {
    // If we've exceeded max depth, return black (no light)
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(SHADOW_ACNE_EPSILON, f64::INFINITY)) else {
        return sky.color(ray);
    };

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            result.attenuation * ray_color(&result.scattered, world, depth - 1, sky, rng)
        }
        None => Color::ZERO,
    }
}
