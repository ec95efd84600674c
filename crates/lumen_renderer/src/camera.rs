//! Camera for ray generation and the pixel loop.

use crate::error::{RenderError, Result};
use crate::output::PixelSink;
use crate::renderer::{ray_color, SkyGradient};
use crate::sampling::{random_in_unit_disk, sample_square};
use crate::{Color, Hittable};
use lumen_math::{DVec3, Point3, Ray};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// User-facing camera settings.
///
/// Everything the camera derives (image height, basis vectors, pixel
/// grid) is computed from these by [`Camera::initialize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Ratio of image width over height
    pub aspect_ratio: f64,
    /// Rendered image width in pixels
    pub image_width: u32,
    /// Random samples per pixel
    pub samples_per_pixel: u32,
    /// Maximum number of ray bounces
    pub max_depth: u32,

    /// Vertical field of view in degrees
    pub vfov: f64,
    pub look_from: Point3,
    pub look_at: Point3,
    /// Camera-relative "up" hint
    pub vup: DVec3,

    /// Variation angle of rays through each pixel, in degrees
    pub defocus_angle: f64,
    /// Distance from camera to plane of perfect focus
    pub focus_dist: f64,

    pub background: SkyGradient,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: 1.0,
            image_width: 100,
            samples_per_pixel: 10,
            max_depth: 10,
            vfov: 50.0,
            look_from: Point3::new(0.0, 0.0, -1.0),
            look_at: Point3::ZERO,
            vup: DVec3::Y,
            defocus_angle: 0.0,
            focus_dist: 10.0,
            background: SkyGradient::default(),
        }
    }
}

impl CameraConfig {
    /// Check that the settings describe a renderable camera.
    pub fn validate(&self) -> Result<()> {
        if self.image_width == 0 {
            return Err(RenderError::invalid("image_width", "must be at least 1"));
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::invalid("samples_per_pixel", "must be at least 1"));
        }
        if self.max_depth == 0 {
            return Err(RenderError::invalid("max_depth", "must be at least 1"));
        }
        if !self.aspect_ratio.is_finite() || self.aspect_ratio <= 0.0 {
            return Err(RenderError::invalid(
                "aspect_ratio",
                format!("must be positive and finite, got {}", self.aspect_ratio),
            ));
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(RenderError::invalid(
                "vfov",
                format!("must be in (0, 180) degrees, got {}", self.vfov),
            ));
        }
        if !self.focus_dist.is_finite() || self.focus_dist <= 0.0 {
            return Err(RenderError::invalid(
                "focus_dist",
                format!("must be positive and finite, got {}", self.focus_dist),
            ));
        }
        if !(self.defocus_angle >= 0.0 && self.defocus_angle < 180.0) {
            return Err(RenderError::invalid(
                "defocus_angle",
                format!("must be in [0, 180) degrees, got {}", self.defocus_angle),
            ));
        }
        if !self.look_from.is_finite() || !self.look_at.is_finite() || !self.vup.is_finite() {
            return Err(RenderError::invalid("look_from", "camera vectors must be finite"));
        }

        let view = self.look_from - self.look_at;
        if view.length_squared() == 0.0 {
            return Err(RenderError::invalid("look_at", "must differ from look_from"));
        }
        if self.vup.cross(view).length_squared() <= 1e-12 * view.length_squared() {
            return Err(RenderError::invalid(
                "vup",
                "must not be zero or parallel to the view direction",
            ));
        }

        Ok(())
    }

    /// Image height implied by width and aspect ratio (at least 1).
    pub fn image_height(&self) -> u32 {
        ((self.image_width as f64 / self.aspect_ratio) as u32).max(1)
    }
}

/// Camera for generating rays into the scene.
#[derive(Debug, Clone)]
pub struct Camera {
    config: CameraConfig,
    initialized: bool,

    // Cached computed values (set by initialize())
    image_height: u32,
    center: Point3,
    pixel00_loc: Point3,
    pixel_delta_u: DVec3,
    pixel_delta_v: DVec3,
    u: DVec3,
    v: DVec3,
    w: DVec3,
    defocus_disk_u: DVec3,
    defocus_disk_v: DVec3,
}

impl Camera {
    /// Create a camera from settings. Call [`Camera::initialize`] (or
    /// [`Camera::render`], which does it) before generating rays.
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            initialized: false,
            image_height: 1,
            center: Point3::ZERO,
            pixel00_loc: Point3::ZERO,
            pixel_delta_u: DVec3::ZERO,
            pixel_delta_v: DVec3::ZERO,
            u: DVec3::X,
            v: DVec3::Y,
            w: DVec3::Z,
            defocus_disk_u: DVec3::ZERO,
            defocus_disk_v: DVec3::ZERO,
        }
    }

    /// Set image width and aspect ratio.
    pub fn with_resolution(mut self, image_width: u32, aspect_ratio: f64) -> Self {
        let config = self.config_mut();
        config.image_width = image_width;
        config.aspect_ratio = aspect_ratio;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        let config = self.config_mut();
        config.samples_per_pixel = samples_per_pixel;
        config.max_depth = max_depth;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Point3, look_at: Point3, vup: DVec3) -> Self {
        let config = self.config_mut();
        config.look_from = look_from;
        config.look_at = look_at;
        config.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f64, defocus_angle: f64, focus_dist: f64) -> Self {
        let config = self.config_mut();
        config.vfov = vfov;
        config.defocus_angle = defocus_angle;
        config.focus_dist = focus_dist;
        self
    }

    /// Set the background gradient.
    pub fn with_background(mut self, background: SkyGradient) -> Self {
        self.config_mut().background = background;
        self
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Mutable access to the settings. Derived state is recomputed on the
    /// next [`Camera::initialize`].
    pub fn config_mut(&mut self) -> &mut CameraConfig {
        self.initialized = false;
        &mut self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Image height in pixels (valid after initialization).
    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    /// Eye position rays start from when there is no defocus blur.
    pub fn center(&self) -> Point3 {
        self.center
    }

    /// Camera basis: right, up, and back (away from the target).
    pub fn basis(&self) -> (DVec3, DVec3, DVec3) {
        (self.u, self.v, self.w)
    }

    /// Center of the top-left pixel.
    pub fn pixel00_loc(&self) -> Point3 {
        self.pixel00_loc
    }

    /// Pixel-to-pixel offsets across and down the viewport.
    pub fn pixel_deltas(&self) -> (DVec3, DVec3) {
        (self.pixel_delta_u, self.pixel_delta_v)
    }

    /// Validate the settings and derive the viewport geometry.
    ///
    /// Does nothing if the camera is already initialized and the settings
    /// have not been touched since.
    pub fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }
        self.config.validate()?;

        let config = &self.config;
        self.image_height = config.image_height();
        self.center = config.look_from;

        // Calculate viewport dimensions
        let theta = config.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * config.focus_dist;
        let viewport_width =
            viewport_height * (config.image_width as f64 / self.image_height as f64);

        // Calculate camera basis vectors
        self.w = (config.look_from - config.look_at).normalize();
        self.u = config.vup.cross(self.w).normalize();
        self.v = self.w.cross(self.u);

        // Vectors across the horizontal and down the vertical viewport edges
        let viewport_u = viewport_width * self.u;
        let viewport_v = -viewport_height * self.v;

        self.pixel_delta_u = viewport_u / config.image_width as f64;
        self.pixel_delta_v = viewport_v / self.image_height as f64;

        let viewport_upper_left =
            self.center - config.focus_dist * self.w - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        // Calculate defocus disk basis vectors
        let defocus_radius = config.focus_dist * (config.defocus_angle / 2.0).to_radians().tan();
        self.defocus_disk_u = self.u * defocus_radius;
        self.defocus_disk_v = self.v * defocus_radius;

        self.initialized = true;
        Ok(())
    }

    /// Generate a ray for pixel (i, j) with random sampling.
    ///
    /// The ray starts at the camera center, or on the defocus disk when
    /// the defocus angle is positive, and passes through a random point
    /// in the pixel's square around its center.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);

        let pixel_sample = self.pixel00_loc
            + ((i as f64) + offset.x) * self.pixel_delta_u
            + ((j as f64) + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.config.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        Ray::new(ray_origin, pixel_sample - ray_origin)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Point3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }

    /// Sum of `samples_per_pixel` radiance samples for pixel (i, j).
    pub fn sample_pixel(
        &self,
        world: &dyn Hittable,
        i: u32,
        j: u32,
        rng: &mut dyn RngCore,
    ) -> Color {
        let mut pixel_color = Color::ZERO;
        for _ in 0..self.config.samples_per_pixel {
            let ray = self.get_ray(i, j, rng);
            pixel_color += ray_color(
                &ray,
                world,
                self.config.max_depth,
                &self.config.background,
                rng,
            );
        }
        pixel_color
    }

    /// Render the scene into `sink`, top row first, left to right.
    pub fn render(
        &mut self,
        world: &dyn Hittable,
        rng: &mut dyn RngCore,
        sink: &mut dyn PixelSink,
    ) -> Result<()> {
        self.initialize()?;

        let width = self.config.image_width;
        let height = self.image_height;
        let samples = self.config.samples_per_pixel;
        log::info!(
            "Rendering {}x{} @ {} spp, max depth {}",
            width,
            height,
            samples,
            self.config.max_depth
        );

        let start = Instant::now();
        sink.begin(width, height)?;

        for j in 0..height {
            log::debug!("Scanlines remaining: {}", height - j);
            for i in 0..width {
                let pixel_color = self.sample_pixel(world, i, j, rng);
                sink.write_pixel(pixel_color, samples)?;
            }
        }

        sink.finish()?;
        log::info!("Rendered in {:?}", start.elapsed());
        Ok(())
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}
