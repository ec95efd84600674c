//! JSON scene descriptions.
//!
//! A scene file names its materials once and lets spheres refer to them
//! by name, so every sphere using "glass" shares one material instance.
//!
//! ```json
//! {
//!   "camera": { "image_width": 400, "vfov": 90.0, "look_from": [0, 0, 3] },
//!   "materials": {
//!     "ground": { "type": "lambertian", "albedo": [0.7, 0.2, 0.5] },
//!     "glass":  { "type": "dielectric", "ior": 1.5, "tint": [1, 1, 1] }
//!   },
//!   "spheres": [
//!     { "center": [0, -100.5, -1], "radius": 100, "material": "ground" },
//!     { "center": [0, 0, -1], "radius": 0.5, "material": "glass", "visible": false }
//!   ]
//! }
//! ```

use crate::{
    Camera, CameraConfig, Color, Dielectric, HittableList, Lambertian, Material, Metal, Sphere,
};
use lumen_math::Point3;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while loading or building a scene.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown material: {0}")]
    UnknownMaterial(String),

    #[error("Invalid material {name}: {reason}")]
    InvalidMaterial { name: String, reason: String },

    #[error("Invalid sphere #{index}: {reason}")]
    InvalidSphere { index: usize, reason: String },
}

/// A material entry in a scene file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MaterialDesc {
    Lambertian {
        albedo: Color,
    },
    Metal {
        albedo: Color,
        #[serde(default)]
        fuzz: f64,
    },
    Dielectric {
        ior: f64,
        #[serde(default = "white")]
        tint: Color,
    },
}

fn white() -> Color {
    Color::ONE
}

fn visible_by_default() -> bool {
    true
}

impl MaterialDesc {
    /// Instantiate the material, checking its parameters.
    fn build(&self, name: &str) -> Result<Arc<dyn Material>, SceneError> {
        let invalid = |reason: &str| SceneError::InvalidMaterial {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        let material: Arc<dyn Material> = match *self {
            MaterialDesc::Lambertian { albedo } => {
                if !albedo.is_finite() {
                    return Err(invalid("albedo must be finite"));
                }
                Arc::new(Lambertian::new(albedo))
            }
            MaterialDesc::Metal { albedo, fuzz } => {
                if !albedo.is_finite() || !fuzz.is_finite() {
                    return Err(invalid("albedo and fuzz must be finite"));
                }
                if !(0.0..=1.0).contains(&fuzz) {
                    log::warn!("Material {} has fuzz {} outside [0, 1], clamping", name, fuzz);
                }
                Arc::new(Metal::new(albedo, fuzz))
            }
            MaterialDesc::Dielectric { ior, tint } => {
                if !tint.is_finite() || !ior.is_finite() || ior <= 0.0 {
                    return Err(invalid("ior must be positive and tint finite"));
                }
                Arc::new(Dielectric::new(ior, tint))
            }
        };
        Ok(material)
    }
}

/// A sphere entry in a scene file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphereDesc {
    pub center: Point3,
    pub radius: f64,
    /// Name of an entry in the scene's material table
    pub material: String,
    #[serde(default = "visible_by_default")]
    pub visible: bool,
}

/// A complete scene file: camera settings, named materials, and spheres.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub camera: CameraConfig,
    pub materials: BTreeMap<String, MaterialDesc>,
    pub spheres: Vec<SphereDesc>,
}

/// A built scene, ready to render.
pub struct Scene {
    pub world: HittableList,
    pub camera: Camera,
}

impl SceneDescription {
    /// Parse a scene from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a scene file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let scene = Self::from_json_str(&json)?;
        log::info!(
            "Loaded {} materials and {} spheres from {}",
            scene.materials.len(),
            scene.spheres.len(),
            path.display()
        );
        Ok(scene)
    }

    /// Serialize back to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, SceneError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Instantiate materials and spheres and set up the camera.
    ///
    /// The camera is not initialized here; rendering does that.
    pub fn build(&self) -> Result<Scene, SceneError> {
        let mut materials: HashMap<&str, Arc<dyn Material>> = HashMap::new();
        for (name, desc) in &self.materials {
            materials.insert(name.as_str(), desc.build(name)?);
        }

        let mut used = HashSet::new();
        let mut world = HittableList::new();
        for (index, desc) in self.spheres.iter().enumerate() {
            if !desc.center.is_finite() {
                return Err(SceneError::InvalidSphere {
                    index,
                    reason: "center must be finite".to_string(),
                });
            }
            if !desc.radius.is_finite() || desc.radius <= 0.0 {
                return Err(SceneError::InvalidSphere {
                    index,
                    reason: format!("radius must be positive, got {}", desc.radius),
                });
            }

            let material = materials
                .get(desc.material.as_str())
                .ok_or_else(|| SceneError::UnknownMaterial(desc.material.clone()))?;
            used.insert(desc.material.as_str());

            world.add(
                Sphere::new(desc.center, desc.radius, Arc::clone(material))
                    .with_visibility(desc.visible),
            );
        }

        for name in self.materials.keys() {
            if !used.contains(name.as_str()) {
                log::warn!("Material {} is never used", name);
            }
        }

        log::info!("Built scene with {} objects", world.len());
        Ok(Scene {
            world,
            camera: Camera::new(self.camera.clone()),
        })
    }

    /// The demo scene: a ground sphere, two diffuse spheres, a metal ball
    /// inside a glass shell, and a tinted high-index glass sphere.
    pub fn demo() -> Self {
        let materials = [
            ("ground", MaterialDesc::Lambertian { albedo: Color::new(0.7, 0.2, 0.5) }),
            ("diffuse", MaterialDesc::Lambertian { albedo: Color::new(0.2, 0.7, 0.5) }),
            ("diffuse_2", MaterialDesc::Lambertian { albedo: Color::new(1.0, 0.3, 0.1) }),
            ("metallic", MaterialDesc::Metal { albedo: Color::new(0.9, 0.2, 0.0), fuzz: 0.1 }),
            ("glass", MaterialDesc::Dielectric { ior: 1.5, tint: Color::ONE }),
            ("glass_2", MaterialDesc::Dielectric { ior: 2.7, tint: Color::new(1.0, 1.0, 0.2) }),
        ]
        .into_iter()
        .map(|(name, desc)| (name.to_string(), desc))
        .collect();

        let sphere = |center: [f64; 3], radius: f64, material: &str| SphereDesc {
            center: Point3::from_array(center),
            radius,
            material: material.to_string(),
            visible: true,
        };

        let spheres = vec![
            sphere([0.0, -100.5, -1.0], 100.0, "ground"),
            sphere([0.0, 0.0, -1.0], 0.5, "diffuse"),
            sphere([0.0, 0.0, 1.0], 0.5, "diffuse_2"),
            sphere([-1.0, 0.0, -1.0], 0.5, "glass"),
            sphere([-1.0, 0.0, -1.0], 0.3, "metallic"),
            sphere([1.0, 0.0, -1.0], 0.5, "glass_2"),
        ];

        let camera = CameraConfig {
            aspect_ratio: 1.0,
            image_width: 12,
            samples_per_pixel: 5,
            max_depth: 2,
            vfov: 90.0,
            look_from: Point3::new(0.0, 0.0, 3.0),
            look_at: Point3::ZERO,
            vup: Point3::Y,
            defocus_angle: 0.0,
            focus_dist: 5.0,
            ..CameraConfig::default()
        };

        Self {
            camera,
            materials,
            spheres,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Hittable, ImageBuffer};
    use lumen_math::{DVec3, Interval, Ray};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SCENE: &str = r#"{
        "camera": { "image_width": 16, "samples_per_pixel": 2, "look_from": [0, 0, 2] },
        "materials": {
            "gray": { "type": "lambertian", "albedo": [0.5, 0.5, 0.5] },
            "mirror": { "type": "metal", "albedo": [0.9, 0.9, 0.9] },
            "glass": { "type": "dielectric", "ior": 1.5 }
        },
        "spheres": [
            { "center": [0, 0, -1], "radius": 0.5, "material": "gray" },
            { "center": [1, 0, -1], "radius": 0.5, "material": "mirror" },
            { "center": [-1, 0, -1], "radius": 0.5, "material": "glass", "visible": false }
        ]
    }"#;

    #[test]
    fn test_parse_with_defaults() {
        let desc = SceneDescription::from_json_str(SCENE).unwrap();

        assert_eq!(desc.camera.image_width, 16);
        assert_eq!(desc.camera.look_from, DVec3::new(0.0, 0.0, 2.0));
        // Unspecified camera fields keep their defaults
        assert_eq!(desc.camera.max_depth, CameraConfig::default().max_depth);

        assert_eq!(
            desc.materials["mirror"],
            MaterialDesc::Metal { albedo: Color::splat(0.9), fuzz: 0.0 }
        );
        assert_eq!(
            desc.materials["glass"],
            MaterialDesc::Dielectric { ior: 1.5, tint: Color::ONE }
        );
        assert!(desc.spheres[0].visible);
        assert!(!desc.spheres[2].visible);
    }

    #[test]
    fn test_build_and_hit() {
        let scene = SceneDescription::from_json_str(SCENE).unwrap().build().unwrap();
        assert_eq!(scene.world.len(), 3);

        let forward = Interval::new(0.001, f64::INFINITY);
        let ray = Ray::new(DVec3::ZERO, DVec3::NEG_Z);
        let rec = scene.world.hit(&ray, forward).expect("gray sphere");
        assert!((rec.t - 0.5).abs() < 1e-12);

        // The glass sphere is hidden
        let ray = Ray::new(DVec3::new(-1.0, 0.0, 0.0), DVec3::NEG_Z);
        assert!(scene.world.hit(&ray, forward).is_none());
    }

    #[test]
    fn test_spheres_share_materials() {
        let json = r#"{
            "materials": { "gray": { "type": "lambertian", "albedo": [0.5, 0.5, 0.5] } },
            "spheres": [
                { "center": [0, 0, -1], "radius": 0.5, "material": "gray" },
                { "center": [0, 0, -3], "radius": 0.5, "material": "gray" }
            ]
        }"#;
        let scene = SceneDescription::from_json_str(json).unwrap().build().unwrap();

        let forward = Interval::new(0.001, f64::INFINITY);
        let near = scene.world.hit(&Ray::new(DVec3::ZERO, DVec3::NEG_Z), forward).unwrap();
        let far = scene
            .world
            .hit(&Ray::new(DVec3::new(0.0, 0.0, -2.0), DVec3::NEG_Z), forward)
            .unwrap();
        assert!(std::ptr::addr_eq(
            near.material as *const dyn Material,
            far.material as *const dyn Material
        ));
    }

    #[test]
    fn test_unknown_material() {
        let json = r#"{ "spheres": [ { "center": [0, 0, 0], "radius": 1, "material": "nope" } ] }"#;
        let err = SceneDescription::from_json_str(json).unwrap().build().err().unwrap();
        assert!(matches!(err, SceneError::UnknownMaterial(name) if name == "nope"));
    }

    #[test]
    fn test_invalid_sphere_radius() {
        let json = r#"{
            "materials": { "gray": { "type": "lambertian", "albedo": [0.5, 0.5, 0.5] } },
            "spheres": [ { "center": [0, 0, 0], "radius": -1, "material": "gray" } ]
        }"#;
        let err = SceneDescription::from_json_str(json).unwrap().build().err().unwrap();
        assert!(matches!(err, SceneError::InvalidSphere { index: 0, .. }));
    }

    #[test]
    fn test_invalid_dielectric() {
        let json = r#"{ "materials": { "bad": { "type": "dielectric", "ior": 0 } } }"#;
        let err = SceneDescription::from_json_str(json).unwrap().build().err().unwrap();
        assert!(matches!(err, SceneError::InvalidMaterial { ref name, .. } if name == "bad"));
    }

    #[test]
    fn test_parse_error() {
        let err = SceneDescription::from_json_str("{ \"spheres\": 3 }").unwrap_err();
        assert!(matches!(err, SceneError::Parse(_)));

        let json = r#"{ "materials": { "x": { "type": "plastic" } } }"#;
        let err = SceneDescription::from_json_str(json).unwrap_err();
        assert!(matches!(err, SceneError::Parse(_)));
    }

    #[test]
    fn test_json_round_trip_of_demo() {
        let demo = SceneDescription::demo();
        let json = demo.to_json_string().unwrap();
        assert_eq!(SceneDescription::from_json_str(&json).unwrap(), demo);
    }

    #[test]
    fn test_demo_renders() {
        let Scene { world, mut camera } = SceneDescription::demo().build().unwrap();
        assert_eq!(world.len(), 6);

        let mut image = ImageBuffer::default();
        camera
            .render(&world, &mut StdRng::seed_from_u64(2024), &mut image)
            .unwrap();
        assert_eq!(image.pixels.len(), 12 * 12);
        assert!(image.pixels.iter().all(|c| c.is_finite() && c.min_element() >= 0.0));
    }
}
