//! Simple path tracer example.
//!
//! Builds a small scene in code and saves it as `output.ppm`.

use lumen_renderer::{
    Camera, Color, Dielectric, HittableList, Lambertian, Metal, Point3, PpmWriter, Sphere, DVec3,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::BufWriter;
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let world = build_scene();

    let mut camera = Camera::default()
        .with_resolution(400, 16.0 / 9.0)
        .with_quality(50, 10)
        .with_position(
            Point3::new(-2.0, 2.0, 1.0), // look_from
            Point3::new(0.0, 0.0, -1.0), // look_at
            DVec3::Y,                    // vup
        )
        .with_lens(30.0, 2.0, 3.4);

    let filename = "output.ppm";
    let mut sink = PpmWriter::new(BufWriter::new(File::create(filename)?));
    let mut rng = StdRng::seed_from_u64(7);

    let start = std::time::Instant::now();
    camera.render(&world, &mut rng, &mut sink)?;
    println!("Rendered {} in {:?}", filename, start.elapsed());

    Ok(())
}

fn build_scene() -> HittableList {
    let ground = Arc::new(Lambertian::new(Color::new(0.8, 0.8, 0.0)));
    let center = Arc::new(Lambertian::new(Color::new(0.1, 0.2, 0.5)));
    let glass = Arc::new(Dielectric::clear(1.5));
    let gold = Arc::new(Metal::new(Color::new(0.8, 0.6, 0.2), 0.3));

    let mut world = HittableList::new();
    world.add(Sphere::new(Point3::new(0.0, -100.5, -1.0), 100.0, ground));
    world.add(Sphere::new(Point3::new(0.0, 0.0, -1.2), 0.5, center));
    // Glass ball nested inside a glass shell
    world.add(Sphere::new(Point3::new(-1.0, 0.0, -1.0), 0.5, glass.clone()));
    world.add(Sphere::new(Point3::new(-1.0, 0.0, -1.0), 0.4, glass));
    world.add(Sphere::new(Point3::new(1.0, 0.0, -1.0), 0.5, gold));
    world
}
