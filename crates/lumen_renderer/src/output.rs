//! Pixel sinks: where finished pixels go.
//!
//! The camera hands every sink the raw sample sum and the sample count;
//! each sink decides how to turn that into stored values.

use crate::Color;
use lumen_math::Interval;
use std::io::{self, Write};

/// Consumer of a row-major, top-to-bottom stream of pixels.
pub trait PixelSink {
    /// Called once before the first pixel.
    fn begin(&mut self, width: u32, height: u32) -> io::Result<()>;

    /// Receive one pixel as the sum of `samples` radiance samples.
    fn write_pixel(&mut self, color_sum: Color, samples: u32) -> io::Result<()>;

    /// Called once after the last pixel.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Apply gamma correction (gamma = 2.0).
///
/// Negative and NaN inputs map to zero.
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert an accumulated sample sum to 8-bit RGB.
///
/// Average, gamma correct, clamp to [0, 0.999], then scale by 256 and
/// truncate.
pub fn color_to_rgb(color_sum: Color, samples: u32) -> [u8; 3] {
    const INTENSITY: Interval = Interval::new(0.0, 0.999);

    let scale = 1.0 / samples.max(1) as f64;
    let channel = |c: f64| (256.0 * INTENSITY.clamp(linear_to_gamma(c * scale))) as u8;

    [
        channel(color_sum.x),
        channel(color_sum.y),
        channel(color_sum.z),
    ]
}

/// Plain-text PPM (P3) writer.
pub struct PpmWriter<W: Write> {
    out: W,
}

impl<W: Write> PpmWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> PixelSink for PpmWriter<W> {
    fn begin(&mut self, width: u32, height: u32) -> io::Result<()> {
        write!(self.out, "P3\n{} {}\n255\n", width, height)
    }

    fn write_pixel(&mut self, color_sum: Color, samples: u32) -> io::Result<()> {
        let [r, g, b] = color_to_rgb(color_sum, samples);
        writeln!(self.out, "{} {} {}", r, g, b)
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// In-memory image of averaged linear colors.
#[derive(Debug, Clone, Default)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

impl PixelSink for ImageBuffer {
    fn begin(&mut self, width: u32, height: u32) -> io::Result<()> {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        Ok(())
    }

    fn write_pixel(&mut self, color_sum: Color, samples: u32) -> io::Result<()> {
        self.pixels.push(color_sum / samples.max(1) as f64);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-1.0), 0.0);
        assert_eq!(linear_to_gamma(f64::NAN), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 1e-12);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_color_to_rgb_values() {
        assert_eq!(color_to_rgb(Color::ZERO, 4), [0, 0, 0]);
        // 4 samples of white average to 1.0, clamped to 0.999
        assert_eq!(color_to_rgb(Color::splat(4.0), 4), [255, 255, 255]);
        // 0.25 -> sqrt 0.5 -> 128
        assert_eq!(color_to_rgb(Color::new(0.5, 1.0, 0.0), 2), [128, 181, 0]);
    }

    #[test]
    fn test_color_to_rgb_stays_in_range() {
        let sums = [0.0, 1e-6, 0.3, 1.0, 7.5, 1e9, f64::INFINITY];
        for samples in [1, 3, 100] {
            for &s in &sums {
                // Every value fits in a u8, so the check is that no panics or
                // wraparound happen at the top end
                let [r, _, _] = color_to_rgb(Color::splat(s), samples);
                if s >= samples as f64 {
                    assert_eq!(r, 255);
                }
            }
        }
    }

    #[test]
    fn test_ppm_writer_format() {
        let mut sink = PpmWriter::new(Vec::new());
        sink.begin(2, 1).unwrap();
        sink.write_pixel(Color::ZERO, 1).unwrap();
        sink.write_pixel(Color::ONE, 1).unwrap();
        sink.finish().unwrap();

        let text = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(text, "P3\n2 1\n255\n0 0 0\n255 255 255\n");
    }

    #[test]
    fn test_image_buffer_averages() {
        let mut image = ImageBuffer::default();
        image.begin(1, 2).unwrap();
        image.write_pixel(Color::splat(2.0), 4).unwrap();
        image.write_pixel(Color::new(3.0, 0.0, 0.0), 3).unwrap();

        assert_eq!(image.get(0, 0), Color::splat(0.5));
        assert_eq!(image.get(0, 1), Color::new(1.0, 0.0, 0.0));
        assert_eq!(image.pixels.len(), 2);
    }

    #[test]
    fn test_image_buffer_dimensions_past_u32_area() {
        // 70_000 * 70_000 does not fit in a u32.
        let mut image = ImageBuffer::default();
        image.begin(70_000, 70_000).unwrap();
        image.write_pixel(Color::splat(3.0), 3).unwrap();

        assert_eq!(image.width, 70_000);
        assert_eq!(image.height, 70_000);
        assert_eq!(image.get(0, 0), Color::ONE);
        assert_eq!(image.index(5, 69_999), 69_999 * 70_000 + 5);
    }
}
