//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing bounded by a fixed depth
//! - Light sampling mixed with material sampling (one-sample MIS)
//! - Stratified anti-aliasing, one parallel task per scanline

use crate::material::ScatterKind;
use crate::pdf::{HittablePdf, MixturePdf};
use crate::{Camera, Color, Hittable, Pdf, Ray};
use lumen_math::Interval;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// Hits closer than this are treated as self-intersections.
const SHADOW_ACNE_EPSILON: f32 = 0.001;

/// Compute the radiance carried back along `ray`.
///
/// `lights` is the aggregate sampled for direct lighting; it is usually a
/// subset of `world`. An empty aggregate has zero density everywhere, which
/// leaves only material sampling in the mixture.
pub fn ray_color(
    ray: &Ray,
    depth: u32,
    world: &dyn Hittable,
    lights: &dyn Hittable,
    background: Color,
    rng: &mut dyn RngCore,
) -> Color {
    // Out of bounce budget: no more light gathered
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(SHADOW_ACNE_EPSILON, f32::INFINITY)) else {
        return background;
    };

    let emission = rec.material.emitted(ray, &rec, rec.u, rec.v, rec.p);

    let Some(srec) = rec.material.scatter(ray, &rec, rng) else {
        return emission;
    };

    let material_pdf = match srec.kind {
        ScatterKind::SkipPdf(skip_ray) => {
            return srec.attenuation
                * ray_color(&skip_ray, depth - 1, world, lights, background, rng);
        }
        ScatterKind::Pdf(pdf) => pdf,
    };

    let light_pdf = HittablePdf::new(lights, rec.p);
    let mixture = MixturePdf::new(&light_pdf, material_pdf.as_ref());

    let scattered = Ray::new(rec.p, mixture.generate(rng), ray.time());
    let pdf_value = mixture.value(scattered.direction());

    // A zero or non-finite density would turn the estimate into inf/NaN
    if !(pdf_value.is_finite() && pdf_value > 0.0) {
        return emission;
    }

    let scattering_pdf = rec.material.scattering_pdf(ray, &rec, &scattered);
    let sample_color = ray_color(&scattered, depth - 1, world, lights, background, rng);

    emission + (srec.attenuation * scattering_pdf * sample_color) / pdf_value
}

/// Render a single pixel with stratified multi-sampling.
///
/// Samples whose radiance is not finite are dropped from the sum.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    lights: &dyn Hittable,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for s_j in 0..camera.sqrt_spp() {
        for s_i in 0..camera.sqrt_spp() {
            let ray = camera.get_ray(x, y, s_i, s_j, rng);
            let sample = ray_color(&ray, camera.max_depth, world, lights, camera.background, rng);
            if sample.is_finite() {
                pixel_color += sample;
            }
        }
    }

    pixel_color * camera.samples_scale()
}

/// Simple image buffer for storing render output.
///
/// Pixels are linear radiance, row-major from the top row down.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Convert to gamma-corrected RGB bytes.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgb8(*color));
        }
        bytes
    }
}

/// Apply gamma correction (gamma = 2.0).
///
/// Non-positive values and NaN map to 0.
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to 8-bit RGB.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let intensity = Interval::new(0.000, 0.999);
    let channel = |c: f32| (256.0 * intensity.clamp(linear_to_gamma(c))) as u8;
    [channel(color.x), channel(color.y), channel(color.z)]
}

/// Render the entire scene to an image buffer.
///
/// Initializes the camera, then renders scanlines in parallel. Each
/// scanline draws from its own generator seeded by `camera.seed` and the
/// row index, so output is reproducible regardless of thread count.
pub fn render(camera: &mut Camera, world: &dyn Hittable, lights: &dyn Hittable) -> ImageBuffer {
    camera.initialize();
    let camera: &Camera = camera;

    let width = camera.image_width;
    let height = camera.image_height();
    log::info!(
        "Rendering {}x{} at {} spp (max depth {}) on {} threads",
        width,
        height,
        camera.sqrt_spp() * camera.sqrt_spp(),
        camera.max_depth,
        rayon::current_num_threads()
    );

    let start = Instant::now();
    let done = AtomicUsize::new(0);

    let rows: Vec<Vec<Color>> = (0..height)
        .into_par_iter()
        .map(|j| {
            let mut rng = StdRng::seed_from_u64(scanline_seed(camera.seed, j));
            let row = (0..width)
                .map(|i| render_pixel(camera, world, lights, i, j, &mut rng))
                .collect();

            let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
            log::debug!("Scanlines remaining: {}", height as usize - finished);
            row
        })
        .collect();

    log::info!("Render finished in {:.2?}", start.elapsed());

    ImageBuffer {
        width,
        height,
        pixels: rows.into_iter().flatten().collect(),
    }
}

/// Decorrelate neighbouring rows before seeding.
#[inline]
fn scanline_seed(seed: u64, row: u32) -> u64 {
    seed ^ (row as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
