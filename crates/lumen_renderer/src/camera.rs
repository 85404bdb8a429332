//! Camera for ray generation.

use crate::{sampling, Color, Ray};
use lumen_math::{degrees_to_radians, Vec3};
use rand::RngCore;

/// Camera for generating rays into the scene.
///
/// The public fields are the configuration. Call [`Camera::initialize`]
/// after changing any of them; it derives the viewport and sampling
/// state and may be called any number of times.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    pub aspect_ratio: f32,
    pub image_width: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    pub background: Color,

    // Camera positioning
    pub vfov: f32, // Vertical field of view in degrees
    pub lookfrom: Vec3,
    pub lookat: Vec3,
    pub vup: Vec3,

    // Lens settings
    pub defocus_angle: f32, // Variation angle of rays through each pixel
    pub focus_dist: f32,    // Distance from lookfrom to plane of perfect focus

    /// Base seed for the per-scanline random streams.
    pub seed: u64,

    // Cached computed values (set by initialize())
    image_height: u32,
    sqrt_spp: u32,
    recip_sqrt_spp: f32,
    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    right: Vec3,
    up: Vec3,
    forward: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            aspect_ratio: 1.0,
            image_width: 100,
            samples_per_pixel: 10,
            max_depth: 10,
            background: Color::ZERO,
            vfov: 90.0,
            lookfrom: Vec3::new(0.0, 0.0, 0.0),
            lookat: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::new(0.0, 1.0, 0.0),
            defocus_angle: 0.0,
            focus_dist: 10.0,
            seed: 0,
            // Cached values (initialized to defaults)
            image_height: 1,
            sqrt_spp: 1,
            recip_sqrt_spp: 1.0,
            center: Vec3::ZERO,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            right: Vec3::X,
            up: Vec3::Y,
            forward: -Vec3::Z,
            defocus_disk_u: Vec3::ZERO,
            defocus_disk_v: Vec3::ZERO,
        }
    }

    /// Set image width and aspect ratio (width over height).
    pub fn with_resolution(mut self, width: u32, aspect_ratio: f32) -> Self {
        self.image_width = width;
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples;
        self.max_depth = max_depth;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, lookfrom: Vec3, lookat: Vec3, vup: Vec3) -> Self {
        self.lookfrom = lookfrom;
        self.lookat = lookat;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, defocus_angle: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    /// Set background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Derive image height, stratification and the viewport from the
    /// public configuration.
    pub fn initialize(&mut self) {
        self.image_height = ((self.image_width as f32 / self.aspect_ratio) as u32).max(1);

        self.sqrt_spp = ((self.samples_per_pixel as f32).sqrt() as u32).max(1);
        self.recip_sqrt_spp = 1.0 / self.sqrt_spp as f32;

        self.center = self.lookfrom;

        // Calculate viewport dimensions
        let theta = degrees_to_radians(self.vfov);
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width =
            viewport_height * (self.image_width as f32 / self.image_height as f32);

        // Calculate camera basis vectors
        self.forward = (self.lookat - self.lookfrom).normalize();
        self.right = self.forward.cross(self.vup).normalize();
        self.up = self.right.cross(self.forward);

        // Calculate viewport vectors
        let viewport_u = viewport_width * self.right;
        let viewport_v = viewport_height * -self.up;

        // Calculate pixel delta vectors
        self.pixel_delta_u = viewport_u / self.image_width as f32;
        self.pixel_delta_v = viewport_v / self.image_height as f32;

        // Calculate upper left pixel location
        let viewport_upper_left =
            self.center + self.focus_dist * self.forward - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        // Calculate defocus disk basis vectors
        let defocus_radius = self.focus_dist * degrees_to_radians(self.defocus_angle / 2.0).tan();
        self.defocus_disk_u = self.right * defocus_radius;
        self.defocus_disk_v = self.up * defocus_radius;
    }

    /// Generate a ray through pixel (i, j), jittered inside the sub-pixel
    /// stratum (s_i, s_j).
    pub fn get_ray(&self, i: u32, j: u32, s_i: u32, s_j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = self.sample_square_stratified(s_i, s_j, rng);

        let pixel_sample = self.pixel00_loc
            + ((i as f32) + offset.x) * self.pixel_delta_u
            + ((j as f32) + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        let ray_direction = pixel_sample - ray_origin;
        let ray_time = sampling::gen_f32(rng);

        Ray::new(ray_origin, ray_direction, ray_time)
    }

    /// Random point in the (s_i, s_j) cell of a `sqrt_spp` grid over the
    /// square [-0.5, 0.5] x [-0.5, 0.5].
    fn sample_square_stratified(&self, s_i: u32, s_j: u32, rng: &mut dyn RngCore) -> Vec3 {
        let px = -0.5 + self.recip_sqrt_spp * (s_i as f32 + sampling::gen_f32(rng));
        let py = -0.5 + self.recip_sqrt_spp * (s_j as f32 + sampling::gen_f32(rng));
        Vec3::new(px, py, 0.0)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Vec3 {
        let p = sampling::random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }

    pub fn image_height(&self) -> u32 {
        self.image_height
    }

    /// Side of the sub-pixel stratification grid.
    pub fn sqrt_spp(&self) -> u32 {
        self.sqrt_spp
    }

    /// Weight of one sample in a pixel average (1 / sqrt_spp²).
    pub fn samples_scale(&self) -> f32 {
        self.recip_sqrt_spp * self.recip_sqrt_spp
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_camera_initialize() {
        let mut camera = Camera::new()
            .with_resolution(800, 2.0)
            .with_position(
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, -1.0),
                Vec3::new(0.0, 1.0, 0.0),
            )
            .with_lens(90.0, 0.0, 1.0);

        camera.initialize();

        assert_eq!(camera.image_height(), 400);
        assert_eq!(camera.center, Vec3::ZERO);
        assert!((camera.forward + Vec3::Z).length() < 0.001);
        assert!((camera.right - Vec3::X).length() < 0.001);
        assert!((camera.up - Vec3::Y).length() < 0.001);
    }

    #[test]
    fn test_image_height_at_least_one() {
        let mut camera = Camera::new().with_resolution(10, 100.0);
        camera.initialize();
        assert_eq!(camera.image_height(), 1);
    }

    #[test]
    fn test_stratification() {
        let mut camera = Camera::new().with_quality(10, 5);
        camera.initialize();
        assert_eq!(camera.sqrt_spp(), 3);
        assert!((camera.samples_scale() - 1.0 / 9.0).abs() < 1e-6);

        camera.samples_per_pixel = 0;
        camera.initialize();
        assert_eq!(camera.sqrt_spp(), 1);
        assert_eq!(camera.samples_scale(), 1.0);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mut camera = Camera::new()
            .with_position(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 0.5, -2.0), Vec3::Y)
            .with_lens(40.0, 2.0, 5.0);

        camera.initialize();
        let first = camera.clone();
        camera.initialize();

        assert_eq!(first.pixel00_loc, camera.pixel00_loc);
        assert_eq!(first.pixel_delta_u, camera.pixel_delta_u);
        assert_eq!(first.defocus_disk_v, camera.defocus_disk_v);
    }

    #[test]
    fn test_camera_ray_direction() {
        let mut camera = Camera::new()
            .with_resolution(100, 1.0)
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0);

        camera.initialize();

        let mut rng = StdRng::seed_from_u64(42);

        // Center ray should point roughly towards -Z
        let ray = camera.get_ray(50, 50, 0, 0, &mut rng);
        assert!(ray.direction().z < 0.0);
        assert_eq!(ray.origin(), Vec3::ZERO);
        assert!((0.0..1.0).contains(&ray.time()));
    }

    #[test]
    fn test_rays_stay_in_their_stratum() {
        let mut camera = Camera::new()
            .with_resolution(2, 1.0)
            .with_quality(4, 5)
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0);
        camera.initialize();

        // Focus plane at z = -1 spans [-1, 1]; pixel (0, 0) is the upper-left
        // quarter, and stratum (1, 0) its upper-right half-cell.
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..50 {
            let ray = camera.get_ray(0, 0, 1, 0, &mut rng);
            let hit = ray.at(1.0);
            assert!((-0.5..=0.0).contains(&hit.x), "x = {}", hit.x);
            assert!((0.5..=1.0).contains(&hit.y), "y = {}", hit.y);
        }
    }

    #[test]
    fn test_defocus_moves_origin() {
        let mut camera = Camera::new().with_lens(90.0, 10.0, 3.0);
        camera.initialize();

        let mut rng = StdRng::seed_from_u64(8);
        let radius = 3.0 * degrees_to_radians(5.0).tan();
        for _ in 0..50 {
            let ray = camera.get_ray(50, 50, 0, 0, &mut rng);
            assert_eq!(ray.origin().z, 0.0);
            assert!(ray.origin().length() <= radius + 1e-5);
        }
    }
}
