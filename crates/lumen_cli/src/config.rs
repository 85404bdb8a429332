//! Render configuration loaded from JSON.
//!
//! Every field is optional in the file; missing values fall back to
//! [`RenderConfig::default`]. Camera placement fields left unset keep the
//! values chosen by the scene.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use lumen_math::Vec3;
use lumen_renderer::Camera;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while loading or validating a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Built-in demo scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SceneKind {
    /// Cornell box with a rotated metal box and a glass sphere
    #[default]
    Cornell,
    /// Cornell box with triangle geometry and several lights
    Triangles,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    pub scene: SceneKind,
    pub image_width: u32,
    pub aspect_ratio: f32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    pub seed: u64,
    pub output: PathBuf,

    // Scene camera overrides
    pub background: Option<Vec3>,
    pub vfov: Option<f32>,
    pub lookfrom: Option<Vec3>,
    pub lookat: Option<Vec3>,
    pub vup: Option<Vec3>,
    pub defocus_angle: Option<f32>,
    pub focus_dist: Option<f32>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scene: SceneKind::default(),
            image_width: 400,
            aspect_ratio: 1.0,
            samples_per_pixel: 100,
            max_depth: 50,
            seed: 0,
            output: PathBuf::from("render.png"),
            background: None,
            vfov: None,
            lookfrom: None,
            lookat: None,
            vup: None,
            defocus_angle: None,
            focus_dist: None,
        }
    }
}

impl RenderConfig {
    /// Load a configuration file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reject values the camera cannot work with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.image_width == 0 {
            return Err(ConfigError::Invalid("image_width must be positive".into()));
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "aspect_ratio must be positive, got {}",
                self.aspect_ratio
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(ConfigError::Invalid("samples_per_pixel must be positive".into()));
        }
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("max_depth must be positive".into()));
        }
        if let Some(vfov) = self.vfov {
            if !(vfov > 0.0 && vfov < 180.0) {
                return Err(ConfigError::Invalid(format!(
                    "vfov must lie in (0, 180), got {vfov}"
                )));
            }
        }
        if let Some(focus_dist) = self.focus_dist {
            if !(focus_dist.is_finite() && focus_dist > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "focus_dist must be positive, got {focus_dist}"
                )));
            }
        }
        if let (Some(from), Some(at)) = (self.lookfrom, self.lookat) {
            if from == at {
                return Err(ConfigError::Invalid("lookfrom and lookat coincide".into()));
            }
        }
        Ok(())
    }

    /// Copy the configured values onto a scene camera.
    pub fn apply(&self, camera: &mut Camera) {
        camera.image_width = self.image_width;
        camera.aspect_ratio = self.aspect_ratio;
        camera.samples_per_pixel = self.samples_per_pixel;
        camera.max_depth = self.max_depth;
        camera.seed = self.seed;

        if let Some(background) = self.background {
            camera.background = background;
        }
        if let Some(vfov) = self.vfov {
            camera.vfov = vfov;
        }
        if let Some(lookfrom) = self.lookfrom {
            camera.lookfrom = lookfrom;
        }
        if let Some(lookat) = self.lookat {
            camera.lookat = lookat;
        }
        if let Some(vup) = self.vup {
            camera.vup = vup;
        }
        if let Some(defocus_angle) = self.defocus_angle {
            camera.defocus_angle = defocus_angle;
        }
        if let Some(focus_dist) = self.focus_dist {
            camera.focus_dist = focus_dist;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_gives_defaults() {
        let config = RenderConfig::from_json_str("{}").expect("empty config is valid");
        assert_eq!(config, RenderConfig::default());
        config.validate().expect("defaults are valid");
    }

    #[test]
    fn test_partial_config() {
        let config = RenderConfig::from_json_str(
            r#"{
                "scene": "triangles",
                "image_width": 320,
                "samples_per_pixel": 64,
                "lookfrom": [0.0, 1.0, 5.0],
                "output": "out/triangles.ppm"
            }"#,
        )
        .expect("config should parse");

        assert_eq!(config.scene, SceneKind::Triangles);
        assert_eq!(config.image_width, 320);
        assert_eq!(config.samples_per_pixel, 64);
        assert_eq!(config.max_depth, 50);
        assert_eq!(config.lookfrom, Some(Vec3::new(0.0, 1.0, 5.0)));
        assert_eq!(config.lookat, None);
        assert_eq!(config.output, PathBuf::from("out/triangles.ppm"));
    }

    #[test]
    fn test_bad_json_is_a_parse_error() {
        let err = RenderConfig::from_json_str(r#"{ "image_width": "wide" }"#)
            .expect_err("string width should fail");
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = RenderConfig::from_json_str(r#"{ "scene": "bunny" }"#)
            .expect_err("unknown scene should fail");
        assert!(matches!(err, ConfigError::Parse(_)));

        let err = RenderConfig::from_json_str(r#"{ "samples": 4 }"#)
            .expect_err("unknown field should fail");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_validate_rejects_degenerate_values() {
        let cases = [
            RenderConfig { image_width: 0, ..Default::default() },
            RenderConfig { aspect_ratio: 0.0, ..Default::default() },
            RenderConfig { aspect_ratio: f32::NAN, ..Default::default() },
            RenderConfig { samples_per_pixel: 0, ..Default::default() },
            RenderConfig { max_depth: 0, ..Default::default() },
            RenderConfig { vfov: Some(180.0), ..Default::default() },
            RenderConfig { focus_dist: Some(-1.0), ..Default::default() },
            RenderConfig {
                lookfrom: Some(Vec3::ONE),
                lookat: Some(Vec3::ONE),
                ..Default::default()
            },
        ];

        for config in cases {
            assert!(
                matches!(config.validate(), Err(ConfigError::Invalid(_))),
                "{config:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_apply_keeps_scene_camera_where_unset() {
        let mut camera = Camera::new()
            .with_position(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
            .with_lens(40.0, 0.0, 10.0);

        let config = RenderConfig {
            image_width: 50,
            seed: 5,
            vfov: Some(25.0),
            ..Default::default()
        };
        config.apply(&mut camera);

        assert_eq!(camera.image_width, 50);
        assert_eq!(camera.seed, 5);
        assert_eq!(camera.vfov, 25.0);
        assert_eq!(camera.lookfrom, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(camera.focus_dist, 10.0);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = RenderConfig::load(Path::new("/nonexistent/lumen.json"))
            .expect_err("missing file");
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
