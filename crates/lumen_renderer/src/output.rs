//! Image output: plain-text PPM and PNG.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::renderer::{color_to_rgb8, ImageBuffer};

/// Errors that can occur while writing a rendered image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Pixel buffer does not match a {width}x{height} image")]
    BufferSize { width: u32, height: u32 },

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

pub type OutputResult<T> = Result<T, OutputError>;

/// Write `image` as an ASCII PPM (`P3`), one `r g b` line per pixel from
/// the top row down.
pub fn write_ppm<W: Write>(image: &ImageBuffer, out: &mut W) -> OutputResult<()> {
    writeln!(out, "P3\n{} {}\n255", image.width, image.height)?;
    for color in &image.pixels {
        let [r, g, b] = color_to_rgb8(*color);
        writeln!(out, "{r} {g} {b}")?;
    }
    out.flush()?;
    Ok(())
}

/// Encode `image` as PNG at `path`.
pub fn save_png(image: &ImageBuffer, path: &Path) -> OutputResult<()> {
    let rgb = image::RgbImage::from_raw(image.width, image.height, image.to_rgb8()).ok_or(
        OutputError::BufferSize {
            width: image.width,
            height: image.height,
        },
    )?;
    rgb.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/// Save `image` to `path`, picking the format from the file extension
/// (`.ppm` or `.png`).
pub fn save(image: &ImageBuffer, path: &Path) -> OutputResult<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "ppm" => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_ppm(image, &mut writer)
        }
        "png" => save_png(image, path),
        other => Err(OutputError::UnsupportedFormat(other.to_string())),
    }?;

    log::info!("Saved {}x{} image to {}", image.width, image.height, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    fn checker() -> ImageBuffer {
        let mut image = ImageBuffer::new(2, 2);
        image.set(0, 0, Color::ONE);
        image.set(1, 1, Color::new(0.25, 0.0, 1.0));
        image
    }

    #[test]
    fn test_write_ppm() {
        let mut out = Vec::new();
        write_ppm(&checker(), &mut out).expect("writing to a Vec cannot fail");

        let text = String::from_utf8(out).expect("ppm is ascii");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[..3], ["P3", "2 2", "255"]);
        assert_eq!(lines[3], "255 255 255");
        assert_eq!(lines[4], "0 0 0");
        assert_eq!(lines[6], "128 0 255");
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn test_save_rejects_unknown_extension() {
        let path = std::env::temp_dir().join("lumen_output_test.bmpx");
        let err = save(&checker(), &path).expect_err("unknown extension");
        assert!(matches!(err, OutputError::UnsupportedFormat(ext) if ext == "bmpx"));
    }

    #[test]
    fn test_save_png_and_ppm() {
        let dir = std::env::temp_dir();
        for name in ["lumen_output_test.png", "lumen_output_test.ppm"] {
            let path = dir.join(name);
            save(&checker(), &path).expect("save should succeed");
            assert!(path.exists());
            std::fs::remove_file(&path).ok();
        }
    }
}
