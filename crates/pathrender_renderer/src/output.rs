//! Image encoders.
//!
//! PPM is written by hand as ASCII `P3`; every other format goes through
//! the `image` crate, chosen by file extension.

use crate::renderer::{color_to_rgb8, ImageBuffer};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while writing an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

/// Supported output encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Ppm,
    Png,
}

impl ImageFormat {
    /// Pick the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, OutputError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "ppm" => Ok(ImageFormat::Ppm),
            "png" => Ok(ImageFormat::Png),
            _ => Err(OutputError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Ppm => "ppm",
            ImageFormat::Png => "png",
        }
    }
}

impl ImageBuffer {
    /// Write the image to `path`, encoding by extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), OutputError> {
        let path = path.as_ref();
        match ImageFormat::from_path(path)? {
            ImageFormat::Ppm => self.save_ppm(path),
            ImageFormat::Png => self.save_png(path),
        }
    }

    /// Save as ASCII PPM (P3).
    pub fn save_ppm<P: AsRef<Path>>(&self, path: P) -> Result<(), OutputError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_ppm(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Encode as ASCII PPM (P3) into any writer.
    pub fn write_ppm<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "P3")?;
        writeln!(writer, "{} {}", self.width, self.height)?;
        writeln!(writer, "255")?;

        for color in &self.pixels {
            let [r, g, b] = color_to_rgb8(*color);
            writeln!(writer, "{} {} {}", r, g, b)?;
        }

        Ok(())
    }

    /// Save as 8-bit RGB PNG.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), OutputError> {
        image::save_buffer_with_format(
            path,
            &self.to_rgb8(),
            self.width,
            self.height,
            image::ColorType::Rgb8,
            image::ImageFormat::Png,
        )?;
        Ok(())
    }
}
