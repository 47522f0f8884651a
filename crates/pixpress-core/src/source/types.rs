//! Core types for source images.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types for turning an uploaded file into a raster.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The uploaded file contained no bytes.
    #[error("Image file is empty")]
    Empty,

    /// The file format is not recognized or supported.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),

    /// Width or height is zero.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Pixel buffer length doesn't match the dimensions.
    #[error("Invalid pixel data: expected {expected} bytes (width * height * 3), got {actual}")]
    PixelDataMismatch { expected: usize, actual: usize },
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    /// Normal (no transformation needed).
    #[default]
    Normal = 1,
    /// Horizontal flip.
    FlipHorizontal = 2,
    /// Rotate 180 degrees.
    Rotate180 = 3,
    /// Vertical flip.
    FlipVertical = 4,
    /// Transpose (flip horizontal + rotate 270 CW).
    Transpose = 5,
    /// Rotate 90 degrees clockwise.
    Rotate90CW = 6,
    /// Transverse (flip horizontal + rotate 90 CW).
    Transverse = 7,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW = 8,
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// Where a source image came from, as declared by the file picker.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Provenance {
    /// File name as selected by the user.
    pub file_name: String,
    /// Declared content type (e.g. `image/png`).
    pub mime_type: String,
    /// Size of the original file in bytes.
    pub original_bytes: u64,
}

impl Provenance {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, original_bytes: u64) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            original_bytes,
        }
    }
}

/// A decoded grid of RGB pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGB pixel data in row-major order (3 bytes per pixel).
    pub pixels: Vec<u8>,
}

impl Raster {
    /// Create a raster from dimensions and pixel data. Not validated; see [`Raster::check`].
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a raster from an `image::RgbImage`.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Number of bytes the pixel buffer must hold for these dimensions.
    ///
    /// `None` if the product overflows `usize`.
    pub fn expected_len(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(3)
    }

    /// Verify the raster can be rendered: non-zero dimensions and a pixel
    /// buffer of exactly `width * height * 3` bytes.
    pub fn check(&self) -> Result<(), DecodeError> {
        if self.width == 0 || self.height == 0 {
            return Err(DecodeError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        let expected = self.expected_len().ok_or(DecodeError::InvalidDimensions {
            width: self.width,
            height: self.height,
        })?;
        if self.pixels.len() != expected {
            return Err(DecodeError::PixelDataMismatch {
                expected,
                actual: self.pixels.len(),
            });
        }
        Ok(())
    }
}

/// An immutable decoded image plus the metadata of the file it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    raster: Raster,
    provenance: Provenance,
}

impl SourceImage {
    /// Wrap an already decoded raster.
    pub fn from_raster(raster: Raster, provenance: Provenance) -> Self {
        Self { raster, provenance }
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    pub fn width(&self) -> u32 {
        self.raster.width
    }

    pub fn height(&self) -> u32 {
        self.raster.height
    }

    /// Size in bytes of the original upload.
    pub fn original_bytes(&self) -> u64 {
        self.provenance.original_bytes
    }
}
