//! Off-screen drawing surface.
//!
//! A [`Surface`] is the scratch RGB buffer a source raster is rendered into
//! before it is serialized. One surface is acquired per compress call and it is
//! released when dropped, so every exit path (success, encoder failure, early
//! `?` return) gives the memory back.

use log::trace;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::source::Raster;

/// Errors that can occur while creating or using a surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// Width or height is zero
    #[error("Surface dimensions must be non-zero, got {width}x{height}")]
    ZeroSize { width: u32, height: u32 },

    /// Byte size of the surface does not fit in memory addressing
    #[error("Surface {width}x{height} is too large to address")]
    TooLarge { width: u32, height: u32 },

    /// Surface area is over the configured limit
    #[error("Surface {width}x{height} exceeds the limit of {max_pixels} pixels")]
    ExceedsLimit {
        width: u32,
        height: u32,
        max_pixels: u64,
    },

    /// The allocator refused the buffer
    #[error("Failed to allocate {bytes} bytes for surface")]
    AllocationFailed { bytes: usize },

    /// Raster being drawn does not match the surface
    #[error("Cannot draw {src_width}x{src_height} raster onto {width}x{height} surface")]
    SizeMismatch {
        width: u32,
        height: u32,
        src_width: u32,
        src_height: u32,
    },
}

/// Limits applied when acquiring a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceLimits {
    /// Maximum surface area in pixels.
    pub max_pixels: u64,
}

impl SurfaceLimits {
    /// 16384 x 16384, the largest canvas area common browsers allow.
    pub const DEFAULT_MAX_PIXELS: u64 = 16_384 * 16_384;

    pub fn new(max_pixels: u64) -> Self {
        Self { max_pixels }
    }
}

impl Default for SurfaceLimits {
    fn default() -> Self {
        Self {
            max_pixels: Self::DEFAULT_MAX_PIXELS,
        }
    }
}

/// A scoped RGB8 drawing buffer.
#[derive(Debug)]
pub struct Surface {
    width: u32,
    height: u32,
    buffer: Vec<u8>,
}

impl Surface {
    /// Allocate a surface of the given size, filled with black.
    pub fn acquire(width: u32, height: u32, limits: SurfaceLimits) -> Result<Self, SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::ZeroSize { width, height });
        }

        let pixels = u64::from(width) * u64::from(height);
        if pixels > limits.max_pixels {
            return Err(SurfaceError::ExceedsLimit {
                width,
                height,
                max_pixels: limits.max_pixels,
            });
        }

        let bytes = usize::try_from(pixels)
            .ok()
            .and_then(|p| p.checked_mul(3))
            .ok_or(SurfaceError::TooLarge { width, height })?;

        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(bytes)
            .map_err(|_| SurfaceError::AllocationFailed { bytes })?;
        buffer.resize(bytes, 0);

        trace!("acquired {}x{} surface ({} bytes)", width, height, bytes);
        #[cfg(test)]
        tracking::acquired();

        Ok(Self {
            width,
            height,
            buffer,
        })
    }

    /// Render a raster at native resolution, replacing the surface contents.
    pub fn draw(&mut self, raster: &Raster) -> Result<(), SurfaceError> {
        if raster.width != self.width
            || raster.height != self.height
            || raster.pixels.len() != self.buffer.len()
        {
            return Err(SurfaceError::SizeMismatch {
                width: self.width,
                height: self.height,
                src_width: raster.width,
                src_height: raster.height,
            });
        }
        self.buffer.copy_from_slice(&raster.pixels);
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGB contents of the surface (3 bytes per pixel, row-major order).
    pub fn pixels(&self) -> &[u8] {
        &self.buffer
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        trace!("released {}x{} surface", self.width, self.height);
        #[cfg(test)]
        tracking::released();
    }
}
