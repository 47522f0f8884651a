//! JPEG re-encoding of source images.
//!
//! The source raster is drawn at native resolution onto a scoped [`Surface`]
//! and the surface is serialized with the `image` crate's JPEG encoder. No
//! metadata is carried over.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};
use log::debug;
use thiserror::Error;

use super::EncodedResult;
use crate::quality::Quality;
use crate::source::{DecodeError, SourceImage};
use crate::surface::{Surface, SurfaceError, SurfaceLimits};

/// Errors that can occur during re-encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The source raster cannot be rendered
    #[error("Cannot render source image: {0}")]
    Decode(#[from] DecodeError),

    /// The drawing surface could not be created or accessed
    #[error("Drawing surface unavailable: {0}")]
    Surface(#[from] SurfaceError),

    /// JPEG encoding failed
    #[error("JPEG encoding failed: {0}")]
    Encoding(String),
}

/// Re-encode a source image as JPEG at the given quality.
///
/// Uses the default [`SurfaceLimits`].
///
/// # Errors
///
/// * `EncodeError::Decode` if the raster has zero dimensions or a pixel
///   buffer that doesn't match them
/// * `EncodeError::Surface` if the surface cannot be acquired or drawn
/// * `EncodeError::Encoding` if the encoder fails
pub fn compress(source: &SourceImage, quality: Quality) -> Result<EncodedResult, EncodeError> {
    compress_with_limits(source, quality, SurfaceLimits::default())
}

/// Re-encode a source image as JPEG, acquiring the surface under `limits`.
pub fn compress_with_limits(
    source: &SourceImage,
    quality: Quality,
    limits: SurfaceLimits,
) -> Result<EncodedResult, EncodeError> {
    let raster = source.raster();
    raster.check()?;

    let bytes = {
        let mut surface = Surface::acquire(raster.width, raster.height, limits)?;
        surface.draw(raster)?;
        encode_surface(&surface, quality)?
    };

    debug!(
        "compressed {} at {}: {} -> {} bytes",
        source.provenance().file_name,
        quality,
        source.original_bytes(),
        bytes.len()
    );

    Ok(EncodedResult::from_encoded(
        &bytes,
        quality,
        source.original_bytes(),
    ))
}

/// Serialize the surface contents to JPEG bytes.
fn encode_surface(surface: &Surface, quality: Quality) -> Result<Vec<u8>, EncodeError> {
    let mut buffer = Cursor::new(Vec::new());

    JpegEncoder::new_with_quality(&mut buffer, quality.value())
        .write_image(
            surface.pixels(),
            surface.width(),
            surface.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| EncodeError::Encoding(e.to_string()))?;

    let bytes = buffer.into_inner();
    if bytes.is_empty() {
        return Err(EncodeError::Encoding("encoder produced no output".to_string()));
    }
    Ok(bytes)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::encode::TARGET_MIME_TYPE;
    use crate::source::{Provenance, Raster};
    use proptest::prelude::*;

    fn quality_strategy() -> impl Strategy<Value = Quality> {
        (2u8..=20).prop_map(|step| Quality::new(step * Quality::STEP).unwrap())
    }

    proptest! {
        /// Property: every valid quality produces a non-empty JPEG result.
        #[test]
        fn prop_every_quality_produces_jpeg(
            (width, height) in (1u32..=24, 1u32..=24),
            quality in quality_strategy(),
            seed in any::<u8>(),
        ) {
            let size = (width * height * 3) as usize;
            let pixels: Vec<u8> = (0..size).map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed)).collect();
            let src = SourceImage::from_raster(
                Raster::new(width, height, pixels),
                Provenance::new("p.png", "image/png", 1),
            );

            let result = compress(&src, quality);
            prop_assert!(result.is_ok());

            let result = result.unwrap();
            prop_assert_eq!(result.mime_type(), TARGET_MIME_TYPE);
            prop_assert!(result.encoded_len() > 0);
        }

        /// Property: repeated compression yields the same shape.
        #[test]
        fn prop_repeat_compress_same_shape(
            (width, height) in (1u32..=16, 1u32..=16),
            quality in quality_strategy(),
        ) {
            let pixels = vec![100u8; (width * height * 3) as usize];
            let src = SourceImage::from_raster(
                Raster::new(width, height, pixels),
                Provenance::new("p.png", "image/png", 1),
            );

            let a = compress(&src, quality).unwrap();
            let b = compress(&src, quality).unwrap();
            prop_assert_eq!(a.mime_type(), b.mime_type());
            prop_assert_eq!(a.encoded_len(), b.encoded_len());
        }
    }
}
