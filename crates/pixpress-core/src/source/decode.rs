//! Decoding uploaded files into source rasters, with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader, RgbImage};
use log::debug;

use super::{DecodeError, Orientation, Provenance, Raster, SourceImage};

/// Content type prefix every accepted upload must carry.
pub const IMAGE_MIME_PREFIX: &str = "image/";

/// Whether an upload with this declared content type should be decoded at all.
///
/// Files that fail this check are ignored by the caller without surfacing an
/// error.
pub fn accepts_content_type(mime_type: &str) -> bool {
    mime_type.starts_with(IMAGE_MIME_PREFIX)
}

impl SourceImage {
    /// Decode an uploaded file into a source image.
    ///
    /// The container format is guessed from content rather than trusted from
    /// `mime_type`. EXIF orientation is applied so the raster matches what a
    /// browser would draw, and the result is flattened to RGB8 over black.
    ///
    /// # Errors
    ///
    /// Returns `DecodeError::Empty` for zero-length input,
    /// `DecodeError::InvalidFormat` when no decoder recognizes the bytes, and
    /// `DecodeError::CorruptedFile` when decoding fails part way.
    pub fn decode(
        bytes: &[u8],
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Result<SourceImage, DecodeError> {
        if bytes.is_empty() {
            return Err(DecodeError::Empty);
        }

        let orientation = extract_orientation(bytes);

        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;
        if reader.format().is_none() {
            return Err(DecodeError::InvalidFormat);
        }

        let img = reader
            .decode()
            .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

        let raster = Raster::from_rgb_image(flatten(apply_orientation(img, orientation)));
        raster.check()?;

        let provenance = Provenance::new(file_name, mime_type, bytes.len() as u64);
        debug!(
            "decoded {} ({}x{}, {} bytes, {:?})",
            provenance.file_name, raster.width, raster.height, provenance.original_bytes, orientation
        );

        Ok(SourceImage::from_raster(raster, provenance))
    }
}

/// Extract EXIF orientation from any container kamadak-exif understands.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
pub fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

/// Apply EXIF orientation transformation to an image.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

/// Composite onto an opaque black background and drop the alpha channel.
fn flatten(img: DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.into_rgb8();
    }

    let rgba = img.into_rgba8();
    let (width, height) = rgba.dimensions();
    let mut rgb = RgbImage::new(width, height);
    for (dst, src) in rgb.pixels_mut().zip(rgba.pixels()) {
        let [r, g, b, a] = src.0;
        dst.0 = [over_black(r, a), over_black(g, a), over_black(b, a)];
    }
    rgb
}

#[inline]
fn over_black(channel: u8, alpha: u8) -> u8 {
    // max 255 * 255 + 127 fits in u16
    ((u16::from(channel) * u16::from(alpha) + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::jpeg::JpegEncoder;
    use image::{ImageFormat, Rgb, Rgba, RgbaImage};

    fn png_bytes(img: &RgbImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    /// Big-endian TIFF block with a single IFD0 Orientation entry.
    fn exif_app1(orientation: u16) -> Vec<u8> {
        let mut tiff = vec![b'M', b'M', 0x00, 0x2A, 0x00, 0x00, 0x00, 0x08];
        tiff.extend_from_slice(&1u16.to_be_bytes()); // entry count
        tiff.extend_from_slice(&0x0112u16.to_be_bytes()); // Orientation
        tiff.extend_from_slice(&3u16.to_be_bytes()); // SHORT
        tiff.extend_from_slice(&1u32.to_be_bytes());
        tiff.extend_from_slice(&orientation.to_be_bytes());
        tiff.extend_from_slice(&[0x00, 0x00]);
        tiff.extend_from_slice(&0u32.to_be_bytes()); // no next IFD

        let mut payload = b"Exif\0\0".to_vec();
        payload.extend_from_slice(&tiff);

        let mut segment = vec![0xFF, 0xE1];
        segment.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
        segment.extend_from_slice(&payload);
        segment
    }

    /// JPEG of `img` with an Exif APP1 segment spliced in after SOI.
    fn jpeg_with_orientation(img: &RgbImage, orientation: u16) -> Vec<u8> {
        let mut encoded = Vec::new();
        JpegEncoder::new_with_quality(&mut encoded, 100)
            .encode_image(img)
            .unwrap();
        assert_eq!(&encoded[0..2], &[0xFF, 0xD8]);

        let mut out = encoded[0..2].to_vec();
        out.extend_from_slice(&exif_app1(orientation));
        out.extend_from_slice(&encoded[2..]);
        out
    }

    /// 4x2, white in the left half and black in the right.
    fn split_fixture() -> RgbImage {
        RgbImage::from_fn(4, 2, |x, _| if x < 2 { Rgb([255; 3]) } else { Rgb([0; 3]) })
    }

    #[test]
    fn test_accepts_content_type() {
        assert!(accepts_content_type("image/png"));
        assert!(accepts_content_type("image/jpeg"));
        assert!(accepts_content_type("image/svg+xml"));
        assert!(!accepts_content_type("text/plain"));
        assert!(!accepts_content_type("application/pdf"));
        assert!(!accepts_content_type(""));
        assert!(!accepts_content_type("IMAGE/PNG"));
    }

    #[test]
    fn test_decode_png() {
        let img = RgbImage::from_pixel(4, 3, Rgb([10, 20, 30]));
        let bytes = png_bytes(&img);

        let source = SourceImage::decode(&bytes, "tiny.png", "image/png").unwrap();
        assert_eq!(source.width(), 4);
        assert_eq!(source.height(), 3);
        assert_eq!(source.raster().pixels.len(), 4 * 3 * 3);
        assert_eq!(&source.raster().pixels[0..3], &[10, 20, 30]);
        assert_eq!(source.original_bytes(), bytes.len() as u64);
        assert_eq!(source.provenance().file_name, "tiny.png");
    }

    #[test]
    fn test_decode_flattens_alpha_over_black() {
        let mut img = RgbaImage::from_pixel(3, 1, Rgba([200, 100, 50, 128]));
        img.put_pixel(1, 0, Rgba([255, 255, 255, 0]));
        img.put_pixel(2, 0, Rgba([12, 34, 56, 255]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();

        let source = SourceImage::decode(out.get_ref(), "alpha.png", "image/png").unwrap();
        assert_eq!(
            source.raster().pixels,
            vec![100, 50, 25, 0, 0, 0, 12, 34, 56]
        );
    }

    #[test]
    fn test_over_black() {
        assert_eq!(over_black(255, 255), 255);
        assert_eq!(over_black(255, 0), 0);
        assert_eq!(over_black(0, 200), 0);
        assert_eq!(over_black(255, 128), 128);
    }

    #[test]
    fn test_orientation_extraction_from_jpeg_exif() {
        let bytes = jpeg_with_orientation(&split_fixture(), 6);
        assert_eq!(extract_orientation(&bytes), Orientation::Rotate90CW);
    }

    #[test]
    fn test_decode_applies_exif_rotation() {
        let bytes = jpeg_with_orientation(&split_fixture(), 6);
        let source = SourceImage::decode(&bytes, "phone.jpg", "image/jpeg").unwrap();

        assert_eq!((source.width(), source.height()), (2, 4));

        // Rotated clockwise: the white left half is now on top.
        let pixels = &source.raster().pixels;
        let row_stride = 2 * 3;
        assert!(pixels[0] > 128, "top row should be light, got {}", pixels[0]);
        let last_row = 3 * row_stride;
        assert!(
            pixels[last_row] < 128,
            "bottom row should be dark, got {}",
            pixels[last_row]
        );
    }

    #[test]
    fn test_decode_exif_normal_keeps_dimensions() {
        let bytes = jpeg_with_orientation(&split_fixture(), 1);
        let source = SourceImage::decode(&bytes, "flat.jpg", "image/jpeg").unwrap();
        assert_eq!((source.width(), source.height()), (4, 2));
    }

    #[test]
    fn test_decode_ignores_declared_mime() {
        let bytes = png_bytes(&RgbImage::new(1, 1));
        let source = SourceImage::decode(&bytes, "mislabelled.jpg", "image/jpeg").unwrap();
        assert_eq!(source.provenance().mime_type, "image/jpeg");
        assert_eq!(source.width(), 1);
    }

    #[test]
    fn test_decode_empty_bytes() {
        assert_eq!(
            SourceImage::decode(&[], "empty.png", "image/png"),
            Err(DecodeError::Empty)
        );
    }

    #[test]
    fn test_decode_unknown_format() {
        let result = SourceImage::decode(&[0x00, 0x01, 0x02, 0x03], "junk.bin", "image/png");
        assert_eq!(result, Err(DecodeError::InvalidFormat));
    }

    #[test]
    fn test_decode_truncated_png() {
        let bytes = png_bytes(&RgbImage::from_pixel(16, 16, Rgb([1, 2, 3])));
        let truncated = &bytes[..bytes.len() / 2];

        match SourceImage::decode(truncated, "cut.png", "image/png") {
            Err(DecodeError::CorruptedFile(_)) => {}
            other => panic!("Expected CorruptedFile error, got: {:?}", other),
        }
    }

    #[test]
    fn test_orientation_extraction_no_exif() {
        let bytes = png_bytes(&RgbImage::new(1, 1));
        assert_eq!(extract_orientation(&bytes), Orientation::Normal);
        assert_eq!(extract_orientation(&[0x00, 0x01, 0x02]), Orientation::Normal);
    }

    #[test]
    fn test_apply_orientation_rotate90_swaps_dimensions() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(2, 1));
        let rotated = apply_orientation(img, Orientation::Rotate90CW);
        assert_eq!((rotated.width(), rotated.height()), (1, 2));
    }

    #[test]
    fn test_apply_orientation_flip_horizontal() {
        let mut rgb = RgbImage::new(2, 1);
        rgb.put_pixel(0, 0, Rgb([255, 0, 0]));
        rgb.put_pixel(1, 0, Rgb([0, 255, 0]));

        let flipped =
            apply_orientation(DynamicImage::ImageRgb8(rgb), Orientation::FlipHorizontal).into_rgb8();
        assert_eq!(flipped.get_pixel(0, 0).0, [0, 255, 0]);
        assert_eq!(flipped.get_pixel(1, 0).0, [255, 0, 0]);
    }

    #[test]
    fn test_apply_orientation_normal_is_identity() {
        let rgb = RgbImage::from_pixel(3, 2, Rgb([9, 8, 7]));
        let out = apply_orientation(DynamicImage::ImageRgb8(rgb.clone()), Orientation::Normal);
        assert_eq!(out.into_rgb8(), rgb);
    }
}
