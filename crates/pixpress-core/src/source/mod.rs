//! Source images: the decoded raster a compression starts from.
//!
//! This module provides functionality for:
//! - Filtering uploads by declared content type
//! - Decoding any supported container (JPEG, PNG, GIF, BMP, WebP) to RGB8
//! - Applying EXIF orientation the way browsers do when drawing an image
//! - Keeping the provenance (file name, MIME type, byte size) of the upload
//!
//! # Examples
//!
//! ```ignore
//! use pixpress_core::source::{accepts_content_type, SourceImage};
//!
//! if accepts_content_type("image/png") {
//!     let bytes = std::fs::read("photo.png").unwrap();
//!     let source = SourceImage::decode(&bytes, "photo.png", "image/png").unwrap();
//!     println!("Decoded {}x{} image", source.width(), source.height());
//! }
//! ```

mod decode;
mod types;

pub use decode::{accepts_content_type, extract_orientation, IMAGE_MIME_PREFIX};
pub use types::{DecodeError, Orientation, Provenance, Raster, SourceImage};
