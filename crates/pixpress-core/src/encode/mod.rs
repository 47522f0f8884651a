//! Re-encoding pipeline for Pixpress.
//!
//! This module provides functionality for:
//! - Rendering a source raster onto a scoped drawing surface
//! - Encoding the surface to JPEG with a chosen [`Quality`](crate::Quality)
//! - Wrapping the output in a `data:` URL and producing download artifacts
//!
//! # Architecture
//!
//! The pipeline is designed to be used from Web Workers via WASM bindings.
//! All operations are synchronous and single-threaded within WASM.
//!
//! # Examples
//!
//! ```ignore
//! use pixpress_core::encode::compress;
//! use pixpress_core::{Quality, SourceImage};
//!
//! let source = SourceImage::decode(&bytes, "photo.png", "image/png").unwrap();
//! let result = compress(&source, Quality::new(80).unwrap()).unwrap();
//! println!("Encoded {} bytes", result.encoded_len());
//! ```

mod jpeg;
mod result;

pub use jpeg::{compress, compress_with_limits, EncodeError};
pub use result::{DownloadArtifact, EncodedResult, OUTPUT_FILE_NAME, TARGET_MIME_TYPE};
