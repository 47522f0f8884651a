//! Compression and estimation WASM bindings.
//!
//! This module exposes the pixpress-core compress/estimate primitives to
//! JavaScript. `compress_image` is synchronous; run it inside a Web Worker to
//! keep the page responsive while large images are encoded.
//!
//! # Example
//!
//! ```typescript
//! import { compress_image, estimate_size } from '@pixpress/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const result = compress_image(bytes, file.name, file.type, 80);
//! const report = estimate_size(result.data_url, file.size);
//! console.log(`Saved ${report.compression_ratio_percent}%`);
//! ```

use crate::types::{JsEncodedResult, JsSizeReport};
use pixpress_core::{CompressSettings, Quality, SourceImage};
use wasm_bindgen::prelude::*;

fn to_js<E: std::fmt::Display>(e: E) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Decode an upload after checking its declared content type.
fn decode_upload(bytes: &[u8], file_name: &str, mime_type: &str) -> Result<SourceImage, String> {
    if !pixpress_core::accepts_content_type(mime_type) {
        return Err(format!("Not an image upload: {:?}", mime_type));
    }
    SourceImage::decode(bytes, file_name, mime_type).map_err(|e| e.to_string())
}

/// Decode an uploaded file and re-encode it as JPEG.
///
/// # Arguments
///
/// * `bytes` - The uploaded file contents as a `Uint8Array`
/// * `file_name` - Name of the uploaded file
/// * `mime_type` - Declared content type of the upload
/// * `quality` - JPEG quality (10-100 in steps of 5)
///
/// # Errors
///
/// Returns an error if the quality is invalid, `mime_type` does not start
/// with `image/`, the file cannot be decoded, or the image cannot be encoded.
#[wasm_bindgen]
pub fn compress_image(
    bytes: &[u8],
    file_name: &str,
    mime_type: &str,
    quality: u8,
) -> Result<JsEncodedResult, JsValue> {
    let quality = Quality::new(quality).map_err(to_js)?;
    let source = decode_upload(bytes, file_name, mime_type).map_err(to_js)?;
    pixpress_core::compress(&source, quality)
        .map(JsEncodedResult::from_result)
        .map_err(to_js)
}

/// Like [`compress_image`], taking a `{ quality, maxPixels }` settings object.
///
/// Missing fields fall back to their defaults (quality 80, browser canvas
/// area limit). Non-image content types are rejected the same way.
#[wasm_bindgen]
pub fn compress_with_settings(
    bytes: &[u8],
    file_name: &str,
    mime_type: &str,
    settings: JsValue,
) -> Result<JsEncodedResult, JsValue> {
    let settings: CompressSettings = if settings.is_undefined() || settings.is_null() {
        CompressSettings::default()
    } else {
        serde_wasm_bindgen::from_value(settings)
            .map_err(|e| JsValue::from_str(&format!("Invalid settings: {}", e)))?
    };
    let quality = settings.quality().map_err(to_js)?;

    let source = decode_upload(bytes, file_name, mime_type).map_err(to_js)?;
    pixpress_core::compress_with_limits(&source, quality, settings.limits())
        .map(JsEncodedResult::from_result)
        .map_err(to_js)
}

/// Estimate decoded size and compression ratio from a `data:` URL.
///
/// # Errors
///
/// Returns an error if the URL has no comma-delimited base64 payload or
/// `original_bytes` is zero.
#[wasm_bindgen]
pub fn estimate_size(data_url: &str, original_bytes: f64) -> Result<JsSizeReport, JsValue> {
    if !original_bytes.is_finite() || original_bytes < 0.0 {
        return Err(JsValue::from_str("original_bytes must be a non-negative number"));
    }
    pixpress_core::estimate_envelope(data_url, original_bytes as u64)
        .map(JsSizeReport::from_report)
        .map_err(to_js)
}

/// Whether a file with this content type should be accepted at all.
#[wasm_bindgen]
pub fn accepts_content_type(mime_type: &str) -> bool {
    pixpress_core::accepts_content_type(mime_type)
}

/// Human-readable byte size (e.g. "1.5 KB").
#[wasm_bindgen]
pub fn format_file_size(bytes: f64) -> String {
    if bytes < 0.0 {
        pixpress_core::format_signed_file_size(bytes as i64)
    } else {
        pixpress_core::format_file_size(bytes as u64)
    }
}

/// Display label for a quality value, or an empty string if it is invalid.
#[wasm_bindgen]
pub fn quality_label(quality: u8) -> String {
    Quality::new(quality)
        .map(|q| q.tier().label().to_string())
        .unwrap_or_default()
}

/// Quick-pick quality values, best first.
#[wasm_bindgen]
pub fn quality_presets() -> Vec<u8> {
    Quality::PRESETS.iter().map(|q| q.value()).collect()
}
