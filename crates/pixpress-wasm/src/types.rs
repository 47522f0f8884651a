//! WASM-compatible wrapper types for compression output.
//!
//! This module provides JavaScript-friendly types that wrap the core Pixpress
//! types. Byte counts are exposed as `f64` so they arrive as plain JS numbers
//! rather than `BigInt`.

use pixpress_core::{
    format_file_size, format_signed_file_size, EncodedResult, SessionState, SizeReport,
    OUTPUT_FILE_NAME,
};
use wasm_bindgen::prelude::*;

/// A compressed image wrapper for JavaScript.
///
/// The `data_url` can be assigned directly to an `<img>` `src`; the download
/// helpers hand back the decoded JPEG bytes and the fixed output file name.
#[wasm_bindgen]
pub struct JsEncodedResult {
    inner: EncodedResult,
}

#[wasm_bindgen]
impl JsEncodedResult {
    /// The `data:image/jpeg;base64,...` URL.
    #[wasm_bindgen(getter)]
    pub fn data_url(&self) -> String {
        self.inner.data_url().to_string()
    }

    /// Always `image/jpeg`.
    #[wasm_bindgen(getter)]
    pub fn mime_type(&self) -> String {
        self.inner.mime_type().to_string()
    }

    /// Quality the image was encoded at.
    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> u8 {
        self.inner.quality().value()
    }

    /// Exact byte length of the JPEG stream.
    #[wasm_bindgen(getter)]
    pub fn encoded_len(&self) -> usize {
        self.inner.encoded_len()
    }

    /// Byte size of the original upload.
    #[wasm_bindgen(getter)]
    pub fn original_bytes(&self) -> f64 {
        self.inner.original_bytes() as f64
    }

    /// Decoded JPEG bytes, ready to wrap in a `Blob`.
    pub fn download_bytes(&self) -> Result<Vec<u8>, JsValue> {
        self.inner
            .to_download()
            .map(|artifact| artifact.bytes)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// File name to offer for the download.
    pub fn download_file_name(&self) -> String {
        OUTPUT_FILE_NAME.to_string()
    }
}

impl JsEncodedResult {
    pub(crate) fn from_result(inner: EncodedResult) -> Self {
        Self { inner }
    }
}

/// Size estimate for JavaScript, with pre-formatted labels for display.
#[wasm_bindgen]
pub struct JsSizeReport {
    inner: SizeReport,
}

#[wasm_bindgen]
impl JsSizeReport {
    #[wasm_bindgen(getter)]
    pub fn original_bytes(&self) -> f64 {
        self.inner.original_bytes as f64
    }

    #[wasm_bindgen(getter)]
    pub fn approximate_decoded_bytes(&self) -> f64 {
        self.inner.approximate_decoded_bytes as f64
    }

    /// Rounded percentage saved; negative when the output grew.
    #[wasm_bindgen(getter)]
    pub fn compression_ratio_percent(&self) -> f64 {
        self.inner.compression_ratio_percent as f64
    }

    #[wasm_bindgen(getter)]
    pub fn saved_bytes(&self) -> f64 {
        self.inner.saved_bytes() as f64
    }

    /// e.g. "2.4 MB"
    pub fn original_size_label(&self) -> String {
        format_file_size(self.inner.original_bytes)
    }

    pub fn compressed_size_label(&self) -> String {
        format_file_size(self.inner.approximate_decoded_bytes)
    }

    pub fn saved_size_label(&self) -> String {
        format_signed_file_size(self.inner.saved_bytes())
    }

    /// Plain object form (`{ originalBytes, approximateDecodedBytes, compressionRatioPercent }`).
    pub fn to_object(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl JsSizeReport {
    pub(crate) fn from_report(inner: SizeReport) -> Self {
        Self { inner }
    }
}

/// Workflow state of a [`JsCompressSession`](crate::session::JsCompressSession).
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsSessionState {
    Idle = 0,
    HasSource = 1,
    HasResult = 2,
}

impl From<SessionState> for JsSessionState {
    fn from(state: SessionState) -> Self {
        match state {
            SessionState::Idle => JsSessionState::Idle,
            SessionState::HasSource => JsSessionState::HasSource,
            SessionState::HasResult => JsSessionState::HasResult,
        }
    }
}
