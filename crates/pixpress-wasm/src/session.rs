//! Stateful compress workflow for JavaScript.
//!
//! Wraps the core [`Session`] so the page can keep the current source and
//! result in WASM memory instead of shuttling pixels back and forth.
//!
//! # Example
//!
//! ```typescript
//! const session = new JsCompressSession();
//! if (session.upload(bytes, file.name, file.type)) {
//!   session.set_quality(70);
//!   const result = session.compress();
//!   preview.src = result.data_url;
//!   const report = session.report();
//! }
//! ```

use crate::types::{JsEncodedResult, JsSessionState, JsSizeReport};
use pixpress_core::{Quality, Session, OUTPUT_FILE_NAME};
use wasm_bindgen::prelude::*;

/// Upload / compress / reset workflow holding one source and one result.
#[wasm_bindgen]
pub struct JsCompressSession {
    inner: Session,
}

#[wasm_bindgen]
impl JsCompressSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> JsCompressSession {
        JsCompressSession {
            inner: Session::new(),
        }
    }

    /// Load a file. Returns `false` (and changes nothing) for non-image types.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be decoded; the previous source
    /// and result are kept.
    pub fn upload(&mut self, bytes: &[u8], file_name: &str, mime_type: &str) -> Result<bool, JsValue> {
        self.inner
            .upload(bytes, file_name, mime_type)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(getter)]
    pub fn quality(&self) -> u8 {
        self.inner.quality().value()
    }

    /// Set the quality for the next compress (10-100 in steps of 5).
    pub fn set_quality(&mut self, quality: u8) -> Result<(), JsValue> {
        let quality = Quality::new(quality).map_err(|e| JsValue::from_str(&e.to_string()))?;
        self.inner.set_quality(quality);
        Ok(())
    }

    /// Compress the current source, replacing any previous result.
    pub fn compress(&mut self) -> Result<JsEncodedResult, JsValue> {
        self.inner
            .compress()
            .map(|result| JsEncodedResult::from_result(result.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Size report for the current result, or `undefined` before compressing.
    pub fn report(&self) -> Result<Option<JsSizeReport>, JsValue> {
        self.inner
            .report()
            .map(|report| report.map(JsSizeReport::from_report))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// JPEG bytes of the current result, or `undefined` before compressing.
    pub fn download_bytes(&self) -> Result<Option<Vec<u8>>, JsValue> {
        self.inner
            .download()
            .map(|artifact| artifact.map(|a| a.bytes))
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn download_file_name(&self) -> String {
        OUTPUT_FILE_NAME.to_string()
    }

    /// Back to idle, dropping the source and result.
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    #[wasm_bindgen(getter)]
    pub fn state(&self) -> JsSessionState {
        self.inner.state().into()
    }

    #[wasm_bindgen(getter)]
    pub fn is_processing(&self) -> bool {
        self.inner.is_processing()
    }

    /// Original file name of the current source, if any.
    #[wasm_bindgen(getter)]
    pub fn source_file_name(&self) -> Option<String> {
        self.inner
            .source()
            .map(|source| source.provenance().file_name.clone())
    }
}

impl Default for JsCompressSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let session = JsCompressSession::new();
        assert_eq!(session.state(), JsSessionState::Idle);
        assert_eq!(session.quality(), 80);
        assert!(!session.is_processing());
        assert_eq!(session.source_file_name(), None);
        assert_eq!(session.download_file_name(), "compressed-image.jpg");
    }

    #[test]
    fn test_reset_from_idle() {
        let mut session = JsCompressSession::new();
        session.reset();
        assert_eq!(session.state(), JsSessionState::Idle);
    }
}
