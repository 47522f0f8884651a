//! The compress workflow as a small state machine.
//!
//! A [`Session`] owns the single "current source / current result" slot the
//! UI works against:
//!
//! ```text
//!  Idle --upload--> HasSource --compress--> HasResult
//!   ^                  ^   |                   |  |
//!   |                  |   +--upload-----------+  |
//!   +------reset-------+------reset---------------+
//! ```
//!
//! The slot is always replaced wholesale; a failed operation leaves the
//! previous state exactly as it was. Only one compress may be in flight at a
//! time, enforced by an [`InFlight`] gate the UI can share to drive its busy
//! indicator.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, warn};
use thiserror::Error;

use crate::encode::{compress_with_limits, DownloadArtifact, EncodeError, EncodedResult};
use crate::envelope::ParseError;
use crate::estimate::{estimate, EstimateError, SizeReport};
use crate::quality::Quality;
use crate::source::{accepts_content_type, DecodeError, SourceImage};
use crate::surface::SurfaceLimits;

/// Errors surfaced by session transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Compress was requested before any image was uploaded
    #[error("No source image selected")]
    NoSource,

    /// Another compress is already running
    #[error("A compression is already in progress")]
    Busy,

    /// The upload could not be decoded
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Re-encoding failed
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// Size estimation failed
    #[error(transparent)]
    Estimate(#[from] EstimateError),

    /// The result envelope could not be decoded for download
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Which part of the workflow the session is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing uploaded.
    Idle,
    /// A source image is loaded but not compressed yet.
    HasSource,
    /// A compressed result is available for the current source.
    HasResult,
}

/// Single-slot gate over the compress operation.
#[derive(Debug, Default)]
pub struct InFlight {
    busy: AtomicBool,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the gate, or `None` if it is already held.
    pub fn try_acquire(&self) -> Option<InFlightGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard { gate: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Holds the [`InFlight`] gate until dropped.
#[derive(Debug)]
pub struct InFlightGuard<'a> {
    gate: &'a InFlight,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.gate.busy.store(false, Ordering::Release);
    }
}

/// Caller-owned compress workflow.
#[derive(Debug, Default)]
pub struct Session {
    source: Option<SourceImage>,
    result: Option<EncodedResult>,
    quality: Quality,
    limits: SurfaceLimits,
    in_flight: Arc<InFlight>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session whose surfaces are acquired under `limits`.
    pub fn with_limits(limits: SurfaceLimits) -> Self {
        Self {
            limits,
            ..Self::default()
        }
    }

    pub fn state(&self) -> SessionState {
        match (&self.source, &self.result) {
            (None, _) => SessionState::Idle,
            (Some(_), None) => SessionState::HasSource,
            (Some(_), Some(_)) => SessionState::HasResult,
        }
    }

    /// Shared handle to the in-flight gate.
    pub fn gate(&self) -> Arc<InFlight> {
        Arc::clone(&self.in_flight)
    }

    pub fn is_processing(&self) -> bool {
        self.in_flight.is_busy()
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// Change the quality used by the next compress. Does not touch any
    /// existing result.
    pub fn set_quality(&mut self, quality: Quality) {
        self.quality = quality;
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    pub fn result(&self) -> Option<&EncodedResult> {
        self.result.as_ref()
    }

    /// Load a new source image, discarding any previous source and result.
    ///
    /// Returns `Ok(false)` without changing anything when `mime_type` is not
    /// an image type.
    pub fn upload(
        &mut self,
        bytes: &[u8],
        file_name: &str,
        mime_type: &str,
    ) -> Result<bool, SessionError> {
        if !accepts_content_type(mime_type) {
            debug!("ignoring upload {} with type {:?}", file_name, mime_type);
            return Ok(false);
        }

        let source = SourceImage::decode(bytes, file_name, mime_type).map_err(|e| {
            warn!("failed to decode {}: {}", file_name, e);
            e
        })?;

        self.source = Some(source);
        self.result = None;
        Ok(true)
    }

    /// Compress the current source at the current quality, replacing any
    /// previous result on success.
    pub fn compress(&mut self) -> Result<&EncodedResult, SessionError> {
        let _guard = self.in_flight.try_acquire().ok_or(SessionError::Busy)?;
        let source = self.source.as_ref().ok_or(SessionError::NoSource)?;

        let result = compress_with_limits(source, self.quality, self.limits).map_err(|e| {
            warn!("compression failed: {}", e);
            e
        })?;

        Ok(self.result.insert(result))
    }

    /// Size report for the current result, if any.
    pub fn report(&self) -> Result<Option<SizeReport>, SessionError> {
        match &self.result {
            Some(result) => Ok(Some(estimate(result)?)),
            None => Ok(None),
        }
    }

    /// Download artifact for the current result, if any.
    pub fn download(&self) -> Result<Option<DownloadArtifact>, SessionError> {
        match &self.result {
            Some(result) => Ok(Some(result.to_download()?)),
            None => Ok(None),
        }
    }

    /// Drop the current source and result.
    pub fn reset(&mut self) {
        self.source = None;
        self.result = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::{OUTPUT_FILE_NAME, TARGET_MIME_TYPE};
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn noisy_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([
                (x * 255 / width) as u8,
                ((x * 31 + y * 17) % 256) as u8,
                (y * 255 / height) as u8,
            ])
        });
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn loaded_session() -> Session {
        let mut session = Session::new();
        assert_eq!(session.upload(&noisy_png(48, 32), "photo.png", "image/png"), Ok(true));
        session
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = Session::new();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.quality(), Quality::DEFAULT);
        assert!(!session.is_processing());
        assert_eq!(session.report(), Ok(None));
        assert_eq!(session.download(), Ok(None));
    }

    #[test]
    fn test_upload_moves_to_has_source() {
        let session = loaded_session();
        assert_eq!(session.state(), SessionState::HasSource);
        assert_eq!(session.source().unwrap().width(), 48);
    }

    #[test]
    fn test_non_image_upload_is_ignored() {
        let mut session = loaded_session();
        let before = session.source().cloned();

        assert_eq!(session.upload(b"hello", "notes.txt", "text/plain"), Ok(false));
        assert_eq!(session.state(), SessionState::HasSource);
        assert_eq!(session.source().cloned(), before);
    }

    #[test]
    fn test_failed_decode_keeps_state() {
        let mut session = loaded_session();
        session.compress().unwrap();

        let err = session.upload(&[1, 2, 3], "broken.png", "image/png").unwrap_err();
        assert_eq!(err, SessionError::Decode(DecodeError::InvalidFormat));
        assert_eq!(session.state(), SessionState::HasResult);
    }

    #[test]
    fn test_compress_without_source() {
        let mut session = Session::new();
        assert_eq!(session.compress().unwrap_err(), SessionError::NoSource);
        assert!(!session.is_processing());
    }

    #[test]
    fn test_compress_produces_result() {
        let mut session = loaded_session();
        let result = session.compress().unwrap();
        assert_eq!(result.mime_type(), TARGET_MIME_TYPE);
        assert_eq!(session.state(), SessionState::HasResult);
        assert!(!session.is_processing());
    }

    #[test]
    fn test_report_and_download() {
        let mut session = loaded_session();
        session.compress().unwrap();

        let report = session.report().unwrap().unwrap();
        let original = session.source().unwrap().original_bytes();
        assert_eq!(report.original_bytes, original);
        assert!(report.approximate_decoded_bytes > 0);

        let artifact = session.download().unwrap().unwrap();
        assert_eq!(artifact.file_name, OUTPUT_FILE_NAME);
        assert_eq!(artifact.mime_type, TARGET_MIME_TYPE);
        assert_eq!(artifact.bytes.len(), session.result().unwrap().encoded_len());
    }

    #[test]
    fn test_new_upload_discards_result() {
        let mut session = loaded_session();
        session.compress().unwrap();
        assert_eq!(session.upload(&noisy_png(8, 8), "other.png", "image/png"), Ok(true));
        assert_eq!(session.state(), SessionState::HasSource);
        assert!(session.result().is_none());
    }

    #[test]
    fn test_recompress_replaces_result() {
        let mut session = loaded_session();
        session.set_quality(Quality::new(95).unwrap());
        let high = session.compress().unwrap().clone();

        session.set_quality(Quality::new(10).unwrap());
        let low = session.compress().unwrap().clone();

        assert_eq!(session.result(), Some(&low));
        assert_eq!(low.quality().value(), 10);
        assert!(low.encoded_len() <= high.encoded_len());
    }

    #[test]
    fn test_busy_gate_rejects_compress() {
        let mut session = loaded_session();
        let gate = session.gate();
        {
            let _held = gate.try_acquire().unwrap();
            assert!(session.is_processing());
            assert_eq!(session.compress().unwrap_err(), SessionError::Busy);
            assert_eq!(session.state(), SessionState::HasSource);
        }
        assert!(!session.is_processing());
        assert!(session.compress().is_ok());
    }

    #[test]
    fn test_failed_compress_keeps_previous_result_and_clears_gate() {
        let mut session = loaded_session();
        let first = session.compress().unwrap().clone();

        session.limits = SurfaceLimits::new(1);
        let err = session.compress().unwrap_err();
        assert!(matches!(err, SessionError::Encode(EncodeError::Surface(_))));
        assert_eq!(session.result(), Some(&first));
        assert!(!session.is_processing());
    }

    #[test]
    fn test_reset() {
        let mut session = loaded_session();
        session.compress().unwrap();
        session.reset();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.source().is_none());
    }

    #[test]
    fn test_in_flight_is_single_slot() {
        let gate = InFlight::new();
        let first = gate.try_acquire();
        assert!(first.is_some());
        assert!(gate.try_acquire().is_none());
        drop(first);
        assert!(gate.try_acquire().is_some());
    }
}
