//! Size estimation from encoded envelopes.
//!
//! The decoded size of a result is estimated from the length of its base64
//! payload alone: every 4 payload characters stand for 3 bytes. Padding
//! characters are counted like any other, so the estimate runs up to two
//! bytes high for padded payloads. This matches the numbers users have
//! always been shown and is kept as is.

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::encode::EncodedResult;
use crate::envelope::{Envelope, ParseError};

/// Errors that can occur while estimating sizes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EstimateError {
    /// The envelope could not be parsed
    #[error("Malformed envelope: {0}")]
    Parse(#[from] ParseError),

    /// Ratio requested against an empty original
    #[error("Original size is zero; compression ratio is undefined")]
    ZeroOriginal,
}

/// Approximate sizes for an encoded result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeReport {
    /// Size of the original upload in bytes.
    pub original_bytes: u64,
    /// `floor(payload_chars * 0.75)`.
    pub approximate_decoded_bytes: u64,
    /// Rounded percentage saved; negative when the output grew.
    pub compression_ratio_percent: i64,
}

impl SizeReport {
    /// Bytes saved relative to the original (negative when the output grew).
    pub fn saved_bytes(&self) -> i64 {
        i64::try_from(self.original_bytes).unwrap_or(i64::MAX)
            - i64::try_from(self.approximate_decoded_bytes).unwrap_or(i64::MAX)
    }
}

/// Estimate the decoded size and compression ratio of an encoded result.
pub fn estimate(encoded: &EncodedResult) -> Result<SizeReport, EstimateError> {
    estimate_envelope(encoded.data_url(), encoded.original_bytes())
}

/// Estimate sizes from raw envelope text and the original byte count.
///
/// # Errors
///
/// * `EstimateError::Parse` if `data_url` is not a base64 `data:` URL
/// * `EstimateError::ZeroOriginal` if `original_bytes` is 0
pub fn estimate_envelope(data_url: &str, original_bytes: u64) -> Result<SizeReport, EstimateError> {
    let envelope = Envelope::parse(data_url)?;
    let approximate = approximate_decoded_bytes(envelope.payload().len());
    let ratio = compression_ratio_percent(original_bytes, approximate)?;

    debug!(
        "estimated {} bytes from {} payload chars ({}% of {} saved)",
        approximate,
        envelope.payload().len(),
        ratio,
        original_bytes
    );

    Ok(SizeReport {
        original_bytes,
        approximate_decoded_bytes: approximate,
        compression_ratio_percent: ratio,
    })
}

/// `floor(payload_chars * 3 / 4)` without intermediate overflow.
pub fn approximate_decoded_bytes(payload_chars: usize) -> u64 {
    let chars = payload_chars as u64;
    (chars / 4) * 3 + (chars % 4) * 3 / 4
}

/// `round((original - compressed) / original * 100)`, rounding halves up.
pub fn compression_ratio_percent(original_bytes: u64, compressed_bytes: u64) -> Result<i64, EstimateError> {
    if original_bytes == 0 {
        return Err(EstimateError::ZeroOriginal);
    }
    let original = original_bytes as f64;
    let ratio = (original - compressed_bytes as f64) / original * 100.0;
    Ok(round_half_up(ratio) as i64)
}

/// Round to the nearest integer, halves toward positive infinity.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
