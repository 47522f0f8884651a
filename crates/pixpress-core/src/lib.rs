//! Pixpress Core - in-browser image compression
//!
//! This crate provides the core functionality behind Pixpress: decoding an
//! uploaded image, re-encoding it as JPEG at a chosen quality, and estimating
//! how much smaller the result is.
//!
//! The two primitives are [`compress`] and [`estimate`]. [`Session`] wraps
//! them in the upload / compress / reset workflow the UI drives.

pub mod encode;
pub mod envelope;
pub mod estimate;
pub mod format;
pub mod quality;
pub mod session;
pub mod settings;
pub mod source;
pub mod surface;

pub use encode::{
    compress, compress_with_limits, DownloadArtifact, EncodeError, EncodedResult,
    OUTPUT_FILE_NAME, TARGET_MIME_TYPE,
};
pub use envelope::{Envelope, ParseError};
pub use estimate::{estimate, estimate_envelope, EstimateError, SizeReport};
pub use format::{format_file_size, format_signed_file_size};
pub use quality::{Quality, QualityError, QualityIndicator, QualityTier};
pub use session::{InFlight, InFlightGuard, Session, SessionError, SessionState};
pub use settings::CompressSettings;
pub use source::{accepts_content_type, DecodeError, Provenance, Raster, SourceImage};
pub use surface::{Surface, SurfaceError, SurfaceLimits};
