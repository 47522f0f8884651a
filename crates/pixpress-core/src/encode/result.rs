//! Output artifacts of a compress call.

use serde::{Deserialize, Serialize};

use crate::envelope::{Envelope, ParseError};
use crate::quality::Quality;

/// MIME type of every encoded result.
pub const TARGET_MIME_TYPE: &str = "image/jpeg";

/// File name offered for every download, whatever the original was called.
pub const OUTPUT_FILE_NAME: &str = "compressed-image.jpg";

/// An encoded image, wrapped in a `data:` URL envelope.
///
/// Only produced by a successful compress, so it always holds a complete
/// encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedResult {
    data_url: String,
    quality: Quality,
    original_bytes: u64,
    encoded_bytes: usize,
}

impl EncodedResult {
    pub(crate) fn from_encoded(bytes: &[u8], quality: Quality, original_bytes: u64) -> Self {
        Self {
            data_url: Envelope::encode(TARGET_MIME_TYPE, bytes),
            quality,
            original_bytes,
            encoded_bytes: bytes.len(),
        }
    }

    /// The full `data:image/jpeg;base64,...` text.
    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    pub fn mime_type(&self) -> &'static str {
        TARGET_MIME_TYPE
    }

    /// Quality the result was encoded at.
    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// Byte size of the upload this result was derived from.
    pub fn original_bytes(&self) -> u64 {
        self.original_bytes
    }

    /// Exact length of the encoded JPEG stream.
    pub fn encoded_len(&self) -> usize {
        self.encoded_bytes
    }

    /// Parsed view of the envelope.
    pub fn envelope(&self) -> Result<Envelope<'_>, ParseError> {
        Envelope::parse(&self.data_url)
    }

    /// Decode the envelope into a downloadable file.
    pub fn to_download(&self) -> Result<DownloadArtifact, ParseError> {
        let envelope = self.envelope()?;
        Ok(DownloadArtifact {
            file_name: OUTPUT_FILE_NAME.to_string(),
            mime_type: envelope.mime_type().to_string(),
            bytes: envelope.decode_payload()?,
        })
    }
}

/// A file ready to be handed to the browser's download machinery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadArtifact {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}
