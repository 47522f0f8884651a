//! `data:` URL envelopes.
//!
//! Encoded output travels as a self-describing text envelope of the form
//! `data:<mime>;base64,<payload>`, which the UI can render directly as an
//! image source or turn into a download.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64";

/// Errors that can occur while reading an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Text does not start with `data:`
    #[error("Envelope is missing the data: scheme")]
    MissingScheme,

    /// No comma separating the header from the payload
    #[error("Envelope has no comma-delimited payload")]
    MissingSeparator,

    /// Header does not declare a base64 payload
    #[error("Envelope header {header:?} does not declare a base64 payload")]
    NotBase64 { header: String },

    /// Payload characters are not valid base64
    #[error("Invalid base64 payload: {0}")]
    InvalidPayload(String),
}

/// Borrowed view over a parsed `data:` URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope<'a> {
    mime_type: &'a str,
    payload: &'a str,
}

impl<'a> Envelope<'a> {
    /// Wrap raw bytes in a base64 `data:` URL.
    pub fn encode(mime_type: &str, bytes: &[u8]) -> String {
        let mut out = String::with_capacity(
            SCHEME.len() + mime_type.len() + BASE64_MARKER.len() + 1 + bytes.len().div_ceil(3) * 4,
        );
        out.push_str(SCHEME);
        out.push_str(mime_type);
        out.push_str(BASE64_MARKER);
        out.push(',');
        STANDARD.encode_string(bytes, &mut out);
        out
    }

    /// Split an envelope into its MIME type and payload.
    ///
    /// The payload is everything after the first comma and is not validated
    /// here; see [`Envelope::decode_payload`].
    pub fn parse(text: &'a str) -> Result<Self, ParseError> {
        let rest = text.strip_prefix(SCHEME).ok_or(ParseError::MissingScheme)?;
        let (header, payload) = rest.split_once(',').ok_or(ParseError::MissingSeparator)?;
        let mime_type = header
            .strip_suffix(BASE64_MARKER)
            .ok_or_else(|| ParseError::NotBase64 {
                header: header.to_string(),
            })?;

        Ok(Self { mime_type, payload })
    }

    /// Declared MIME type (may be empty).
    pub fn mime_type(&self) -> &'a str {
        self.mime_type
    }

    /// The base64 payload text.
    pub fn payload(&self) -> &'a str {
        self.payload
    }

    /// Decode the payload back into bytes.
    pub fn decode_payload(&self) -> Result<Vec<u8>, ParseError> {
        STANDARD
            .decode(self.payload)
            .map_err(|e| ParseError::InvalidPayload(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_layout() {
        let text = Envelope::encode("image/jpeg", b"abc");
        assert_eq!(text, "data:image/jpeg;base64,YWJj");
    }

    #[test]
    fn test_encode_pads() {
        assert_eq!(Envelope::encode("image/jpeg", b"ab"), "data:image/jpeg;base64,YWI=");
        assert_eq!(Envelope::encode("image/jpeg", b""), "data:image/jpeg;base64,");
    }

    #[test]
    fn test_parse() {
        let env = Envelope::parse("data:image/png;base64,iVBORw0K").unwrap();
        assert_eq!(env.mime_type(), "image/png");
        assert_eq!(env.payload(), "iVBORw0K");
    }

    #[test]
    fn test_parse_empty_payload() {
        let env = Envelope::parse("data:image/jpeg;base64,").unwrap();
        assert_eq!(env.payload(), "");
        assert_eq!(env.decode_payload().unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_parse_splits_on_first_comma() {
        let env = Envelope::parse("data:image/jpeg;base64,AAAA,BBBB").unwrap();
        assert_eq!(env.payload(), "AAAA,BBBB");
    }

    #[test]
    fn test_parse_missing_separator() {
        assert_eq!(
            Envelope::parse("data:image/jpeg;base64AAAA"),
            Err(ParseError::MissingSeparator)
        );
    }

    #[test]
    fn test_parse_missing_scheme() {
        assert_eq!(
            Envelope::parse("image/jpeg;base64,AAAA"),
            Err(ParseError::MissingScheme)
        );
        assert_eq!(Envelope::parse(""), Err(ParseError::MissingScheme));
    }

    #[test]
    fn test_parse_not_base64() {
        assert_eq!(
            Envelope::parse("data:text/plain,hello"),
            Err(ParseError::NotBase64 {
                header: "text/plain".to_string()
            })
        );
    }

    #[test]
    fn test_decode_payload_roundtrip() {
        let bytes: Vec<u8> = (0..=255).collect();
        let text = Envelope::encode("image/jpeg", &bytes);
        let env = Envelope::parse(&text).unwrap();
        assert_eq!(env.decode_payload().unwrap(), bytes);
    }

    #[test]
    fn test_decode_payload_invalid() {
        let env = Envelope::parse("data:image/jpeg;base64,@@@@").unwrap();
        assert!(matches!(
            env.decode_payload(),
            Err(ParseError::InvalidPayload(_))
        ));
    }
}
