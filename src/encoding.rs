//! Payload encodings for audit event fields
//!
//! A field's byte payload carries a declared encoding describing how the
//! payload maps to its character value. Plain payloads are read directly;
//! base64 and hex payloads are decoded through the codec first.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{AuditError, Result};

/// Declared encoding of a field payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Raw bytes, no codec applied
    #[default]
    Plain,
    /// Standard base64 with padding
    Base64,
    /// Lowercase hex digits
    Hex,
}

impl Encoding {
    /// Decode an encoded payload back to raw bytes
    ///
    /// # Errors
    ///
    /// Returns `AuditError::Encoding` if the payload is not valid for
    /// this encoding.
    pub fn decode(&self, payload: &[u8]) -> Result<Vec<u8>> {
        match self {
            Encoding::Plain => Ok(payload.to_vec()),
            Encoding::Base64 => BASE64
                .decode(payload)
                .map_err(|e| AuditError::encoding(format!("invalid base64 payload: {}", e))),
            Encoding::Hex => hex::decode(payload)
                .map_err(|e| AuditError::encoding(format!("invalid hex payload: {}", e))),
        }
    }

    /// Encode raw bytes into this encoding's payload representation
    pub fn encode(&self, raw: &[u8]) -> Vec<u8> {
        match self {
            Encoding::Plain => raw.to_vec(),
            Encoding::Base64 => BASE64.encode(raw).into_bytes(),
            Encoding::Hex => hex::encode(raw).into_bytes(),
        }
    }

    /// Encoding name as used in configuration
    pub fn as_str(&self) -> &str {
        match self {
            Encoding::Plain => "plain",
            Encoding::Base64 => "base64",
            Encoding::Hex => "hex",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_round_trip() {
        let raw = b"audit record";
        let encoded = Encoding::Plain.encode(raw);
        assert_eq!(encoded, raw);
        assert_eq!(Encoding::Plain.decode(&encoded).unwrap(), raw);
    }

    #[test]
    fn test_base64_round_trip() {
        let raw = b"audit record";
        let encoded = Encoding::Base64.encode(raw);
        assert_eq!(encoded, b"YXVkaXQgcmVjb3Jk");
        assert_eq!(Encoding::Base64.decode(&encoded).unwrap(), raw);
    }

    #[test]
    fn test_hex_round_trip() {
        let raw = b"\x00\xffaudit";
        let encoded = Encoding::Hex.encode(raw);
        assert_eq!(Encoding::Hex.decode(&encoded).unwrap(), raw);
    }

    #[test]
    fn test_invalid_base64_rejected() {
        let err = Encoding::Base64.decode(b"not base64!!").unwrap_err();
        assert!(matches!(err, AuditError::Encoding(_)));
    }

    #[test]
    fn test_invalid_hex_rejected() {
        let err = Encoding::Hex.decode(b"zz").unwrap_err();
        assert!(matches!(err, AuditError::Encoding(_)));
    }

    #[test]
    fn test_default_is_plain() {
        assert_eq!(Encoding::default(), Encoding::Plain);
    }

    #[test]
    fn test_config_names() {
        assert_eq!(Encoding::Plain.as_str(), "plain");
        assert_eq!(Encoding::Base64.as_str(), "base64");
        assert_eq!(Encoding::Hex.as_str(), "hex");
    }
}
