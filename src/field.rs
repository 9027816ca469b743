//! Named, encoded binary values attached to audit events

use std::fmt;

use zeroize::Zeroize;

use crate::encoding::Encoding;
use crate::error::{AuditError, Result};

/// A named binary value with a declared payload encoding
///
/// The name is immutable once constructed. The payload is owned by the
/// field and can be securely wiped with [`clear`](Self::clear); it is also
/// wiped when the field is dropped, so sensitive values do not linger in
/// freed memory.
///
/// # Example
///
/// ```
/// use veritrail::{Encoding, Field};
///
/// let field = Field::with_encoding("actor", b"YWxpY2U=".to_vec(), Encoding::Base64).unwrap();
/// assert_eq!(field.char_value().unwrap(), "alice");
/// ```
pub struct Field {
    name: String,
    payload: Vec<u8>,
    encoding: Encoding,
}

impl Field {
    /// Create a plain-encoded field
    ///
    /// # Errors
    ///
    /// Returns `AuditError::InvalidArgument` if the name is blank.
    pub fn new<S: Into<String>>(name: S, payload: Vec<u8>) -> Result<Self> {
        Self::with_encoding(name, payload, Encoding::Plain)
    }

    /// Create a field with an explicit payload encoding
    pub fn with_encoding<S: Into<String>>(
        name: S,
        payload: Vec<u8>,
        encoding: Encoding,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AuditError::invalid_argument("field name must not be blank"));
        }
        Ok(Self {
            name,
            payload,
            encoding,
        })
    }

    /// Create a field from character input, encoding the payload with the
    /// given encoding so that [`char_value`](Self::char_value) round-trips
    pub fn from_chars<S: Into<String>>(name: S, value: &str, encoding: Encoding) -> Result<Self> {
        Self::with_encoding(name, encoding.encode(value.as_bytes()), encoding)
    }

    /// Field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared payload encoding
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Raw payload bytes as stored (still encoded for base64/hex fields)
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Character view of the payload
    ///
    /// Plain payloads are decoded directly as UTF-8; base64 and hex
    /// payloads are first decoded to raw bytes through the codec.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::Encoding` if the payload is not valid for the
    /// declared encoding or the decoded bytes are not valid UTF-8.
    pub fn char_value(&self) -> Result<String> {
        let raw = self.encoding.decode(&self.payload)?;
        String::from_utf8(raw).map_err(|e| {
            AuditError::encoding(format!("field '{}' is not valid UTF-8: {}", self.name, e))
        })
    }

    /// Zero-overwrite the payload in place
    ///
    /// The payload keeps its length; subsequent reads observe all-zero
    /// bytes. Decoding a wiped base64/hex payload fails, which is the
    /// intended behavior for a destroyed field.
    pub fn clear(&mut self) {
        self.payload.as_mut_slice().zeroize();
    }
}

impl Drop for Field {
    fn drop(&mut self) {
        self.payload.zeroize();
    }
}

// Payloads may hold sensitive material; Debug reports length only.
impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("encoding", &self.encoding)
            .field("payload_len", &self.payload.len())
            .finish()
    }
}
