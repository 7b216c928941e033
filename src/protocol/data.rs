//! Serialized object blobs
//!
//! Keys, values and topic messages travel as opaque serialized blobs. The
//! client treats them as bytes, with helpers for the string case the CLI
//! needs.
//!
//! ## Blob Layout (Big Endian)
//! ```text
//! ┌───────────────────┬─────────────┬───────────────────────┐
//! │ Partition hash (4)│ Type id (4) │       Payload         │
//! └───────────────────┴─────────────┴───────────────────────┘
//! ```

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

/// Blob header: partition hash + type id
pub const DATA_HEADER_SIZE: usize = 8;

/// Serializer type id for UTF-8 strings
pub const STRING_TYPE_ID: i32 = -11;

/// An opaque serialized object
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Data(Bytes);

impl Data {
    /// Wrap already-serialized bytes
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self(bytes.into())
    }

    /// Serialize a string the way the server's string serializer does
    pub fn from_string(value: &str) -> Self {
        let mut buf = BytesMut::with_capacity(DATA_HEADER_SIZE + 4 + value.len());
        buf.put_i32(0);
        buf.put_i32(STRING_TYPE_ID);
        buf.put_i32(value.len() as i32);
        buf.put_slice(value.as_bytes());
        Self(buf.freeze())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Bytes {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serializer type id, if the blob has a header
    pub fn type_id(&self) -> Option<i32> {
        let bytes = self.0.get(4..DATA_HEADER_SIZE)?;
        Some(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Decode a string blob; `None` for other types or malformed payloads
    pub fn to_string_value(&self) -> Option<String> {
        if self.type_id()? != STRING_TYPE_ID {
            return None;
        }
        let len_bytes = self.0.get(DATA_HEADER_SIZE..DATA_HEADER_SIZE + 4)?;
        let len = i32::from_be_bytes([len_bytes[0], len_bytes[1], len_bytes[2], len_bytes[3]]);
        let start = DATA_HEADER_SIZE + 4;
        let payload = self.0.get(start..start + usize::try_from(len).ok()?)?;
        String::from_utf8(payload.to_vec()).ok()
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_string_value() {
            Some(s) => write!(f, "Data({:?})", s),
            None => write!(f, "Data({} bytes)", self.0.len()),
        }
    }
}

impl fmt::Display for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_string_value() {
            Some(s) => f.write_str(&s),
            None => {
                for byte in self.0.iter() {
                    write!(f, "{:02x}", byte)?;
                }
                Ok(())
            }
        }
    }
}
