//! Primitive field codec
//!
//! Reads and writes fixed-width scalars at a byte offset inside a frame's
//! content. All multi-byte integers are Little Endian.
//!
//! Offsets are protocol constants computed when the operation table is
//! defined, so addressing past the end of a buffer is a programming error and
//! panics through normal slice indexing.
//!
//! ## UUID Layout
//! ```text
//! ┌──────────┬──────────────────┬──────────────────┐
//! │ Null (1) │   MSB i64 (8)    │   LSB i64 (8)    │
//! └──────────┴──────────────────┴──────────────────┘
//! ```

use uuid::Uuid;

pub const BYTE_SIZE: usize = 1;
pub const BOOLEAN_SIZE: usize = 1;
pub const SHORT_SIZE: usize = 2;
pub const INT_SIZE: usize = 4;
pub const LONG_SIZE: usize = 8;
pub const UUID_SIZE: usize = BOOLEAN_SIZE + 2 * LONG_SIZE;

#[inline]
pub fn encode_bool(buf: &mut [u8], offset: usize, value: bool) {
    buf[offset] = value as u8;
}

#[inline]
pub fn decode_bool(buf: &[u8], offset: usize) -> bool {
    buf[offset] != 0
}

#[inline]
pub fn encode_u8(buf: &mut [u8], offset: usize, value: u8) {
    buf[offset] = value;
}

#[inline]
pub fn decode_u8(buf: &[u8], offset: usize) -> u8 {
    buf[offset]
}

#[inline]
pub fn encode_i16(buf: &mut [u8], offset: usize, value: i16) {
    buf[offset..offset + SHORT_SIZE].copy_from_slice(&value.to_le_bytes());
}

#[inline]
pub fn decode_i16(buf: &[u8], offset: usize) -> i16 {
    i16::from_le_bytes([buf[offset], buf[offset + 1]])
}

#[inline]
pub fn encode_i32(buf: &mut [u8], offset: usize, value: i32) {
    buf[offset..offset + INT_SIZE].copy_from_slice(&value.to_le_bytes());
}

#[inline]
pub fn decode_i32(buf: &[u8], offset: usize) -> i32 {
    let mut bytes = [0u8; INT_SIZE];
    bytes.copy_from_slice(&buf[offset..offset + INT_SIZE]);
    i32::from_le_bytes(bytes)
}

#[inline]
pub fn encode_i64(buf: &mut [u8], offset: usize, value: i64) {
    buf[offset..offset + LONG_SIZE].copy_from_slice(&value.to_le_bytes());
}

#[inline]
pub fn decode_i64(buf: &[u8], offset: usize) -> i64 {
    let mut bytes = [0u8; LONG_SIZE];
    bytes.copy_from_slice(&buf[offset..offset + LONG_SIZE]);
    i64::from_le_bytes(bytes)
}

/// Encode an optional 128-bit identifier
///
/// `None` sets the null flag and zeroes both halves.
pub fn encode_uuid(buf: &mut [u8], offset: usize, value: Option<Uuid>) {
    match value {
        Some(uuid) => {
            let bits = uuid.as_u128();
            encode_bool(buf, offset, false);
            encode_i64(buf, offset + BOOLEAN_SIZE, (bits >> 64) as u64 as i64);
            encode_i64(buf, offset + BOOLEAN_SIZE + LONG_SIZE, bits as u64 as i64);
        }
        None => {
            encode_bool(buf, offset, true);
            buf[offset + BOOLEAN_SIZE..offset + UUID_SIZE].fill(0);
        }
    }
}

/// Decode an optional 128-bit identifier
///
/// The null flag decides absence; an all-zero identifier with the flag clear
/// is a real value and comes back as `Some(Uuid::nil())`.
pub fn decode_uuid(buf: &[u8], offset: usize) -> Option<Uuid> {
    if decode_bool(buf, offset) {
        return None;
    }
    let msb = decode_i64(buf, offset + BOOLEAN_SIZE) as u64 as u128;
    let lsb = decode_i64(buf, offset + BOOLEAN_SIZE + LONG_SIZE) as u64 as u128;
    Some(Uuid::from_u128((msb << 64) | lsb))
}
