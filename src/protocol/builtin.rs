//! Variable-length field codecs
//!
//! Each variable-length field is written as one or more frames after the
//! initial frame:
//! - string / data: one data frame with the raw bytes
//! - absent optional: one null frame
//! - list: begin frame, one encoding per item, end frame
//! - list of i64: one data frame of packed little-endian longs
//! - nested structure: begin frame, fields, end frame
//!
//! Structure decoders skip to the matching end frame after reading the fields
//! they know, so servers may append fields without breaking older clients.

use bytes::{BufMut, BytesMut};

use super::data::Data;
use super::fixed::{self, INT_SIZE, LONG_SIZE};
use super::frame::{flags, Frame, FrameRole};
use super::iterator::FrameIterator;
use super::message::{ClientMessage, EXCEPTION_MESSAGE_TYPE, RESPONSE_HEADER_SIZE};
use crate::error::{ClcError, Result};

// =============================================================================
// Strings and Data
// =============================================================================

pub fn encode_string(message: &mut ClientMessage, value: &str) {
    message.add_frame(Frame::new(value.as_bytes().to_vec(), flags::DEFAULT));
}

pub fn decode_string(iter: &mut FrameIterator<'_>) -> Result<String> {
    let frame = iter.next_expecting(FrameRole::Data)?;
    Ok(String::from_utf8(frame.content.to_vec())?)
}

pub fn encode_data(message: &mut ClientMessage, value: &Data) {
    message.add_frame(Frame::new(value.clone().into_bytes(), flags::DEFAULT));
}

pub fn decode_data(iter: &mut FrameIterator<'_>) -> Result<Data> {
    let frame = iter.next_expecting(FrameRole::Data)?;
    Ok(Data::new(frame.content.clone()))
}

// =============================================================================
// Nullable Values
// =============================================================================

/// Encode an optional value, writing a null frame when absent
pub fn encode_nullable<T: ?Sized>(
    message: &mut ClientMessage,
    value: Option<&T>,
    encode: impl FnOnce(&mut ClientMessage, &T),
) {
    match value {
        Some(v) => encode(message, v),
        None => message.add_frame(Frame::null()),
    }
}

/// Decode an optional value, consuming a null frame when absent
pub fn decode_nullable<'a, T>(
    iter: &mut FrameIterator<'a>,
    decode: impl FnOnce(&mut FrameIterator<'a>) -> Result<T>,
) -> Result<Option<T>> {
    if iter.next_if_null() {
        return Ok(None);
    }
    decode(iter).map(Some)
}

// =============================================================================
// Lists
// =============================================================================

/// Encode a list as begin frame, items, end frame
pub fn encode_list<T>(
    message: &mut ClientMessage,
    items: &[T],
    mut encode: impl FnMut(&mut ClientMessage, &T),
) {
    message.add_frame(Frame::begin());
    for item in items {
        encode(message, item);
    }
    message.add_frame(Frame::end());
}

/// Decode a list written by [`encode_list`]
pub fn decode_list<'a, T>(
    iter: &mut FrameIterator<'a>,
    mut decode: impl FnMut(&mut FrameIterator<'a>) -> Result<T>,
) -> Result<Vec<T>> {
    iter.next_expecting(FrameRole::BeginStructure)?;
    let mut items = Vec::new();
    while iter.peek_next().map(|f| !f.is_end_frame()).unwrap_or(false) {
        items.push(decode(iter)?);
    }
    iter.next_expecting(FrameRole::EndStructure)?;
    Ok(items)
}

/// Encode a list of i64 packed into a single frame
pub fn encode_long_list(message: &mut ClientMessage, items: &[i64]) {
    let mut buf = BytesMut::with_capacity(items.len() * LONG_SIZE);
    for item in items {
        buf.put_i64_le(*item);
    }
    message.add_frame(Frame::new(buf.freeze(), flags::DEFAULT));
}

pub fn decode_long_list(iter: &mut FrameIterator<'_>) -> Result<Vec<i64>> {
    let frame = iter.next_expecting(FrameRole::Data)?;
    if frame.content.len() % LONG_SIZE != 0 {
        return Err(ClcError::Protocol(format!(
            "Long list frame of {} bytes is not a multiple of {}",
            frame.content.len(),
            LONG_SIZE
        )));
    }
    Ok((0..frame.content.len() / LONG_SIZE)
        .map(|i| fixed::decode_i64(&frame.content, i * LONG_SIZE))
        .collect())
}

// =============================================================================
// Nested Structures
// =============================================================================

/// Name and service of a distributed object known to the cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributedObjectInfo {
    pub service_name: String,
    pub name: String,
}

pub fn encode_distributed_object_info(message: &mut ClientMessage, info: &DistributedObjectInfo) {
    message.add_frame(Frame::begin());
    encode_string(message, &info.service_name);
    encode_string(message, &info.name);
    message.add_frame(Frame::end());
}

pub fn decode_distributed_object_info(iter: &mut FrameIterator<'_>) -> Result<DistributedObjectInfo> {
    iter.next_expecting(FrameRole::BeginStructure)?;
    let service_name = decode_string(iter)?;
    let name = decode_string(iter)?;
    iter.skip_to_end_of_structure()?;
    Ok(DistributedObjectInfo { service_name, name })
}

/// One entry of a server error response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorHolder {
    pub error_code: i32,
    pub class_name: String,
    pub message: Option<String>,
}

impl From<ErrorHolder> for ClcError {
    fn from(holder: ErrorHolder) -> Self {
        ClcError::Remote {
            error_code: holder.error_code,
            class_name: holder.class_name,
            message: holder.message,
        }
    }
}

/// Encode an error holder; the stack trace is written as an empty list
pub fn encode_error_holder(message: &mut ClientMessage, holder: &ErrorHolder) {
    message.add_frame(Frame::begin());
    let mut fixed_part = vec![0u8; INT_SIZE];
    fixed::encode_i32(&mut fixed_part, 0, holder.error_code);
    message.add_frame(Frame::new(fixed_part, flags::DEFAULT));
    encode_string(message, &holder.class_name);
    encode_nullable(message, holder.message.as_deref(), encode_string);
    encode_list::<String>(message, &[], |m, s| encode_string(m, s));
    message.add_frame(Frame::end());
}

/// Decode an error holder, skipping the stack trace
pub fn decode_error_holder(iter: &mut FrameIterator<'_>) -> Result<ErrorHolder> {
    iter.next_expecting(FrameRole::BeginStructure)?;
    let fixed_part = iter.next_expecting(FrameRole::Data)?;
    if fixed_part.content.len() < INT_SIZE {
        return Err(ClcError::Protocol(format!(
            "Error holder frame too short: {} bytes",
            fixed_part.content.len()
        )));
    }
    let error_code = fixed::decode_i32(&fixed_part.content, 0);
    let class_name = decode_string(iter)?;
    let message = decode_nullable(iter, decode_string)?;
    iter.skip_to_end_of_structure()?;
    Ok(ErrorHolder {
        error_code,
        class_name,
        message,
    })
}

/// Build a server error response
pub fn encode_error_response(holders: &[ErrorHolder]) -> ClientMessage {
    let mut message = ClientMessage::new();
    let mut initial = vec![0u8; RESPONSE_HEADER_SIZE];
    fixed::encode_i32(&mut initial, 0, EXCEPTION_MESSAGE_TYPE);
    message.add_frame(Frame::new(initial, flags::UNFRAGMENTED));
    encode_list(&mut message, holders, encode_error_holder);
    message
}

/// Decode a server error response into its holders
pub fn decode_error_response(message: &ClientMessage) -> Result<Vec<ErrorHolder>> {
    let mut iter = message.frame_iter();
    iter.next_initial()?;
    decode_list(&mut iter, decode_error_holder)
}
