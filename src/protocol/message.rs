//! Client message definitions
//!
//! A message is an ordered sequence of frames carrying one logical request,
//! response or event.
//!
//! ## Initial Frame Layout
//! ```text
//! Request / event:
//! ┌──────────┬────────────────┬──────────────┬──────────────────────┐
//! │ Type (4) │ Correlation(8) │ Partition(4) │ Fixed fields ...     │
//! └──────────┴────────────────┴──────────────┴──────────────────────┘
//!   0          4                12             16
//!
//! Response:
//! ┌──────────┬────────────────┬──────────────┬──────────────────────┐
//! │ Type (4) │ Correlation(8) │ BackupAcks(1)│ Fixed fields ...     │
//! └──────────┴────────────────┴──────────────┴──────────────────────┘
//!   0          4                12             13
//! ```
//!
//! Fragments of a split message carry the fragmentation id (i64) at offset 0
//! of their first frame instead.

use std::fmt;
use std::io::{Read, Write};

use bytes::{Bytes, BytesMut};

use super::fixed::{self, BYTE_SIZE, INT_SIZE, LONG_SIZE};
use super::frame::{flags, Frame};
use super::iterator::FrameIterator;
use crate::error::{ClcError, Result};

pub const TYPE_OFFSET: usize = 0;
pub const CORRELATION_ID_OFFSET: usize = TYPE_OFFSET + INT_SIZE;
pub const PARTITION_ID_OFFSET: usize = CORRELATION_ID_OFFSET + LONG_SIZE;
pub const RESPONSE_BACKUP_ACKS_OFFSET: usize = CORRELATION_ID_OFFSET + LONG_SIZE;
pub const FRAGMENTATION_ID_OFFSET: usize = 0;

/// Initial-frame header size for requests and events
pub const REQUEST_HEADER_SIZE: usize = PARTITION_ID_OFFSET + INT_SIZE;

/// Initial-frame header size for responses
pub const RESPONSE_HEADER_SIZE: usize = RESPONSE_BACKUP_ACKS_OFFSET + BYTE_SIZE;

/// Partition id meaning "no partition affinity"
pub const NO_PARTITION: i32 = -1;

/// Message type of a server error response
pub const EXCEPTION_MESSAGE_TYPE: i32 = 0;

/// Preamble written once when a client connection opens
pub const CLIENT_PROTOCOL_HEADER: &[u8; 3] = b"CP2";

/// A request, response or event as a sequence of frames
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientMessage {
    frames: Vec<Frame>,

    /// Whether the transport may resend this message after a transient failure
    retryable: bool,
}

impl ClientMessage {
    /// Create an empty message for encoding
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap frames received from the transport
    pub fn from_frames(frames: Vec<Frame>) -> Self {
        Self {
            frames,
            retryable: false,
        }
    }

    /// Append a frame
    pub fn add_frame(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }

    /// Number of frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Forward-only decode cursor over the frames
    pub fn frame_iter(&self) -> FrameIterator<'_> {
        FrameIterator::new(&self.frames)
    }

    pub fn retryable(&self) -> bool {
        self.retryable
    }

    pub fn set_retryable(&mut self, retryable: bool) {
        self.retryable = retryable;
    }

    // =========================================================================
    // Initial Frame Header Accessors
    // =========================================================================

    /// First frame, checked to be long enough to hold `required` bytes
    pub fn initial_frame(&self, required: usize) -> Result<&Frame> {
        let frame = self
            .frames
            .first()
            .ok_or_else(|| ClcError::Protocol("Message has no frames".to_string()))?;
        if frame.content.len() < required {
            return Err(ClcError::Protocol(format!(
                "Initial frame too short: expected at least {} bytes, got {}",
                required,
                frame.content.len()
            )));
        }
        Ok(frame)
    }

    fn patch_initial_frame(&mut self, required: usize, patch: impl FnOnce(&mut [u8])) -> Result<()> {
        self.initial_frame(required)?;
        self.frames[0].patch_content(patch);
        Ok(())
    }

    pub fn message_type(&self) -> Result<i32> {
        let frame = self.initial_frame(TYPE_OFFSET + INT_SIZE)?;
        Ok(fixed::decode_i32(&frame.content, TYPE_OFFSET))
    }

    pub fn set_message_type(&mut self, message_type: i32) -> Result<()> {
        self.patch_initial_frame(TYPE_OFFSET + INT_SIZE, |buf| {
            fixed::encode_i32(buf, TYPE_OFFSET, message_type)
        })
    }

    pub fn correlation_id(&self) -> Result<i64> {
        let frame = self.initial_frame(CORRELATION_ID_OFFSET + LONG_SIZE)?;
        Ok(fixed::decode_i64(&frame.content, CORRELATION_ID_OFFSET))
    }

    /// Stamp the correlation id; owned by the transport
    pub fn set_correlation_id(&mut self, correlation_id: i64) -> Result<()> {
        self.patch_initial_frame(CORRELATION_ID_OFFSET + LONG_SIZE, |buf| {
            fixed::encode_i64(buf, CORRELATION_ID_OFFSET, correlation_id)
        })
    }

    pub fn partition_id(&self) -> Result<i32> {
        let frame = self.initial_frame(REQUEST_HEADER_SIZE)?;
        Ok(fixed::decode_i32(&frame.content, PARTITION_ID_OFFSET))
    }

    pub fn set_partition_id(&mut self, partition_id: i32) -> Result<()> {
        self.patch_initial_frame(REQUEST_HEADER_SIZE, |buf| {
            fixed::encode_i32(buf, PARTITION_ID_OFFSET, partition_id)
        })
    }

    /// Backup acknowledgement count of a response
    pub fn backup_acks(&self) -> Result<u8> {
        let frame = self.initial_frame(RESPONSE_HEADER_SIZE)?;
        Ok(fixed::decode_u8(&frame.content, RESPONSE_BACKUP_ACKS_OFFSET))
    }

    /// Fragmentation id carried by a fragment's first frame
    pub fn fragmentation_id(&self) -> Result<i64> {
        let frame = self.initial_frame(FRAGMENTATION_ID_OFFSET + LONG_SIZE)?;
        Ok(fixed::decode_i64(&frame.content, FRAGMENTATION_ID_OFFSET))
    }

    pub fn is_event(&self) -> bool {
        self.frames
            .first()
            .map(|f| flags::has_flag(f.flags, flags::IS_EVENT))
            .unwrap_or(false)
    }

    /// Wire size of all frames
    pub fn frame_length(&self) -> usize {
        self.frames.iter().map(Frame::frame_length).sum()
    }

    // =========================================================================
    // Wire Encoding/Decoding
    // =========================================================================

    /// Encode all frames; the last frame is written with `IS_FINAL`
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.frame_length());
        let last = self.frames.len().saturating_sub(1);
        for (i, frame) in self.frames.iter().enumerate() {
            let extra = if i == last { flags::IS_FINAL } else { flags::DEFAULT };
            frame.encode_into(&mut buf, extra);
        }
        buf.freeze()
    }

    /// Write the message to a stream
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.encode())?;
        Ok(())
    }

    /// Read frames until one marked `IS_FINAL`
    ///
    /// `IS_FINAL` is a wire mark only and is cleared on the stored frame.
    /// Each frame is capped at `max_frame_size` and the frames together at
    /// `max_message_size` bytes. The result may be one fragment of a larger
    /// message; see [`FragmentAssembler`](super::FragmentAssembler).
    pub fn read_from<R: Read>(reader: &mut R, max_frame_size: usize, max_message_size: usize) -> Result<Self> {
        let mut frames = Vec::new();
        let mut length = 0usize;
        loop {
            let mut frame = Frame::read_from(reader, max_frame_size)?;
            length += frame.frame_length();
            if length > max_message_size {
                return Err(ClcError::Protocol(format!(
                    "Message exceeds maximum size: {} bytes after {} frames (max {})",
                    length,
                    frames.len() + 1,
                    max_message_size
                )));
            }
            let is_final = frame.is_final();
            frame.flags &= !flags::IS_FINAL;
            frames.push(frame);
            if is_final {
                break;
            }
        }
        Ok(Self::from_frames(frames))
    }
}

impl fmt::Display for ClientMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message_type() {
            Ok(t) => write!(f, "ClientMessage{{type=0x{:06x}, frames={}", t, self.frames.len())?,
            Err(_) => write!(f, "ClientMessage{{frames={}", self.frames.len())?,
        }
        if let Ok(id) = self.correlation_id() {
            write!(f, ", correlation_id={}", id)?;
        }
        write!(f, ", retryable={}}}", self.retryable)
    }
}
