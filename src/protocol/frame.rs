//! Frame definitions
//!
//! A frame is the atomic transport unit: a flag set plus a content buffer.
//!
//! ## Wire Format
//! ```text
//! ┌──────────────┬───────────┬─────────────────────────────┐
//! │ Length (4)   │ Flags (2) │          Content            │
//! │ i32 LE       │ u16 LE    │                             │
//! └──────────────┴───────────┴─────────────────────────────┘
//! ```
//!
//! `Length` counts the 6 header bytes as well as the content.

use std::fmt;
use std::io::{Read, Write};

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{ClcError, Result};

/// Frame header size: 4 bytes length + 2 bytes flags
pub const FRAME_HEADER_SIZE: usize = 6;

/// Flag constants for frames.
pub mod flags {
    pub const DEFAULT: u16 = 0;
    /// First frame group of a message (begin message).
    pub const BEGIN_FRAGMENT: u16 = 1 << 15;
    /// Last frame group of a message (end message).
    pub const END_FRAGMENT: u16 = 1 << 14;
    /// Message fits in a single frame group.
    pub const UNFRAGMENTED: u16 = BEGIN_FRAGMENT | END_FRAGMENT;
    /// Last frame of a message on the wire.
    pub const IS_FINAL: u16 = 1 << 13;
    pub const BEGIN_DATA_STRUCTURE: u16 = 1 << 12;
    pub const END_DATA_STRUCTURE: u16 = 1 << 11;
    pub const IS_NULL: u16 = 1 << 10;
    pub const IS_EVENT: u16 = 1 << 9;
    /// Response carries a backup acknowledgement count.
    pub const BACKUP_AWARE: u16 = 1 << 8;
    pub const BACKUP_EVENT: u16 = 1 << 7;

    /// Check if a specific flag is set.
    #[inline]
    pub fn has_flag(flags: u16, flag: u16) -> bool {
        flags & flag == flag
    }
}

/// Structural role of a frame inside a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRole {
    /// First frame of a message (header + fixed fields)
    Initial,
    /// Raw payload of a variable-length field
    Data,
    /// Marker for an absent optional value
    Null,
    /// Opens a nested structure or list
    BeginStructure,
    /// Closes a nested structure or list
    EndStructure,
}

impl fmt::Display for FrameRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FrameRole::Initial => "initial frame",
            FrameRole::Data => "data frame",
            FrameRole::Null => "null frame",
            FrameRole::BeginStructure => "begin-structure frame",
            FrameRole::EndStructure => "end-structure frame",
        };
        f.write_str(name)
    }
}

/// A single protocol frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Flag bits (see `flags` module)
    pub flags: u16,

    /// Frame content, without the wire header
    pub content: Bytes,
}

impl Frame {
    /// Wrap content bytes with the given flags
    pub fn new(content: impl Into<Bytes>, flags: u16) -> Self {
        Self {
            flags,
            content: content.into(),
        }
    }

    /// Null marker frame
    pub fn null() -> Self {
        Self::new(Bytes::new(), flags::IS_NULL)
    }

    /// Begin-structure marker frame
    pub fn begin() -> Self {
        Self::new(Bytes::new(), flags::BEGIN_DATA_STRUCTURE)
    }

    /// End-structure marker frame
    pub fn end() -> Self {
        Self::new(Bytes::new(), flags::END_DATA_STRUCTURE)
    }

    #[inline]
    pub fn is_null_frame(&self) -> bool {
        flags::has_flag(self.flags, flags::IS_NULL)
    }

    #[inline]
    pub fn is_begin_frame(&self) -> bool {
        flags::has_flag(self.flags, flags::BEGIN_DATA_STRUCTURE)
    }

    #[inline]
    pub fn is_end_frame(&self) -> bool {
        flags::has_flag(self.flags, flags::END_DATA_STRUCTURE)
    }

    #[inline]
    pub fn is_final(&self) -> bool {
        flags::has_flag(self.flags, flags::IS_FINAL)
    }

    #[inline]
    pub fn is_unfragmented(&self) -> bool {
        flags::has_flag(self.flags, flags::UNFRAGMENTED)
    }

    /// Role implied by the flags, ignoring position
    pub fn role(&self) -> FrameRole {
        if self.is_null_frame() {
            FrameRole::Null
        } else if self.is_begin_frame() {
            FrameRole::BeginStructure
        } else if self.is_end_frame() {
            FrameRole::EndStructure
        } else {
            FrameRole::Data
        }
    }

    /// Add flag bits (used for fragmentation and finality marks)
    pub fn add_flags(&mut self, extra: u16) {
        self.flags |= extra;
    }

    /// Rewrite the content through a copy
    ///
    /// Used by the transport to stamp header fields it owns (correlation id).
    pub fn patch_content(&mut self, patch: impl FnOnce(&mut [u8])) {
        let mut buf = BytesMut::from(self.content.as_ref());
        patch(&mut buf[..]);
        self.content = buf.freeze();
    }

    /// Size on the wire including the 6-byte header
    #[inline]
    pub fn frame_length(&self) -> usize {
        FRAME_HEADER_SIZE + self.content.len()
    }

    // =========================================================================
    // Wire Encoding/Decoding
    // =========================================================================

    /// Append the wire form of this frame, OR-ing `extra_flags` into the header
    pub fn encode_into(&self, buf: &mut BytesMut, extra_flags: u16) {
        buf.reserve(self.frame_length());
        buf.put_i32_le(self.frame_length() as i32);
        buf.put_u16_le(self.flags | extra_flags);
        buf.put_slice(&self.content);
    }

    /// Write the wire form of this frame to a stream
    pub fn write_to<W: Write>(&self, writer: &mut W, extra_flags: u16) -> Result<()> {
        let mut buf = BytesMut::with_capacity(self.frame_length());
        self.encode_into(&mut buf, extra_flags);
        writer.write_all(&buf)?;
        Ok(())
    }

    /// Read a complete frame from a stream
    ///
    /// Blocks until the whole frame is received or an error occurs.
    pub fn read_from<R: Read>(reader: &mut R, max_frame_size: usize) -> Result<Self> {
        let mut header = [0u8; FRAME_HEADER_SIZE];
        reader.read_exact(&mut header)?;

        let frame_length = i32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        let flags = u16::from_le_bytes([header[4], header[5]]);

        if frame_length < FRAME_HEADER_SIZE as i32 {
            return Err(ClcError::Protocol(format!(
                "Frame length {} is smaller than the {}-byte frame header",
                frame_length, FRAME_HEADER_SIZE
            )));
        }
        let frame_length = frame_length as usize;
        if frame_length > max_frame_size {
            return Err(ClcError::Protocol(format!(
                "Frame too large: {} bytes (max {})",
                frame_length, max_frame_size
            )));
        }

        let mut content = vec![0u8; frame_length - FRAME_HEADER_SIZE];
        if !content.is_empty() {
            reader.read_exact(&mut content)?;
        }

        Ok(Self::new(content, flags))
    }
}
