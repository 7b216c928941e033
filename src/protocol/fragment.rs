//! Message fragmentation
//!
//! A message larger than the transmission unit is sent as several fragments.
//! Each fragment is its own wire message whose first frame carries the
//! fragmentation id and the position flags:
//!
//! ```text
//! fragment 1: [id | BEGIN_FRAGMENT] [initial frame] [frame] ...
//! fragment 2: [id | -             ] [frame] ...
//! fragment n: [id | END_FRAGMENT  ] [frame] ... (last frame IS_FINAL)
//! ```
//!
//! Frames are never split; a single frame bigger than the limit travels alone.

use std::collections::HashMap;

use super::fixed::{self, LONG_SIZE};
use super::frame::{flags, Frame};
use super::message::{ClientMessage, FRAGMENTATION_ID_OFFSET};
use crate::error::{ClcError, Result};

fn fragmentation_frame(fragment_id: i64, position_flags: u16) -> Frame {
    let mut content = vec![0u8; LONG_SIZE];
    fixed::encode_i64(&mut content, FRAGMENTATION_ID_OFFSET, fragment_id);
    Frame::new(content, position_flags)
}

/// Split a message into fragments of at most `fragment_size` wire bytes
///
/// Returns the message unchanged when it fits or cannot be split further.
pub fn split_message(message: ClientMessage, fragment_size: usize, fragment_id: i64) -> Vec<ClientMessage> {
    if message.frame_length() <= fragment_size || message.len() < 2 {
        return vec![message];
    }

    let retryable = message.retryable();
    let header_length = fragmentation_frame(fragment_id, flags::DEFAULT).frame_length();

    let mut groups: Vec<Vec<Frame>> = Vec::new();
    let mut current: Vec<Frame> = Vec::new();
    let mut current_length = header_length;

    for frame in message.into_frames() {
        if !current.is_empty() && current_length + frame.frame_length() > fragment_size {
            groups.push(std::mem::take(&mut current));
            current_length = header_length;
        }
        current_length += frame.frame_length();
        current.push(frame);
    }
    groups.push(current);

    if groups.len() == 1 {
        let mut whole = ClientMessage::from_frames(groups.remove(0));
        whole.set_retryable(retryable);
        return vec![whole];
    }

    let last = groups.len() - 1;
    groups
        .into_iter()
        .enumerate()
        .map(|(i, group)| {
            let position = match i {
                0 => flags::BEGIN_FRAGMENT,
                i if i == last => flags::END_FRAGMENT,
                _ => flags::DEFAULT,
            };
            let mut fragment = ClientMessage::new();
            fragment.add_frame(fragmentation_frame(fragment_id, position));
            for frame in group {
                fragment.add_frame(frame);
            }
            fragment.set_retryable(retryable);
            fragment
        })
        .collect()
}

/// Most fragmented messages that may be in flight at once
pub const MAX_PENDING_MESSAGES: usize = 256;

#[derive(Debug, Default)]
struct Partial {
    frames: Vec<Frame>,
    length: usize,
}

/// Reassembles fragmented messages keyed by fragmentation id
///
/// Each partial message is capped at `max_message_size` wire bytes and at most
/// [`MAX_PENDING_MESSAGES`] may be open at once. A message that goes over its
/// cap is dropped and reported as a protocol error.
#[derive(Debug)]
pub struct FragmentAssembler {
    pending: HashMap<i64, Partial>,
    max_message_size: usize,
}

impl FragmentAssembler {
    pub fn new(max_message_size: usize) -> Self {
        Self {
            pending: HashMap::new(),
            max_message_size,
        }
    }

    /// Number of messages still waiting for fragments
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Feed one wire message
    ///
    /// Returns the complete message once its last fragment arrives, or the
    /// input itself when it was never fragmented.
    pub fn accept(&mut self, wire: ClientMessage) -> Result<Option<ClientMessage>> {
        let first_flags = wire
            .frames()
            .first()
            .map(|f| f.flags)
            .ok_or_else(|| ClcError::Protocol("Received message with no frames".to_string()))?;

        if flags::has_flag(first_flags, flags::UNFRAGMENTED) {
            return Ok(Some(wire));
        }

        let fragment_id = wire.fragmentation_id()?;
        let frames: Vec<Frame> = wire.into_frames().into_iter().skip(1).collect();
        let length: usize = frames.iter().map(Frame::frame_length).sum();

        if flags::has_flag(first_flags, flags::BEGIN_FRAGMENT) {
            if self.pending.contains_key(&fragment_id) {
                return Err(ClcError::Protocol(format!(
                    "Duplicate begin fragment for fragmentation id {}",
                    fragment_id
                )));
            }
            if self.pending.len() >= MAX_PENDING_MESSAGES {
                return Err(ClcError::Protocol(format!(
                    "Too many fragmented messages in flight (limit {})",
                    MAX_PENDING_MESSAGES
                )));
            }
            self.check_length(fragment_id, length)?;
            tracing::trace!("Begin fragment {}", fragment_id);
            self.pending.insert(fragment_id, Partial { frames, length });
            return Ok(None);
        }

        let collected = self.pending.get_mut(&fragment_id).ok_or_else(|| {
            ClcError::Protocol(format!(
                "Fragment for unknown fragmentation id {}",
                fragment_id
            ))
        })?;
        let total = collected.length + length;
        collected.frames.extend(frames);
        collected.length = total;
        if let Err(e) = self.check_length(fragment_id, total) {
            self.pending.remove(&fragment_id);
            return Err(e);
        }

        if flags::has_flag(first_flags, flags::END_FRAGMENT) {
            let partial = self.pending.remove(&fragment_id).unwrap_or_default();
            tracing::trace!(
                "End fragment {}, {} frames reassembled",
                fragment_id,
                partial.frames.len()
            );
            return Ok(Some(ClientMessage::from_frames(partial.frames)));
        }
        Ok(None)
    }

    fn check_length(&self, fragment_id: i64, length: usize) -> Result<()> {
        if length > self.max_message_size {
            tracing::warn!(
                "Dropping fragmented message {}: {} bytes exceeds limit {}",
                fragment_id,
                length,
                self.max_message_size
            );
            return Err(ClcError::Protocol(format!(
                "Fragmented message {} is {} bytes (max {})",
                fragment_id, length, self.max_message_size
            )));
        }
        Ok(())
    }
}
