//! Frame iterator
//!
//! Forward-only decode cursor over a message's frames. Every consuming call
//! states the role it expects, so a frame sequence that does not match the
//! declared field order fails with a structural error instead of decoding
//! into the wrong fields.

use super::frame::{Frame, FrameRole};
use crate::error::{ClcError, Result};

/// Cursor over a message's frames
#[derive(Debug, Clone)]
pub struct FrameIterator<'a> {
    frames: &'a [Frame],
    position: usize,
}

impl<'a> FrameIterator<'a> {
    pub fn new(frames: &'a [Frame]) -> Self {
        Self { frames, position: 0 }
    }

    /// Index of the next frame to be consumed
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn has_next(&self) -> bool {
        self.position < self.frames.len()
    }

    /// Look at the next frame without consuming it
    pub fn peek_next(&self) -> Option<&'a Frame> {
        self.frames.get(self.position)
    }

    /// Consume the next frame whatever its role
    pub fn next_frame(&mut self, expected: FrameRole) -> Result<&'a Frame> {
        let frame = self.frames.get(self.position).ok_or(ClcError::FramesExhausted {
            index: self.position,
            expected,
        })?;
        self.position += 1;
        Ok(frame)
    }

    /// Consume the initial frame of the message
    pub fn next_initial(&mut self) -> Result<&'a Frame> {
        if self.position != 0 {
            return Err(ClcError::Protocol(format!(
                "Initial frame requested at position {}",
                self.position
            )));
        }
        self.next_frame(FrameRole::Initial)
    }

    /// Consume the next frame, failing unless it has the expected role
    pub fn next_expecting(&mut self, expected: FrameRole) -> Result<&'a Frame> {
        let index = self.position;
        let frame = self.next_frame(expected)?;
        let found = frame.role();
        if found != expected {
            return Err(ClcError::UnexpectedFrame {
                index,
                expected,
                found,
            });
        }
        Ok(frame)
    }

    /// Consume a null frame if one is next
    ///
    /// Returns `true` when the value is absent.
    pub fn next_if_null(&mut self) -> bool {
        match self.peek_next() {
            Some(frame) if frame.is_null_frame() => {
                self.position += 1;
                true
            }
            _ => false,
        }
    }

    /// Whether the next frame closes the current structure
    pub fn next_is_end(&self) -> bool {
        self.peek_next().map(Frame::is_end_frame).unwrap_or(false)
    }

    /// Skip the rest of the current nested structure
    ///
    /// Must be called after its begin frame was consumed; consumes frames up
    /// to and including the matching end frame, stepping over any nested
    /// structures on the way.
    pub fn skip_to_end_of_structure(&mut self) -> Result<()> {
        let mut open = 1usize;
        while open != 0 {
            let frame = self.next_frame(FrameRole::EndStructure)?;
            if frame.is_end_frame() {
                open -= 1;
            } else if frame.is_begin_frame() {
                open += 1;
            }
        }
        Ok(())
    }
}

impl<'a> Iterator for FrameIterator<'a> {
    type Item = &'a Frame;

    fn next(&mut self) -> Option<Self::Item> {
        let frame = self.frames.get(self.position)?;
        self.position += 1;
        Some(frame)
    }
}
