//! Stream transport
//!
//! Blocking transport over any `Read`/`Write` pair (a socket, a pipe, a file
//! or an in-memory buffer).

use std::io::{BufReader, BufWriter, Cursor, Read, Write};
use std::sync::atomic::{AtomicI64, Ordering};

use parking_lot::Mutex;

use super::Transport;
use crate::config::Config;
use crate::error::{ClcError, Result};
use crate::protocol::{split_message, ClientMessage, FragmentAssembler, CLIENT_PROTOCOL_HEADER};

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Write a message to a stream and flush it
pub fn write_message<W: Write>(writer: &mut W, message: &ClientMessage) -> Result<()> {
    message.write_to(writer)?;
    writer.flush()?;
    Ok(())
}

/// Read one wire message (possibly a fragment) from a stream
///
/// Blocks until a frame marked `IS_FINAL` is received or an error occurs.
pub fn read_message<R: Read>(reader: &mut R, max_frame_size: usize, max_message_size: usize) -> Result<ClientMessage> {
    ClientMessage::read_from(reader, max_frame_size, max_message_size)
}

/// Read every wire message in a captured byte buffer
///
/// Trailing bytes that do not form a complete message are an error.
pub fn read_all_messages(bytes: &[u8], max_frame_size: usize, max_message_size: usize) -> Result<Vec<ClientMessage>> {
    let mut cursor = Cursor::new(bytes);
    let mut messages = Vec::new();
    while (cursor.position() as usize) < bytes.len() {
        let message = read_message(&mut cursor, max_frame_size, max_message_size).map_err(|e| match e {
            ClcError::Io(ref io) if io.kind() == std::io::ErrorKind::UnexpectedEof => {
                ClcError::Protocol(format!(
                    "Truncated message after {} complete messages",
                    messages.len()
                ))
            }
            other => other,
        })?;
        messages.push(message);
    }
    Ok(messages)
}

// =============================================================================
// StreamTransport
// =============================================================================

/// Request/response transport over a byte stream
///
/// `invoke` holds the read side for the whole exchange, so concurrent callers
/// are served one request at a time and never see each other's responses.
pub struct StreamTransport<R: Read, W: Write> {
    /// Stream reader (buffered for efficiency)
    reader: Mutex<BufReader<R>>,

    /// Stream writer (buffered for efficiency)
    writer: Mutex<BufWriter<W>>,

    /// Partially received fragmented messages
    assembler: Mutex<FragmentAssembler>,

    next_correlation_id: AtomicI64,

    next_fragment_id: AtomicI64,

    /// Fragmentation threshold for outgoing messages
    fragment_size: usize,

    /// Largest accepted incoming frame
    max_frame_size: usize,

    /// Largest accepted incoming message
    max_message_size: usize,
}

impl<R: Read, W: Write> StreamTransport<R, W> {
    /// Create a transport over an already-open stream
    pub fn new(reader: R, writer: W, config: &Config) -> Self {
        Self {
            reader: Mutex::new(BufReader::new(reader)),
            writer: Mutex::new(BufWriter::new(writer)),
            assembler: Mutex::new(FragmentAssembler::new(config.max_message_size)),
            next_correlation_id: AtomicI64::new(1),
            next_fragment_id: AtomicI64::new(1),
            fragment_size: config.fragment_size,
            max_frame_size: config.max_frame_size,
            max_message_size: config.max_message_size,
        }
    }

    /// Write the protocol preamble; call once before the first request
    pub fn handshake(&self) -> Result<()> {
        let mut writer = self.writer.lock();
        writer.write_all(CLIENT_PROTOCOL_HEADER)?;
        writer.flush()?;
        tracing::debug!("Protocol header sent");
        Ok(())
    }

    /// Send a request, fragmenting it when needed
    ///
    /// Returns the correlation id stamped on the request.
    pub fn send(&self, mut request: ClientMessage) -> Result<i64> {
        let correlation_id = self.next_correlation_id.fetch_add(1, Ordering::Relaxed);
        request.set_correlation_id(correlation_id)?;
        tracing::debug!("Sending {}", request);

        let fragments = if request.frame_length() > self.fragment_size {
            let fragment_id = self.next_fragment_id.fetch_add(1, Ordering::Relaxed);
            split_message(request, self.fragment_size, fragment_id)
        } else {
            vec![request]
        };
        if fragments.len() > 1 {
            tracing::debug!(
                "Request {} split into {} fragments",
                correlation_id,
                fragments.len()
            );
        }

        let mut writer = self.writer.lock();
        for fragment in &fragments {
            fragment.write_to(&mut *writer)?;
        }
        writer.flush()?;
        Ok(correlation_id)
    }

    /// Receive the next complete message, reassembling fragments
    pub fn receive(&self) -> Result<ClientMessage> {
        let mut reader = self.reader.lock();
        self.receive_from(&mut reader)
    }

    fn receive_from(&self, reader: &mut BufReader<R>) -> Result<ClientMessage> {
        loop {
            let wire = read_message(&mut *reader, self.max_frame_size, self.max_message_size)?;
            if let Some(message) = self.assembler.lock().accept(wire)? {
                tracing::trace!("Received {}", message);
                return Ok(message);
            }
        }
    }

    /// Number of fragmented messages still incomplete
    pub fn pending_fragments(&self) -> usize {
        self.assembler.lock().pending()
    }
}

impl<R: Read, W: Write> Transport for StreamTransport<R, W> {
    fn invoke(&self, request: ClientMessage) -> Result<ClientMessage> {
        let mut reader = self.reader.lock();
        let correlation_id = self.send(request)?;

        loop {
            let response = self.receive_from(&mut reader)?;
            if response.is_event() {
                tracing::debug!(
                    "Skipping event 0x{:06x} while waiting for {}",
                    response.message_type()?,
                    correlation_id
                );
                continue;
            }
            let received = response.correlation_id()?;
            if received != correlation_id {
                tracing::warn!(
                    "Dropping response for correlation id {} (waiting for {})",
                    received,
                    correlation_id
                );
                continue;
            }
            return Ok(response);
        }
    }
}
