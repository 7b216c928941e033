//! Transport Module
//!
//! Boundary between the codec layer and whatever carries bytes to the
//! cluster. Connection establishment, discovery, authentication and retries
//! live outside this crate; this module only moves complete messages over an
//! already-open byte stream.
//!
//! ## Responsibilities
//! - Stamp correlation ids on outgoing requests
//! - Split oversized requests into fragments
//! - Reassemble fragmented responses before handing them to a decoder
//! - Skip server events while waiting for a response

mod stream;

pub use stream::{read_all_messages, read_message, write_message, StreamTransport};

use crate::error::Result;
use crate::protocol::ClientMessage;

/// Sends a request and returns its complete response
pub trait Transport {
    fn invoke(&self, request: ClientMessage) -> Result<ClientMessage>;
}
