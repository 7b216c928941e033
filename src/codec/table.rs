//! Operation table
//!
//! The full set of supported operations, with lookup helpers and a self-check
//! the CLI runs once at startup.

use std::collections::HashSet;

use super::layout::{MessageLayout, OperationDescriptor};
use super::ops::{client, map, multimap, topic};
use crate::error::{ClcError, Result};
use crate::protocol::{EXCEPTION_MESSAGE_TYPE, REQUEST_HEADER_SIZE, RESPONSE_HEADER_SIZE};

/// Every supported operation
pub static OPERATIONS: &[OperationDescriptor] = &[
    client::PING,
    client::CREATE_PROXY,
    client::DESTROY_PROXY,
    client::GET_DISTRIBUTED_OBJECTS,
    map::PUT,
    map::GET,
    map::REMOVE,
    map::CONTAINS_KEY,
    map::SIZE,
    map::CLEAR,
    multimap::PUT,
    multimap::GET,
    multimap::SIZE,
    multimap::LOCK,
    multimap::UNLOCK,
    topic::PUBLISH,
    topic::ADD_MESSAGE_LISTENER,
    topic::REMOVE_MESSAGE_LISTENER,
];

/// Every supported server event
pub static EVENTS: &[MessageLayout] = &[topic::MESSAGE_EVENT];

/// Find an operation by its qualified name (case-insensitive)
pub fn find(name: &str) -> Option<&'static OperationDescriptor> {
    OPERATIONS.iter().find(|op| op.name.eq_ignore_ascii_case(name))
}

/// Find the operation a request or response message type belongs to
pub fn find_by_message_type(message_type: i32) -> Option<&'static OperationDescriptor> {
    OPERATIONS
        .iter()
        .find(|op| op.request.message_type == message_type || op.response.message_type == message_type)
}

/// Validate the whole table
///
/// Checks field names, header sizes, response types (request + 1) and that
/// names and message types are unique across operations and events.
pub fn self_check() -> Result<()> {
    let mut names = HashSet::new();
    let mut message_types = HashSet::new();
    message_types.insert(EXCEPTION_MESSAGE_TYPE);

    for op in OPERATIONS {
        if !names.insert(op.name.to_ascii_lowercase()) {
            return Err(table_error(op.name, "duplicate operation name"));
        }
        op.request.validate(op.name)?;
        op.response.validate(op.name)?;

        if op.request.header_size != REQUEST_HEADER_SIZE {
            return Err(table_error(op.name, "request header size"));
        }
        if op.response.header_size != RESPONSE_HEADER_SIZE {
            return Err(table_error(op.name, "response header size"));
        }
        if op.response.message_type != op.request.message_type + 1 {
            return Err(table_error(op.name, "response type must follow the request type"));
        }
        for message_type in [op.request.message_type, op.response.message_type] {
            if !message_types.insert(message_type) {
                return Err(table_error(op.name, &format!("message type 0x{:06x} reused", message_type)));
            }
        }
    }

    for event in EVENTS {
        event.validate("event")?;
        if !message_types.insert(event.message_type) {
            return Err(table_error(
                "event",
                &format!("message type 0x{:06x} reused", event.message_type),
            ));
        }
    }

    tracing::debug!(
        "Operation table verified: {} operations, {} events",
        OPERATIONS.len(),
        EVENTS.len()
    );
    Ok(())
}

fn table_error(name: &str, problem: &str) -> ClcError {
    ClcError::Protocol(format!("Operation table: {}: {}", name, problem))
}
