//! Map operations (service 0x01)

use crate::codec::engine;
use crate::codec::layout::{fixed, var, FixedKind, MessageLayout, OperationDescriptor, Routing, VarKind};
use crate::codec::Value;
use crate::error::Result;
use crate::protocol::{ClientMessage, Data};

/// Puts an entry into this map with a given ttl (time to live) value.
pub const PUT: OperationDescriptor = OperationDescriptor {
    name: "Map.put",
    retryable: false,
    routing: Routing::Partition,
    request: MessageLayout::request(
        0x010100,
        &[fixed("threadId", FixedKind::Long), fixed("ttl", FixedKind::Long)],
        &[
            var("name", VarKind::String),
            var("key", VarKind::Data),
            var("value", VarKind::Data),
        ],
    ),
    response: MessageLayout::response(0x010101, &[], &[var("response", VarKind::NullableData)]),
};

/// Returns the value for the specified key, or null if this map does not
/// contain this key.
pub const GET: OperationDescriptor = OperationDescriptor {
    name: "Map.get",
    retryable: true,
    routing: Routing::Partition,
    request: MessageLayout::request(
        0x010200,
        &[fixed("threadId", FixedKind::Long)],
        &[var("name", VarKind::String), var("key", VarKind::Data)],
    ),
    response: MessageLayout::response(0x010201, &[], &[var("response", VarKind::NullableData)]),
};

/// Removes the mapping for a key from this map if it is present.
pub const REMOVE: OperationDescriptor = OperationDescriptor {
    name: "Map.remove",
    retryable: false,
    routing: Routing::Partition,
    request: MessageLayout::request(
        0x010300,
        &[fixed("threadId", FixedKind::Long)],
        &[var("name", VarKind::String), var("key", VarKind::Data)],
    ),
    response: MessageLayout::response(0x010301, &[], &[var("response", VarKind::NullableData)]),
};

pub const CONTAINS_KEY: OperationDescriptor = OperationDescriptor {
    name: "Map.containsKey",
    retryable: true,
    routing: Routing::Partition,
    request: MessageLayout::request(
        0x010600,
        &[fixed("threadId", FixedKind::Long)],
        &[var("name", VarKind::String), var("key", VarKind::Data)],
    ),
    response: MessageLayout::response(0x010601, &[fixed("response", FixedKind::Bool)], &[]),
};

pub const SIZE: OperationDescriptor = OperationDescriptor {
    name: "Map.size",
    retryable: true,
    routing: Routing::Any,
    request: MessageLayout::request(0x012A00, &[], &[var("name", VarKind::String)]),
    response: MessageLayout::response(0x012A01, &[fixed("response", FixedKind::Int)], &[]),
};

/// Clears the map and invokes the clear listeners on all members.
pub const CLEAR: OperationDescriptor = OperationDescriptor {
    name: "Map.clear",
    retryable: false,
    routing: Routing::Any,
    request: MessageLayout::request(0x012D00, &[], &[var("name", VarKind::String)]),
    response: MessageLayout::response(0x012D01, &[], &[]),
};

const _: () = assert!(PUT.request.offset_of(1) == 24);
const _: () = assert!(PUT.request.initial_frame_size() == 32);
const _: () = assert!(SIZE.response.initial_frame_size() == 17);

pub fn encode_put_request(
    partition_id: i32,
    name: &str,
    key: &Data,
    value: &Data,
    thread_id: i64,
    ttl: i64,
) -> Result<ClientMessage> {
    engine::encode_request(
        &PUT,
        Some(partition_id),
        &[
            Value::Long(thread_id),
            Value::Long(ttl),
            Value::String(name.to_string()),
            Value::Data(key.clone()),
            Value::Data(value.clone()),
        ],
    )
}

/// Returns the previous value, if any
pub fn decode_put_response(message: &ClientMessage) -> Result<Option<Data>> {
    engine::decode_response(&PUT, message)?.take_nullable_data("response")
}

pub fn encode_get_request(partition_id: i32, name: &str, key: &Data, thread_id: i64) -> Result<ClientMessage> {
    engine::encode_request(&GET, Some(partition_id), &key_arguments(name, key, thread_id))
}

pub fn decode_get_response(message: &ClientMessage) -> Result<Option<Data>> {
    engine::decode_response(&GET, message)?.take_nullable_data("response")
}

pub fn encode_remove_request(partition_id: i32, name: &str, key: &Data, thread_id: i64) -> Result<ClientMessage> {
    engine::encode_request(&REMOVE, Some(partition_id), &key_arguments(name, key, thread_id))
}

/// Returns the removed value, if any
pub fn decode_remove_response(message: &ClientMessage) -> Result<Option<Data>> {
    engine::decode_response(&REMOVE, message)?.take_nullable_data("response")
}

pub fn encode_contains_key_request(
    partition_id: i32,
    name: &str,
    key: &Data,
    thread_id: i64,
) -> Result<ClientMessage> {
    engine::encode_request(&CONTAINS_KEY, Some(partition_id), &key_arguments(name, key, thread_id))
}

pub fn decode_contains_key_response(message: &ClientMessage) -> Result<bool> {
    engine::decode_response(&CONTAINS_KEY, message)?.take_bool("response")
}

pub fn encode_size_request(name: &str) -> Result<ClientMessage> {
    engine::encode_request(&SIZE, None, &[Value::String(name.to_string())])
}

pub fn decode_size_response(message: &ClientMessage) -> Result<i32> {
    engine::decode_response(&SIZE, message)?.take_int("response")
}

pub fn encode_clear_request(name: &str) -> Result<ClientMessage> {
    engine::encode_request(&CLEAR, None, &[Value::String(name.to_string())])
}

pub fn decode_clear_response(message: &ClientMessage) -> Result<()> {
    engine::decode_response(&CLEAR, message)?;
    Ok(())
}

fn key_arguments(name: &str, key: &Data, thread_id: i64) -> [Value; 3] {
    [
        Value::Long(thread_id),
        Value::String(name.to_string()),
        Value::Data(key.clone()),
    ]
}
