//! MultiMap operations (service 0x02)

use crate::codec::engine;
use crate::codec::layout::{fixed, var, FixedKind, MessageLayout, OperationDescriptor, Routing, VarKind};
use crate::codec::Value;
use crate::error::Result;
use crate::protocol::{ClientMessage, Data};

/// Stores a key-value pair in the multimap.
pub const PUT: OperationDescriptor = OperationDescriptor {
    name: "MultiMap.put",
    retryable: false,
    routing: Routing::Partition,
    request: MessageLayout::request(
        0x020100,
        &[fixed("threadId", FixedKind::Long)],
        &[
            var("name", VarKind::String),
            var("key", VarKind::Data),
            var("value", VarKind::Data),
        ],
    ),
    response: MessageLayout::response(0x020101, &[fixed("response", FixedKind::Bool)], &[]),
};

/// Returns the collection of values associated with the key.
pub const GET: OperationDescriptor = OperationDescriptor {
    name: "MultiMap.get",
    retryable: true,
    routing: Routing::Partition,
    request: MessageLayout::request(
        0x020200,
        &[fixed("threadId", FixedKind::Long)],
        &[var("name", VarKind::String), var("key", VarKind::Data)],
    ),
    response: MessageLayout::response(0x020201, &[], &[var("response", VarKind::DataList)]),
};

pub const SIZE: OperationDescriptor = OperationDescriptor {
    name: "MultiMap.size",
    retryable: true,
    routing: Routing::Any,
    request: MessageLayout::request(0x020A00, &[], &[var("name", VarKind::String)]),
    response: MessageLayout::response(0x020A01, &[fixed("response", FixedKind::Int)], &[]),
};

/// Acquires the lock for the specified key for the specified lease time.
///
/// The lock is released automatically once the lease time expires.
pub const LOCK: OperationDescriptor = OperationDescriptor {
    name: "MultiMap.lock",
    retryable: true,
    routing: Routing::Partition,
    request: MessageLayout::request(
        0x021000,
        &[
            fixed("threadId", FixedKind::Long),
            fixed("ttl", FixedKind::Long),
            fixed("referenceId", FixedKind::Long),
        ],
        &[var("name", VarKind::String), var("key", VarKind::Data)],
    ),
    response: MessageLayout::response(0x021001, &[], &[]),
};

/// Releases the lock for the specified key.
pub const UNLOCK: OperationDescriptor = OperationDescriptor {
    name: "MultiMap.unlock",
    retryable: true,
    routing: Routing::Partition,
    request: MessageLayout::request(
        0x021300,
        &[fixed("threadId", FixedKind::Long), fixed("referenceId", FixedKind::Long)],
        &[var("name", VarKind::String), var("key", VarKind::Data)],
    ),
    response: MessageLayout::response(0x021301, &[], &[]),
};

const _: () = assert!(LOCK.request.offset_of(2) == 32);
const _: () = assert!(LOCK.request.initial_frame_size() == 40);

pub fn encode_put_request(
    partition_id: i32,
    name: &str,
    key: &Data,
    value: &Data,
    thread_id: i64,
) -> Result<ClientMessage> {
    engine::encode_request(
        &PUT,
        Some(partition_id),
        &[
            Value::Long(thread_id),
            Value::String(name.to_string()),
            Value::Data(key.clone()),
            Value::Data(value.clone()),
        ],
    )
}

/// Returns `true` if the size of the multimap increased
pub fn decode_put_response(message: &ClientMessage) -> Result<bool> {
    engine::decode_response(&PUT, message)?.take_bool("response")
}

pub fn encode_get_request(partition_id: i32, name: &str, key: &Data, thread_id: i64) -> Result<ClientMessage> {
    engine::encode_request(
        &GET,
        Some(partition_id),
        &[
            Value::Long(thread_id),
            Value::String(name.to_string()),
            Value::Data(key.clone()),
        ],
    )
}

pub fn decode_get_response(message: &ClientMessage) -> Result<Vec<Data>> {
    engine::decode_response(&GET, message)?.take_data_list("response")
}

pub fn encode_size_request(name: &str) -> Result<ClientMessage> {
    engine::encode_request(&SIZE, None, &[Value::String(name.to_string())])
}

pub fn decode_size_response(message: &ClientMessage) -> Result<i32> {
    engine::decode_response(&SIZE, message)?.take_int("response")
}

pub fn encode_lock_request(
    partition_id: i32,
    name: &str,
    key: &Data,
    thread_id: i64,
    ttl: i64,
    reference_id: i64,
) -> Result<ClientMessage> {
    engine::encode_request(
        &LOCK,
        Some(partition_id),
        &[
            Value::Long(thread_id),
            Value::Long(ttl),
            Value::Long(reference_id),
            Value::String(name.to_string()),
            Value::Data(key.clone()),
        ],
    )
}

pub fn decode_lock_response(message: &ClientMessage) -> Result<()> {
    engine::decode_response(&LOCK, message)?;
    Ok(())
}

pub fn encode_unlock_request(
    partition_id: i32,
    name: &str,
    key: &Data,
    thread_id: i64,
    reference_id: i64,
) -> Result<ClientMessage> {
    engine::encode_request(
        &UNLOCK,
        Some(partition_id),
        &[
            Value::Long(thread_id),
            Value::Long(reference_id),
            Value::String(name.to_string()),
            Value::Data(key.clone()),
        ],
    )
}

pub fn decode_unlock_response(message: &ClientMessage) -> Result<()> {
    engine::decode_response(&UNLOCK, message)?;
    Ok(())
}
