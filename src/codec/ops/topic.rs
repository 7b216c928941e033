//! Topic operations (service 0x04)

use uuid::Uuid;

use crate::codec::engine;
use crate::codec::layout::{fixed, var, FixedKind, MessageLayout, OperationDescriptor, Routing, VarKind};
use crate::codec::Value;
use crate::error::Result;
use crate::protocol::{ClientMessage, Data};

/// Publishes the message to all subscribers of this topic.
pub const PUBLISH: OperationDescriptor = OperationDescriptor {
    name: "Topic.publish",
    retryable: false,
    routing: Routing::Partition,
    request: MessageLayout::request(
        0x040100,
        &[],
        &[var("name", VarKind::String), var("message", VarKind::Data)],
    ),
    response: MessageLayout::response(0x040101, &[], &[]),
};

/// Subscribes to this topic.
pub const ADD_MESSAGE_LISTENER: OperationDescriptor = OperationDescriptor {
    name: "Topic.addMessageListener",
    retryable: false,
    routing: Routing::Any,
    request: MessageLayout::request(
        0x040200,
        &[fixed("localOnly", FixedKind::Bool)],
        &[var("name", VarKind::String)],
    ),
    response: MessageLayout::response(0x040201, &[fixed("response", FixedKind::Uuid)], &[]),
};

/// Stops receiving messages for the given message listener.
///
/// Removing a listener that is already gone does nothing.
pub const REMOVE_MESSAGE_LISTENER: OperationDescriptor = OperationDescriptor {
    name: "Topic.removeMessageListener",
    retryable: true,
    routing: Routing::Any,
    request: MessageLayout::request(
        0x040300,
        &[fixed("registrationId", FixedKind::Uuid)],
        &[var("name", VarKind::String)],
    ),
    response: MessageLayout::response(0x040301, &[fixed("response", FixedKind::Bool)], &[]),
};

/// Message pushed to a registered topic listener.
pub const MESSAGE_EVENT: MessageLayout = MessageLayout::event(
    0x040202,
    &[fixed("publishTime", FixedKind::Long), fixed("uuid", FixedKind::Uuid)],
    &[var("item", VarKind::Data)],
);

const _: () = assert!(REMOVE_MESSAGE_LISTENER.request.offset_of(0) == 16);
const _: () = assert!(REMOVE_MESSAGE_LISTENER.request.initial_frame_size() == 33);
const _: () = assert!(REMOVE_MESSAGE_LISTENER.response.offset_of(0) == 13);
const _: () = assert!(MESSAGE_EVENT.offset_of(1) == 24);

pub fn encode_publish_request(partition_id: i32, name: &str, message: &Data) -> Result<ClientMessage> {
    engine::encode_request(
        &PUBLISH,
        Some(partition_id),
        &[Value::String(name.to_string()), Value::Data(message.clone())],
    )
}

pub fn decode_publish_response(message: &ClientMessage) -> Result<()> {
    engine::decode_response(&PUBLISH, message)?;
    Ok(())
}

pub fn encode_add_message_listener_request(name: &str, local_only: bool) -> Result<ClientMessage> {
    engine::encode_request(
        &ADD_MESSAGE_LISTENER,
        None,
        &[Value::Bool(local_only), Value::String(name.to_string())],
    )
}

/// Returns the registration id of the new listener
pub fn decode_add_message_listener_response(message: &ClientMessage) -> Result<Option<Uuid>> {
    engine::decode_response(&ADD_MESSAGE_LISTENER, message)?.take_uuid("response")
}

pub fn encode_remove_message_listener_request(
    name: &str,
    registration_id: Option<Uuid>,
) -> Result<ClientMessage> {
    engine::encode_request(
        &REMOVE_MESSAGE_LISTENER,
        None,
        &[Value::Uuid(registration_id), Value::String(name.to_string())],
    )
}

/// Returns `true` if the listener was registered
pub fn decode_remove_message_listener_response(message: &ClientMessage) -> Result<bool> {
    engine::decode_response(&REMOVE_MESSAGE_LISTENER, message)?.take_bool("response")
}

/// A message delivered to a topic listener
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicMessage {
    pub item: Data,
    pub publish_time: i64,
    /// Member that published the message
    pub publisher: Option<Uuid>,
}

pub fn decode_message_event(message: &ClientMessage) -> Result<TopicMessage> {
    let mut fields = engine::decode_event(&MESSAGE_EVENT, message)?;
    Ok(TopicMessage {
        publish_time: fields.take_long("publishTime")?,
        publisher: fields.take_uuid("uuid")?,
        item: fields.take_data("item")?,
    })
}
