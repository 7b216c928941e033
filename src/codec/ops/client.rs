//! Client service operations (service 0x00)

use crate::codec::engine;
use crate::codec::layout::{var, MessageLayout, OperationDescriptor, Routing, VarKind};
use crate::codec::Value;
use crate::error::Result;
use crate::protocol::{ClientMessage, DistributedObjectInfo};

/// Sent by the client to keep the connection alive.
pub const PING: OperationDescriptor = OperationDescriptor {
    name: "Client.ping",
    retryable: true,
    routing: Routing::Any,
    request: MessageLayout::request(0x000B00, &[], &[]),
    response: MessageLayout::response(0x000B01, &[], &[]),
};

/// Creates a distributed object on the cluster.
pub const CREATE_PROXY: OperationDescriptor = OperationDescriptor {
    name: "Client.createProxy",
    retryable: false,
    routing: Routing::Any,
    request: MessageLayout::request(
        0x000400,
        &[],
        &[var("name", VarKind::String), var("serviceName", VarKind::String)],
    ),
    response: MessageLayout::response(0x000401, &[], &[]),
};

/// Destroys a distributed object on the cluster.
pub const DESTROY_PROXY: OperationDescriptor = OperationDescriptor {
    name: "Client.destroyProxy",
    retryable: false,
    routing: Routing::Any,
    request: MessageLayout::request(
        0x000500,
        &[],
        &[var("name", VarKind::String), var("serviceName", VarKind::String)],
    ),
    response: MessageLayout::response(0x000501, &[], &[]),
};

/// Lists the distributed objects known to the cluster.
pub const GET_DISTRIBUTED_OBJECTS: OperationDescriptor = OperationDescriptor {
    name: "Client.getDistributedObjects",
    retryable: false,
    routing: Routing::Any,
    request: MessageLayout::request(0x000800, &[], &[]),
    response: MessageLayout::response(
        0x000801,
        &[],
        &[var("response", VarKind::DistributedObjectList)],
    ),
};

pub fn encode_ping_request() -> Result<ClientMessage> {
    engine::encode_request(&PING, None, &[])
}

pub fn decode_ping_response(message: &ClientMessage) -> Result<()> {
    engine::decode_response(&PING, message)?;
    Ok(())
}

pub fn encode_create_proxy_request(name: &str, service_name: &str) -> Result<ClientMessage> {
    engine::encode_request(
        &CREATE_PROXY,
        None,
        &[Value::String(name.to_string()), Value::String(service_name.to_string())],
    )
}

pub fn decode_create_proxy_response(message: &ClientMessage) -> Result<()> {
    engine::decode_response(&CREATE_PROXY, message)?;
    Ok(())
}

pub fn encode_destroy_proxy_request(name: &str, service_name: &str) -> Result<ClientMessage> {
    engine::encode_request(
        &DESTROY_PROXY,
        None,
        &[Value::String(name.to_string()), Value::String(service_name.to_string())],
    )
}

pub fn decode_destroy_proxy_response(message: &ClientMessage) -> Result<()> {
    engine::decode_response(&DESTROY_PROXY, message)?;
    Ok(())
}

pub fn encode_get_distributed_objects_request() -> Result<ClientMessage> {
    engine::encode_request(&GET_DISTRIBUTED_OBJECTS, None, &[])
}

pub fn decode_get_distributed_objects_response(message: &ClientMessage) -> Result<Vec<DistributedObjectInfo>> {
    engine::decode_response(&GET_DISTRIBUTED_OBJECTS, message)?.take_distributed_objects("response")
}
