//! Generic codec engine
//!
//! One encode and one decode routine for every operation, driven by its
//! [`MessageLayout`]. Encoding walks the layout writing fixed fields at their
//! offsets and appending one frame group per variable-length field; decoding
//! walks it in the same order through a [`FrameIterator`].
//!
//! Arguments are passed in layout order: fixed fields first, then variable
//! fields, each in declaration order.

use super::layout::{FixedKind, MessageLayout, OperationDescriptor, Routing, VarKind};
use super::value::{Fields, Value};
use crate::error::{ClcError, Result};
use crate::protocol::builtin;
use crate::protocol::fixed;
use crate::protocol::{
    flags, ClientMessage, Frame, FrameIterator, NO_PARTITION, PARTITION_ID_OFFSET, TYPE_OFFSET,
};

// =============================================================================
// Requests
// =============================================================================

/// Encode a request
///
/// `partition_id` is required for partition-routed operations and ignored for
/// the rest, which always carry `-1`.
pub fn encode_request(
    op: &OperationDescriptor,
    partition_id: Option<i32>,
    args: &[Value],
) -> Result<ClientMessage> {
    let partition_id = match op.routing {
        Routing::Any => NO_PARTITION,
        Routing::Partition => partition_id.ok_or_else(|| {
            ClcError::InvalidArgument(format!("{} requires a partition id", op.name))
        })?,
    };

    let mut message = encode_message(&op.request, args, flags::UNFRAGMENTED, |buf| {
        fixed::encode_i32(buf, PARTITION_ID_OFFSET, partition_id)
    })?;
    message.set_retryable(op.retryable);

    tracing::trace!(
        "Encoded {} request: partition={}, frames={}",
        op.name,
        partition_id,
        message.len()
    );
    Ok(message)
}

/// Decode a request (server side of the contract)
pub fn decode_request(op: &OperationDescriptor, message: &ClientMessage) -> Result<Fields> {
    expect_message_type(message, op.request.message_type)?;
    decode_message(&op.request, message)
}

// =============================================================================
// Responses
// =============================================================================

/// Encode a response with zero backup acknowledgements
pub fn encode_response(op: &OperationDescriptor, args: &[Value]) -> Result<ClientMessage> {
    encode_message(&op.response, args, flags::UNFRAGMENTED, |_| {})
}

/// Decode a response
///
/// A server error response is returned as [`ClcError::Remote`]; any other
/// message type than the operation's response type is a protocol violation.
pub fn decode_response(op: &OperationDescriptor, message: &ClientMessage) -> Result<Fields> {
    let message_type = message.message_type()?;
    if message_type == crate::protocol::EXCEPTION_MESSAGE_TYPE {
        let holders = builtin::decode_error_response(message)?;
        let first = holders.into_iter().next().ok_or_else(|| {
            ClcError::Protocol("Error response without error holders".to_string())
        })?;
        tracing::debug!("{} failed on the server: {}", op.name, first.class_name);
        return Err(first.into());
    }
    expect_message_type(message, op.response.message_type)?;

    let fields = decode_message(&op.response, message)?;
    tracing::trace!(
        "Decoded {} response: backup_acks={}, fields={}",
        op.name,
        message.backup_acks()?,
        fields.len()
    );
    Ok(fields)
}

// =============================================================================
// Events
// =============================================================================

/// Encode an event pushed by the server
pub fn encode_event(layout: &MessageLayout, partition_id: i32, args: &[Value]) -> Result<ClientMessage> {
    encode_message(layout, args, flags::UNFRAGMENTED | flags::IS_EVENT, |buf| {
        fixed::encode_i32(buf, PARTITION_ID_OFFSET, partition_id)
    })
}

/// Decode an event
pub fn decode_event(layout: &MessageLayout, message: &ClientMessage) -> Result<Fields> {
    if !message.is_event() {
        return Err(ClcError::Protocol(format!(
            "Message 0x{:06x} is not flagged as an event",
            message.message_type()?
        )));
    }
    expect_message_type(message, layout.message_type)?;
    decode_message(layout, message)
}

// =============================================================================
// Layout Walk
// =============================================================================

fn expect_message_type(message: &ClientMessage, expected: i32) -> Result<()> {
    let found = message.message_type()?;
    if found != expected {
        return Err(ClcError::MessageTypeMismatch { expected, found });
    }
    Ok(())
}

fn encode_message(
    layout: &MessageLayout,
    args: &[Value],
    initial_flags: u16,
    header: impl FnOnce(&mut [u8]),
) -> Result<ClientMessage> {
    if args.len() != layout.field_count() {
        return Err(ClcError::InvalidArgument(format!(
            "message 0x{:06x} takes {} arguments ({}), got {}",
            layout.message_type,
            layout.field_count(),
            layout.field_names().collect::<Vec<_>>().join(", "),
            args.len()
        )));
    }
    let (fixed_args, var_args) = args.split_at(layout.fixed.len());

    let mut initial = vec![0u8; layout.initial_frame_size()];
    fixed::encode_i32(&mut initial, TYPE_OFFSET, layout.message_type);
    header(&mut initial[..]);
    for (index, (field, value)) in layout.fixed.iter().zip(fixed_args).enumerate() {
        write_fixed(&mut initial, layout.offset_of(index), field.name, field.kind, value)?;
    }

    let mut message = ClientMessage::new();
    message.add_frame(Frame::new(initial, initial_flags));
    for (field, value) in layout.vars.iter().zip(var_args) {
        write_var(&mut message, field.name, field.kind, value)?;
    }
    Ok(message)
}

fn decode_message(layout: &MessageLayout, message: &ClientMessage) -> Result<Fields> {
    let required = layout.initial_frame_size();
    message.initial_frame(required)?;

    let mut iter = message.frame_iter();
    let initial = iter.next_initial()?;

    let mut fields = Fields::new();
    for (index, field) in layout.fixed.iter().enumerate() {
        let value = read_fixed(&initial.content, layout.offset_of(index), field.kind);
        fields.push(field.name, value);
    }
    for field in layout.vars {
        let value = read_var(&mut iter, field.kind)?;
        fields.push(field.name, value);
    }
    Ok(fields)
}

fn mismatch(name: &str, expected: &str, found: &Value) -> ClcError {
    ClcError::InvalidArgument(format!(
        "field '{}' expects {}, got {}",
        name,
        expected,
        found.kind_name()
    ))
}

fn write_fixed(buf: &mut [u8], offset: usize, name: &str, kind: FixedKind, value: &Value) -> Result<()> {
    match (kind, value) {
        (FixedKind::Bool, Value::Bool(v)) => fixed::encode_bool(buf, offset, *v),
        (FixedKind::Byte, Value::Byte(v)) => fixed::encode_u8(buf, offset, *v),
        (FixedKind::Short, Value::Short(v)) => fixed::encode_i16(buf, offset, *v),
        (FixedKind::Int, Value::Int(v)) => fixed::encode_i32(buf, offset, *v),
        (FixedKind::Long, Value::Long(v)) => fixed::encode_i64(buf, offset, *v),
        (FixedKind::Uuid, Value::Uuid(v)) => fixed::encode_uuid(buf, offset, *v),
        _ => return Err(mismatch(name, kind.name(), value)),
    }
    Ok(())
}

fn read_fixed(buf: &[u8], offset: usize, kind: FixedKind) -> Value {
    match kind {
        FixedKind::Bool => Value::Bool(fixed::decode_bool(buf, offset)),
        FixedKind::Byte => Value::Byte(fixed::decode_u8(buf, offset)),
        FixedKind::Short => Value::Short(fixed::decode_i16(buf, offset)),
        FixedKind::Int => Value::Int(fixed::decode_i32(buf, offset)),
        FixedKind::Long => Value::Long(fixed::decode_i64(buf, offset)),
        FixedKind::Uuid => Value::Uuid(fixed::decode_uuid(buf, offset)),
    }
}

fn write_var(message: &mut ClientMessage, name: &str, kind: VarKind, value: &Value) -> Result<()> {
    match (kind, value) {
        (VarKind::String, Value::String(v)) => builtin::encode_string(message, v),
        (VarKind::NullableString, Value::NullableString(v)) => {
            builtin::encode_nullable(message, v.as_deref(), builtin::encode_string)
        }
        (VarKind::Data, Value::Data(v)) => builtin::encode_data(message, v),
        (VarKind::NullableData, Value::NullableData(v)) => {
            builtin::encode_nullable(message, v.as_ref(), builtin::encode_data)
        }
        (VarKind::StringList, Value::StringList(v)) => {
            builtin::encode_list(message, v, |m, s| builtin::encode_string(m, s))
        }
        (VarKind::DataList, Value::DataList(v)) => builtin::encode_list(message, v, builtin::encode_data),
        (VarKind::LongList, Value::LongList(v)) => builtin::encode_long_list(message, v),
        (VarKind::DistributedObjectList, Value::DistributedObjects(v)) => {
            builtin::encode_list(message, v, builtin::encode_distributed_object_info)
        }
        _ => return Err(mismatch(name, kind.name(), value)),
    }
    Ok(())
}

fn read_var(iter: &mut FrameIterator<'_>, kind: VarKind) -> Result<Value> {
    let value = match kind {
        VarKind::String => Value::String(builtin::decode_string(iter)?),
        VarKind::NullableString => {
            Value::NullableString(builtin::decode_nullable(iter, builtin::decode_string)?)
        }
        VarKind::Data => Value::Data(builtin::decode_data(iter)?),
        VarKind::NullableData => Value::NullableData(builtin::decode_nullable(iter, builtin::decode_data)?),
        VarKind::StringList => Value::StringList(builtin::decode_list(iter, builtin::decode_string)?),
        VarKind::DataList => Value::DataList(builtin::decode_list(iter, builtin::decode_data)?),
        VarKind::LongList => Value::LongList(builtin::decode_long_list(iter)?),
        VarKind::DistributedObjectList => Value::DistributedObjects(builtin::decode_list(
            iter,
            builtin::decode_distributed_object_info,
        )?),
    };
    Ok(value)
}
