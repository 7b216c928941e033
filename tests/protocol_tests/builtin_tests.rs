//! Builtin Codec Tests
//!
//! Tests for strings, data blobs, nullable values, lists and nested
//! structures.

use gridclc::protocol::builtin::{
    decode_data, decode_distributed_object_info, decode_error_response, decode_list,
    decode_long_list, decode_nullable, decode_string, encode_data, encode_distributed_object_info,
    encode_error_response, encode_list, encode_long_list, encode_nullable, encode_string,
};
use gridclc::protocol::{
    flags, ClientMessage, Data, DistributedObjectInfo, ErrorHolder, Frame, FrameRole,
    EXCEPTION_MESSAGE_TYPE, STRING_TYPE_ID,
};
use gridclc::ClcError;

fn message_with_initial() -> ClientMessage {
    let mut message = ClientMessage::new();
    message.add_frame(Frame::new(vec![0u8; 16], flags::UNFRAGMENTED));
    message
}

// =============================================================================
// String and Data Tests
// =============================================================================

#[test]
fn test_string_is_one_data_frame() {
    let mut message = message_with_initial();
    encode_string(&mut message, "topic1");
    assert_eq!(message.len(), 2);
    assert_eq!(message.frames()[1].content.as_ref(), b"topic1");

    let mut iter = message.frame_iter();
    iter.next_initial().unwrap();
    assert_eq!(decode_string(&mut iter).unwrap(), "topic1");
}

#[test]
fn test_invalid_utf8_is_error() {
    let mut message = message_with_initial();
    message.add_frame(Frame::new(vec![0xFF, 0xFE], flags::DEFAULT));

    let mut iter = message.frame_iter();
    iter.next_initial().unwrap();
    assert!(matches!(decode_string(&mut iter), Err(ClcError::InvalidUtf8(_))));
}

#[test]
fn test_data_from_string() {
    let data = Data::from_string("hi");
    assert_eq!(data.type_id(), Some(STRING_TYPE_ID));
    assert_eq!(data.to_string_value().as_deref(), Some("hi"));
    assert_eq!(data.len(), 8 + 4 + 2);
    assert_eq!(data.to_string(), "hi");

    let raw = Data::new(vec![1u8, 2, 3]);
    assert_eq!(raw.type_id(), None);
    assert_eq!(raw.to_string(), "010203");
}

#[test]
fn test_data_roundtrip() {
    let mut message = message_with_initial();
    encode_data(&mut message, &Data::from_string("key"));

    let mut iter = message.frame_iter();
    iter.next_initial().unwrap();
    assert_eq!(decode_data(&mut iter).unwrap(), Data::from_string("key"));
}

// =============================================================================
// Nullable Tests
// =============================================================================

#[test]
fn test_nullable_absent_and_present() {
    let mut message = message_with_initial();
    encode_nullable(&mut message, None::<&str>, encode_string);
    encode_nullable(&mut message, Some("x"), encode_string);

    assert!(message.frames()[1].is_null_frame());

    let mut iter = message.frame_iter();
    iter.next_initial().unwrap();
    assert_eq!(decode_nullable(&mut iter, decode_string).unwrap(), None);
    assert_eq!(decode_nullable(&mut iter, decode_string).unwrap(), Some("x".to_string()));
}

// =============================================================================
// List Tests
// =============================================================================

#[test]
fn test_list_frames() {
    let items = vec!["a".to_string(), "b".to_string()];
    let mut message = message_with_initial();
    encode_list(&mut message, &items, |m, s| encode_string(m, s));

    let roles: Vec<FrameRole> = message.frames()[1..].iter().map(Frame::role).collect();
    assert_eq!(
        roles,
        vec![
            FrameRole::BeginStructure,
            FrameRole::Data,
            FrameRole::Data,
            FrameRole::EndStructure
        ]
    );

    let mut iter = message.frame_iter();
    iter.next_initial().unwrap();
    assert_eq!(decode_list(&mut iter, decode_string).unwrap(), items);
    assert!(!iter.has_next());
}

#[test]
fn test_empty_list() {
    let mut message = message_with_initial();
    encode_list::<Data>(&mut message, &[], encode_data);

    let mut iter = message.frame_iter();
    iter.next_initial().unwrap();
    assert!(decode_list(&mut iter, decode_data).unwrap().is_empty());
}

#[test]
fn test_long_list_packed() {
    let mut message = message_with_initial();
    encode_long_list(&mut message, &[1, -1, i64::MAX]);
    assert_eq!(message.frames()[1].content.len(), 24);

    let mut iter = message.frame_iter();
    iter.next_initial().unwrap();
    assert_eq!(decode_long_list(&mut iter).unwrap(), vec![1, -1, i64::MAX]);
}

#[test]
fn test_long_list_bad_length() {
    let mut message = message_with_initial();
    message.add_frame(Frame::new(vec![0u8; 7], flags::DEFAULT));

    let mut iter = message.frame_iter();
    iter.next_initial().unwrap();
    assert!(matches!(decode_long_list(&mut iter), Err(ClcError::Protocol(_))));
}

// =============================================================================
// Structure Tests
// =============================================================================

#[test]
fn test_distributed_object_info_roundtrip() {
    let info = DistributedObjectInfo {
        service_name: "hz:impl:mapService".to_string(),
        name: "orders".to_string(),
    };
    let mut message = message_with_initial();
    encode_distributed_object_info(&mut message, &info);

    let mut iter = message.frame_iter();
    iter.next_initial().unwrap();
    assert_eq!(decode_distributed_object_info(&mut iter).unwrap(), info);
}

#[test]
fn test_structure_with_extra_fields_is_skipped() {
    // A newer server appends a field the client does not know about.
    let mut message = message_with_initial();
    message.add_frame(Frame::begin());
    encode_string(&mut message, "svc");
    encode_string(&mut message, "obj");
    encode_string(&mut message, "extra");
    message.add_frame(Frame::end());
    encode_string(&mut message, "after");

    let mut iter = message.frame_iter();
    iter.next_initial().unwrap();
    let info = decode_distributed_object_info(&mut iter).unwrap();
    assert_eq!(info.name, "obj");
    assert_eq!(decode_string(&mut iter).unwrap(), "after");
}

// =============================================================================
// Error Response Tests
// =============================================================================

#[test]
fn test_error_response_roundtrip() {
    let holders = vec![
        ErrorHolder {
            error_code: 17,
            class_name: "java.lang.IllegalStateException".to_string(),
            message: Some("boom".to_string()),
        },
        ErrorHolder {
            error_code: 1,
            class_name: "Cause".to_string(),
            message: None,
        },
    ];
    let message = encode_error_response(&holders);
    assert_eq!(message.message_type().unwrap(), EXCEPTION_MESSAGE_TYPE);
    assert_eq!(decode_error_response(&message).unwrap(), holders);
}

#[test]
fn test_error_holder_into_remote() {
    let error: ClcError = ErrorHolder {
        error_code: 3,
        class_name: "X".to_string(),
        message: None,
    }
    .into();
    match error {
        ClcError::Remote {
            error_code,
            class_name,
            message,
        } => {
            assert_eq!(error_code, 3);
            assert_eq!(class_name, "X");
            assert_eq!(message, None);
        }
        other => panic!("Expected Remote, got {:?}", other),
    }
}
