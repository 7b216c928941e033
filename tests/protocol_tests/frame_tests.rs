//! Frame Tests
//!
//! Tests for frame flags, roles and the frame wire format.

use std::io::Cursor;

use bytes::BytesMut;
use gridclc::protocol::{flags, Frame, FrameRole, FRAME_HEADER_SIZE};
use gridclc::ClcError;

// =============================================================================
// Flag and Role Tests
// =============================================================================

#[test]
fn test_flag_values() {
    assert_eq!(flags::BEGIN_FRAGMENT, 0x8000);
    assert_eq!(flags::END_FRAGMENT, 0x4000);
    assert_eq!(flags::UNFRAGMENTED, 0xC000);
    assert_eq!(flags::IS_FINAL, 0x2000);
    assert_eq!(flags::BEGIN_DATA_STRUCTURE, 0x1000);
    assert_eq!(flags::END_DATA_STRUCTURE, 0x0800);
    assert_eq!(flags::IS_NULL, 0x0400);
    assert_eq!(flags::IS_EVENT, 0x0200);
    assert_eq!(flags::BACKUP_AWARE, 0x0100);
    assert_eq!(flags::BACKUP_EVENT, 0x0080);
}

#[test]
fn test_has_flag_requires_all_bits() {
    assert!(flags::has_flag(flags::UNFRAGMENTED, flags::BEGIN_FRAGMENT));
    assert!(!flags::has_flag(flags::BEGIN_FRAGMENT, flags::UNFRAGMENTED));
}

#[test]
fn test_marker_frames() {
    assert_eq!(Frame::null().role(), FrameRole::Null);
    assert_eq!(Frame::begin().role(), FrameRole::BeginStructure);
    assert_eq!(Frame::end().role(), FrameRole::EndStructure);
    assert_eq!(Frame::new(b"x".to_vec(), flags::DEFAULT).role(), FrameRole::Data);

    assert!(Frame::null().content.is_empty());
    assert!(Frame::end().is_end_frame());
    assert!(!Frame::end().is_begin_frame());
}

#[test]
fn test_add_flags_and_patch() {
    let mut frame = Frame::new(vec![0u8; 4], flags::DEFAULT);
    frame.add_flags(flags::UNFRAGMENTED);
    assert!(frame.is_unfragmented());

    frame.patch_content(|buf| buf[2] = 7);
    assert_eq!(&frame.content[..], &[0, 0, 7, 0]);
}

// =============================================================================
// Wire Format Tests
// =============================================================================

#[test]
fn test_encode_into_layout() {
    let frame = Frame::new(b"abc".to_vec(), flags::IS_NULL);
    let mut buf = BytesMut::new();
    frame.encode_into(&mut buf, flags::IS_FINAL);

    assert_eq!(frame.frame_length(), FRAME_HEADER_SIZE + 3);
    assert_eq!(&buf[0..4], &9i32.to_le_bytes());
    assert_eq!(&buf[4..6], &(flags::IS_NULL | flags::IS_FINAL).to_le_bytes());
    assert_eq!(&buf[6..], b"abc");
}

#[test]
fn test_read_from_roundtrip() {
    let frame = Frame::new(b"payload".to_vec(), flags::BEGIN_DATA_STRUCTURE);
    let mut wire = Vec::new();
    frame.write_to(&mut wire, flags::DEFAULT).unwrap();

    let decoded = Frame::read_from(&mut Cursor::new(wire), 1024).unwrap();
    assert_eq!(decoded, frame);
}

#[test]
fn test_read_rejects_short_length() {
    let mut wire = Vec::new();
    wire.extend_from_slice(&5i32.to_le_bytes());
    wire.extend_from_slice(&0u16.to_le_bytes());

    let result = Frame::read_from(&mut Cursor::new(wire), 1024);
    assert!(matches!(result, Err(ClcError::Protocol(_))));
}

#[test]
fn test_read_rejects_oversized_frame() {
    let frame = Frame::new(vec![1u8; 100], flags::DEFAULT);
    let mut wire = Vec::new();
    frame.write_to(&mut wire, flags::DEFAULT).unwrap();

    let result = Frame::read_from(&mut Cursor::new(wire), 64);
    assert!(matches!(result, Err(ClcError::Protocol(_))));
}

#[test]
fn test_read_truncated_content() {
    let mut wire = Vec::new();
    wire.extend_from_slice(&20i32.to_le_bytes());
    wire.extend_from_slice(&0u16.to_le_bytes());
    wire.extend_from_slice(b"short");

    let result = Frame::read_from(&mut Cursor::new(wire), 1024);
    assert!(matches!(result, Err(ClcError::Io(_))));
}
