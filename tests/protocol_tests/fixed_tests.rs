//! Fixed Field Tests
//!
//! Tests for the primitive field codec.

use gridclc::protocol::fixed::{
    decode_bool, decode_i16, decode_i32, decode_i64, decode_u8, decode_uuid, encode_bool,
    encode_i16, encode_i32, encode_i64, encode_u8, encode_uuid, UUID_SIZE,
};
use uuid::Uuid;

// =============================================================================
// Scalar Tests
// =============================================================================

#[test]
fn test_bool_roundtrip() {
    let mut buf = [0u8; 2];
    encode_bool(&mut buf, 1, true);
    assert_eq!(buf, [0, 1]);
    assert!(decode_bool(&buf, 1));
    assert!(!decode_bool(&buf, 0));
}

#[test]
fn test_integers_are_little_endian() {
    let mut buf = [0u8; 14];
    encode_u8(&mut buf, 0, 0xAB);
    encode_i16(&mut buf, 1, 0x0102);
    encode_i32(&mut buf, 3, 0x01020304);
    encode_i64(&mut buf, 6, -2);

    assert_eq!(buf[0], 0xAB);
    assert_eq!(&buf[1..3], &[0x02, 0x01]);
    assert_eq!(&buf[3..7], &[0x04, 0x03, 0x02, 0x01]);
    assert_eq!(&buf[6..14], &[0xFE, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
}

#[test]
fn test_integer_decode_at_offset() {
    let mut buf = [0u8; 20];
    encode_i32(&mut buf, 0, i32::MIN);
    encode_i64(&mut buf, 4, i64::MAX);
    encode_i16(&mut buf, 12, -300);
    encode_u8(&mut buf, 14, 255);

    assert_eq!(decode_i32(&buf, 0), i32::MIN);
    assert_eq!(decode_i64(&buf, 4), i64::MAX);
    assert_eq!(decode_i16(&buf, 12), -300);
    assert_eq!(decode_u8(&buf, 14), 255);
}

#[test]
#[should_panic]
fn test_out_of_bounds_panics() {
    let mut buf = [0u8; 4];
    encode_i64(&mut buf, 0, 1);
}

// =============================================================================
// UUID Tests
// =============================================================================

#[test]
fn test_uuid_layout() {
    let uuid = Uuid::from_u128(0x0102030405060708_090A0B0C0D0E0F10);
    let mut buf = [0u8; UUID_SIZE];
    encode_uuid(&mut buf, 0, Some(uuid));

    assert_eq!(buf[0], 0, "null flag must be clear");
    assert_eq!(&buf[1..9], &0x0102030405060708i64.to_le_bytes());
    assert_eq!(&buf[9..17], &0x090A0B0C0D0E0F10i64.to_le_bytes());
    assert_eq!(decode_uuid(&buf, 0), Some(uuid));
}

#[test]
fn test_uuid_high_bit_survives() {
    let uuid = Uuid::from_u128(u128::MAX - 1);
    let mut buf = [0u8; UUID_SIZE + 3];
    encode_uuid(&mut buf, 3, Some(uuid));
    assert_eq!(decode_uuid(&buf, 3), Some(uuid));
}

#[test]
fn test_null_uuid_distinct_from_nil() {
    let mut absent = [0xFFu8; UUID_SIZE];
    let mut nil = [0xFFu8; UUID_SIZE];
    encode_uuid(&mut absent, 0, None);
    encode_uuid(&mut nil, 0, Some(Uuid::nil()));

    assert_eq!(absent[0], 1);
    assert!(absent[1..].iter().all(|b| *b == 0));
    assert_ne!(absent, nil);

    assert_eq!(decode_uuid(&absent, 0), None);
    assert_eq!(decode_uuid(&nil, 0), Some(Uuid::nil()));
}
