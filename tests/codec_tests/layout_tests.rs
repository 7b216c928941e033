//! Layout Tests
//!
//! Tests for offset computation and the operation table.

use gridclc::codec::layout::{fixed, var};
use gridclc::codec::ops::{map, multimap, topic};
use gridclc::codec::{table, FixedKind, MessageLayout, Routing, VarKind};
use gridclc::protocol::{REQUEST_HEADER_SIZE, RESPONSE_HEADER_SIZE};

// =============================================================================
// Offset Tests
// =============================================================================

const MIXED: MessageLayout = MessageLayout::request(
    0x7F0100,
    &[
        fixed("a", FixedKind::Bool),
        fixed("b", FixedKind::Short),
        fixed("c", FixedKind::Int),
        fixed("d", FixedKind::Uuid),
        fixed("e", FixedKind::Long),
    ],
    &[],
);

const DUPLICATE_NAMES: MessageLayout = MessageLayout::request(
    0x7F0200,
    &[fixed("name", FixedKind::Int)],
    &[var("name", VarKind::String)],
);

#[test]
fn test_offsets_accumulate_kind_sizes() {
    let layout = MIXED;
    assert_eq!(layout.offset_of(0), 16);
    assert_eq!(layout.offset_of(1), 17);
    assert_eq!(layout.offset_of(2), 19);
    assert_eq!(layout.offset_of(3), 23);
    assert_eq!(layout.offset_of(4), 40);
    assert_eq!(layout.initial_frame_size(), 48);
}

#[test]
fn test_response_fields_start_after_backup_acks() {
    assert_eq!(topic::REMOVE_MESSAGE_LISTENER.response.offset_of(0), RESPONSE_HEADER_SIZE);
    assert_eq!(map::SIZE.response.initial_frame_size(), 17);
    assert_eq!(map::CLEAR.response.initial_frame_size(), RESPONSE_HEADER_SIZE);
}

#[test]
fn test_representative_request_offsets() {
    assert_eq!(topic::REMOVE_MESSAGE_LISTENER.request.offset_of(0), REQUEST_HEADER_SIZE);
    assert_eq!(topic::REMOVE_MESSAGE_LISTENER.request.initial_frame_size(), 33);
    assert_eq!(map::PUT.request.offset_of(1), 24);
    assert_eq!(multimap::LOCK.request.offset_of(2), 32);
    assert_eq!(topic::MESSAGE_EVENT.offset_of(1), 24);
}

#[test]
fn test_offsets_are_deterministic() {
    for op in table::OPERATIONS {
        let first: Vec<usize> = (0..=op.request.fixed.len()).map(|i| op.request.offset_of(i)).collect();
        let second: Vec<usize> = (0..=op.request.fixed.len()).map(|i| op.request.offset_of(i)).collect();
        assert_eq!(first, second, "{}", op.name);
        assert!(first.windows(2).all(|w| w[0] < w[1]), "{}", op.name);
    }
}

#[test]
fn test_field_names_order() {
    let names: Vec<&str> = map::PUT.request.field_names().collect();
    assert_eq!(names, vec!["threadId", "ttl", "name", "key", "value"]);
    assert_eq!(map::PUT.request.field_count(), 5);
}

#[test]
fn test_validate_rejects_duplicate_names() {
    assert!(DUPLICATE_NAMES.validate("test").is_err());
}

// =============================================================================
// Table Tests
// =============================================================================

#[test]
fn test_self_check_passes() {
    table::self_check().unwrap();
}

#[test]
fn test_table_has_every_operation() {
    assert_eq!(table::OPERATIONS.len(), 18);
    assert_eq!(table::EVENTS.len(), 1);
}

#[test]
fn test_find_by_name_and_type() {
    let op = table::find("topic.removemessagelistener").unwrap();
    assert_eq!(op.request.message_type, 0x040300);
    assert!(op.retryable);
    assert_eq!(op.routing, Routing::Any);

    assert_eq!(table::find_by_message_type(0x010101).unwrap().name, "Map.put");
    assert!(table::find("Map.compute").is_none());
    assert!(table::find_by_message_type(0).is_none());
}

#[test]
fn test_routing_and_retry_policy() {
    assert_eq!(map::PUT.routing, Routing::Partition);
    assert!(!map::PUT.retryable);
    assert_eq!(map::SIZE.routing, Routing::Any);
    assert!(multimap::LOCK.retryable);
    assert!(!topic::PUBLISH.retryable);
    assert_eq!(topic::PUBLISH.routing, Routing::Partition);
}
