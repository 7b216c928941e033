//! Frame Iterator Tests
//!
//! Tests for the forward-only decode cursor.

use gridclc::protocol::{flags, Frame, FrameIterator, FrameRole};
use gridclc::ClcError;

fn data(bytes: &[u8]) -> Frame {
    Frame::new(bytes.to_vec(), flags::DEFAULT)
}

// =============================================================================
// Cursor Tests
// =============================================================================

#[test]
fn test_peek_does_not_consume() {
    let frames = vec![data(b"a"), data(b"b")];
    let mut iter = FrameIterator::new(&frames);

    assert_eq!(iter.peek_next().unwrap().content.as_ref(), b"a");
    assert_eq!(iter.position(), 0);
    iter.next_expecting(FrameRole::Data).unwrap();
    assert_eq!(iter.peek_next().unwrap().content.as_ref(), b"b");
}

#[test]
fn test_exhaustion_is_error() {
    let frames = vec![data(b"a")];
    let mut iter = FrameIterator::new(&frames);
    iter.next_initial().unwrap();

    match iter.next_expecting(FrameRole::Data) {
        Err(ClcError::FramesExhausted { index, expected }) => {
            assert_eq!(index, 1);
            assert_eq!(expected, FrameRole::Data);
        }
        other => panic!("Expected FramesExhausted, got {:?}", other),
    }
}

#[test]
fn test_role_mismatch_is_error() {
    let frames = vec![data(b"a"), Frame::begin()];
    let mut iter = FrameIterator::new(&frames);
    iter.next_initial().unwrap();

    match iter.next_expecting(FrameRole::Data) {
        Err(ClcError::UnexpectedFrame {
            index,
            expected,
            found,
        }) => {
            assert_eq!(index, 1);
            assert_eq!(expected, FrameRole::Data);
            assert_eq!(found, FrameRole::BeginStructure);
        }
        other => panic!("Expected UnexpectedFrame, got {:?}", other),
    }
}

#[test]
fn test_initial_only_at_start() {
    let frames = vec![data(b"a"), data(b"b")];
    let mut iter = FrameIterator::new(&frames);
    iter.next_initial().unwrap();
    assert!(matches!(iter.next_initial(), Err(ClcError::Protocol(_))));
}

#[test]
fn test_next_if_null() {
    let frames = vec![Frame::null(), data(b"x")];
    let mut iter = FrameIterator::new(&frames);

    assert!(iter.next_if_null());
    assert!(!iter.next_if_null());
    assert_eq!(iter.position(), 1);
}

#[test]
fn test_next_is_end() {
    let frames = vec![Frame::end()];
    let iter = FrameIterator::new(&frames);
    assert!(iter.next_is_end());
    assert!(!FrameIterator::new(&[]).next_is_end());
}

// =============================================================================
// Structure Skipping Tests
// =============================================================================

#[test]
fn test_skip_to_end_of_structure_nested() {
    // begin { a, begin { b }, c } tail
    let frames = vec![
        Frame::begin(),
        data(b"a"),
        Frame::begin(),
        data(b"b"),
        Frame::end(),
        data(b"c"),
        Frame::end(),
        data(b"tail"),
    ];
    let mut iter = FrameIterator::new(&frames);
    iter.next_expecting(FrameRole::BeginStructure).unwrap();
    iter.next_expecting(FrameRole::Data).unwrap();
    iter.skip_to_end_of_structure().unwrap();

    let tail = iter.next_expecting(FrameRole::Data).unwrap();
    assert_eq!(tail.content.as_ref(), b"tail");
    assert!(!iter.has_next());
}

#[test]
fn test_skip_without_end_is_error() {
    let frames = vec![Frame::begin(), data(b"a")];
    let mut iter = FrameIterator::new(&frames);
    iter.next_expecting(FrameRole::BeginStructure).unwrap();
    assert!(matches!(
        iter.skip_to_end_of_structure(),
        Err(ClcError::FramesExhausted { .. })
    ));
}

#[test]
fn test_iterator_trait() {
    let frames = vec![data(b"a"), Frame::null(), Frame::end()];
    let roles: Vec<FrameRole> = FrameIterator::new(&frames).map(Frame::role).collect();
    assert_eq!(roles, vec![FrameRole::Data, FrameRole::Null, FrameRole::EndStructure]);
}
