//! Stream Transport Tests
//!
//! Tests for the blocking transport over in-memory and file-backed streams.

use std::io::{Cursor, Seek, SeekFrom, Write};
use std::sync::Arc;

use gridclc::codec::ops::{map, multimap, topic};
use gridclc::codec::{engine, Value};
use gridclc::protocol::{split_message, ClientMessage, Data, CLIENT_PROTOCOL_HEADER};
use gridclc::transport::{read_all_messages, write_message, StreamTransport, Transport};
use gridclc::{ClcError, Config};
use parking_lot::Mutex;
use tempfile::tempfile;

/// Write half that keeps its bytes inspectable after the transport owns it
#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> Vec<u8> {
        self.0.lock().clone()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn size_response(correlation_id: i64, size: i32) -> ClientMessage {
    let mut response = engine::encode_response(&map::SIZE, &[Value::Int(size)]).unwrap();
    response.set_correlation_id(correlation_id).unwrap();
    response
}

fn wire(messages: &[ClientMessage]) -> Vec<u8> {
    let mut bytes = Vec::new();
    for message in messages {
        write_message(&mut bytes, message).unwrap();
    }
    bytes
}

// =============================================================================
// Helper Function Tests
// =============================================================================

#[test]
fn test_read_all_messages() {
    let bytes = wire(&[size_response(1, 10), size_response(2, 20)]);
    let messages = read_all_messages(&bytes, 1024, 4096).unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(map::decode_size_response(&messages[1]).unwrap(), 20);
}

#[test]
fn test_read_all_messages_truncated() {
    let mut bytes = wire(&[size_response(1, 10)]);
    bytes.truncate(bytes.len() - 3);
    assert!(matches!(read_all_messages(&bytes, 1024, 4096), Err(ClcError::Protocol(_))));
}

#[test]
fn test_read_all_messages_empty() {
    assert!(read_all_messages(&[], 1024, 4096).unwrap().is_empty());
}

// =============================================================================
// Transport Tests
// =============================================================================

#[test]
fn test_handshake_writes_preamble() {
    let out = SharedBuffer::default();
    let transport = StreamTransport::new(Cursor::new(Vec::new()), out.clone(), &Config::default());
    transport.handshake().unwrap();
    assert_eq!(out.contents(), CLIENT_PROTOCOL_HEADER.to_vec());
}

#[test]
fn test_send_assigns_increasing_correlation_ids() {
    let out = SharedBuffer::default();
    let transport = StreamTransport::new(Cursor::new(Vec::new()), out.clone(), &Config::default());

    let first = transport.send(map::encode_size_request("a").unwrap()).unwrap();
    let second = transport.send(map::encode_size_request("b").unwrap()).unwrap();
    assert_eq!(second, first + 1);

    let sent = read_all_messages(&out.contents(), 1024, 4096).unwrap();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].correlation_id().unwrap(), first);
    assert_eq!(sent[1].correlation_id().unwrap(), second);
}

#[test]
fn test_invoke_skips_events_and_stale_responses() {
    let event = engine::encode_event(
        &topic::MESSAGE_EVENT,
        0,
        &[
            Value::Long(1),
            Value::Uuid(None),
            Value::Data(Data::from_string("tick")),
        ],
    )
    .unwrap();
    let incoming = wire(&[event, size_response(99, 0), size_response(1, 7)]);

    let transport = StreamTransport::new(Cursor::new(incoming), SharedBuffer::default(), &Config::default());
    let response = transport.invoke(map::encode_size_request("m").unwrap()).unwrap();

    assert_eq!(response.correlation_id().unwrap(), 1);
    assert_eq!(map::decode_size_response(&response).unwrap(), 7);
}

#[test]
fn test_invoke_reassembles_fragmented_response() {
    let mut response = engine::encode_response(
        &map::GET,
        &[Value::NullableData(Some(Data::from_string(&"x".repeat(400))))],
    )
    .unwrap();
    response.set_correlation_id(1).unwrap();
    let fragments = split_message(response, 200, 44);
    assert!(fragments.len() > 1);

    let transport = StreamTransport::new(Cursor::new(wire(&fragments)), SharedBuffer::default(), &Config::default());
    let request = map::encode_get_request(0, "m", &Data::from_string("k"), 1).unwrap();
    let received = transport.invoke(request).unwrap();

    let value = map::decode_get_response(&received).unwrap().unwrap();
    assert_eq!(value.to_string_value().unwrap().len(), 400);
    assert_eq!(transport.pending_fragments(), 0);
}

#[test]
fn test_send_fragments_large_request() {
    let out = SharedBuffer::default();
    let config = Config::builder().fragment_size(128).build();
    let transport = StreamTransport::new(Cursor::new(Vec::new()), out.clone(), &config);

    let big = Data::from_string(&"v".repeat(300));
    let request = map::encode_put_request(1, "m", &Data::from_string("k"), &big, 1, 0).unwrap();
    transport.send(request).unwrap();

    let sent = read_all_messages(&out.contents(), 4096, 16 * 1024).unwrap();
    assert!(sent.len() > 1);
    let mut assembler = gridclc::protocol::FragmentAssembler::new(config.max_message_size);
    let mut complete = None;
    for fragment in sent {
        complete = assembler.accept(fragment).unwrap();
    }
    let mut fields = engine::decode_request(&map::PUT, &complete.unwrap()).unwrap();
    assert_eq!(fields.take_data("value").unwrap(), big);
}

#[test]
fn test_invoke_rejects_oversized_fragmented_response() {
    let items: Vec<Data> = (0..10).map(|i| Data::from_string(&format!("{:0>100}", i))).collect();
    let mut response = engine::encode_response(&multimap::GET, &[Value::DataList(items)]).unwrap();
    response.set_correlation_id(1).unwrap();
    let fragments = split_message(response, 200, 45);
    assert!(fragments.len() > 4);

    // every fragment fits on its own, the reassembled message does not
    let config = Config::builder().max_message_size(512).build();
    let transport = StreamTransport::new(Cursor::new(wire(&fragments)), SharedBuffer::default(), &config);
    let request = multimap::encode_get_request(0, "m", &Data::from_string("k"), 1).unwrap();
    let result = transport.invoke(request);

    assert!(matches!(result, Err(ClcError::Protocol(_))));
    assert_eq!(transport.pending_fragments(), 0);
}

#[test]
fn test_invoke_eof_is_io_error() {
    let transport = StreamTransport::new(Cursor::new(Vec::new()), SharedBuffer::default(), &Config::default());
    let result = transport.invoke(map::encode_size_request("m").unwrap());
    assert!(matches!(result, Err(ClcError::Io(_))));
}

#[test]
fn test_file_backed_stream() {
    let mut file = tempfile().unwrap();
    file.write_all(&wire(&[size_response(1, 3)])).unwrap();
    file.seek(SeekFrom::Start(0)).unwrap();

    let transport = StreamTransport::new(file, SharedBuffer::default(), &Config::default());
    let response = transport.invoke(map::encode_size_request("m").unwrap()).unwrap();
    assert_eq!(map::decode_size_response(&response).unwrap(), 3);
}
