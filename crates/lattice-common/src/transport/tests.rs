//! Loopback tests for the TCP transport.
//!
//! Each test runs a minimal threaded server speaking the length-prefixed
//! wire format and drives a real `TcpTransport` against it.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

use serde_json::json;

use crate::protocol::{LatticeError, Request, Response};
use crate::transport::{JsonCodec, TcpTransport, Transport};

/// Accepts one connection, answers `count` requests by echoing the request
/// args back as the result, then drops the connection.
fn spawn_echo_server(count: usize) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        for _ in 0..count {
            let mut len_buf = [0u8; 4];
            if stream.read_exact(&mut len_buf).is_err() {
                return;
            }
            let len = u32::from_be_bytes(len_buf) as usize;
            let mut buf = vec![0u8; len];
            stream.read_exact(&mut buf).unwrap();

            let request = JsonCodec::decode_request(&buf).unwrap();
            let response = Response::success(request.id, request.args);
            let encoded = JsonCodec::encode_response(&response).unwrap();

            stream.write_all(&(encoded.len() as u32).to_be_bytes()).unwrap();
            stream.write_all(&encoded).unwrap();
            stream.flush().unwrap();
        }
    });

    addr
}

#[test]
fn test_open_send_receive() {
    let addr = spawn_echo_server(1);

    let mut transport = TcpTransport::new(&addr);
    transport.open().unwrap();
    assert!(transport.is_open());

    let request = Request::new("get", json!({"key": "row1"}));
    let response = transport.send_request(&request).unwrap();

    assert!(response.success);
    assert_eq!(response.id, request.id);
    assert_eq!(response.result, Some(json!({"key": "row1"})));
}

#[test]
fn test_multiple_requests_on_one_connection() {
    let addr = spawn_echo_server(3);

    let mut transport = TcpTransport::new(&addr);
    transport.open().unwrap();

    for i in 0..3 {
        let request = Request::new("get", json!({"n": i}));
        let response = transport.send_request(&request).unwrap();
        assert_eq!(response.result, Some(json!({"n": i})));
    }
}

#[test]
fn test_server_hangup_surfaces_transport_error() {
    // Server answers one request then hangs up; the second send fails.
    let addr = spawn_echo_server(1);

    let mut transport = TcpTransport::new(&addr);
    transport.open().unwrap();

    let first = Request::new("get", json!({}));
    transport.send_request(&first).unwrap();

    let second = Request::new("get", json!({}));
    match transport.send_request(&second) {
        Err(LatticeError::Transport(_)) | Err(LatticeError::Io(_)) => {}
        other => panic!("expected a connection failure, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_connect_refused() {
    // Bind then drop so the port is very likely unused.
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().to_string()
    };

    let mut transport = TcpTransport::new(&addr);
    let result = transport.open();
    assert!(matches!(result, Err(LatticeError::Transport(_))));
    assert!(!transport.is_open());
}

#[test]
fn test_reopen_after_close() {
    let addr = spawn_echo_server(1);

    let mut transport = TcpTransport::new(&addr);
    transport.open().unwrap();
    transport.close();
    assert!(!transport.is_open());

    let addr2 = spawn_echo_server(1);
    let mut transport2 = TcpTransport::new(&addr2);
    transport2.open().unwrap();
    let request = Request::new("get", json!({"fresh": true}));
    let response = transport2.send_request(&request).unwrap();
    assert_eq!(response.result, Some(json!({"fresh": true})));
}
