//
// Copyright 2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Integration tests for the wire protocol.
//!
//! These tests verify that:
//! - Method calls and responses survive encode/decode with every field intact
//! - Group frames preserve message order and variant
//! - Multi-valued headers and params keep entry and value order
//! - Malformed frames are rejected, never defaulted

use microbus::codec::{CodecError, WireCodec, PROTOCOL_MARKER};
use microbus::message::{Message, MethodCall, Response};
use serde_json::json;

#[test]
fn test_method_call_round_trip_preserves_every_field() {
    let codec = WireCodec::new();
    let call = MethodCall::new(42, "/root/emp/add", "clientA", "emp", "add")
        .with_header("trace", "t-1")
        .with_header("trace", "t-2")
        .with_param("tenant", "blue")
        .with_body_arg(json!("Rick"));

    let frame = codec.encode_method_call(&call).unwrap();
    let decoded = codec.decode_single(&frame).unwrap();

    let Message::MethodCall(decoded) = decoded else {
        panic!("expected a method call");
    };
    assert_eq!(decoded.id(), 42);
    assert_eq!(decoded.address(), "/root/emp/add");
    assert_eq!(decoded.return_address(), "clientA");
    assert_eq!(decoded.object_name(), "emp");
    assert_eq!(decoded.method_name(), "add");
    assert_eq!(decoded.timestamp(), call.timestamp());
    assert_eq!(decoded.headers().get_all("trace"), Some(&["t-1".to_string(), "t-2".to_string()][..]));
    assert_eq!(decoded.params().get("tenant"), Some("blue"));
    assert_eq!(decoded.body(), &[json!("Rick")]);
}

#[test]
fn test_multi_argument_body_keeps_order() {
    let codec = WireCodec::new();
    let call = MethodCall::new(7, "/calc/add", "client", "calc", "add")
        .with_body(vec![json!(1), json!(2.5), json!({"nested": [3, 4]})]);

    let frame = codec.encode_method_call(&call).unwrap();
    let decoded = codec.decode_single(&frame).unwrap();

    let Message::MethodCall(decoded) = decoded else {
        panic!("expected a method call");
    };
    assert_eq!(
        decoded.body(),
        &[json!(1), json!(2.5), json!({"nested": [3, 4]})]
    );
}

#[test]
fn test_error_response_round_trip() {
    let codec = WireCodec::new();
    let call = MethodCall::new(9, "/emp/fire", "clientB", "emp", "fire");
    let response = Response::error(&call, "not allowed");

    let frame = codec.encode_response(&response).unwrap();
    let decoded = codec.decode_single(&frame).unwrap();

    let Message::Response(decoded) = decoded else {
        panic!("expected a response");
    };
    assert_eq!(decoded.id(), 9);
    assert_eq!(decoded.return_address(), "clientB");
    assert!(decoded.was_errors());
    assert_eq!(decoded.body(), Some(&json!("not allowed")));
}

#[test]
fn test_absent_response_body_round_trips_as_none() {
    let codec = WireCodec::new();
    let call = MethodCall::new(3, "/emp/ping", "client", "emp", "ping");
    let response = Response::ok(&call, None);

    let frame = codec.encode_response(&response).unwrap();
    let decoded = codec.decode_single(&frame).unwrap();

    let Message::Response(decoded) = decoded else {
        panic!("expected a response");
    };
    assert!(!decoded.was_errors());
    assert_eq!(decoded.body(), None);
}

#[test]
fn test_group_frame_preserves_order_and_variants() {
    let codec = WireCodec::new();
    let first = MethodCall::new(1, "/a/x", "client", "a", "x").with_body_arg(json!("one"));
    let second = MethodCall::new(2, "/a/y", "client", "a", "y");
    let reply = Response::ok(&second, Some(json!(2)));
    let messages = vec![
        Message::from(first),
        Message::from(second.clone()),
        Message::from(reply),
    ];

    let frame = codec.encode_group(&messages).unwrap();
    let decoded = codec.decode(&frame).unwrap();

    assert_eq!(decoded, messages);
    // Routing convention: the first message carries the group's return
    // address.
    assert_eq!(decoded[0].return_address(), "client");
}

#[test]
fn test_malformed_frames_are_rejected() {
    let codec = WireCodec::new();

    assert_eq!(codec.decode(""), Err(CodecError::EmptyFrame));
    assert_eq!(codec.decode("plain text"), Err(CodecError::MissingMarker));

    let unknown_type = format!("{}z", PROTOCOL_MARKER);
    assert_eq!(
        codec.decode(&unknown_type),
        Err(CodecError::UnknownMessageType { found: 'z' })
    );

    let truncated = format!("{}m", PROTOCOL_MARKER);
    assert!(matches!(
        codec.decode(&truncated),
        Err(CodecError::MissingField { .. })
    ));
}

#[test]
fn test_body_containing_protocol_bytes_round_trips() {
    let codec = WireCodec::new();
    let hostile = "\u{1c}\u{1d}\u{1e}\u{1f}\u{1a}\u{15}\u{19}".to_string();
    let call = MethodCall::new(5, "/echo", "client", "echo", "echo").with_body_arg(json!(hostile));

    let frame = codec.encode_method_call(&call).unwrap();
    let decoded = codec.decode_single(&frame).unwrap();

    let Message::MethodCall(decoded) = decoded else {
        panic!("expected a method call");
    };
    assert_eq!(decoded.body()[0], json!(hostile));
}
