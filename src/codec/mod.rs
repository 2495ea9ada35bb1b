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

//! Text wire codec for method calls and responses.
//!
//! Frames are flat strings: a start marker, a type byte, then fixed
//! fields delimited by ASCII control characters. Payload values are JSON
//! literals, which keeps them free of the structural bytes. A group frame
//! batches several messages into one unit so a flush can move a whole
//! outbox in a single send.
//!
//! ```
//! use microbus::codec::WireCodec;
//! use microbus::message::MethodCall;
//! use serde_json::json;
//!
//! let codec = WireCodec::new();
//! let call = MethodCall::new(42, "/root/emp/add", "clientA", "emp", "add")
//!     .with_body_arg(json!("Rick"));
//! let frame = codec.encode_method_call(&call).unwrap();
//! let decoded = codec.decode(&frame).unwrap();
//! assert_eq!(decoded.len(), 1);
//! assert_eq!(decoded[0].id(), 42);
//! ```

mod constants;
mod decoder;
mod encoder;
mod error;

pub use constants::{
    ARG_SEPARATOR, ENTRY_DELIM, KEY_DELIM, MESSAGE_SEPARATOR, MESSAGE_TYPE_GROUP,
    MESSAGE_TYPE_METHOD, MESSAGE_TYPE_RESPONSE, PROTOCOL_MARKER, PROTOCOL_SEPARATOR, VALUE_DELIM,
};
pub use error::CodecError;

use crate::message::{Message, MethodCall, Response};

/// Stateless encoder/decoder for the wire protocol.
///
/// The codec holds no buffers or configuration; it exists so the encode
/// and decode entry points share one type that callers can pass around.
#[derive(Debug, Clone, Copy, Default)]
pub struct WireCodec;

impl WireCodec {
    /// Creates a codec.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Encodes a single method call frame.
    pub fn encode_method_call(&self, call: &MethodCall) -> Result<String, CodecError> {
        let mut out = String::new();
        encoder::encode_method_call(call, &mut out)?;
        Ok(out)
    }

    /// Encodes a single response frame.
    pub fn encode_response(&self, response: &Response) -> Result<String, CodecError> {
        let mut out = String::new();
        encoder::encode_response(response, &mut out)?;
        Ok(out)
    }

    /// Encodes a message of either variant.
    pub fn encode_message(&self, message: &Message) -> Result<String, CodecError> {
        match message {
            Message::MethodCall(call) => self.encode_method_call(call),
            Message::Response(response) => self.encode_response(response),
        }
    }

    /// Encodes a batch of messages as one group frame.
    pub fn encode_group<'a, I>(&self, messages: I) -> Result<String, CodecError>
    where
        I: IntoIterator<Item = &'a Message>,
    {
        let mut out = String::new();
        encoder::encode_group(messages, &mut out)?;
        Ok(out)
    }

    /// Appends an encoded method call to a reusable buffer.
    pub fn encode_method_call_into(
        &self,
        call: &MethodCall,
        out: &mut String,
    ) -> Result<(), CodecError> {
        encoder::encode_method_call(call, out)
    }

    /// Appends an encoded response to a reusable buffer.
    pub fn encode_response_into(
        &self,
        response: &Response,
        out: &mut String,
    ) -> Result<(), CodecError> {
        encoder::encode_response(response, out)
    }

    /// Decodes a frame into the messages it carries.
    ///
    /// A method call or response frame yields one message; a group frame
    /// yields its members in encoded order.
    pub fn decode(&self, frame: &str) -> Result<Vec<Message>, CodecError> {
        decoder::decode(frame)
    }

    /// Decodes a frame known to hold exactly one message.
    pub fn decode_single(&self, frame: &str) -> Result<Message, CodecError> {
        decoder::decode_single(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MultiMap;
    use serde_json::json;

    #[test]
    fn test_method_call_round_trip() {
        let codec = WireCodec::new();
        let call = MethodCall::new(42, "/root/emp/add", "clientA", "emp", "add")
            .with_header("trace", "abc123")
            .with_param("tenant", "blue")
            .with_body_arg(json!("Rick"));

        let frame = codec.encode_method_call(&call).unwrap();
        let decoded = codec.decode_single(&frame).unwrap();

        assert_eq!(decoded, Message::MethodCall(call));
    }

    #[test]
    fn test_response_round_trip() {
        let codec = WireCodec::new();
        let call = MethodCall::new(7, "/root/emp/add", "clientA", "emp", "add");
        let response = Response::ok(&call, Some(json!({"added": true})));

        let frame = codec.encode_response(&response).unwrap();
        let decoded = codec.decode_single(&frame).unwrap();

        assert_eq!(decoded, Message::Response(response));
    }

    #[test]
    fn test_error_response_round_trip() {
        let codec = WireCodec::new();
        let call = MethodCall::new(7, "/root/emp/add", "clientA", "emp", "add");
        let response = Response::error(&call, "no such method");

        let frame = codec.encode_response(&response).unwrap();
        let decoded = codec.decode_single(&frame).unwrap();
        let Message::Response(decoded) = decoded else {
            panic!("expected a response");
        };
        assert!(decoded.was_errors());
        assert_eq!(decoded.body(), Some(&json!("no such method")));
    }

    #[test]
    fn test_group_round_trip_preserves_order() {
        let codec = WireCodec::new();
        let first = MethodCall::new(1, "/a/x", "client", "a", "x").with_body_arg(json!(1));
        let second = MethodCall::new(2, "/a/y", "client", "a", "y");
        let third = Response::ok(&second, None);
        let messages = vec![
            Message::from(first),
            Message::from(second.clone()),
            Message::from(third),
        ];

        let frame = codec.encode_group(&messages).unwrap();
        let decoded = codec.decode(&frame).unwrap();

        assert_eq!(decoded, messages);
    }

    #[test]
    fn test_empty_header_value_survives() {
        let codec = WireCodec::new();
        let call = MethodCall::new(1, "/a", "c", "a", "m").with_header("marker", "");

        let frame = codec.encode_method_call(&call).unwrap();
        let decoded = codec.decode_single(&frame).unwrap();
        let Message::MethodCall(decoded) = decoded else {
            panic!("expected a method call");
        };
        assert_eq!(decoded.headers().get("marker"), Some(""));
    }

    #[test]
    fn test_multi_valued_params_survive() {
        let codec = WireCodec::new();
        let call = MethodCall::new(1, "/a", "c", "a", "m")
            .with_param("tag", "x")
            .with_param("tag", "y");

        let frame = codec.encode_method_call(&call).unwrap();
        let decoded = codec.decode_single(&frame).unwrap();
        let Message::MethodCall(decoded) = decoded else {
            panic!("expected a method call");
        };
        let expected: MultiMap = [("tag", "x"), ("tag", "y")].into_iter().collect();
        assert_eq!(decoded.params(), &expected);
    }

    #[test]
    fn test_hostile_payload_round_trip() {
        let codec = WireCodec::new();
        let hostile = format!(
            "{}{}{}",
            PROTOCOL_MARKER, PROTOCOL_SEPARATOR, MESSAGE_SEPARATOR
        );
        let call = MethodCall::new(1, "/a", "c", "a", "m").with_body_arg(json!(hostile));

        let frame = codec.encode_method_call(&call).unwrap();
        let decoded = codec.decode_single(&frame).unwrap();
        let Message::MethodCall(decoded) = decoded else {
            panic!("expected a method call");
        };
        assert_eq!(decoded.body()[0], json!(hostile));
    }
}
