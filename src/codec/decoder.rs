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

//! Frame decoding.

use super::constants::*;
use super::error::CodecError;
use crate::message::{Message, MethodCall, MultiMap, Response};
use serde_json::Value;

/// Number of separator-delimited fields in a method call frame.
const METHOD_FIELDS: usize = 9;

/// Number of separator-delimited fields in a response frame.
const RESPONSE_FIELDS: usize = 10;

/// Decodes a frame into one or more messages.
///
/// A group frame yields its contained messages in order; a standalone
/// method call or response yields a single-element vector.
pub(super) fn decode(frame: &str) -> Result<Vec<Message>, CodecError> {
    if frame.is_empty() {
        return Err(CodecError::EmptyFrame);
    }
    let rest = frame
        .strip_prefix(PROTOCOL_MARKER)
        .ok_or(CodecError::MissingMarker)?;
    let type_byte = rest.chars().next().ok_or(CodecError::MissingField {
        field: "message type",
    })?;
    match type_byte {
        MESSAGE_TYPE_GROUP => decode_group(&rest[1..]),
        MESSAGE_TYPE_METHOD | MESSAGE_TYPE_RESPONSE => Ok(vec![decode_single(frame)?]),
        found => Err(CodecError::UnknownMessageType { found }),
    }
}

/// Decodes exactly one method call or response frame.
pub(super) fn decode_single(frame: &str) -> Result<Message, CodecError> {
    let rest = frame
        .strip_prefix(PROTOCOL_MARKER)
        .ok_or(CodecError::MissingMarker)?;
    let type_byte = rest.chars().next().ok_or(CodecError::MissingField {
        field: "message type",
    })?;
    let body = rest[1..]
        .strip_prefix(PROTOCOL_SEPARATOR)
        .ok_or(CodecError::MissingField { field: "id" })?;
    match type_byte {
        MESSAGE_TYPE_METHOD => decode_method_call(body).map(Message::MethodCall),
        MESSAGE_TYPE_RESPONSE => decode_response(body).map(Message::Response),
        found => Err(CodecError::UnknownMessageType { found }),
    }
}

fn decode_group(content: &str) -> Result<Vec<Message>, CodecError> {
    let mut messages = Vec::new();
    if content.is_empty() {
        return Ok(messages);
    }
    let body = content
        .strip_suffix(MESSAGE_SEPARATOR)
        .ok_or(CodecError::MalformedBlock { block: "group" })?;
    for part in body.split(MESSAGE_SEPARATOR) {
        messages.push(decode_single(part)?);
    }
    Ok(messages)
}

fn decode_method_call(fields: &str) -> Result<MethodCall, CodecError> {
    let parts: Vec<&str> = fields.splitn(METHOD_FIELDS, PROTOCOL_SEPARATOR).collect();
    const NAMES: [&str; METHOD_FIELDS] = [
        "id",
        "address",
        "return address",
        "headers",
        "params",
        "object name",
        "method name",
        "timestamp",
        "body",
    ];
    if parts.len() < METHOD_FIELDS {
        return Err(CodecError::MissingField {
            field: NAMES[parts.len()],
        });
    }

    Ok(MethodCall::from_parts(
        parse_u64(parts[0], "id")?,
        parts[1].to_string(),
        parts[2].to_string(),
        parse_u64(parts[7], "timestamp")?,
        parts[5].to_string(),
        parts[6].to_string(),
        decode_multimap(parts[3], "headers")?,
        decode_multimap(parts[4], "params")?,
        decode_body(parts[8])?,
    ))
}

fn decode_response(fields: &str) -> Result<Response, CodecError> {
    let parts: Vec<&str> = fields.splitn(RESPONSE_FIELDS, PROTOCOL_SEPARATOR).collect();
    const NAMES: [&str; RESPONSE_FIELDS] = [
        "id",
        "address",
        "return address",
        "reserved headers slot",
        "reserved params slot",
        "reserved object name slot",
        "reserved method name slot",
        "timestamp",
        "error flag",
        "body",
    ];
    if parts.len() < RESPONSE_FIELDS {
        return Err(CodecError::MissingField {
            field: NAMES[parts.len()],
        });
    }

    let was_errors = match parts[8] {
        "1" => true,
        "0" => false,
        other => {
            return Err(CodecError::InvalidErrorFlag {
                value: other.to_string(),
            })
        }
    };

    let body = match parts[9] {
        "" | "null" => None,
        literal => Some(parse_json(literal)?),
    };

    Ok(Response::from_parts(
        parse_u64(parts[0], "id")?,
        parts[1].to_string(),
        parts[2].to_string(),
        parse_u64(parts[7], "timestamp")?,
        was_errors,
        body,
    ))
}

/// Inverts the body encoding rule: empty means no arguments, a frame
/// containing the arg separator is a terminated list, anything else is a
/// single argument.
fn decode_body(content: &str) -> Result<Vec<Value>, CodecError> {
    if content.is_empty() {
        return Ok(Vec::new());
    }
    if content.contains(ARG_SEPARATOR) {
        let terminated = content
            .strip_suffix(ARG_SEPARATOR)
            .ok_or(CodecError::MalformedBlock { block: "body" })?;
        terminated.split(ARG_SEPARATOR).map(parse_json).collect()
    } else {
        Ok(vec![parse_json(content)?])
    }
}

fn decode_multimap(content: &str, block: &'static str) -> Result<MultiMap, CodecError> {
    let mut map = MultiMap::new();
    if content.is_empty() {
        return Ok(map);
    }
    let terminated = content
        .strip_suffix(ENTRY_DELIM)
        .ok_or(CodecError::MalformedBlock { block })?;
    for entry in terminated.split(ENTRY_DELIM) {
        let (key, values) = entry
            .split_once(KEY_DELIM)
            .ok_or(CodecError::MalformedBlock { block })?;
        let values = values
            .strip_suffix(VALUE_DELIM)
            .ok_or(CodecError::MalformedBlock { block })?;
        for value in values.split(VALUE_DELIM) {
            map.insert(key, value);
        }
    }
    Ok(map)
}

fn parse_u64(text: &str, field: &'static str) -> Result<u64, CodecError> {
    text.parse().map_err(|_| CodecError::InvalidNumber {
        field,
        value: text.to_string(),
    })
}

fn parse_json(literal: &str) -> Result<Value, CodecError> {
    serde_json::from_str(literal).map_err(|e| CodecError::InvalidBody {
        detail: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encode_call(call: &MethodCall) -> String {
        let mut out = String::new();
        super::super::encoder::encode_method_call(call, &mut out).unwrap();
        out
    }

    #[test]
    fn test_missing_marker() {
        assert_eq!(decode("not a frame"), Err(CodecError::MissingMarker));
    }

    #[test]
    fn test_empty_frame() {
        assert_eq!(decode(""), Err(CodecError::EmptyFrame));
    }

    #[test]
    fn test_unknown_type_byte() {
        let frame = format!("{}x", PROTOCOL_MARKER);
        assert_eq!(
            decode(&frame),
            Err(CodecError::UnknownMessageType { found: 'x' })
        );
    }

    #[test]
    fn test_truncated_call_frame() {
        let frame = format!(
            "{}{}{}42{}/addr",
            PROTOCOL_MARKER, MESSAGE_TYPE_METHOD, PROTOCOL_SEPARATOR, PROTOCOL_SEPARATOR
        );
        assert!(matches!(
            decode(&frame),
            Err(CodecError::MissingField { .. })
        ));
    }

    #[test]
    fn test_bad_id() {
        let call = MethodCall::new(1, "/a", "c", "a", "m");
        let frame = encode_call(&call).replace(
            &format!("{}1{}", PROTOCOL_SEPARATOR, PROTOCOL_SEPARATOR),
            &format!("{}abc{}", PROTOCOL_SEPARATOR, PROTOCOL_SEPARATOR),
        );
        assert!(matches!(
            decode(&frame),
            Err(CodecError::InvalidNumber { field: "id", .. })
        ));
    }

    #[test]
    fn test_single_body_arg_decodes_to_one_element_list() {
        let call =
            MethodCall::new(42, "/root/emp/add", "clientA", "emp", "add").with_body_arg(json!("Rick"));
        let decoded = decode(&encode_call(&call)).unwrap();
        let Message::MethodCall(decoded) = &decoded[0] else {
            panic!("expected a method call");
        };
        assert_eq!(decoded.body(), &[json!("Rick")]);
    }

    #[test]
    fn test_invalid_body_literal() {
        let call = MethodCall::new(1, "/a", "c", "a", "m");
        let mut frame = encode_call(&call);
        frame.push_str("{not json");
        assert!(matches!(
            decode(&frame),
            Err(CodecError::InvalidBody { .. })
        ));
    }

    #[test]
    fn test_bad_error_flag() {
        let call = MethodCall::new(1, "/a", "c", "a", "m");
        let response = Response::ok(&call, None);
        let mut frame = String::new();
        super::super::encoder::encode_response(&response, &mut frame).unwrap();
        let frame = frame.replace(
            &format!("{}0{}", PROTOCOL_SEPARATOR, PROTOCOL_SEPARATOR),
            &format!("{}2{}", PROTOCOL_SEPARATOR, PROTOCOL_SEPARATOR),
        );
        assert!(matches!(
            decode(&frame),
            Err(CodecError::InvalidErrorFlag { .. })
        ));
    }

    #[test]
    fn test_empty_group() {
        let frame = format!("{}{}", PROTOCOL_MARKER, MESSAGE_TYPE_GROUP);
        assert_eq!(decode(&frame).unwrap(), vec![]);
    }
}
