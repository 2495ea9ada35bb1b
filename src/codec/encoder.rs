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

//! Frame encoding.
//!
//! Encoders append to a caller-owned scratch buffer rather than allocating
//! per call; a worker reuses one `String` across its whole batch.

use super::constants::*;
use super::error::CodecError;
use crate::message::{Message, MethodCall, MultiMap, Response};
use serde_json::Value;

/// Encodes a method call frame.
///
/// Layout: marker, type byte, then separator-delimited `id`, `address`,
/// `return_address`, headers block, params block, `object_name`,
/// `method_name`, `timestamp`, body.
pub(super) fn encode_method_call(call: &MethodCall, out: &mut String) -> Result<(), CodecError> {
    out.push(PROTOCOL_MARKER);
    out.push(MESSAGE_TYPE_METHOD);
    out.push(PROTOCOL_SEPARATOR);
    out.push_str(&call.id().to_string());
    out.push(PROTOCOL_SEPARATOR);
    out.push_str(call.address());
    out.push(PROTOCOL_SEPARATOR);
    out.push_str(call.return_address());
    out.push(PROTOCOL_SEPARATOR);
    encode_multimap(call.headers(), out);
    out.push(PROTOCOL_SEPARATOR);
    encode_multimap(call.params(), out);
    out.push(PROTOCOL_SEPARATOR);
    out.push_str(call.object_name());
    out.push(PROTOCOL_SEPARATOR);
    out.push_str(call.method_name());
    out.push(PROTOCOL_SEPARATOR);
    out.push_str(&call.timestamp().to_string());
    out.push(PROTOCOL_SEPARATOR);
    encode_body(call.body(), out)?;
    Ok(())
}

/// Encodes a response frame.
///
/// Four empty reserved slots follow the return address (headers, params,
/// object name, method name — kept for field symmetry with call frames),
/// then timestamp, the `1`/`0` error flag, and the body (`null` when
/// absent).
pub(super) fn encode_response(response: &Response, out: &mut String) -> Result<(), CodecError> {
    out.push(PROTOCOL_MARKER);
    out.push(MESSAGE_TYPE_RESPONSE);
    out.push(PROTOCOL_SEPARATOR);
    out.push_str(&response.id().to_string());
    out.push(PROTOCOL_SEPARATOR);
    out.push_str(response.address());
    out.push(PROTOCOL_SEPARATOR);
    out.push_str(response.return_address());
    out.push(PROTOCOL_SEPARATOR);
    out.push(PROTOCOL_SEPARATOR); // reserved for headers
    out.push(PROTOCOL_SEPARATOR); // reserved for params
    out.push(PROTOCOL_SEPARATOR); // reserved for object name
    out.push(PROTOCOL_SEPARATOR); // reserved for method name
    out.push_str(&response.timestamp().to_string());
    out.push(PROTOCOL_SEPARATOR);
    out.push(if response.was_errors() { '1' } else { '0' });
    out.push(PROTOCOL_SEPARATOR);
    match response.body() {
        Some(value) => out.push_str(&to_json(value)?),
        None => out.push_str("null"),
    }
    Ok(())
}

/// Encodes a group frame: marker, group type byte, then each message
/// encoded per its own rule and terminated by the message separator.
///
/// By convention only the first message's return address is definitive for
/// routing the whole group; the encoder does not treat later messages
/// differently.
pub(super) fn encode_group<'a, I>(messages: I, out: &mut String) -> Result<(), CodecError>
where
    I: IntoIterator<Item = &'a Message>,
{
    out.push(PROTOCOL_MARKER);
    out.push(MESSAGE_TYPE_GROUP);
    for message in messages {
        match message {
            Message::MethodCall(call) => encode_method_call(call, out)?,
            Message::Response(response) => encode_response(response, out)?,
        }
        out.push(MESSAGE_SEPARATOR);
    }
    Ok(())
}

/// Body encoding: more than one argument serializes each JSON literal
/// followed by the arg separator; exactly one serializes the literal
/// alone; zero arguments emit nothing.
fn encode_body(body: &[Value], out: &mut String) -> Result<(), CodecError> {
    match body {
        [] => Ok(()),
        [single] => {
            out.push_str(&to_json(single)?);
            Ok(())
        }
        many => {
            for arg in many {
                out.push_str(&to_json(arg)?);
                out.push(ARG_SEPARATOR);
            }
            Ok(())
        }
    }
}

/// Headers/params block: per entry, key, key delimiter, each value
/// terminated by the value delimiter, then the entry delimiter. Keys with
/// zero values never occur in a [`MultiMap`], so every stored entry is
/// emitted.
fn encode_multimap(map: &MultiMap, out: &mut String) {
    for (key, values) in map.iter() {
        out.push_str(key);
        out.push(KEY_DELIM);
        for value in values {
            out.push_str(value);
            out.push(VALUE_DELIM);
        }
        out.push(ENTRY_DELIM);
    }
}

fn to_json(value: &Value) -> Result<String, CodecError> {
    serde_json::to_string(value).map_err(|e| CodecError::InvalidBody {
        detail: e.to_string(),
    })
}
