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

//! Error types for the wire codec.

use std::fmt;

/// A structural violation found while decoding a frame.
///
/// Decoding never defaults a malformed frame into an empty message; every
/// missing separator, unknown type byte, or unparsable field surfaces here
/// so the caller can reject the frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The frame was empty.
    EmptyFrame,

    /// The frame did not begin with the protocol marker.
    MissingMarker,

    /// The message-type byte was not one of method-call, response, group.
    UnknownMessageType {
        /// The byte that was found in the type position.
        found: char,
    },

    /// A required field separator was absent or out of order.
    MissingField {
        /// Name of the first field that could not be located.
        field: &'static str,
    },

    /// A numeric field did not parse.
    InvalidNumber {
        /// Name of the field.
        field: &'static str,
        /// The raw text that failed to parse.
        value: String,
    },

    /// The response error flag was neither `1` nor `0`.
    InvalidErrorFlag {
        /// The raw text that was found.
        value: String,
    },

    /// A headers, params, or body block violated its delimiter structure.
    MalformedBlock {
        /// Which block was malformed.
        block: &'static str,
    },

    /// A body argument was not a valid JSON literal.
    InvalidBody {
        /// Parser detail.
        detail: String,
    },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFrame => write!(f, "empty frame"),
            Self::MissingMarker => write!(f, "frame does not start with the protocol marker"),
            Self::UnknownMessageType { found } => {
                write!(f, "unknown message type byte {:?}", found)
            }
            Self::MissingField { field } => {
                write!(f, "malformed frame: missing field '{}'", field)
            }
            Self::InvalidNumber { field, value } => {
                write!(f, "field '{}' is not a valid number: {:?}", field, value)
            }
            Self::InvalidErrorFlag { value } => {
                write!(f, "error flag must be '1' or '0', got {:?}", value)
            }
            Self::MalformedBlock { block } => {
                write!(f, "malformed {} block", block)
            }
            Self::InvalidBody { detail } => {
                write!(f, "body is not a valid JSON literal: {}", detail)
            }
        }
    }
}

impl std::error::Error for CodecError {}
