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

//! Reserved control points of the wire protocol.
//!
//! Every structural byte is an ASCII control character. JSON escapes all
//! control characters inside string literals (`\u001c` and friends), so a
//! body payload can never collide with frame structure no matter what the
//! caller serializes. These values are stable for the lifetime of a
//! deployment; changing any of them is a wire-protocol break.

/// Start-of-message sentinel.
pub const PROTOCOL_MARKER: char = '\u{1c}';

/// Message-type byte for a method call frame.
pub const MESSAGE_TYPE_METHOD: char = 'm';

/// Message-type byte for a response frame.
pub const MESSAGE_TYPE_RESPONSE: char = 'r';

/// Message-type byte for a group (batch) frame.
pub const MESSAGE_TYPE_GROUP: char = 'g';

/// Delimits the fixed fields of a single message.
pub const PROTOCOL_SEPARATOR: char = '\u{1d}';

/// Terminates each message inside a group frame.
pub const MESSAGE_SEPARATOR: char = '\u{1e}';

/// Terminates each body argument when a call carries more than one.
pub const ARG_SEPARATOR: char = '\u{1f}';

/// Separates a header/param key from its value list.
pub const KEY_DELIM: char = '\u{1a}';

/// Terminates each value in a multi-valued header/param entry.
pub const VALUE_DELIM: char = '\u{15}';

/// Terminates each header/param entry.
pub const ENTRY_DELIM: char = '\u{19}';
