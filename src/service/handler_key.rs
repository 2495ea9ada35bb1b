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

//! Correlation keys for pending calls.

use crate::message::{MethodCall, Response};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of an in-flight call in the correlation map.
///
/// Equality and hashing cover `(return_address, message_id)` ONLY.
/// `address` and `timestamp` are stored and printed but excluded from
/// identity: two keys with the same return address and id but different
/// target addresses compare equal. Wire peers depend on that exact
/// identity, so it must not be widened.
#[derive(Debug, Clone)]
pub struct HandlerKey {
    return_address: String,
    address: String,
    message_id: u64,
    timestamp: u64,
}

impl HandlerKey {
    /// Builds the key under which a call's callback will be filed.
    #[must_use]
    pub fn from_call(call: &MethodCall) -> Self {
        Self {
            return_address: call.return_address().to_string(),
            address: call.address().to_string(),
            message_id: call.id(),
            timestamp: call.timestamp(),
        }
    }

    /// Builds the lookup key for an arriving response.
    #[must_use]
    pub fn from_response(response: &Response) -> Self {
        Self {
            return_address: response.return_address().to_string(),
            address: response.address().to_string(),
            message_id: response.id(),
            timestamp: response.timestamp(),
        }
    }

    /// The return address half of the identity.
    #[must_use]
    pub fn return_address(&self) -> &str {
        &self.return_address
    }

    /// Informational target address (not part of identity).
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The message id half of the identity.
    #[must_use]
    pub fn message_id(&self) -> u64 {
        self.message_id
    }

    /// Informational creation time (not part of identity).
    #[must_use]
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }
}

impl PartialEq for HandlerKey {
    fn eq(&self, other: &Self) -> bool {
        self.message_id == other.message_id && self.return_address == other.return_address
    }
}

impl Eq for HandlerKey {}

impl Hash for HandlerKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.return_address.hash(state);
        self.message_id.hash(state);
    }
}

impl fmt::Display for HandlerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{} (address '{}', at {})",
            self.return_address, self.message_id, self.address, self.timestamp
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(key: &HandlerKey) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_identity_ignores_address_and_timestamp() {
        let a = HandlerKey::from_call(&MethodCall::from_parts(
            7,
            "/emp/add".to_string(),
            "clientA".to_string(),
            100,
            String::new(),
            String::new(),
            Default::default(),
            Default::default(),
            Vec::new(),
        ));
        let b = HandlerKey::from_call(&MethodCall::from_parts(
            7,
            "/other/path".to_string(),
            "clientA".to_string(),
            999,
            String::new(),
            String::new(),
            Default::default(),
            Default::default(),
            Vec::new(),
        ));
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_identity_distinguishes_return_address_and_id() {
        let base = MethodCall::new(7, "/emp/add", "clientA", "emp", "add");
        let key = HandlerKey::from_call(&base);

        let other_client = MethodCall::new(7, "/emp/add", "clientB", "emp", "add");
        assert_ne!(key, HandlerKey::from_call(&other_client));

        let other_id = MethodCall::new(8, "/emp/add", "clientA", "emp", "add");
        assert_ne!(key, HandlerKey::from_call(&other_id));
    }

    #[test]
    fn test_response_key_matches_call_key() {
        let call = MethodCall::new(42, "/emp/add", "clientA", "emp", "add");
        let response = Response::ok(&call, None);
        assert_eq!(
            HandlerKey::from_call(&call),
            HandlerKey::from_response(&response)
        );
    }
}
