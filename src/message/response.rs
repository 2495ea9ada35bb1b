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

//! Response messages.

use super::method_call::now_millis;
use super::MethodCall;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The outcome of a [`MethodCall`], routed back to the caller.
///
/// `id`, `address`, and `return_address` are copied from the originating
/// call so the correlation machinery can match the response to the pending
/// callback. `was_errors` distinguishes a success body from a failure
/// description; the error detail travels in `body` either way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    id: u64,
    address: String,
    return_address: String,
    timestamp: u64,
    was_errors: bool,
    body: Option<Value>,
}

impl Response {
    /// Builds a success response for `call` carrying `body` as the result.
    #[must_use]
    pub fn ok(call: &MethodCall, body: Option<Value>) -> Self {
        Self {
            id: call.id(),
            address: call.address().to_string(),
            return_address: call.return_address().to_string(),
            timestamp: now_millis(),
            was_errors: false,
            body,
        }
    }

    /// Builds an error-flagged response for `call`, preserving the failure
    /// description as the body.
    #[must_use]
    pub fn error(call: &MethodCall, description: impl Into<String>) -> Self {
        Self {
            id: call.id(),
            address: call.address().to_string(),
            return_address: call.return_address().to_string(),
            timestamp: now_millis(),
            was_errors: true,
            body: Some(Value::String(description.into())),
        }
    }

    /// Reconstructs a response from decoded wire fields.
    #[must_use]
    pub fn from_parts(
        id: u64,
        address: String,
        return_address: String,
        timestamp: u64,
        was_errors: bool,
        body: Option<Value>,
    ) -> Self {
        Self {
            id,
            address,
            return_address,
            timestamp,
            was_errors,
            body,
        }
    }

    /// Correlation id copied from the originating call.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Address of the call this responds to.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Originator path the response is routed to.
    #[must_use]
    pub fn return_address(&self) -> &str {
        &self.return_address
    }

    /// Creation time in milliseconds.
    #[must_use]
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// `true` if the body is a failure description rather than a result.
    #[must_use]
    pub fn was_errors(&self) -> bool {
        self.was_errors
    }

    /// Result value or failure description.
    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Consumes the response, returning its body.
    #[must_use]
    pub fn into_body(self) -> Option<Value> {
        self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ok_copies_routing_fields() {
        let call = MethodCall::new(7, "/svc/emp/add", "clientA", "emp", "add");
        let response = Response::ok(&call, Some(json!(true)));

        assert_eq!(response.id(), 7);
        assert_eq!(response.address(), "/svc/emp/add");
        assert_eq!(response.return_address(), "clientA");
        assert!(!response.was_errors());
        assert_eq!(response.body(), Some(&json!(true)));
    }

    #[test]
    fn test_error_preserves_description() {
        let call = MethodCall::new(7, "/svc/emp/add", "clientA", "emp", "add");
        let response = Response::error(&call, "employee not found");

        assert!(response.was_errors());
        assert_eq!(response.body(), Some(&json!("employee not found")));
    }
}
