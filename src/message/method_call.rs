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

//! Method call messages.

use super::MultiMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};

/// An asynchronous method invocation addressed to a service.
///
/// A `MethodCall` carries everything needed to route the call to a target
/// object, invoke the named method with an ordered argument list, and route
/// the eventual [`Response`](super::Response) back to the originator:
///
/// - `id` — caller-assigned correlation number, unique within the lifetime
///   of the caller's `return_address` scope
/// - `address` — logical target path (e.g. `/services/emp/add`)
/// - `return_address` — logical path of the originator; half of the
///   correlation key and the reply routing destination
/// - `object_name` / `method_name` — the target object and method
/// - `headers` / `params` — ordered multi-valued string maps
/// - `body` — ordered argument list as JSON values
/// - `timestamp` — creation time in milliseconds, monotonic per producer
///
/// # Example
///
/// ```rust
/// use microbus::message::MethodCall;
/// use serde_json::json;
///
/// let call = MethodCall::new(42, "/root/emp/add", "clientA", "emp", "add")
///     .with_body_arg(json!("Rick"));
///
/// assert_eq!(call.id(), 42);
/// assert_eq!(call.body().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    id: u64,
    address: String,
    return_address: String,
    timestamp: u64,
    object_name: String,
    method_name: String,
    headers: MultiMap,
    params: MultiMap,
    body: Vec<Value>,
}

impl MethodCall {
    /// Creates a call with an empty body, stamped with the current time.
    #[must_use]
    pub fn new(
        id: u64,
        address: impl Into<String>,
        return_address: impl Into<String>,
        object_name: impl Into<String>,
        method_name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            address: address.into(),
            return_address: return_address.into(),
            timestamp: now_millis(),
            object_name: object_name.into(),
            method_name: method_name.into(),
            headers: MultiMap::new(),
            params: MultiMap::new(),
            body: Vec::new(),
        }
    }

    /// Reconstructs a call from decoded wire fields, keeping the original
    /// timestamp.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn from_parts(
        id: u64,
        address: String,
        return_address: String,
        timestamp: u64,
        object_name: String,
        method_name: String,
        headers: MultiMap,
        params: MultiMap,
        body: Vec<Value>,
    ) -> Self {
        Self {
            id,
            address,
            return_address,
            timestamp,
            object_name,
            method_name,
            headers,
            params,
            body,
        }
    }

    /// Appends a single body argument, preserving order.
    #[must_use]
    pub fn with_body_arg(mut self, arg: Value) -> Self {
        self.body.push(arg);
        self
    }

    /// Replaces the body with an ordered argument list.
    #[must_use]
    pub fn with_body(mut self, body: Vec<Value>) -> Self {
        self.body = body;
        self
    }

    /// Appends a header value.
    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key, value);
        self
    }

    /// Appends a request parameter value.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key, value);
        self
    }

    /// Caller-assigned correlation id.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Logical target path.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Logical path of the originator.
    #[must_use]
    pub fn return_address(&self) -> &str {
        &self.return_address
    }

    /// Creation time in milliseconds.
    #[must_use]
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Target object name.
    #[must_use]
    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    /// Target method name.
    #[must_use]
    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// Headers in insertion order.
    #[must_use]
    pub fn headers(&self) -> &MultiMap {
        &self.headers
    }

    /// Request parameters in insertion order.
    #[must_use]
    pub fn params(&self) -> &MultiMap {
        &self.params
    }

    /// Ordered argument list.
    #[must_use]
    pub fn body(&self) -> &[Value] {
        &self.body
    }
}

/// Milliseconds since the Unix epoch.
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
