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

//! Message model for the RPC core.
//!
//! Two message variants travel through the system: [`MethodCall`] (an
//! invocation addressed to a service) and [`Response`] (its outcome,
//! routed back by return address). Both carry the correlation fields
//! `id`, `address`, `return_address`, and `timestamp`; the
//! [`Message`] enum unifies them where a queue or frame can carry either.

mod method_call;
mod multimap;
mod response;

pub use method_call::MethodCall;
pub use multimap::MultiMap;
pub use response::Response;

/// Either side of the call/response round trip.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// An invocation addressed to a service.
    MethodCall(MethodCall),
    /// The outcome of an invocation, routed back to the caller.
    Response(Response),
}

impl Message {
    /// Correlation id carried by either variant.
    #[must_use]
    pub fn id(&self) -> u64 {
        match self {
            Self::MethodCall(call) => call.id(),
            Self::Response(response) => response.id(),
        }
    }

    /// Logical target path.
    #[must_use]
    pub fn address(&self) -> &str {
        match self {
            Self::MethodCall(call) => call.address(),
            Self::Response(response) => response.address(),
        }
    }

    /// Logical path of the originator.
    #[must_use]
    pub fn return_address(&self) -> &str {
        match self {
            Self::MethodCall(call) => call.return_address(),
            Self::Response(response) => response.return_address(),
        }
    }

    /// Creation time in milliseconds.
    #[must_use]
    pub fn timestamp(&self) -> u64 {
        match self {
            Self::MethodCall(call) => call.timestamp(),
            Self::Response(response) => response.timestamp(),
        }
    }

    /// Returns `true` for the [`Message::MethodCall`] variant.
    #[must_use]
    pub fn is_method_call(&self) -> bool {
        matches!(self, Self::MethodCall(_))
    }
}

impl From<MethodCall> for Message {
    fn from(call: MethodCall) -> Self {
        Self::MethodCall(call)
    }
}

impl From<Response> for Message {
    fn from(response: Response) -> Self {
        Self::Response(response)
    }
}
