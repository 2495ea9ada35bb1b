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

//! The capability interface a registered service implements.

use serde_json::Value;
use std::error::Error;

/// A dispatch target bound to an address prefix.
///
/// The bundle drives each service from a single worker, so `invoke` takes
/// `&mut self` and implementations need no internal locking; all other
/// threads reach the service only by pushing messages.
pub trait Service: Send + 'static {
    /// Handles one method call.
    ///
    /// A returned `Ok` value becomes a success response body; a returned
    /// error becomes a response with the error flag set and the error's
    /// display text as body.
    fn invoke(
        &mut self,
        method: &str,
        args: &[Value],
    ) -> Result<Value, Box<dyn Error + Send + Sync>>;

    /// Called when the worker has drained its inbound queue.
    fn queue_empty(&mut self) {}

    /// Called when the worker accumulated a full batch of `size` responses
    /// before flushing.
    fn queue_limit(&mut self, size: usize) {
        let _ = size;
    }
}
