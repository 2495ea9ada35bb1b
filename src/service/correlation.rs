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

//! Pending-call bookkeeping.

use super::error::ServiceError;
use super::handler_key::HandlerKey;
use crate::reactor::CallbackFuture;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Maps in-flight calls to the callbacks awaiting their responses.
///
/// Every inserted key leaves the map exactly once: removed by the matching
/// response, or swept by [`prune_resolved`](CorrelationMap::prune_resolved)
/// after a timeout or cancellation resolved the callback. Nothing is left
/// to leak.
#[derive(Default)]
pub struct CorrelationMap {
    pending: Mutex<HashMap<HandlerKey, Arc<CallbackFuture<Value>>>>,
}

impl CorrelationMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Files a callback under the call's key.
    ///
    /// Ids must be unique per return address; a colliding insert is
    /// rejected rather than silently replacing the earlier callback.
    pub fn insert(
        &self,
        key: HandlerKey,
        callback: Arc<CallbackFuture<Value>>,
    ) -> Result<(), ServiceError> {
        let mut pending = self.pending.lock();
        if pending.contains_key(&key) {
            return Err(ServiceError::CorrelationCollision {
                key: key.to_string(),
            });
        }
        pending.insert(key, callback);
        Ok(())
    }

    /// Removes and returns the callback filed under `key`, if any.
    pub fn remove(&self, key: &HandlerKey) -> Option<Arc<CallbackFuture<Value>>> {
        self.pending.lock().remove(key)
    }

    /// Sweeps entries whose callbacks were resolved elsewhere (timed out
    /// or cancelled). Returns how many were dropped.
    pub fn prune_resolved(&self) -> usize {
        let mut pending = self.pending.lock();
        let before = pending.len();
        pending.retain(|_, callback| !callback.is_resolved());
        let dropped = before - pending.len();
        if dropped > 0 {
            debug!(dropped, "pruned resolved correlation entries");
        }
        dropped
    }

    /// Number of calls still awaiting a response.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Whether no calls are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }
}

impl std::fmt::Debug for CorrelationMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorrelationMap")
            .field("pending", &self.len())
            .finish()
    }
}
