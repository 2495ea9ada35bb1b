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

//! Error types for queue operations.

use std::fmt;

/// Errors surfaced by [`Queue`](super::Queue) producers and consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// The queue was stopped; no further items are accepted.
    Closed {
        /// Name of the queue.
        name: String,
    },

    /// A non-blocking send found the queue at capacity.
    Full {
        /// Name of the queue.
        name: String,
        /// The configured capacity.
        capacity: usize,
    },

    /// The single consumer handle was already claimed.
    ConsumerClaimed {
        /// Name of the queue.
        name: String,
    },
}

impl fmt::Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed { name } => write!(f, "queue '{}' is closed", name),
            Self::Full { name, capacity } => {
                write!(f, "queue '{}' is full (capacity {})", name, capacity)
            }
            Self::ConsumerClaimed { name } => {
                write!(f, "queue '{}' already has a consumer", name)
            }
        }
    }
}

impl std::error::Error for QueueError {}
