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

//! Error types for service registration and dispatch.

use crate::queue::QueueError;
use std::fmt;

/// Errors surfaced by the service bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The address prefix is already bound to another service.
    AddressAlreadyBound {
        /// The normalized prefix that was rejected.
        address: String,
    },

    /// A pending call with the same correlation key already exists.
    CorrelationCollision {
        /// Display form of the colliding key.
        key: String,
    },

    /// A reply queue for this return address was already claimed.
    ReplyQueueClaimed {
        /// The return address.
        return_address: String,
    },

    /// The bundle has been stopped.
    Stopped,

    /// A queue operation failed.
    Queue(QueueError),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AddressAlreadyBound { address } => {
                write!(f, "address '{}' is already bound to a service", address)
            }
            Self::CorrelationCollision { key } => {
                write!(f, "a call with correlation key {} is already pending", key)
            }
            Self::ReplyQueueClaimed { return_address } => {
                write!(
                    f,
                    "reply queue for return address '{}' is already claimed",
                    return_address
                )
            }
            Self::Stopped => write!(f, "service bundle is stopped"),
            Self::Queue(e) => write!(f, "queue failure: {}", e),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Queue(e) => Some(e),
            _ => None,
        }
    }
}

impl From<QueueError> for ServiceError {
    fn from(e: QueueError) -> Self {
        Self::Queue(e)
    }
}
