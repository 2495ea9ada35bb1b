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

//! Top-level error type for the microbus core.
//!
//! Each layer owns its error enum ([`CodecError`], [`QueueError`],
//! [`ServiceError`], [`CallbackError`]); [`MicrobusError`] composes them
//! plus a boxed application variant for errors raised inside service
//! method bodies. Layer errors convert up via `From`, so `?` works across
//! layer boundaries.
//!
//! # Examples
//!
//! ```rust
//! use microbus::{CodecError, MicrobusError};
//!
//! let codec_err = CodecError::EmptyFrame;
//! let err: MicrobusError = codec_err.into();
//! assert!(err.is_codec_error());
//! ```

use crate::codec::CodecError;
use crate::queue::QueueError;
use crate::reactor::CallbackError;
use crate::service::ServiceError;
use std::error::Error as StdError;
use std::fmt;

/// Unified error type for microbus operations.
///
/// Recovery differs per layer: a codec error condemns one frame, a queue
/// error condemns one handoff, a service error condemns one registration
/// or call, a callback error is a construction-time misuse, and an
/// application error belongs to the caller.
#[derive(Debug)]
pub enum MicrobusError {
    /// A frame failed to encode or decode.
    Codec(CodecError),

    /// A queue handoff failed.
    Queue(QueueError),

    /// Registration, dispatch, or correlation failed.
    Service(ServiceError),

    /// A callback was assembled incorrectly.
    Callback(CallbackError),

    /// A user-defined error from a service method body. The framework
    /// propagates these untouched.
    Application(Box<dyn StdError + Send + Sync>),
}

impl MicrobusError {
    /// Returns `true` if this is a codec error.
    #[must_use]
    pub const fn is_codec_error(&self) -> bool {
        matches!(self, Self::Codec(_))
    }

    /// Returns `true` if this is a queue error.
    #[must_use]
    pub const fn is_queue_error(&self) -> bool {
        matches!(self, Self::Queue(_))
    }

    /// Returns `true` if this is a service error.
    #[must_use]
    pub const fn is_service_error(&self) -> bool {
        matches!(self, Self::Service(_))
    }

    /// Returns `true` if this is a callback construction error.
    #[must_use]
    pub const fn is_callback_error(&self) -> bool {
        matches!(self, Self::Callback(_))
    }

    /// Returns `true` if this is an application error.
    #[must_use]
    pub const fn is_application_error(&self) -> bool {
        matches!(self, Self::Application(_))
    }

    /// Returns `true` if retrying the same operation may succeed.
    ///
    /// A full queue clears as the consumer drains; everything else either
    /// needs a different input (codec, service, callback) or is final
    /// (closed queues, stopped bundles).
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Queue(QueueError::Full { .. }) => true,
            Self::Service(ServiceError::Queue(QueueError::Full { .. })) => true,
            _ => false,
        }
    }
}

impl fmt::Display for MicrobusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Codec(e) => write!(f, "codec error: {}", e),
            Self::Queue(e) => write!(f, "queue error: {}", e),
            Self::Service(e) => write!(f, "service error: {}", e),
            Self::Callback(e) => write!(f, "callback error: {}", e),
            Self::Application(e) => write!(f, "application error: {}", e),
        }
    }
}

impl StdError for MicrobusError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Codec(e) => Some(e),
            Self::Queue(e) => Some(e),
            Self::Service(e) => Some(e),
            Self::Callback(e) => Some(e),
            Self::Application(e) => Some(e.as_ref()),
        }
    }
}

impl From<CodecError> for MicrobusError {
    fn from(error: CodecError) -> Self {
        Self::Codec(error)
    }
}

impl From<QueueError> for MicrobusError {
    fn from(error: QueueError) -> Self {
        Self::Queue(error)
    }
}

impl From<ServiceError> for MicrobusError {
    fn from(error: ServiceError) -> Self {
        Self::Service(error)
    }
}

impl From<CallbackError> for MicrobusError {
    fn from(error: CallbackError) -> Self {
        Self::Callback(error)
    }
}
