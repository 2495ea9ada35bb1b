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

//! One-shot callback futures.

use parking_lot::Mutex;
use serde_json::Value;
use std::fmt;
use std::time::Instant;
use tracing::warn;

/// Resolution state of a [`CallbackFuture`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackState {
    /// Not yet resolved.
    Pending,
    /// Resolved by a successful result.
    Completed,
    /// Resolved by a failure.
    Failed,
    /// Resolved by the reactor's deadline scan.
    TimedOut,
    /// Cancelled by the caller.
    Cancelled,
}

/// A structured failure delivered to an error handler.
#[derive(Debug, Clone, PartialEq)]
pub struct CallFailure {
    message: String,
    detail: Option<Value>,
}

impl CallFailure {
    /// Creates a failure with a human-readable message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detail: None,
        }
    }

    /// Attaches a structured detail payload.
    #[must_use]
    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = Some(detail);
        self
    }

    /// The failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Structured detail, when the failing side supplied one.
    #[must_use]
    pub fn detail(&self) -> Option<&Value> {
        self.detail.as_ref()
    }
}

impl fmt::Display for CallFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

type ResultHandler<T> = Box<dyn FnOnce(T) + Send>;
type ErrorHandler = Box<dyn FnOnce(CallFailure) + Send>;
type TimeoutHandler = Box<dyn FnOnce() + Send>;

struct Inner<T> {
    state: CallbackState,
    deadline: Option<Instant>,
    on_result: Option<ResultHandler<T>>,
    on_error: Option<ErrorHandler>,
    on_timeout: Option<TimeoutHandler>,
}

/// A future-like handle resolved exactly once.
///
/// Three paths race to resolve it: a real result ([`accept`]), a failure
/// ([`fail`]), and the reactor's deadline scan ([`check_timeout`]). The
/// first committer wins; every later attempt is a no-op that returns
/// `false` and logs a warning. Handlers run outside the internal lock, so
/// a handler may itself touch other callbacks.
///
/// [`accept`]: CallbackFuture::accept
/// [`fail`]: CallbackFuture::fail
/// [`check_timeout`]: CallbackFuture::check_timeout
pub struct CallbackFuture<T> {
    inner: Mutex<Inner<T>>,
}

impl<T> CallbackFuture<T> {
    pub(super) fn new(
        on_result: ResultHandler<T>,
        on_error: Option<ErrorHandler>,
        on_timeout: Option<TimeoutHandler>,
        deadline: Option<Instant>,
    ) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: CallbackState::Pending,
                deadline,
                on_result: Some(on_result),
                on_error,
                on_timeout,
            }),
        }
    }

    /// Builds a callback with only a result handler and no deadline.
    ///
    /// Such a future never times out and needs no reactor; it resolves
    /// solely through [`accept`](Self::accept), [`fail`](Self::fail), or
    /// [`cancel`](Self::cancel).
    #[must_use]
    pub fn from_result_handler(on_result: impl FnOnce(T) + Send + 'static) -> Self {
        Self::new(Box::new(on_result), None, None, None)
    }

    /// Current resolution state.
    #[must_use]
    pub fn state(&self) -> CallbackState {
        self.inner.lock().state
    }

    /// Returns `true` once any resolution path has committed.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.state() != CallbackState::Pending
    }

    /// Deadline assigned at construction, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.inner.lock().deadline
    }

    /// Resolves with a successful result.
    ///
    /// Returns `false` without invoking anything when the future was
    /// already resolved.
    pub fn accept(&self, value: T) -> bool {
        let handler = {
            let mut inner = self.inner.lock();
            if inner.state != CallbackState::Pending {
                drop(inner);
                warn!(state = ?self.state(), "discarding result for already-resolved callback");
                return false;
            }
            inner.state = CallbackState::Completed;
            inner.on_result.take()
        };
        if let Some(handler) = handler {
            handler(value);
        }
        true
    }

    /// Resolves with a failure, invoking the error handler when one was
    /// registered.
    pub fn fail(&self, failure: CallFailure) -> bool {
        let handler = {
            let mut inner = self.inner.lock();
            if inner.state != CallbackState::Pending {
                drop(inner);
                warn!(state = ?self.state(), "discarding failure for already-resolved callback");
                return false;
            }
            inner.state = CallbackState::Failed;
            inner.on_error.take()
        };
        if let Some(handler) = handler {
            handler(failure);
        }
        true
    }

    /// Marks the future cancelled.
    ///
    /// Cancellation is cooperative: later results and deadline scans become
    /// no-ops, but in-flight service-side work is not interrupted. No
    /// handler is invoked.
    pub fn cancel(&self) -> bool {
        let mut inner = self.inner.lock();
        if inner.state != CallbackState::Pending {
            return false;
        }
        inner.state = CallbackState::Cancelled;
        inner.on_result = None;
        inner.on_error = None;
        inner.on_timeout = None;
        true
    }

    /// Fires the timeout path when still pending and past the deadline.
    ///
    /// Returns `true` only on the tick that actually transitions the
    /// future to [`CallbackState::TimedOut`].
    pub fn check_timeout(&self, now: Instant) -> bool {
        let handler = {
            let mut inner = self.inner.lock();
            if inner.state != CallbackState::Pending {
                return false;
            }
            let Some(deadline) = inner.deadline else {
                return false;
            };
            if now < deadline {
                return false;
            }
            inner.state = CallbackState::TimedOut;
            inner.on_timeout.take()
        };
        if let Some(handler) = handler {
            handler();
        }
        true
    }
}

impl<T> fmt::Debug for CallbackFuture<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("CallbackFuture")
            .field("state", &inner.state)
            .field("deadline", &inner.deadline)
            .finish_non_exhaustive()
    }
}

/// Type-erased view the reactor keeps of each registered callback.
pub trait TimedCallback: Send + Sync {
    /// Fires the timeout path if the deadline has elapsed.
    fn check_timeout(&self, now: Instant) -> bool;

    /// Whether any resolution path has committed.
    fn is_resolved(&self) -> bool;
}

impl<T: Send> TimedCallback for CallbackFuture<T> {
    fn check_timeout(&self, now: Instant) -> bool {
        CallbackFuture::check_timeout(self, now)
    }

    fn is_resolved(&self) -> bool {
        CallbackFuture::is_resolved(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_accept_resolves_once() {
        let hits = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&hits);
        let future = CallbackFuture::from_result_handler(move |_: u32| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(future.accept(7));
        assert!(!future.accept(8));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(future.state(), CallbackState::Completed);
    }

    #[test]
    fn test_fail_without_error_handler_still_resolves() {
        let future = CallbackFuture::from_result_handler(|_: u32| {});
        assert!(future.fail(CallFailure::new("boom")));
        assert_eq!(future.state(), CallbackState::Failed);
        assert!(!future.accept(1));
    }

    #[test]
    fn test_cancel_blocks_later_resolution() {
        let future = CallbackFuture::from_result_handler(|_: u32| panic!("must not run"));
        assert!(future.cancel());
        assert!(!future.accept(1));
        assert!(!future.check_timeout(Instant::now()));
        assert_eq!(future.state(), CallbackState::Cancelled);
    }

    #[test]
    fn test_timeout_fires_only_past_deadline() {
        let fired = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&fired);
        let deadline = Instant::now() + Duration::from_secs(60);
        let future = CallbackFuture::new(
            Box::new(|_: u32| {}),
            None,
            Some(Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })),
            Some(deadline),
        );

        assert!(!future.check_timeout(Instant::now()));
        assert!(future.check_timeout(deadline + Duration::from_millis(1)));
        assert!(!future.check_timeout(deadline + Duration::from_secs(1)));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(future.state(), CallbackState::TimedOut);
    }

    #[test]
    fn test_resolution_beats_timeout() {
        let future = CallbackFuture::new(
            Box::new(|_: u32| {}),
            None,
            Some(Box::new(|| panic!("timeout must not fire"))),
            Some(Instant::now()),
        );
        assert!(future.accept(1));
        assert!(!future.check_timeout(Instant::now() + Duration::from_secs(1)));
    }
}
