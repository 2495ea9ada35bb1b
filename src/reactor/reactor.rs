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

//! Tick-driven deadline scanner and repeating task scheduler.

use super::callback::{CallbackFuture, TimedCallback};
use super::error::CallbackError;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Deadline substituted when a timeout handler is registered without an
/// explicit duration.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

struct RepeatingTask {
    interval: Duration,
    next_due: Instant,
    run: Box<dyn FnMut() + Send>,
}

/// Scans registered callbacks for elapsed deadlines and runs repeating
/// housekeeping tasks.
///
/// The reactor does no scheduling of its own. Whoever owns it calls
/// [`tick`](Reactor::tick), typically once per processed batch or on a
/// fixed timer, and each tick is one short bounded scan. Resolved
/// callbacks are dropped from the registry as ticks encounter them.
#[derive(Default)]
pub struct Reactor {
    callbacks: Mutex<Vec<Arc<dyn TimedCallback>>>,
    tasks: Mutex<Vec<RepeatingTask>>,
}

impl Reactor {
    /// Creates an empty reactor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback for deadline scanning.
    pub fn register_callback(&self, callback: Arc<dyn TimedCallback>) {
        self.callbacks.lock().push(callback);
    }

    /// Schedules `task` to run on the first tick at or after each
    /// `interval` boundary.
    pub fn add_repeating_task(&self, interval: Duration, task: impl FnMut() + Send + 'static) {
        self.tasks.lock().push(RepeatingTask {
            interval,
            next_due: Instant::now() + interval,
            run: Box::new(task),
        });
    }

    /// Number of callbacks currently registered.
    #[must_use]
    pub fn pending_callbacks(&self) -> usize {
        self.callbacks.lock().len()
    }

    /// Runs one scan: fires elapsed deadlines, drops resolved callbacks,
    /// and runs due repeating tasks.
    ///
    /// Timeout handlers and task bodies run with the registries unlocked,
    /// so they may register new callbacks or tasks on this same reactor.
    pub fn tick(&self) {
        let now = Instant::now();

        // Swap the registry out before invoking any handler. A handler
        // that re-enters register_callback lands in the fresh vector and
        // survivors are appended back afterwards.
        let scanned = std::mem::take(&mut *self.callbacks.lock());
        let mut fired = 0usize;
        let mut unresolved = Vec::with_capacity(scanned.len());
        for callback in scanned {
            if callback.check_timeout(now) {
                fired += 1;
            }
            if !callback.is_resolved() {
                unresolved.push(callback);
            }
        }
        if !unresolved.is_empty() {
            self.callbacks.lock().append(&mut unresolved);
        }
        if fired > 0 {
            debug!(fired, "deadline scan timed out callbacks");
        }

        // Same discipline for tasks: a task body may call
        // add_repeating_task without deadlocking the tick.
        let mut due = std::mem::take(&mut *self.tasks.lock());
        for task in due.iter_mut() {
            if now >= task.next_due {
                (task.run)();
                task.next_due = now + task.interval;
            }
        }
        self.tasks.lock().append(&mut due);
    }
}

impl std::fmt::Debug for Reactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reactor")
            .field("pending_callbacks", &self.pending_callbacks())
            .field("repeating_tasks", &self.tasks.lock().len())
            .finish()
    }
}

/// Assembles a [`CallbackFuture`] and wires it to a reactor.
///
/// Timeout and error handling depend on a reactor tick to fire, so
/// [`build`](CallbackBuilder::build) refuses those configurations when no
/// reactor was supplied. A timeout handler registered without an explicit
/// duration gets [`DEFAULT_TIMEOUT`].
pub struct CallbackBuilder<T> {
    reactor: Option<Arc<Reactor>>,
    on_result: Option<Box<dyn FnOnce(T) + Send>>,
    on_error: Option<Box<dyn FnOnce(super::CallFailure) + Send>>,
    on_timeout: Option<Box<dyn FnOnce() + Send>>,
    timeout: Option<Duration>,
}

impl<T> Default for CallbackBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CallbackBuilder<T> {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            reactor: None,
            on_result: None,
            on_error: None,
            on_timeout: None,
            timeout: None,
        }
    }

    /// Attaches the reactor that will scan this callback's deadline.
    #[must_use]
    pub fn with_reactor(mut self, reactor: Arc<Reactor>) -> Self {
        self.reactor = Some(reactor);
        self
    }

    /// Sets the handler invoked on a successful result.
    #[must_use]
    pub fn with_callback(mut self, on_result: impl FnOnce(T) + Send + 'static) -> Self {
        self.on_result = Some(Box::new(on_result));
        self
    }

    /// Sets the handler invoked on failure.
    #[must_use]
    pub fn with_error_handler(
        mut self,
        on_error: impl FnOnce(super::CallFailure) + Send + 'static,
    ) -> Self {
        self.on_error = Some(Box::new(on_error));
        self
    }

    /// Sets the handler invoked when the deadline elapses unresolved.
    #[must_use]
    pub fn with_timeout_handler(mut self, on_timeout: impl FnOnce() + Send + 'static) -> Self {
        self.on_timeout = Some(Box::new(on_timeout));
        self
    }

    /// Sets an explicit deadline duration.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl<T: Send + 'static> CallbackBuilder<T> {
    /// Builds the callback and registers it with the reactor.
    ///
    /// Fails with [`CallbackError::ReactorRequired`] when a timeout, a
    /// timeout handler, or an error handler was configured without a
    /// reactor, and with [`CallbackError::MissingResultHandler`] when no
    /// result handler was set.
    pub fn build(self) -> Result<Arc<CallbackFuture<T>>, CallbackError> {
        let on_result = self.on_result.ok_or(CallbackError::MissingResultHandler)?;

        let needs_reactor =
            self.on_error.is_some() || self.on_timeout.is_some() || self.timeout.is_some();
        if needs_reactor && self.reactor.is_none() {
            return Err(CallbackError::ReactorRequired);
        }

        let timeout = match (self.timeout, self.on_timeout.is_some()) {
            (Some(timeout), _) => Some(timeout),
            (None, true) => Some(DEFAULT_TIMEOUT),
            (None, false) => None,
        };
        let deadline = timeout.map(|t| Instant::now() + t);

        let future = Arc::new(CallbackFuture::new(
            on_result,
            self.on_error,
            self.on_timeout,
            deadline,
        ));
        if let Some(reactor) = self.reactor {
            reactor.register_callback(Arc::clone(&future) as Arc<dyn TimedCallback>);
        }
        Ok(future)
    }
}

impl<T> std::fmt::Debug for CallbackBuilder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackBuilder")
            .field("has_reactor", &self.reactor.is_some())
            .field("has_error_handler", &self.on_error.is_some())
            .field("has_timeout_handler", &self.on_timeout.is_some())
            .field("timeout", &self.timeout)
            .finish()
    }
}
