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

//! Callback futures and the reactor that times them out.
//!
//! Every asynchronous call gets a [`CallbackFuture`]: a one-shot handle
//! that the response path, the failure path, and the reactor's deadline
//! scan race to resolve. First committer wins; the losers become no-ops.
//! The [`Reactor`] is tick-driven by its owner and also hosts repeating
//! housekeeping tasks.
//!
//! ```
//! use microbus::reactor::{CallbackBuilder, Reactor};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let reactor = Arc::new(Reactor::new());
//! let future = CallbackBuilder::new()
//!     .with_reactor(Arc::clone(&reactor))
//!     .with_callback(|value: u64| println!("result: {value}"))
//!     .with_timeout_handler(|| println!("timed out"))
//!     .with_timeout(Duration::from_secs(5))
//!     .build()
//!     .unwrap();
//!
//! future.accept(42);
//! reactor.tick();
//! ```

mod callback;
mod error;
#[allow(clippy::module_inception)]
mod reactor;

pub use callback::{CallFailure, CallbackFuture, CallbackState, TimedCallback};
pub use error::CallbackError;
pub use reactor::{CallbackBuilder, Reactor, DEFAULT_TIMEOUT};
