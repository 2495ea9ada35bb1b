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

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

//! # Microbus - Async RPC Microservice Core
//!
//! Microbus is the in-process core of an RPC microservice runtime:
//!
//! - **Wire codec**: a delimited text protocol for method calls,
//!   responses, and batched groups, with JSON body payloads
//! - **Service dispatch**: address-prefixed registration, one worker and
//!   one bounded queue per service, batched response flushing
//! - **Correlation**: every in-flight call filed once under a
//!   `(return address, id)` key and removed exactly once
//! - **Callback futures**: one-shot resolution racing the response,
//!   failure, and timeout paths, with a tick-driven reactor
//! - **Events**: named-channel fan-out plus a queue-to-channel adapter
//!
//! Transports are deliberately out of scope; whatever moves the encoded
//! frames (HTTP, sockets, an in-process loop) feeds decoded messages into
//! a bundle and carries encoded responses away.
//!
//! ## Architecture
//!
//! - **[`message`]**: `MethodCall`, `Response`, and the ordered
//!   `MultiMap` used for headers and params
//! - **[`codec`]**: `WireCodec` encode/decode with structural control
//!   bytes disjoint from body content
//! - **[`queue`]**: bounded MPSC handoff with a single claimable consumer
//! - **[`reactor`]**: `CallbackFuture` state machine, `CallbackBuilder`,
//!   deadline scanning, repeating tasks
//! - **[`service`]**: `ServiceBundle` dispatch and response correlation
//! - **[`events`]**: `EventManager` fan-out and `EventBusQueueAdapter`
//! - **[`config`]**: immutable service and bundle configuration
//!
//! ## Quick Start
//!
//! ```rust
//! use microbus::config::{BundleConfig, ServiceConfig};
//! use microbus::message::MethodCall;
//! use microbus::service::{Service, ServiceBundle};
//! use serde_json::{json, Value};
//!
//! struct Greeter;
//!
//! impl Service for Greeter {
//!     fn invoke(
//!         &mut self,
//!         method: &str,
//!         args: &[Value],
//!     ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
//!         match method {
//!             "greet" => {
//!                 let name = args.first().and_then(Value::as_str).unwrap_or("world");
//!                 Ok(json!(format!("hello, {name}")))
//!             }
//!             other => Err(format!("no such method '{other}'").into()),
//!         }
//!     }
//! }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bundle = ServiceBundle::new(&ServiceConfig::default(), BundleConfig::default());
//! bundle.start()?;
//! bundle.register("/greeter", Greeter)?;
//!
//! let mut replies = bundle.reply_queue("clientA")?;
//! let call = MethodCall::new(bundle.next_id(), "/greeter/greet", "clientA", "greeter", "greet")
//!     .with_body_arg(json!("Rick"));
//! bundle.call(call).await?;
//!
//! let response = replies
//!     .poll_wait(std::time::Duration::from_secs(1))
//!     .await
//!     .expect("response");
//! assert_eq!(response.body(), Some(&json!("hello, Rick")));
//! bundle.stop().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Each layer owns its error enum ([`CodecError`], [`QueueError`],
//! [`ServiceError`], [`CallbackError`]); [`MicrobusError`] composes them.
//! All errors implement `std::error::Error` with sources preserved.
//!
//! ## Safety
//!
//! Microbus is written in 100% safe Rust with `#![deny(unsafe_code)]`.
//! All concurrency is handled through Tokio's async runtime.

pub mod codec;
pub mod config;
pub mod error;
pub mod events;
pub mod message;
pub mod queue;
pub mod reactor;
pub mod service;

pub use codec::{CodecError, WireCodec};
pub use config::{BundleConfig, ServiceConfig};
pub use error::MicrobusError;
pub use events::{EventBusQueueAdapter, EventManager, EventPublisher};
pub use message::{Message, MethodCall, MultiMap, Response};
pub use queue::{Queue, QueueError, ReceiveQueue, SendQueue};
pub use reactor::{
    CallFailure, CallbackBuilder, CallbackError, CallbackFuture, CallbackState, Reactor,
};
pub use service::{Service, ServiceBundle, ServiceError};
