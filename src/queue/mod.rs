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

//! Producer/consumer queues.
//!
//! Every service worker, response router, and event adapter in the crate
//! moves data through a [`Queue`]: many clonable [`SendQueue`] producers,
//! one claimed [`ReceiveQueue`] consumer. Consumption is either pull
//! driven (`poll`, `poll_wait`, `take_batch`) or push driven via
//! [`Queue::start_listener`]; `stop` is graceful and drains what was
//! already enqueued.
//!
//! ```
//! use microbus::queue::Queue;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let queue = Queue::new("jobs", 64);
//! let sender = queue.send_queue();
//! let mut receiver = queue.receive_queue().unwrap();
//!
//! sender.send("first").await.unwrap();
//! assert_eq!(receiver.recv().await, Some("first"));
//! # }
//! ```

mod error;
#[allow(clippy::module_inception)]
mod queue;

pub use error::QueueError;
pub use queue::{Queue, ReceiveQueue, SendQueue};
