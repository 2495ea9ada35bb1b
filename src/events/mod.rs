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

//! Event channels and the queue-to-channel bridge.
//!
//! [`EventManager`] fans published events out to named channels;
//! [`EventBusQueueAdapter`] drains an externally fed [`Queue`] and
//! republishes each item onto one of those channels, in manual
//! (`process`) or push-driven (`start`/`stop`) mode.
//!
//! [`Queue`]: crate::queue::Queue

mod adapter;
mod manager;

pub use adapter::EventBusQueueAdapter;
pub use manager::{EventManager, EventPublisher};
