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

//! Named-channel event fan-out.

use crate::queue::{Queue, QueueError, ReceiveQueue, SendQueue};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Anything that can publish events onto a named channel.
#[async_trait]
pub trait EventPublisher<T: Send>: Send + Sync {
    /// Delivers `event` to every subscriber of `channel`.
    async fn publish(&self, channel: &str, event: T);
}

struct ChannelState<T> {
    subscribers: Vec<SendQueue<T>>,
    queues: Vec<Arc<Queue<T>>>,
}

impl<T> Default for ChannelState<T> {
    fn default() -> Self {
        Self {
            subscribers: Vec::new(),
            queues: Vec::new(),
        }
    }
}

/// Fans events out to per-subscriber queues, keyed by channel name.
///
/// Each subscription gets its own bounded queue; a publish clones the
/// event once per subscriber. Subscribers that stopped their queue are
/// dropped on the next publish that notices them.
pub struct EventManager<T> {
    channels: Mutex<HashMap<String, ChannelState<T>>>,
    subscriber_capacity: usize,
}

impl<T: Clone + Send + 'static> EventManager<T> {
    /// Creates a manager whose subscriber queues hold `subscriber_capacity`
    /// buffered events each.
    #[must_use]
    pub fn new(subscriber_capacity: usize) -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
            subscriber_capacity,
        }
    }

    /// Subscribes to `channel`, creating it on first use.
    ///
    /// Returns the consumer side of a fresh queue that will receive every
    /// event published to the channel from now on.
    pub fn subscribe(&self, channel: &str) -> Result<ReceiveQueue<T>, QueueError> {
        let queue = Arc::new(Queue::new(
            format!("event:{}", channel),
            self.subscriber_capacity,
        ));
        let receive = queue.receive_queue()?;
        let mut channels = self.channels.lock();
        let state = channels.entry(channel.to_string()).or_default();
        state.subscribers.push(queue.send_queue());
        state.queues.push(queue);
        debug!(channel, subscribers = state.subscribers.len(), "subscribed");
        Ok(receive)
    }

    /// Number of live subscribers on `channel`.
    #[must_use]
    pub fn subscriber_count(&self, channel: &str) -> usize {
        self.channels
            .lock()
            .get(channel)
            .map_or(0, |state| state.subscribers.len())
    }
}

#[async_trait]
impl<T: Clone + Send + 'static> EventPublisher<T> for EventManager<T> {
    async fn publish(&self, channel: &str, event: T) {
        let subscribers: Vec<SendQueue<T>> = match self.channels.lock().get(channel) {
            Some(state) => state.subscribers.clone(),
            None => return,
        };

        let mut dead = Vec::new();
        for (index, subscriber) in subscribers.iter().enumerate() {
            if let Err(QueueError::Closed { .. }) = subscriber.send(event.clone()).await {
                dead.push(index);
            }
        }

        if !dead.is_empty() {
            let mut channels = self.channels.lock();
            if let Some(state) = channels.get_mut(channel) {
                for index in dead.into_iter().rev() {
                    if index < state.subscribers.len() {
                        state.subscribers.remove(index);
                        state.queues.remove(index);
                    }
                }
                debug!(
                    channel,
                    remaining = state.subscribers.len(),
                    "dropped closed subscribers"
                );
            }
        }
    }
}

impl<T> std::fmt::Debug for EventManager<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventManager")
            .field("channels", &self.channels.lock().len())
            .finish_non_exhaustive()
    }
}
