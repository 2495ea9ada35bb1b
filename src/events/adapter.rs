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

//! Bridges an externally fed queue onto an event channel.

use super::manager::{EventManager, EventPublisher};
use crate::queue::{Queue, QueueError, ReceiveQueue};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

/// How long the push-driven loop waits on the queue before re-checking
/// the running flag.
const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Drains a queue and republishes each item onto a named event channel.
///
/// The consumer handle lives behind one async mutex, so the manual
/// [`process`](EventBusQueueAdapter::process) path and the push-driven
/// [`start`](EventBusQueueAdapter::start) loop can never interleave a
/// publish: whichever holds the guard drains and publishes alone.
pub struct EventBusQueueAdapter<T> {
    channel: String,
    manager: Arc<EventManager<T>>,
    inbound: Arc<tokio::sync::Mutex<ReceiveQueue<T>>>,
    running: Arc<AtomicBool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Clone + Send + 'static> EventBusQueueAdapter<T> {
    /// Claims `queue`'s consumer handle and binds it to `channel` on
    /// `manager`.
    pub fn new(
        channel: impl Into<String>,
        manager: Arc<EventManager<T>>,
        queue: &Queue<T>,
    ) -> Result<Self, QueueError> {
        let inbound = queue.receive_queue()?;
        Ok(Self {
            channel: channel.into(),
            manager,
            inbound: Arc::new(tokio::sync::Mutex::new(inbound)),
            running: Arc::new(AtomicBool::new(false)),
            task: Mutex::new(None),
        })
    }

    /// The event channel this adapter publishes to.
    #[must_use]
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Drains everything currently queued, publishing each item, then
    /// returns the number published. Never waits for new items.
    pub async fn process(&self) -> usize {
        let mut inbound = self.inbound.lock().await;
        let mut published = 0;
        while let Some(item) = inbound.poll() {
            self.manager.publish(&self.channel, item).await;
            published += 1;
        }
        published
    }

    /// Switches to push-driven mode: a background loop drains the queue
    /// as items arrive. Idempotent while running.
    pub fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }
        let inbound = Arc::clone(&self.inbound);
        let manager = Arc::clone(&self.manager);
        let running = Arc::clone(&self.running);
        let channel = self.channel.clone();
        let handle = tokio::spawn(async move {
            while running.load(Ordering::SeqCst) {
                // Hold the guard across the publish, release between
                // iterations so process() callers can interleave batches.
                let mut guard = inbound.lock().await;
                match guard.poll_wait(POLL_INTERVAL).await {
                    Some(item) => manager.publish(&channel, item).await,
                    None => drop(guard),
                }
            }
            debug!(%channel, "adapter listener exiting");
        });
        *self.task.lock() = Some(handle);
    }

    /// Tears down the push-driven loop and halts further draining.
    pub async fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        let handle = self.task.lock().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

impl<T> std::fmt::Debug for EventBusQueueAdapter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBusQueueAdapter")
            .field("channel", &self.channel)
            .field("running", &self.running.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_process_drains_everything_queued() {
        let manager = Arc::new(EventManager::new(16));
        let queue = Queue::new("bus", 16);
        let sender = queue.send_queue();
        let adapter = EventBusQueueAdapter::new("news", Arc::clone(&manager), &queue).unwrap();
        let mut subscriber = manager.subscribe("news").unwrap();

        for i in 0..3u32 {
            sender.send(i).await.unwrap();
        }
        assert_eq!(adapter.process().await, 3);
        assert_eq!(adapter.process().await, 0);

        assert_eq!(subscriber.poll(), Some(0));
        assert_eq!(subscriber.poll(), Some(1));
        assert_eq!(subscriber.poll(), Some(2));
    }

    #[tokio::test]
    async fn test_push_mode_delivers_until_stopped() {
        let manager = Arc::new(EventManager::new(16));
        let queue = Queue::new("bus", 16);
        let sender = queue.send_queue();
        let adapter = EventBusQueueAdapter::new("news", Arc::clone(&manager), &queue).unwrap();
        let mut subscriber = manager.subscribe("news").unwrap();

        adapter.start();
        sender.send(7u32).await.unwrap();
        assert_eq!(
            subscriber.poll_wait(Duration::from_millis(500)).await,
            Some(7)
        );

        adapter.stop().await;
        sender.send(8).await.unwrap();
        assert_eq!(subscriber.poll_wait(Duration::from_millis(50)).await, None);
    }

    #[tokio::test]
    async fn test_adapter_claims_the_consumer() {
        let manager = Arc::new(EventManager::<u32>::new(16));
        let queue = Queue::new("bus", 16);
        let _adapter = EventBusQueueAdapter::new("news", manager, &queue).unwrap();
        assert!(matches!(
            queue.receive_queue(),
            Err(QueueError::ConsumerClaimed { .. })
        ));
    }
}
