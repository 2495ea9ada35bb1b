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

//! Bounded MPSC queue with a single claimable consumer.

use super::error::QueueError;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

/// A named, bounded handoff between many producers and one consumer.
///
/// The queue itself is a handle factory: producers clone [`SendQueue`]s
/// freely, while the consumer side is claimed exactly once, either as a
/// [`ReceiveQueue`] for pull-style draining or by [`Queue::start_listener`]
/// for push-driven delivery. Items from a single producer arrive in push
/// order; no order is guaranteed across producers.
pub struct Queue<T> {
    name: Arc<str>,
    capacity: usize,
    sender: mpsc::Sender<T>,
    receiver: Mutex<Option<mpsc::Receiver<T>>>,
    closed: Arc<AtomicBool>,
    shutdown: watch::Sender<bool>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl<T> Queue<T> {
    /// Creates a queue holding at most `capacity` buffered items.
    #[must_use]
    pub fn new(name: impl Into<String>, capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity);
        let (shutdown, _) = watch::channel(false);
        Self {
            name: name.into().into(),
            capacity,
            sender,
            receiver: Mutex::new(Some(receiver)),
            closed: Arc::new(AtomicBool::new(false)),
            shutdown,
            listener: Mutex::new(None),
        }
    }

    /// Name given at construction.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Maximum number of buffered items.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns a clonable producer handle.
    #[must_use]
    pub fn send_queue(&self) -> SendQueue<T> {
        SendQueue {
            name: Arc::clone(&self.name),
            capacity: self.capacity,
            sender: self.sender.clone(),
            closed: Arc::clone(&self.closed),
        }
    }

    /// Claims the single consumer handle.
    ///
    /// Fails with [`QueueError::ConsumerClaimed`] if the handle was already
    /// taken, by an earlier call or by a listener.
    pub fn receive_queue(&self) -> Result<ReceiveQueue<T>, QueueError> {
        let receiver =
            self.receiver
                .lock()
                .take()
                .ok_or_else(|| QueueError::ConsumerClaimed {
                    name: self.name.to_string(),
                })?;
        Ok(ReceiveQueue {
            name: Arc::clone(&self.name),
            receiver,
            shutdown: self.shutdown.subscribe(),
        })
    }
}

impl<T: Send + 'static> Queue<T> {
    /// Spawns the consumer loop, invoking `handler` for each item in
    /// arrival order.
    ///
    /// Only one listener may ever be started per queue; this claims the
    /// consumer handle.
    pub fn start_listener<F>(&self, mut handler: F) -> Result<(), QueueError>
    where
        F: FnMut(T) + Send + 'static,
    {
        let mut receive = self.receive_queue()?;
        let name = Arc::clone(&self.name);
        let handle = tokio::spawn(async move {
            while let Some(item) = receive.recv().await {
                handler(item);
            }
            debug!(queue = %name, "listener drained and exiting");
        });
        *self.listener.lock() = Some(handle);
        Ok(())
    }

    /// Stops the queue gracefully.
    ///
    /// Producers observe [`QueueError::Closed`] immediately; the consumer
    /// (or listener) still receives every item enqueued before the stop,
    /// then terminates. Awaits listener completion when one was started.
    pub async fn stop(&self) {
        self.closed.store(true, Ordering::SeqCst);
        let _ = self.shutdown.send(true);
        let handle = self.listener.lock().take();
        if let Some(handle) = handle {
            if handle.await.is_err() {
                debug!(queue = %self.name, "listener task panicked during stop");
            }
        }
    }
}

impl<T> std::fmt::Debug for Queue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Queue")
            .field("name", &self.name)
            .field("capacity", &self.capacity)
            .field("closed", &self.closed.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Clonable producer side of a [`Queue`].
pub struct SendQueue<T> {
    name: Arc<str>,
    capacity: usize,
    sender: mpsc::Sender<T>,
    closed: Arc<AtomicBool>,
}

impl<T> SendQueue<T> {
    /// Name of the owning queue.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Enqueues an item, waiting for capacity when the queue is full.
    pub async fn send(&self, item: T) -> Result<(), QueueError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(QueueError::Closed {
                name: self.name.to_string(),
            });
        }
        self.sender
            .send(item)
            .await
            .map_err(|_| QueueError::Closed {
                name: self.name.to_string(),
            })
    }

    /// Enqueues an item without waiting.
    pub fn try_send(&self, item: T) -> Result<(), QueueError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(QueueError::Closed {
                name: self.name.to_string(),
            });
        }
        self.sender.try_send(item).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => QueueError::Full {
                name: self.name.to_string(),
                capacity: self.capacity,
            },
            mpsc::error::TrySendError::Closed(_) => QueueError::Closed {
                name: self.name.to_string(),
            },
        })
    }
}

impl<T> Clone for SendQueue<T> {
    fn clone(&self) -> Self {
        Self {
            name: Arc::clone(&self.name),
            capacity: self.capacity,
            sender: self.sender.clone(),
            closed: Arc::clone(&self.closed),
        }
    }
}

impl<T> std::fmt::Debug for SendQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendQueue")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// The single consumer side of a [`Queue`].
pub struct ReceiveQueue<T> {
    name: Arc<str>,
    receiver: mpsc::Receiver<T>,
    shutdown: watch::Receiver<bool>,
}

impl<T> ReceiveQueue<T> {
    /// Name of the owning queue.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Waits for the next item.
    ///
    /// Returns `None` once the queue is stopped and every item enqueued
    /// before the stop has been delivered.
    pub async fn recv(&mut self) -> Option<T> {
        if *self.shutdown.borrow() {
            return self.receiver.try_recv().ok();
        }
        tokio::select! {
            item = self.receiver.recv() => item,
            _ = self.shutdown.changed() => self.receiver.try_recv().ok(),
        }
    }

    /// Returns the next item if one is already buffered.
    pub fn poll(&mut self) -> Option<T> {
        self.receiver.try_recv().ok()
    }

    /// Waits up to `wait` for the next item.
    pub async fn poll_wait(&mut self, wait: Duration) -> Option<T> {
        tokio::time::timeout(wait, self.recv()).await.ok().flatten()
    }

    /// Drains up to `max` already-buffered items without waiting.
    pub fn take_batch(&mut self, max: usize) -> Vec<T> {
        let mut batch = Vec::new();
        while batch.len() < max {
            match self.receiver.try_recv() {
                Ok(item) => batch.push(item),
                Err(_) => break,
            }
        }
        batch
    }
}

impl<T> std::fmt::Debug for ReceiveQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReceiveQueue")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
