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

//! Address-prefixed service dispatch.

use super::correlation::CorrelationMap;
use super::error::ServiceError;
use super::handler_key::HandlerKey;
use super::service::Service;
use crate::config::{BundleConfig, ServiceConfig};
use crate::message::{MethodCall, Response};
use crate::queue::{Queue, ReceiveQueue, SendQueue};
use crate::reactor::{CallFailure, CallbackFuture, Reactor};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Work item handed to a service worker.
enum ServiceMessage {
    Call(MethodCall),
    Flush,
}

/// One registered service: its normalized address prefix, inbound queue,
/// and worker task.
struct Registration {
    address: String,
    queue: Arc<Queue<ServiceMessage>>,
    sender: SendQueue<ServiceMessage>,
    worker: JoinHandle<()>,
}

/// Owns the address-to-service mapping and routes calls and responses.
///
/// Each registered [`Service`] gets its own bounded inbound queue and a
/// dedicated worker, so service state is only ever touched from one task.
/// Responses funnel through a shared queue whose router resolves pending
/// callbacks by [`HandlerKey`] and forwards unclaimed responses to
/// per-return-address reply queues.
pub struct ServiceBundle {
    root_uri: String,
    config: BundleConfig,
    reactor: Arc<Reactor>,
    correlation: Arc<CorrelationMap>,
    registrations: Mutex<Vec<Registration>>,
    responses: Queue<Response>,
    response_sender: SendQueue<Response>,
    reply_senders: Arc<Mutex<HashMap<String, SendQueue<Response>>>>,
    reply_queues: Mutex<Vec<Arc<Queue<Response>>>>,
    next_id: AtomicU64,
    started: AtomicBool,
    stopped: AtomicBool,
}

impl ServiceBundle {
    /// Creates a bundle rooted at the service config's root URI.
    #[must_use]
    pub fn new(service_config: &ServiceConfig, config: BundleConfig) -> Self {
        let responses = Queue::new("responses", config.queue_capacity());
        let response_sender = responses.send_queue();
        Self {
            root_uri: service_config.root_uri().to_string(),
            config,
            reactor: Arc::new(Reactor::new()),
            correlation: Arc::new(CorrelationMap::new()),
            registrations: Mutex::new(Vec::new()),
            responses,
            response_sender,
            reply_senders: Arc::new(Mutex::new(HashMap::new())),
            reply_queues: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            started: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
        }
    }

    /// The reactor that scans this bundle's callback deadlines.
    ///
    /// The bundle never ticks it on its own; the embedding process drives
    /// ticks on whatever cadence it processes batches.
    #[must_use]
    pub fn reactor(&self) -> &Arc<Reactor> {
        &self.reactor
    }

    /// Allocates the next message id.
    #[must_use]
    pub fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Number of calls awaiting a response.
    #[must_use]
    pub fn pending_calls(&self) -> usize {
        self.correlation.len()
    }

    /// Starts the response router and the correlation sweep task.
    ///
    /// Idempotent; later calls are no-ops.
    pub fn start(&self) -> Result<(), ServiceError> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        let correlation = Arc::clone(&self.correlation);
        let reply_senders = Arc::clone(&self.reply_senders);
        self.responses.start_listener(move |response| {
            route_response(&correlation, &reply_senders, response);
        })?;

        let correlation = Arc::clone(&self.correlation);
        self.reactor
            .add_repeating_task(self.config.prune_interval(), move || {
                correlation.prune_resolved();
            });
        Ok(())
    }

    /// Binds `address` (a path-segment prefix) to `service` and spawns its
    /// worker.
    ///
    /// A prefix can only be bound once; re-binding is rejected, never
    /// last-wins.
    pub fn register<S: Service>(&self, address: &str, service: S) -> Result<(), ServiceError> {
        if self.stopped.load(Ordering::SeqCst) {
            return Err(ServiceError::Stopped);
        }
        let address = normalize_address(address);
        let mut registrations = self.registrations.lock();
        if registrations.iter().any(|r| r.address == address) {
            return Err(ServiceError::AddressAlreadyBound { address });
        }

        let queue = Arc::new(Queue::new(
            format!("service{}", address),
            self.config.queue_capacity(),
        ));
        let sender = queue.send_queue();
        let inbound = queue.receive_queue()?;
        let worker = tokio::spawn(run_worker(
            address.clone(),
            inbound,
            service,
            self.response_sender.clone(),
            self.config.flush_batch_size(),
        ));
        debug!(%address, "registered service");
        registrations.push(Registration {
            address,
            queue,
            sender,
            worker,
        });
        Ok(())
    }

    /// Routes a call to the service bound to its address.
    ///
    /// An unknown address yields an error [`Response`] on the response
    /// path, never a silent drop.
    pub async fn call(&self, call: MethodCall) -> Result<(), ServiceError> {
        if self.stopped.load(Ordering::SeqCst) {
            return Err(ServiceError::Stopped);
        }
        match self.resolve(call.address()) {
            Some(sender) => {
                sender.send(ServiceMessage::Call(call)).await?;
                Ok(())
            }
            None => {
                warn!(address = %call.address(), "no handler for address");
                let response =
                    Response::error(&call, format!("no handler for address '{}'", call.address()));
                self.response_sender.send(response).await?;
                Ok(())
            }
        }
    }

    /// Files `callback` under the call's correlation key, then routes the
    /// call.
    ///
    /// The key leaves the correlation map exactly once: claimed by the
    /// matching response, or swept after a timeout or cancellation.
    pub async fn call_with_callback(
        &self,
        call: MethodCall,
        callback: Arc<CallbackFuture<Value>>,
    ) -> Result<(), ServiceError> {
        let key = HandlerKey::from_call(&call);
        self.correlation.insert(key.clone(), callback)?;
        if let Err(e) = self.call(call).await {
            self.correlation.remove(&key);
            return Err(e);
        }
        Ok(())
    }

    /// Forces every worker to push its buffered responses now.
    pub async fn flush(&self) -> Result<(), ServiceError> {
        let senders: Vec<_> = self
            .registrations
            .lock()
            .iter()
            .map(|r| r.sender.clone())
            .collect();
        for sender in senders {
            sender.send(ServiceMessage::Flush).await?;
        }
        Ok(())
    }

    /// Claims the stream of responses addressed to `return_address` that
    /// no pending callback claimed.
    pub fn reply_queue(&self, return_address: &str) -> Result<ReceiveQueue<Response>, ServiceError> {
        let mut reply_senders = self.reply_senders.lock();
        if reply_senders.contains_key(return_address) {
            return Err(ServiceError::ReplyQueueClaimed {
                return_address: return_address.to_string(),
            });
        }
        let queue = Arc::new(Queue::new(
            format!("reply:{}", return_address),
            self.config.queue_capacity(),
        ));
        let receive = queue.receive_queue()?;
        reply_senders.insert(return_address.to_string(), queue.send_queue());
        self.reply_queues.lock().push(queue);
        Ok(receive)
    }

    /// Stops the bundle gracefully.
    ///
    /// Service queues drain their already-enqueued calls, workers flush
    /// and exit, then the response router drains and exits. Registrations
    /// do not survive a stop.
    pub async fn stop(&self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        let registrations = std::mem::take(&mut *self.registrations.lock());
        for registration in &registrations {
            registration.queue.stop().await;
        }
        for registration in registrations {
            if registration.worker.await.is_err() {
                warn!(address = %registration.address, "service worker panicked");
            }
        }
        self.responses.stop().await;
        let reply_queues = std::mem::take(&mut *self.reply_queues.lock());
        for queue in reply_queues {
            queue.stop().await;
        }
        debug!("service bundle stopped");
    }

    fn resolve(&self, address: &str) -> Option<SendQueue<ServiceMessage>> {
        let call_segments = path_segments(address);
        let root_segments = path_segments(&self.root_uri);
        let local: &[&str] = if call_segments.len() >= root_segments.len()
            && call_segments[..root_segments.len()] == root_segments[..]
        {
            &call_segments[root_segments.len()..]
        } else {
            &call_segments[..]
        };

        let registrations = self.registrations.lock();
        registrations
            .iter()
            .find(|registration| {
                let prefix = path_segments(&registration.address);
                local.len() >= prefix.len() && local[..prefix.len()] == prefix[..]
            })
            .map(|registration| registration.sender.clone())
    }
}

impl std::fmt::Debug for ServiceBundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceBundle")
            .field("root_uri", &self.root_uri)
            .field("registrations", &self.registrations.lock().len())
            .field("pending_calls", &self.pending_calls())
            .finish_non_exhaustive()
    }
}

/// Normalizes an address to `/segment/segment` form.
fn normalize_address(address: &str) -> String {
    let mut normalized = String::with_capacity(address.len() + 1);
    for segment in path_segments(address) {
        normalized.push('/');
        normalized.push_str(segment);
    }
    normalized
}

fn path_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

async fn run_worker<S: Service>(
    address: String,
    mut inbound: ReceiveQueue<ServiceMessage>,
    mut service: S,
    responses: SendQueue<Response>,
    flush_batch_size: usize,
) {
    let mut outbox: Vec<Response> = Vec::new();
    loop {
        let Some(first) = inbound.recv().await else {
            flush_outbox(&mut outbox, &responses).await;
            break;
        };
        // Drain everything already queued before reporting empty.
        let mut next = Some(first);
        while let Some(message) = next.take() {
            match message {
                ServiceMessage::Call(call) => {
                    outbox.push(dispatch_call(&mut service, &call));
                    if outbox.len() >= flush_batch_size {
                        service.queue_limit(outbox.len());
                        flush_outbox(&mut outbox, &responses).await;
                    }
                }
                ServiceMessage::Flush => flush_outbox(&mut outbox, &responses).await,
            }
            next = inbound.poll();
        }
        service.queue_empty();
        flush_outbox(&mut outbox, &responses).await;
    }
    debug!(%address, "service worker exiting");
}

fn dispatch_call(service: &mut impl Service, call: &MethodCall) -> Response {
    let method = if call.method_name().is_empty() {
        call.address()
            .rsplit('/')
            .find(|s| !s.is_empty())
            .unwrap_or_default()
    } else {
        call.method_name()
    };
    match service.invoke(method, call.body()) {
        Ok(value) => Response::ok(call, Some(value)),
        Err(error) => {
            debug!(address = %call.address(), method, %error, "service method failed");
            Response::error(call, error.to_string())
        }
    }
}

async fn flush_outbox(outbox: &mut Vec<Response>, responses: &SendQueue<Response>) {
    for response in outbox.drain(..) {
        if let Err(e) = responses.send(response).await {
            warn!(error = %e, "dropping response, response queue unavailable");
        }
    }
}

/// Resolves or forwards one response: a pending callback claims it by
/// key, otherwise it goes to the return address's reply queue.
fn route_response(
    correlation: &CorrelationMap,
    reply_senders: &Mutex<HashMap<String, SendQueue<Response>>>,
    response: Response,
) {
    let key = HandlerKey::from_response(&response);
    if let Some(callback) = correlation.remove(&key) {
        let was_errors = response.was_errors();
        let body = response.into_body();
        if was_errors {
            let message = body
                .as_ref()
                .and_then(Value::as_str)
                .unwrap_or("service call failed")
                .to_string();
            let mut failure = CallFailure::new(message);
            if let Some(detail) = body {
                failure = failure.with_detail(detail);
            }
            callback.fail(failure);
        } else {
            callback.accept(body.unwrap_or(Value::Null));
        }
        return;
    }

    let sender = reply_senders.lock().get(response.return_address()).cloned();
    match sender {
        Some(sender) => {
            if let Err(e) = sender.try_send(response) {
                warn!(error = %e, "reply queue rejected response");
            }
        }
        None => {
            debug!(key = %key, "dropping response with no callback or reply queue");
        }
    }
}
