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

//! Integration tests for service dispatch and response correlation.
//!
//! These tests verify that:
//! - Registered services receive calls by address-prefix match
//! - Responses resolve pending callbacks exactly once
//! - Unknown methods and addresses produce error responses, never drops
//! - Out-of-order responses reach the right callbacks
//! - Queue lifecycle hooks fire as the worker drains

// Route test logging through RUST_LOG
#[ctor::ctor]
fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

use microbus::config::{BundleConfig, ServiceConfig};
use microbus::message::MethodCall;
use microbus::reactor::CallbackFuture;
use microbus::service::{Service, ServiceBundle, ServiceError};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Employee directory used as a dispatch target.
struct EmployeeDirectory {
    names: Vec<String>,
    empty_hook_hits: Arc<AtomicU32>,
}

impl EmployeeDirectory {
    fn new() -> (Self, Arc<AtomicU32>) {
        let hits = Arc::new(AtomicU32::new(0));
        (
            Self {
                names: Vec::new(),
                empty_hook_hits: Arc::clone(&hits),
            },
            hits,
        )
    }
}

impl Service for EmployeeDirectory {
    fn invoke(
        &mut self,
        method: &str,
        args: &[Value],
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        match method {
            "add" => {
                let name = args
                    .first()
                    .and_then(Value::as_str)
                    .ok_or("add requires a name")?;
                self.names.push(name.to_string());
                Ok(json!(self.names.len()))
            }
            "list" => Ok(json!(self.names)),
            other => Err(format!("no such method '{}'", other).into()),
        }
    }

    fn queue_empty(&mut self) {
        self.empty_hook_hits.fetch_add(1, Ordering::SeqCst);
    }
}

fn new_bundle() -> ServiceBundle {
    ServiceBundle::new(&ServiceConfig::default(), BundleConfig::default())
}

fn new_call(bundle: &ServiceBundle, address: &str, method: &str, args: Vec<Value>) -> MethodCall {
    MethodCall::new(bundle.next_id(), address, "clientA", "emp", method).with_body(args)
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}

#[tokio::test]
async fn test_call_reaches_service_and_callback() {
    let bundle = new_bundle();
    bundle.start().unwrap();
    let (directory, _) = EmployeeDirectory::new();
    bundle.register("/emp", directory).unwrap();

    let (tx, rx) = std::sync::mpsc::channel();
    let callback = Arc::new(CallbackFuture::from_result_handler(move |value: Value| {
        tx.send(value).unwrap();
    }));
    let call = new_call(&bundle, "/services/emp/add", "add", vec![json!("Rick")]);
    bundle.call_with_callback(call, callback).await.unwrap();
    settle().await;

    assert_eq!(rx.try_recv().unwrap(), json!(1));
    assert_eq!(bundle.pending_calls(), 0);
    bundle.stop().await;
}

#[tokio::test]
async fn test_unknown_method_resolves_callback_as_failure() {
    let bundle = new_bundle();
    bundle.start().unwrap();
    let (directory, _) = EmployeeDirectory::new();
    bundle.register("/emp", directory).unwrap();

    let callback = Arc::new(CallbackFuture::from_result_handler(|_: Value| {
        panic!("success handler must not run");
    }));
    let probe = Arc::clone(&callback);
    let call = new_call(&bundle, "/emp/readEmployee", "readEmployee", vec![]);
    bundle.call_with_callback(call, callback).await.unwrap();
    settle().await;

    assert!(probe.is_resolved());
    assert_eq!(bundle.pending_calls(), 0);
    bundle.stop().await;
}

#[tokio::test]
async fn test_unknown_address_yields_error_response() {
    let bundle = new_bundle();
    bundle.start().unwrap();

    let mut replies = bundle.reply_queue("clientA").unwrap();
    let call = new_call(&bundle, "/missing/thing", "thing", vec![]);
    bundle.call(call).await.unwrap();

    let response = replies
        .poll_wait(Duration::from_millis(500))
        .await
        .expect("error response must arrive");
    assert!(response.was_errors());
    bundle.stop().await;
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected() {
    let bundle = new_bundle();
    let (first, _) = EmployeeDirectory::new();
    let (second, _) = EmployeeDirectory::new();
    bundle.register("/emp", first).unwrap();
    assert!(matches!(
        bundle.register("/emp", second),
        Err(ServiceError::AddressAlreadyBound { .. })
    ));
    bundle.stop().await;
}

#[tokio::test]
async fn test_out_of_order_responses_hit_the_right_callbacks() {
    let bundle = new_bundle();
    bundle.start().unwrap();
    let (directory, _) = EmployeeDirectory::new();
    bundle.register("/emp", directory).unwrap();

    let (tx, rx) = std::sync::mpsc::channel();
    for name in ["a", "b", "c"] {
        let tx = tx.clone();
        let name = name.to_string();
        let name_for_callback = name.clone();
        let callback = Arc::new(CallbackFuture::from_result_handler(move |value: Value| {
            tx.send((name_for_callback, value)).unwrap();
        }));
        let call = new_call(&bundle, "/emp/add", "add", vec![json!(name.clone())]);
        bundle.call_with_callback(call, callback).await.unwrap();
    }
    settle().await;

    let mut outcomes: Vec<(String, Value)> = rx.try_iter().collect();
    outcomes.sort_by(|a, b| a.0.cmp(&b.0));
    assert_eq!(
        outcomes,
        vec![
            ("a".to_string(), json!(1)),
            ("b".to_string(), json!(2)),
            ("c".to_string(), json!(3)),
        ]
    );
    assert_eq!(bundle.pending_calls(), 0);
    bundle.stop().await;
}

#[tokio::test]
async fn test_queue_empty_hook_fires_after_drain() {
    let bundle = new_bundle();
    bundle.start().unwrap();
    let (directory, hits) = EmployeeDirectory::new();
    bundle.register("/emp", directory).unwrap();

    let call = new_call(&bundle, "/emp/add", "add", vec![json!("x")]);
    bundle.call(call).await.unwrap();
    settle().await;

    assert!(hits.load(Ordering::SeqCst) >= 1);
    bundle.stop().await;
}

#[tokio::test]
async fn test_flush_pushes_buffered_responses() {
    // A large batch threshold keeps the worker buffering until the drain
    // or an explicit flush pushes responses out.
    let bundle = ServiceBundle::new(
        &ServiceConfig::default(),
        BundleConfig::new().with_flush_batch_size(1000),
    );
    bundle.start().unwrap();
    let (directory, _) = EmployeeDirectory::new();
    bundle.register("/emp", directory).unwrap();

    let mut replies = bundle.reply_queue("clientA").unwrap();
    for name in ["a", "b"] {
        let call = new_call(&bundle, "/emp/add", "add", vec![json!(name)]);
        bundle.call(call).await.unwrap();
    }
    bundle.flush().await.unwrap();
    settle().await;

    let mut seen = 0;
    while replies.poll().is_some() {
        seen += 1;
    }
    assert_eq!(seen, 2);
    bundle.stop().await;
}

#[tokio::test]
async fn test_state_accumulates_in_one_worker() {
    let bundle = new_bundle();
    bundle.start().unwrap();
    let (directory, _) = EmployeeDirectory::new();
    bundle.register("/emp", directory).unwrap();

    for name in ["Rick", "Morty"] {
        let call = new_call(&bundle, "/emp/add", "add", vec![json!(name)]);
        bundle.call(call).await.unwrap();
    }

    let (tx, rx) = std::sync::mpsc::channel();
    let callback = Arc::new(CallbackFuture::from_result_handler(move |value: Value| {
        tx.send(value).unwrap();
    }));
    let call = new_call(&bundle, "/emp/list", "list", vec![]);
    bundle.call_with_callback(call, callback).await.unwrap();
    settle().await;

    assert_eq!(rx.try_recv().unwrap(), json!(["Rick", "Morty"]));
    bundle.stop().await;
}
