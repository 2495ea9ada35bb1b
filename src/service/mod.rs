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

//! Service registration, dispatch, and response correlation.
//!
//! A [`ServiceBundle`] binds address prefixes to [`Service`]
//! implementations, runs each behind its own single-consumer queue, and
//! correlates responses back to pending [`CallbackFuture`]s through a
//! [`CorrelationMap`] keyed by [`HandlerKey`].
//!
//! [`CallbackFuture`]: crate::reactor::CallbackFuture

mod bundle;
mod correlation;
mod error;
mod handler_key;
#[allow(clippy::module_inception)]
mod service;

pub use bundle::ServiceBundle;
pub use correlation::CorrelationMap;
pub use error::ServiceError;
pub use handler_key::HandlerKey;
pub use service::Service;
