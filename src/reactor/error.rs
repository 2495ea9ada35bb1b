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

//! Error types for callback construction.

use thiserror::Error;

/// Misuse conditions caught when assembling a callback.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallbackError {
    /// A timeout or error handler was configured without a reactor to
    /// schedule it. Failing here keeps callers from believing they have
    /// timeout protection when nothing will ever scan the deadline.
    #[error("timeout and error handling require a registered reactor")]
    ReactorRequired,

    /// No result handler was supplied.
    #[error("a callback requires a result handler")]
    MissingResultHandler,
}
