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

//! Immutable configuration for bundles and their host process.
//!
//! Construction is consuming `with_*` setters over sensible defaults; a
//! built config never mutates afterwards. The core reads no environment
//! variables; whoever embeds it resolves those and passes values in.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Process-level service settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    port: u16,
    public_host: String,
    public_port: Option<u16>,
    root_uri: String,
    sample_stats_every: u32,
    check_timing_every_x_calls: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            public_host: "localhost".to_string(),
            public_port: None,
            root_uri: "/services".to_string(),
            sample_stats_every: 5,
            check_timing_every_x_calls: 100,
        }
    }
}

impl ServiceConfig {
    /// Creates a config with the stock defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bind port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the host name advertised to peers.
    #[must_use]
    pub fn with_public_host(mut self, host: impl Into<String>) -> Self {
        self.public_host = host.into();
        self
    }

    /// Sets the port advertised to peers when it differs from the bind
    /// port.
    #[must_use]
    pub fn with_public_port(mut self, port: u16) -> Self {
        self.public_port = Some(port);
        self
    }

    /// Sets the address prefix every service lives under.
    #[must_use]
    pub fn with_root_uri(mut self, root_uri: impl Into<String>) -> Self {
        self.root_uri = root_uri.into();
        self
    }

    /// Sets the stats flush cadence in seconds.
    #[must_use]
    pub fn with_sample_stats_every(mut self, seconds: u32) -> Self {
        self.sample_stats_every = seconds;
        self
    }

    /// Sets how many calls pass between timing checks.
    #[must_use]
    pub fn with_check_timing_every_x_calls(mut self, calls: u32) -> Self {
        self.check_timing_every_x_calls = calls;
        self
    }

    /// The bind port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The advertised host name.
    #[must_use]
    pub fn public_host(&self) -> &str {
        &self.public_host
    }

    /// The advertised port, falling back to the bind port.
    #[must_use]
    pub fn public_port(&self) -> u16 {
        self.public_port.unwrap_or(self.port)
    }

    /// The address prefix every service lives under.
    #[must_use]
    pub fn root_uri(&self) -> &str {
        &self.root_uri
    }

    /// Stats flush cadence in seconds.
    #[must_use]
    pub fn sample_stats_every(&self) -> u32 {
        self.sample_stats_every
    }

    /// Calls between timing checks.
    #[must_use]
    pub fn check_timing_every_x_calls(&self) -> u32 {
        self.check_timing_every_x_calls
    }
}

/// Per-bundle queueing and batching policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleConfig {
    queue_capacity: usize,
    flush_batch_size: usize,
    #[serde(with = "duration_millis")]
    prune_interval: Duration,
}

impl Default for BundleConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 1024,
            flush_batch_size: 64,
            prune_interval: Duration::from_secs(1),
        }
    }
}

impl BundleConfig {
    /// Creates a config with the stock defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the capacity of each service's inbound queue.
    #[must_use]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Sets how many buffered responses force a flush.
    #[must_use]
    pub fn with_flush_batch_size(mut self, size: usize) -> Self {
        self.flush_batch_size = size;
        self
    }

    /// Sets how often resolved correlation entries are swept.
    #[must_use]
    pub fn with_prune_interval(mut self, interval: Duration) -> Self {
        self.prune_interval = interval;
        self
    }

    /// Capacity of each service's inbound queue.
    #[must_use]
    pub fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    /// Buffered responses that force a flush.
    #[must_use]
    pub fn flush_batch_size(&self) -> usize {
        self.flush_batch_size
    }

    /// Sweep cadence for resolved correlation entries.
    #[must_use]
    pub fn prune_interval(&self) -> Duration {
        self.prune_interval
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        (value.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.port(), 8080);
        assert_eq!(config.public_host(), "localhost");
        assert_eq!(config.root_uri(), "/services");
        assert_eq!(config.sample_stats_every(), 5);
        assert_eq!(config.check_timing_every_x_calls(), 100);
    }

    #[test]
    fn test_public_port_falls_back_to_port() {
        let config = ServiceConfig::new().with_port(9090);
        assert_eq!(config.public_port(), 9090);
        let config = config.with_public_port(443);
        assert_eq!(config.public_port(), 443);
    }

    #[test]
    fn test_bundle_config_round_trips_as_json() {
        let config = BundleConfig::new()
            .with_queue_capacity(32)
            .with_flush_batch_size(8)
            .with_prune_interval(Duration::from_millis(250));
        let text = serde_json::to_string(&config).unwrap();
        let back: BundleConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
