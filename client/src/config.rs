//
// Copyright 2026 The Teleterm Developers. All Rights Reserved.
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

//! Session configuration.

use std::time::Duration;
use teleterm_screen::BLINK_TOGGLE_TICKS;

/// Terminal session configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server hostname or IP address.
    pub host: String,

    /// Server port.
    pub port: u16,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Cadence of the screen tick driving cursor blink.
    pub tick_interval: Duration,

    /// Ticks between cursor visibility toggles.
    pub blink_toggle_ticks: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 23,
            connect_timeout: Duration::from_secs(10),
            tick_interval: Duration::from_millis(16),
            blink_toggle_ticks: BLINK_TOGGLE_TICKS,
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with the given host and port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Set the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the screen tick cadence.
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Set the number of ticks between cursor blink toggles.
    pub fn with_blink_toggle_ticks(mut self, ticks: u32) -> Self {
        self.blink_toggle_ticks = ticks;
        self
    }

    /// Get the server address as a string.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
